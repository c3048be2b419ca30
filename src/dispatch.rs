//! Invocation dispatcher - routes a function name and ordered arguments
//! to the right handler and packages a uniform response.
//!
//! Every invocation runs against a write-staging overlay of the store;
//! the staged writes reach the backing store only when the handler
//! succeeds, so a failure commits nothing.

use tracing::{error, info};

use crate::config::SeedConfig;
use crate::error::{Error, Result};
use crate::lifecycle;
use crate::repository;
use crate::store::{StagedStore, StateStore};
use crate::types::{Account, Commodity, parse_timestamp};

/// Uniform invocation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// Response returned to the invoking platform: a JSON-array payload for
/// queries (empty for mutations), a human-readable message, and the
/// machine-readable error kind on failure.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: ResponseStatus,
    pub payload: Vec<u8>,
    pub message: String,
    pub error_kind: Option<&'static str>,
}

impl Response {
    fn success(payload: Vec<u8>) -> Self {
        Self {
            status: ResponseStatus::Success,
            payload,
            message: String::new(),
            error_kind: None,
        }
    }

    fn failure(err: &Error) -> Self {
        Self {
            status: ResponseStatus::Failure,
            payload: Vec::new(),
            message: err.to_string(),
            error_kind: Some(err.kind()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

fn expect_arity(function: &str, args: &[String], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::Validation(format!(
            "{function} expects {expected} args, got {}",
            args.len()
        )));
    }
    Ok(())
}

fn to_payload<T: serde::Serialize>(list: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec(list).map_err(|e| Error::Persistence(format!("encode payload: {e}")))
}

fn invoke(store: &mut dyn StateStore, function: &str, args: &[String]) -> Result<Vec<u8>> {
    match function {
        "createCommodity" => {
            expect_arity(function, args, 5)?;
            repository::create_commodity(store, &args[0], &args[1], &args[2], &args[3], &args[4])?;
            Ok(Vec::new())
        }
        "createOrder" => {
            expect_arity(function, args, 6)?;
            repository::create_order(
                store, &args[0], &args[1], &args[2], &args[3], &args[4], &args[5],
            )?;
            Ok(Vec::new())
        }
        "queryCommodityList" => {
            if args.len() > 1 {
                return Err(Error::Validation(format!(
                    "{function} expects at most 1 arg, got {}",
                    args.len()
                )));
            }
            let list = repository::list_commodities(store, args.first().map(String::as_str))?;
            to_payload(&list)
        }
        "queryOrderList" => {
            if args.len() > 1 {
                return Err(Error::Validation(format!(
                    "{function} expects at most 1 arg, got {}",
                    args.len()
                )));
            }
            let list = repository::list_orders(store, args.first().map(String::as_str))?;
            to_payload(&list)
        }
        "queryAccount" => {
            expect_arity(function, args, 1)?;
            let list = repository::list_accounts(store, &args[0])?;
            to_payload(&list)
        }
        "updateOrderStatus" => {
            // Order id, symbolic status code, and the reference timestamp
            // the transition (and any settlement) is computed against.
            expect_arity(function, args, 3)?;
            if args[0].is_empty() || args[1].is_empty() || args[2].is_empty() {
                return Err(Error::Validation("empty argument".to_string()));
            }
            let as_of = parse_timestamp(&args[2])?;
            lifecycle::update_order_status(store, &args[0], &args[1], as_of)?;
            Ok(Vec::new())
        }
        other => Err(Error::Validation(format!("unsupported function: {other}"))),
    }
}

/// Execute one invocation atomically against the store.
pub fn dispatch(store: &mut dyn StateStore, function: &str, args: &[String]) -> Response {
    let mut staged = StagedStore::new(store);
    match invoke(&mut staged, function, args) {
        Ok(payload) => match staged.commit() {
            Ok(()) => Response::success(payload),
            Err(e) => {
                error!(function, %e, "commit failed");
                Response::failure(&e)
            }
        },
        Err(e) => {
            // Overlay dropped; nothing staged reaches the store.
            info!(function, %e, "invocation failed");
            Response::failure(&e)
        }
    }
}

/// Seed the world state with the configured accounts and commodities.
/// Runs once at ledger initialization, atomically.
pub fn init_ledger(store: &mut dyn StateStore, seeds: &SeedConfig) -> Result<()> {
    let mut staged = StagedStore::new(store);

    for seed in &seeds.accounts {
        let account = Account {
            id: seed.id.clone(),
            name: seed.name.clone(),
            balance: seed.balance,
        };
        repository::put_account(&mut staged, &account)?;
    }
    for seed in &seeds.commodities {
        let commodity = Commodity {
            name: seed.name.clone(),
            id: seed.id.clone(),
            location: seed.location.clone(),
            price: seed.price,
            owner_id: seed.owner.clone(),
        };
        repository::put_commodity(&mut staged, &commodity)?;
    }

    staged.commit()?;
    info!(
        accounts = seeds.accounts.len(),
        commodities = seeds.commodities.len(),
        "ledger initialized"
    );
    Ok(())
}
