//! Entity repository - encode/decode and persist ledger records
//!
//! Validation always runs to completion before the first write, so a
//! failing operation stages nothing.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{Error, Result};
use crate::store::{Namespace, StateStore};
use crate::types::{Account, Commodity, Order, OrderStatus, parse_price, parse_timestamp};

/// Sentinel id meaning "every account" for `list_accounts`.
pub const ALL_ACCOUNTS: &str = "all";

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::Persistence(format!("encode: {e}")))
}

fn decode<T: DeserializeOwned>(ns: Namespace, id: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::Decode(format!("{ns} {id:?}: {e}")))
}

fn get_entity<T: DeserializeOwned>(
    store: &dyn StateStore,
    ns: Namespace,
    id: &str,
) -> Result<Option<T>> {
    match store.get(ns, id)? {
        Some(bytes) => Ok(Some(decode(ns, id, &bytes)?)),
        None => Ok(None),
    }
}

fn list_entities<T: DeserializeOwned>(
    store: &dyn StateStore,
    ns: Namespace,
    id_filter: Option<&str>,
) -> Result<Vec<T>> {
    match id_filter {
        // Fully specified id: exact lookup, 0 or 1 results.
        Some(id) => {
            if id.is_empty() {
                return Err(Error::Validation(format!("empty {ns} id filter")));
            }
            Ok(get_entity(store, ns, id)?.into_iter().collect())
        }
        // No filter: full namespace scan. The iterator is consumed (and
        // therefore released) inside this arm even when a decode fails.
        None => {
            let mut out = Vec::new();
            for (id, bytes) in store.scan_all(ns)? {
                out.push(decode(ns, &id, &bytes)?);
            }
            Ok(out)
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(format!("empty field {field:?}")));
    }
    Ok(())
}

pub fn get_account(store: &dyn StateStore, id: &str) -> Result<Option<Account>> {
    get_entity(store, Namespace::Account, id)
}

pub fn put_account(store: &mut dyn StateStore, account: &Account) -> Result<()> {
    let bytes = encode(account)?;
    store.put(Namespace::Account, &account.id, bytes)
}

pub fn get_commodity(store: &dyn StateStore, id: &str) -> Result<Option<Commodity>> {
    get_entity(store, Namespace::Commodity, id)
}

pub fn put_commodity(store: &mut dyn StateStore, commodity: &Commodity) -> Result<()> {
    let bytes = encode(commodity)?;
    store.put(Namespace::Commodity, &commodity.id, bytes)
}

pub fn get_order(store: &dyn StateStore, id: &str) -> Result<Option<Order>> {
    get_entity(store, Namespace::Order, id)
}

pub fn put_order(store: &mut dyn StateStore, order: &Order) -> Result<()> {
    let bytes = encode(order)?;
    store.put(Namespace::Order, &order.id, bytes)
}

/// Create a commodity listing. Ids are unique within the commodity
/// namespace; the record is immutable once written.
pub fn create_commodity(
    store: &mut dyn StateStore,
    name: &str,
    id: &str,
    location: &str,
    price: &str,
    owner_id: &str,
) -> Result<()> {
    require("name", name)?;
    require("id", id)?;
    require("location", location)?;
    require("price", price)?;
    require("ownerId", owner_id)?;

    let price = parse_price(price)?;

    if store.get(Namespace::Commodity, id)?.is_some() {
        return Err(Error::AlreadyExists(format!("commodity {id:?}")));
    }

    let commodity = Commodity {
        name: name.to_string(),
        id: id.to_string(),
        location: location.to_string(),
        price,
        owner_id: owner_id.to_string(),
    };
    put_commodity(store, &commodity)?;
    info!(id, name, %price, "commodity created");
    Ok(())
}

/// Exact lookup when a filter id is given, full namespace scan otherwise.
/// Always returns a list, possibly empty.
pub fn list_commodities(store: &dyn StateStore, id_filter: Option<&str>) -> Result<Vec<Commodity>> {
    list_entities(store, Namespace::Commodity, id_filter)
}

/// Create an order against an existing commodity. The commodity is
/// snapshotted by value into the order, and the status is forced to
/// `New` regardless of the caller-supplied status argument.
pub fn create_order(
    store: &mut dyn StateStore,
    commodity_id: &str,
    id: &str,
    order_time: &str,
    status: &str,
    buyer_id: &str,
    seller_id: &str,
) -> Result<()> {
    require("commodityId", commodity_id)?;
    require("id", id)?;
    require("orderTime", order_time)?;
    require("status", status)?;
    require("buyerId", buyer_id)?;
    require("sellerId", seller_id)?;

    let commodity = get_commodity(store, commodity_id)?
        .ok_or_else(|| Error::NotFound(format!("commodity {commodity_id:?}")))?;

    let order_time = parse_timestamp(order_time)?;

    if store.get(Namespace::Order, id)?.is_some() {
        return Err(Error::AlreadyExists(format!("order {id:?}")));
    }

    let order = Order {
        commodity,
        id: id.to_string(),
        order_time,
        status: OrderStatus::New,
        buyer_id: buyer_id.to_string(),
        seller_id: seller_id.to_string(),
    };
    put_order(store, &order)?;
    info!(id, commodity_id, buyer = buyer_id, seller = seller_id, "order created");
    Ok(())
}

pub fn list_orders(store: &dyn StateStore, id_filter: Option<&str>) -> Result<Vec<Order>> {
    list_entities(store, Namespace::Order, id_filter)
}

/// Account query. The literal `"all"` means no filter; any other value
/// is an exact id lookup with 0 or 1 results.
pub fn list_accounts(store: &dyn StateStore, id_or_all: &str) -> Result<Vec<Account>> {
    require("accountId", id_or_all)?;
    if id_or_all == ALL_ACCOUNTS {
        list_entities(store, Namespace::Account, None)
    } else {
        list_entities(store, Namespace::Account, Some(id_or_all))
    }
}
