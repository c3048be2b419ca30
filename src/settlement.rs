//! Settlement engine - the monetary transfer behind a finished order
//!
//! A straight two-party transfer: the buyer pays the seller for the
//! elapsed rental time at the snapshotted commodity price. Balances have
//! no lower bound, so the buyer may go negative.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{Error, Result};
use crate::repository::{get_account, put_account};
use crate::store::StateStore;
use crate::types::Order;

const SECONDS_PER_HOUR: i64 = 3600;

/// Amount owed for an order settled at `as_of`: elapsed hours times the
/// snapshotted commodity price, in exact decimal arithmetic.
pub fn settlement_amount(order: &Order, as_of: NaiveDateTime) -> Decimal {
    let elapsed = as_of - order.order_time;
    let hours = Decimal::from(elapsed.num_seconds()) / Decimal::from(SECONDS_PER_HOUR);
    hours * order.commodity.price
}

/// Apply the transfer for an order reaching its terminal done status.
/// Both party accounts must exist; the reference timestamp is an explicit
/// input so re-execution on another validator computes the same amount.
pub fn settle(store: &mut dyn StateStore, order: &Order, as_of: NaiveDateTime) -> Result<()> {
    let mut buyer = get_account(store, &order.buyer_id)?
        .ok_or_else(|| Error::NotFound(format!("buyer account {:?}", order.buyer_id)))?;
    let mut seller = get_account(store, &order.seller_id)?
        .ok_or_else(|| Error::NotFound(format!("seller account {:?}", order.seller_id)))?;

    let amount = settlement_amount(order, as_of);
    buyer.balance -= amount;
    seller.balance += amount;

    put_account(store, &buyer)?;
    put_account(store, &seller)?;

    info!(
        order = %order.id,
        %amount,
        buyer = %buyer.id,
        seller = %seller.id,
        "order settled"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{create_commodity, create_order, get_order};
    use crate::store::MemLedger;
    use crate::types::{Account, parse_timestamp};

    fn seeded_ledger() -> MemLedger {
        let mut ledger = MemLedger::new();
        for (id, name) in [("1", "供货商"), ("2", "物流商"), ("3", "买家")] {
            let account = Account {
                id: id.to_string(),
                name: name.to_string(),
                balance: Decimal::from(1000),
            };
            put_account(&mut ledger, &account).unwrap();
        }
        create_commodity(&mut ledger, "国光", "c1", "中国", "10", "1").unwrap();
        create_order(&mut ledger, "c1", "o1", "2021-01-01 00:00:00", "New", "3", "1").unwrap();
        ledger
    }

    #[test]
    fn transfer_is_elapsed_hours_times_price() {
        let mut ledger = seeded_ledger();
        let order = get_order(&ledger, "o1").unwrap().unwrap();

        settle(&mut ledger, &order, parse_timestamp("2021-01-01 06:00:00").unwrap()).unwrap();

        let buyer = get_account(&ledger, "3").unwrap().unwrap();
        let seller = get_account(&ledger, "1").unwrap().unwrap();
        let third = get_account(&ledger, "2").unwrap().unwrap();
        assert_eq!(buyer.balance, Decimal::from(940));
        assert_eq!(seller.balance, Decimal::from(1060));
        assert_eq!(third.balance, Decimal::from(1000));
    }

    #[test]
    fn fractional_hours_settle_exactly() {
        let mut ledger = seeded_ledger();
        let order = get_order(&ledger, "o1").unwrap().unwrap();

        // 90 minutes at price 10 is exactly 15.
        settle(&mut ledger, &order, parse_timestamp("2021-01-01 01:30:00").unwrap()).unwrap();
        let buyer = get_account(&ledger, "3").unwrap().unwrap();
        assert_eq!(buyer.balance, Decimal::from(985));
    }

    #[test]
    fn balance_may_go_negative() {
        let mut ledger = seeded_ledger();
        let order = get_order(&ledger, "o1").unwrap().unwrap();

        settle(&mut ledger, &order, parse_timestamp("2021-01-08 00:00:00").unwrap()).unwrap();
        let buyer = get_account(&ledger, "3").unwrap().unwrap();
        assert_eq!(buyer.balance, Decimal::from(1000 - 168 * 10));
        assert!(buyer.balance.is_sign_negative());
    }

    #[test]
    fn missing_party_account_fails() {
        let mut ledger = seeded_ledger();
        let mut order = get_order(&ledger, "o1").unwrap().unwrap();
        order.buyer_id = "missing".to_string();

        let err = settle(
            &mut ledger,
            &order,
            parse_timestamp("2021-01-01 06:00:00").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
