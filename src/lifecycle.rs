//! Order lifecycle - one-way status transitions
//!
//! New → Processing → Done, with Canceled as the second terminal state.
//! Transitions only move forward; terminal states accept nothing, so a
//! finished order can never settle twice.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::repository::{get_order, put_order};
use crate::settlement;
use crate::store::StateStore;
use crate::types::{Order, OrderStatus};

fn check_transition(current: OrderStatus, next: OrderStatus) -> Result<()> {
    if current.is_terminal() {
        return Err(Error::Transition(format!(
            "order already terminal in status {current}"
        )));
    }
    if next.rank() <= current.rank() {
        return Err(Error::Transition(format!("cannot move {current} -> {next}")));
    }
    Ok(())
}

/// Apply a status transition to an order located by exact id lookup.
///
/// `as_of` is the reference timestamp for the transition, supplied by the
/// invocation rather than read from a local clock. When the new status is
/// `Done`, settlement runs before the order is persisted.
pub fn update_order_status(
    store: &mut dyn StateStore,
    order_id: &str,
    status_code: &str,
    as_of: NaiveDateTime,
) -> Result<Order> {
    let next = OrderStatus::from_code(status_code)
        .ok_or_else(|| Error::Format(format!("unknown status code {status_code:?}")))?;

    let mut order =
        get_order(store, order_id)?.ok_or_else(|| Error::NotFound(format!("order {order_id:?}")))?;

    if let Err(e) = check_transition(order.status, next) {
        warn!(order = order_id, from = %order.status, to = %next, "transition rejected");
        return Err(e);
    }

    if next == OrderStatus::Done {
        settlement::settle(store, &order, as_of)?;
    }

    order.status = next;
    put_order(store, &order)?;
    info!(order = order_id, status = %next, "order status updated");
    Ok(order)
}
