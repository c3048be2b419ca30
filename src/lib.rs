//! coldchain - Core Library
//! Deterministic state-transition core for a perishable-food supply
//! chain on a shared ledger: accounts, commodity listings, and orders
//! whose completion triggers a monetary settlement.

// Public modules
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod repository;
pub mod settlement;
pub mod store;
pub mod types;

// Re-exports
pub use config::SeedConfig;
pub use dispatch::{Response, ResponseStatus, dispatch, init_ledger};
pub use error::{Error, Result};
pub use store::{MemLedger, Namespace, StateStore};
pub use types::{Account, Commodity, Order, OrderStatus};
