//! Application layer - Services, Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations over the ports. Cycle accounting and
//! regeneration tracking live in services shared by the handlers; every
//! write to a table happens under that table's lock.

mod accounting;
mod error;
pub mod handlers;
mod ledger;
mod locks;
mod tracker;

pub use accounting::AccountingService;
pub use error::AccountingError;
pub use handlers::*;
pub use ledger::CycleLedger;
pub use locks::{Table, TableLocks};
pub use tracker::RegenerationTracker;
