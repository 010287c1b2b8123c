//! In-memory adapters.
//!
//! Tokio `RwLock`-backed implementations of every repository port,
//! used by tests and for running without a database.

mod cycle_readings;
mod entities;
mod regenerations;
mod table;

pub use cycle_readings::InMemoryCycleReadingRepository;
pub use entities::{
    InMemoryMetalSheetRepository, InMemoryToolRepository, InMemoryTroubleReportRepository,
};
pub use regenerations::InMemoryRegenerationRepository;
