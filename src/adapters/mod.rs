//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory repositories for tests and development
//! - `postgres` - PostgreSQL repositories (sqlx)

pub mod memory;
pub mod postgres;

pub use memory::{
    InMemoryCycleReadingRepository, InMemoryMetalSheetRepository, InMemoryRegenerationRepository,
    InMemoryToolRepository, InMemoryTroubleReportRepository,
};
pub use postgres::{
    PostgresCycleReadingRepository, PostgresMetalSheetRepository, PostgresRegenerationRepository,
    PostgresToolRepository, PostgresTroubleReportRepository,
};
