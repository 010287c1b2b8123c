//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresCycleReadingRepository` - cumulative readings, ordered by `(stop, id)`
//! - `PostgresRegenerationRepository` - regenerations, one open per tool via a partial unique index
//! - `PostgresToolRepository`, `PostgresMetalSheetRepository`,
//!   `PostgresTroubleReportRepository` - audited entities stored as JSONB
//!
//! The schema lives in `migrations/`.

mod codec;
mod cycle_reading_repository;
mod metal_sheet_repository;
mod regeneration_repository;
mod tool_repository;
mod trouble_report_repository;

pub use cycle_reading_repository::PostgresCycleReadingRepository;
pub use metal_sheet_repository::PostgresMetalSheetRepository;
pub use regeneration_repository::PostgresRegenerationRepository;
pub use tool_repository::PostgresToolRepository;
pub use trouble_report_repository::PostgresTroubleReportRepository;
