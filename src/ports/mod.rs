//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the store. Adapters implement these ports.
//!
//! ## Accounting Ports
//!
//! - `CycleReadingRepository` - Cumulative counter readings per tool
//! - `RegenerationRepository` - Regeneration records, one open per tool
//!
//! ## Entity Ports
//!
//! - `ToolRepository`, `MetalSheetRepository`, `TroubleReportRepository` -
//!   entities persisted together with their modification history

mod cycle_reading_repository;
mod metal_sheet_repository;
mod regeneration_repository;
mod tool_repository;
mod trouble_report_repository;

pub use cycle_reading_repository::CycleReadingRepository;
pub use metal_sheet_repository::MetalSheetRepository;
pub use regeneration_repository::RegenerationRepository;
pub use tool_repository::ToolRepository;
pub use trouble_report_repository::TroubleReportRepository;
