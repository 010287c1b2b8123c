//! Application handlers.
//!
//! Command and query handlers for the audited registries: tools, metal
//! sheets and trouble reports.

pub mod metal_sheet;
pub mod tool;
pub mod trouble_report;

pub use metal_sheet::{
    AddMetalSheetCommand, AddMetalSheetHandler, DeleteMetalSheetCommand, DeleteMetalSheetHandler,
    GetMetalSheetHandler, GetMetalSheetQuery, ListMetalSheetsHandler, ListMetalSheetsQuery,
    UpdateMetalSheetCommand, UpdateMetalSheetHandler,
};
pub use tool::{
    AbortToolRegenerationCommand, AbortToolRegenerationHandler, AddToolCommand, AddToolHandler,
    FinishToolRegenerationCommand, FinishToolRegenerationHandler, GetToolHandler, GetToolQuery,
    ListToolsHandler, ListToolsQuery, StartToolRegenerationCommand, StartToolRegenerationHandler,
    StartToolRegenerationResult, UpdateToolCommand, UpdateToolHandler,
};
pub use trouble_report::{
    AddTroubleReportCommand, AddTroubleReportHandler, DeleteTroubleReportCommand,
    DeleteTroubleReportHandler, GetTroubleReportHandler, GetTroubleReportQuery,
    ListTroubleReportsHandler, ListTroubleReportsQuery, UpdateTroubleReportCommand,
    UpdateTroubleReportHandler,
};
