//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the toolroom domain.

mod actor;
mod errors;
mod ids;
mod press;
mod state_machine;
mod timestamp;

pub use actor::Actor;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MetalSheetId, ReadingId, RegenerationId, ToolId, TroubleReportId, UserId};
pub use press::{PressNumber, MAX_PRESS_NUMBER};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
