//! Regeneration domain module.
//!
//! Lifecycle: started (open) → completed, or open → aborted (record deleted).

mod aggregate;
mod status;

pub use aggregate::{NewRegeneration, Regeneration, MAX_REASON_LENGTH};
pub use status::RegenerationStatus;
