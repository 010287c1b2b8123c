//! Audit trail for mutable entities.
//!
//! Every attributable mutation of a tool, metal sheet or trouble report
//! appends a [`Mod`] to the entity's [`ModHistory`]. The history is stored
//! with the entity and is never truncated or reordered.

mod audited;
mod modification;

pub use audited::{Audited, Draft};
pub use modification::{Mod, ModHistory};
