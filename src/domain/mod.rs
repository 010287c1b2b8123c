//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, actors, errors)
//! - `history` - Append-only modification history and audited entities
//! - `cycles` - Cumulative cycle readings and partial-cycle arithmetic
//! - `regeneration` - Regeneration records and their lifecycle
//! - `accounting` - Pure rules combining readings with regenerations
//! - `tool`, `metal_sheet`, `trouble_report` - Audited shop-floor entities

pub mod accounting;
pub mod cycles;
pub mod foundation;
pub mod history;
pub mod metal_sheet;
pub mod regeneration;
pub mod tool;
pub mod trouble_report;
