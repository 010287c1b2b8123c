//! Pure accounting rules combining the cycle ledger with regenerations.

mod partials;
mod totals;

pub use partials::{
    partial_cycles_across_regenerations, partial_for_reading, resetting_regeneration,
    with_partials,
};
pub use totals::{total_since, Cutoff};
