//! Toolroom - tool and press management backend
//!
//! Accounts press cycles per tool from cumulative counter readings,
//! tracks tool regenerations (at most one open per tool) and keeps an
//! append-only modification history for every registry entity.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
