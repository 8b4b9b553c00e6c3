//! Legacy (pre-volumetric) calculation path: lot area divided by a flat
//! per-category area table, no storey decomposition.

mod calc;
mod tables;

pub use calc::{consumption, households, lot_units, min_workers, workplaces};
pub use tables::{Consumption, LegacyLevel, LegacyTables};
