//! Unit stat table and troop compositions

pub mod composition;
pub mod stats;

pub use composition::{TroopComposition, TroopInventory};
pub use stats::{UnitCategory, UnitOverride, UnitStatTable, UnitType};
