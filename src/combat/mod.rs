//! Combat outcome simulation
//!
//! A pure, reentrant oracle: troop compositions and a wall level in,
//! predicted losses and wall levels out.

pub mod constants;
pub mod simulator;
pub mod wall;
pub mod what_if;

pub use simulator::{simulate, CombatModifiers, SimulationResult};
pub use wall::{post_combat_wall, pre_combat_wall};
pub use what_if::{rank_templates, TemplateOutlook};
