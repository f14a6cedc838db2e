//! Pre-dispatch what-if evaluation of farm templates
//!
//! The simulator is reentrant, so every template is played against the
//! scouted defence in parallel.

use rayon::prelude::*;
use serde::Serialize;

use super::simulator::{simulate, CombatModifiers, SimulationResult};
use crate::core::error::Result;
use crate::units::composition::TroopComposition;
use crate::units::stats::UnitStatTable;

/// Predicted result of sending one template
#[derive(Debug, Clone, Serialize)]
pub struct TemplateOutlook {
    /// Position of the template in the configured list
    pub index: usize,
    pub result: SimulationResult,
    /// Defenders all died, so the survivors can loot
    pub clears_defence: bool,
    pub units_lost: u64,
    /// Carry capacity of the units expected to come home
    pub surviving_capacity: u64,
}

/// Simulate every template and order them best first
///
/// Templates that clear the defence come first, then fewer losses, then
/// more surviving carry capacity; ties keep configuration order.
pub fn rank_templates(
    table: &UnitStatTable,
    templates: &[TroopComposition],
    defender: &TroopComposition,
    wall_level: u32,
    modifiers: CombatModifiers,
) -> Result<Vec<TemplateOutlook>> {
    let mut outlooks = templates
        .par_iter()
        .enumerate()
        .map(|(index, template)| {
            let result = simulate(table, template, defender, wall_level, modifiers)?;
            let survivors = result.attacker_survivors(template);
            Ok(TemplateOutlook {
                index,
                clears_defence: result.defender_wiped(table, defender),
                units_lost: result.attacker_losses.total(),
                surviving_capacity: survivors.carry_capacity(table),
                result,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    outlooks.sort_by(|a, b| {
        b.clears_defence
            .cmp(&a.clears_defence)
            .then(a.units_lost.cmp(&b.units_lost))
            .then(b.surviving_capacity.cmp(&a.surviving_capacity))
            .then(a.index.cmp(&b.index))
    });
    Ok(outlooks)
}
