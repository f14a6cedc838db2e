//! Battle outcome prediction
//!
//! Both sides are split over the three attack axes (infantry, cavalry,
//! archer). Each round every axis with attack strength fights the share of
//! the defence matching its share of the attacker's food upkeep. An axis
//! that overpowers its share kills it outright and loses `sqrt(1/a)/a` of
//! its own units; an axis that falls short is wiped after killing
//! `sqrt(a)*a` of its share. Rounds repeat until one side is gone.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::wall::{post_combat_wall, pre_combat_wall, wall_bonus, wall_flat_defense};
use crate::core::error::{FarmError, Result};
use crate::units::composition::TroopComposition;
use crate::units::stats::{UnitCategory, UnitStatTable, UnitType, RAM};

/// Externally computed battle modifiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatModifiers {
    /// Defence doubles during the server's night bonus
    pub night_bonus: bool,
    /// Attacker morale in percent, (0, 100]
    pub morale_pct: f64,
    /// Attacker luck in percent, [-100, 100]
    pub luck_pct: f64,
}

impl Default for CombatModifiers {
    fn default() -> Self {
        Self {
            night_bonus: false,
            morale_pct: 100.0,
            luck_pct: 0.0,
        }
    }
}

/// Predicted outcome of one engagement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub attacker_losses: TroopComposition,
    pub defender_losses: TroopComposition,
    pub wall_before: u32,
    pub wall_during_combat: u32,
    pub wall_after: u32,
    pub rounds: u32,
}

impl SimulationResult {
    fn no_combat(wall: u32) -> Self {
        Self {
            attacker_losses: TroopComposition::new(),
            defender_losses: TroopComposition::new(),
            wall_before: wall,
            wall_during_combat: wall,
            wall_after: wall,
            rounds: 0,
        }
    }

    /// Attacking units that make it home
    pub fn attacker_survivors(&self, attacker: &TroopComposition) -> TroopComposition {
        attacker
            .iter()
            .map(|(id, count)| (id, count - self.attacker_losses.get(id).min(count)))
            .collect()
    }

    /// Whether every fighting defender died
    pub fn defender_wiped(&self, table: &UnitStatTable, defender: &TroopComposition) -> bool {
        defender
            .iter()
            .filter(|(id, _)| table.get(id).is_some_and(|u| u.fights()))
            .all(|(id, count)| self.defender_losses.get(id) >= count)
    }
}

/// One unit type on one side of the battle
struct Troop<'a> {
    unit: &'a UnitType,
    original: u32,
    current: f64,
}

impl Troop<'_> {
    fn axis(&self) -> usize {
        // Scouts are filtered out before the fight
        self.unit.category.axis_index().unwrap_or(0)
    }
}

fn muster<'a>(table: &'a UnitStatTable, composition: &TroopComposition) -> Result<Vec<Troop<'a>>> {
    let mut troops = Vec::new();
    for (id, count) in composition.iter() {
        let unit = table
            .get(id)
            .ok_or_else(|| FarmError::InvalidCombatInput(format!("unknown unit '{}'", id)))?;
        if unit.fights() {
            troops.push(Troop {
                unit,
                original: count,
                current: f64::from(count),
            });
        }
    }
    // Fixed summation order regardless of map iteration order
    troops.sort_by(|a, b| a.unit.id.cmp(&b.unit.id));
    Ok(troops)
}

fn alive(troops: &[Troop]) -> f64 {
    troops.iter().map(|t| t.current.round()).sum()
}

fn loss_ratio(troops: &[Troop], losses: &TroopComposition) -> f64 {
    let total: u64 = troops.iter().map(|t| u64::from(t.original)).sum();
    if total == 0 {
        return 0.0;
    }
    let lost: u64 = troops.iter().map(|t| u64::from(losses.get(&t.unit.id))).sum();
    lost as f64 / total as f64
}

fn losses_of(troops: &[Troop]) -> TroopComposition {
    troops
        .iter()
        .map(|t| {
            let survivors = t.current.round().clamp(0.0, f64::from(t.original)) as u32;
            (t.unit.id.clone(), t.original - survivors)
        })
        .collect()
}

fn validate(wall_level: u32, modifiers: &CombatModifiers) -> Result<()> {
    if wall_level > MAX_WALL_LEVEL {
        return Err(FarmError::InvalidCombatInput(format!(
            "wall level {} exceeds maximum {}",
            wall_level, MAX_WALL_LEVEL
        )));
    }
    if !modifiers.morale_pct.is_finite() || modifiers.morale_pct <= 0.0 || modifiers.morale_pct > 100.0 {
        return Err(FarmError::InvalidCombatInput(format!(
            "morale {}% outside (0, 100]",
            modifiers.morale_pct
        )));
    }
    if !modifiers.luck_pct.is_finite() || modifiers.luck_pct.abs() > MAX_LUCK_PCT {
        return Err(FarmError::InvalidCombatInput(format!(
            "luck {}% outside [-100, 100]",
            modifiers.luck_pct
        )));
    }
    Ok(())
}

/// Predict losses and wall decay for an attack
pub fn simulate(
    table: &UnitStatTable,
    attacker: &TroopComposition,
    defender: &TroopComposition,
    wall_level: u32,
    modifiers: CombatModifiers,
) -> Result<SimulationResult> {
    validate(wall_level, &modifiers)?;
    let mut attackers = muster(table, attacker)?;
    let mut defenders = muster(table, defender)?;

    if attackers.is_empty() || defenders.is_empty() {
        return Ok(SimulationResult::no_combat(wall_level));
    }

    let rams = attacker.get(RAM);
    let wall_during_combat = pre_combat_wall(wall_level, rams);
    let bonus = wall_bonus(wall_during_combat);
    let flat = wall_flat_defense(wall_during_combat);
    let night = if modifiers.night_bonus { NIGHT_BONUS_MULTIPLIER } else { 1.0 };
    let strength = (modifiers.morale_pct / 100.0) * (1.0 + modifiers.luck_pct / 100.0);

    let mut rounds = 0;
    while rounds < MAX_ROUNDS && alive(&attackers) >= 1.0 && alive(&defenders) >= 1.0 {
        rounds += 1;

        let mut attack = [0.0f64; 3];
        let mut food = [0.0f64; 3];
        for troop in &attackers {
            attack[troop.axis()] += f64::from(troop.unit.attack) * troop.current;
            food[troop.axis()] += f64::from(troop.unit.food_upkeep) * troop.current;
        }
        let total_food: f64 = food.iter().sum();

        let mut defense = [0.0f64; 3];
        for troop in &defenders {
            for (axis, category) in UnitCategory::AXES.iter().enumerate() {
                defense[axis] += f64::from(troop.unit.defense_against(*category)) * troop.current;
            }
        }

        let snapshot: Vec<f64> = defenders.iter().map(|t| t.current).collect();
        let mut engaged = false;

        for axis in 0..3 {
            if attack[axis] <= 0.0 || total_food <= 0.0 {
                continue;
            }
            let share = food[axis] / total_food;
            let resistance = defense[axis] * share * bonus * night + flat * share;
            if resistance <= 0.0 {
                continue;
            }
            engaged = true;

            let a = attack[axis] * strength / resistance;
            if a < 1.0 {
                let killed = a.sqrt() * a * share;
                for (troop, before) in defenders.iter_mut().zip(&snapshot) {
                    troop.current -= before * killed;
                }
                for troop in attackers.iter_mut().filter(|t| t.axis() == axis) {
                    troop.current = 0.0;
                }
            } else {
                let lost = (1.0 / a).sqrt() / a;
                for (troop, before) in defenders.iter_mut().zip(&snapshot) {
                    troop.current -= before * share;
                }
                for troop in attackers.iter_mut().filter(|t| t.axis() == axis) {
                    troop.current -= lost * troop.current;
                }
            }
        }

        for troop in defenders.iter_mut() {
            troop.current = troop.current.max(0.0);
        }

        if !engaged {
            break;
        }
    }

    let attacker_losses = losses_of(&attackers);
    let defender_losses = losses_of(&defenders);

    let ram_attack = table.get(RAM).map(|u| u.attack).unwrap_or(0);
    let wall_after = post_combat_wall(
        wall_level,
        wall_during_combat,
        rams,
        ram_attack,
        loss_ratio(&defenders, &defender_losses),
        loss_ratio(&attackers, &attacker_losses),
    );

    tracing::debug!(
        rounds,
        wall_before = wall_level,
        wall_during_combat,
        wall_after,
        "Simulated battle"
    );

    Ok(SimulationResult {
        attacker_losses,
        defender_losses,
        wall_before: wall_level,
        wall_during_combat,
        wall_after,
        rounds,
    })
}
