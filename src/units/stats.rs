//! Unit types and their combat/cost properties
//!
//! The default table matches the standard server rules. Servers that
//! publish their own unit data patch it through [`UnitStatTable::apply_overrides`]
//! once at startup; the table is never mutated per simulation.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{FarmError, Result};
use crate::core::types::Resources;
use super::composition::TroopComposition;

/// Unit id of the siege unit that erodes walls
pub const RAM: &str = "ram";

/// Which attack axis a unit fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Infantry,
    Cavalry,
    Archer,
    /// Reconnaissance units never take part in the fight
    Scout,
}

impl UnitCategory {
    /// The three combat axes, in evaluation order
    pub const AXES: [UnitCategory; 3] =
        [UnitCategory::Infantry, UnitCategory::Cavalry, UnitCategory::Archer];

    pub fn axis_index(&self) -> Option<usize> {
        match self {
            UnitCategory::Infantry => Some(0),
            UnitCategory::Cavalry => Some(1),
            UnitCategory::Archer => Some(2),
            UnitCategory::Scout => None,
        }
    }
}

/// Immutable per-server unit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub id: String,
    pub attack: u32,
    pub defense_infantry: u32,
    pub defense_cavalry: u32,
    pub defense_archer: u32,
    pub carry_capacity: u32,
    /// Minutes per field at world/unit speed 1.0
    pub speed: f64,
    pub food_upkeep: u32,
    pub point_value_attack: u32,
    pub point_value_defense: u32,
    pub category: UnitCategory,
    pub cost: Resources,
    /// Seconds at building level 1
    pub build_time: u32,
}

impl UnitType {
    /// Defense value against the given attack axis
    pub fn defense_against(&self, axis: UnitCategory) -> u32 {
        match axis {
            UnitCategory::Infantry => self.defense_infantry,
            UnitCategory::Cavalry => self.defense_cavalry,
            UnitCategory::Archer => self.defense_archer,
            UnitCategory::Scout => 0,
        }
    }

    pub fn fights(&self) -> bool {
        self.category != UnitCategory::Scout
    }
}

/// Partial unit record from server data; `None` keeps the table value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitOverride {
    pub attack: Option<u32>,
    pub defense_infantry: Option<u32>,
    pub defense_cavalry: Option<u32>,
    pub defense_archer: Option<u32>,
    pub carry_capacity: Option<u32>,
    pub speed: Option<f64>,
    pub food_upkeep: Option<u32>,
    pub point_value_attack: Option<u32>,
    pub point_value_defense: Option<u32>,
}

impl UnitOverride {
    fn apply(&self, unit: &mut UnitType) {
        if let Some(v) = self.attack {
            unit.attack = v;
        }
        if let Some(v) = self.defense_infantry {
            unit.defense_infantry = v;
        }
        if let Some(v) = self.defense_cavalry {
            unit.defense_cavalry = v;
        }
        if let Some(v) = self.defense_archer {
            unit.defense_archer = v;
        }
        if let Some(v) = self.carry_capacity {
            unit.carry_capacity = v;
        }
        if let Some(v) = self.speed {
            unit.speed = v;
        }
        if let Some(v) = self.food_upkeep {
            unit.food_upkeep = v;
        }
        if let Some(v) = self.point_value_attack {
            unit.point_value_attack = v;
        }
        if let Some(v) = self.point_value_defense {
            unit.point_value_defense = v;
        }
    }
}

/// Ordered lookup table of unit types
#[derive(Debug, Clone)]
pub struct UnitStatTable {
    units: Vec<UnitType>,
    index: AHashMap<String, usize>,
}

#[allow(clippy::too_many_arguments)]
fn unit(
    id: &str,
    category: UnitCategory,
    attack: u32,
    (defense_infantry, defense_cavalry, defense_archer): (u32, u32, u32),
    (speed, carry_capacity, food_upkeep): (f64, u32, u32),
    (point_value_attack, point_value_defense): (u32, u32),
    (wood, stone, iron): (u32, u32, u32),
    build_time: u32,
) -> UnitType {
    UnitType {
        id: id.to_string(),
        attack,
        defense_infantry,
        defense_cavalry,
        defense_archer,
        carry_capacity,
        speed,
        food_upkeep,
        point_value_attack,
        point_value_defense,
        category,
        cost: Resources::new(wood, stone, iron),
        build_time,
    }
}

impl UnitStatTable {
    pub fn new(units: Vec<UnitType>) -> Self {
        let index = units
            .iter()
            .enumerate()
            .map(|(i, u)| (u.id.clone(), i))
            .collect();
        Self { units, index }
    }

    /// Default unit data of a standard server
    pub fn standard() -> Self {
        use UnitCategory::*;

        Self::new(vec![
            unit("spear", Infantry, 10, (15, 45, 20), (14.0, 25, 1), (1, 4), (50, 30, 20), 840),
            unit("sword", Infantry, 25, (50, 15, 40), (18.0, 15, 1), (2, 5), (30, 30, 70), 1200),
            unit("axe", Infantry, 40, (10, 5, 10), (14.0, 10, 1), (4, 1), (60, 30, 40), 1320),
            unit("archer", Archer, 15, (50, 40, 5), (14.0, 10, 1), (2, 5), (80, 30, 60), 1500),
            unit("spy", Scout, 0, (2, 1, 2), (7.0, 0, 2), (2, 1), (50, 50, 20), 900),
            unit("light", Cavalry, 130, (30, 40, 30), (8.0, 80, 4), (13, 5), (125, 100, 250), 1800),
            unit("marcher", Archer, 150, (40, 30, 50), (8.0, 50, 5), (12, 6), (250, 100, 150), 2200),
            unit("heavy", Cavalry, 150, (200, 80, 180), (9.0, 50, 6), (15, 23), (200, 150, 600), 3200),
            unit(RAM, Infantry, 2, (20, 50, 20), (24.0, 0, 5), (8, 4), (300, 200, 200), 4800),
            unit("catapult", Infantry, 100, (100, 50, 100), (24.0, 0, 8), (10, 12), (320, 400, 100), 7200),
            unit("knight", Cavalry, 150, (250, 400, 150), (8.0, 100, 1), (20, 40), (0, 0, 0), 21600),
            unit("snob", Infantry, 30, (100, 50, 100), (35.0, 0, 100), (200, 200), (40000, 50000, 50000), 10800),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&UnitType> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    pub fn require(&self, id: &str) -> Result<&UnitType> {
        self.get(id).ok_or_else(|| FarmError::UnknownUnit(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitType> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Patch table values with server-specific data
    pub fn apply_overrides(&mut self, overrides: &AHashMap<String, UnitOverride>) {
        for (id, patch) in overrides {
            match self.index.get(id) {
                Some(&i) => patch.apply(&mut self.units[i]),
                None => tracing::debug!(unit = %id, "Ignoring override for unknown unit"),
            }
        }
    }

    /// Travel time in seconds: the slowest unit sets the pace
    pub fn travel_seconds(
        &self,
        composition: &TroopComposition,
        distance: f64,
        world_speed: f64,
        unit_speed: f64,
    ) -> Option<u64> {
        let slowest = composition
            .iter()
            .filter_map(|(id, _)| self.get(id))
            .map(|u| u.speed)
            .reduce(f64::max)?;

        let seconds = slowest * distance * 60.0 / (world_speed * unit_speed);
        Some(seconds.round().max(0.0) as u64)
    }
}

impl Default for UnitStatTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_lookup() {
        let table = UnitStatTable::standard();
        let axe = table.get("axe").unwrap();
        assert_eq!(axe.attack, 40);
        assert_eq!(axe.category, UnitCategory::Infantry);
        assert_eq!(table.get("light").unwrap().carry_capacity, 80);
        assert!(table.get("dragon").is_none());
        assert!(matches!(table.require("dragon"), Err(FarmError::UnknownUnit(_))));
    }

    #[test]
    fn test_spy_does_not_fight() {
        let table = UnitStatTable::standard();
        assert!(!table.get("spy").unwrap().fights());
        assert!(table.get("spear").unwrap().fights());
        assert_eq!(UnitCategory::Scout.axis_index(), None);
    }

    #[test]
    fn test_defense_against_axes() {
        let table = UnitStatTable::standard();
        let spear = table.get("spear").unwrap();
        assert_eq!(spear.defense_against(UnitCategory::Infantry), 15);
        assert_eq!(spear.defense_against(UnitCategory::Cavalry), 45);
        assert_eq!(spear.defense_against(UnitCategory::Archer), 20);
    }

    #[test]
    fn test_apply_overrides() {
        let mut table = UnitStatTable::standard();
        let mut overrides = AHashMap::new();
        overrides.insert(
            "spear".to_string(),
            UnitOverride {
                attack: Some(12),
                speed: Some(18.0),
                ..UnitOverride::default()
            },
        );
        overrides.insert("dragon".to_string(), UnitOverride::default());

        table.apply_overrides(&overrides);

        let spear = table.get("spear").unwrap();
        assert_eq!(spear.attack, 12);
        assert_eq!(spear.speed, 18.0);
        // Untouched fields survive
        assert_eq!(spear.defense_cavalry, 45);
        assert_eq!(table.len(), 12);
    }

    #[test]
    fn test_travel_time_uses_slowest_unit() {
        let table = UnitStatTable::standard();
        let mixed = TroopComposition::from_pairs([("light", 5), ("ram", 1)]);
        // ram: 24 min/field * 10 fields
        assert_eq!(table.travel_seconds(&mixed, 10.0, 1.0, 1.0), Some(24 * 10 * 60));

        let fast = TroopComposition::from_pairs([("light", 5)]);
        assert_eq!(table.travel_seconds(&fast, 10.0, 2.0, 1.0), Some(8 * 10 * 60 / 2));

        assert_eq!(table.travel_seconds(&TroopComposition::new(), 10.0, 1.0, 1.0), None);
    }
}
