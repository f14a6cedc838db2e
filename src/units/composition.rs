//! Troop compositions and the per-base troop inventory

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{FarmError, Result};
use super::stats::UnitStatTable;

/// Mapping from unit id to a non-negative count
///
/// Zero entries are equivalent to missing entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TroopComposition {
    counts: AHashMap<String, u32>,
}

impl TroopComposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut composition = Self::new();
        for (unit, count) in pairs {
            composition.add(unit, count);
        }
        composition
    }

    /// Count for a unit id (0 when absent)
    pub fn get(&self, unit: &str) -> u32 {
        self.counts.get(unit).copied().unwrap_or(0)
    }

    pub fn set(&mut self, unit: impl Into<String>, count: u32) {
        let unit = unit.into();
        if count == 0 {
            self.counts.remove(&unit);
        } else {
            self.counts.insert(unit, count);
        }
    }

    pub fn add(&mut self, unit: impl Into<String>, count: u32) {
        if count == 0 {
            return;
        }
        let entry = self.counts.entry(unit.into()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Non-zero entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts
            .iter()
            .filter(|(_, &c)| c > 0)
            .map(|(u, &c)| (u.as_str(), c))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Total unit count
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Loot this composition can carry home
    pub fn carry_capacity(&self, table: &UnitStatTable) -> u64 {
        self.iter()
            .filter_map(|(id, count)| table.get(id).map(|u| u64::from(u.carry_capacity) * u64::from(count)))
            .sum()
    }

    /// First unit for which `available` falls short of this composition
    pub fn shortfall_against(&self, available: &TroopComposition) -> Option<(String, u32, u32)> {
        let mut units: Vec<(&str, u32)> = self.iter().collect();
        units.sort_unstable_by_key(|(id, _)| *id);
        units
            .into_iter()
            .find(|(id, need)| available.get(id) < *need)
            .map(|(id, need)| (id.to_string(), available.get(id), need))
    }
}

impl PartialEq for TroopComposition {
    fn eq(&self, other: &Self) -> bool {
        self.iter().all(|(id, c)| other.get(id) == c) && other.iter().all(|(id, c)| self.get(id) == c)
    }
}

impl Eq for TroopComposition {}

impl<S: Into<String>> FromIterator<(S, u32)> for TroopComposition {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Troops at home for one base, owned by a single scheduling cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TroopInventory {
    troops: TroopComposition,
}

impl TroopInventory {
    pub fn new(troops: TroopComposition) -> Self {
        Self { troops }
    }

    pub fn available(&self, unit: &str) -> u32 {
        self.troops.get(unit)
    }

    pub fn troops(&self) -> &TroopComposition {
        &self.troops
    }

    pub fn is_empty(&self) -> bool {
        self.troops.is_empty()
    }

    /// Check that the whole composition can be fielded
    pub fn check(&self, composition: &TroopComposition) -> Result<()> {
        match composition.shortfall_against(&self.troops) {
            Some((unit, available, required)) => Err(FarmError::InsufficientTroops {
                unit,
                available,
                required,
            }),
            None => Ok(()),
        }
    }

    /// Decrement the inventory by a composition; all or nothing
    pub fn reserve(&mut self, composition: &TroopComposition) -> Result<()> {
        self.check(composition)?;
        for (unit, count) in composition.iter() {
            let left = self.troops.get(unit) - count;
            self.troops.set(unit, left);
        }
        Ok(())
    }
}
