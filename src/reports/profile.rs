//! Loot richness profiling
//!
//! Targets that keep paying out well are raided more often; targets that
//! keep coming back empty are left alone for longer.

use serde::{Deserialize, Serialize};

use super::report::{BattleReport, ReportKind};
use crate::core::config::FarmConfig;
use crate::core::types::VillageId;

/// Re-engagement cadence class of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootProfile {
    #[default]
    Normal,
    High,
    Low,
}

/// Average-loot thresholds for profiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootProfiler {
    pub min_attacks: usize,
    pub low_average: f64,
    pub high_average: f64,
}

impl LootProfiler {
    pub fn from_config(config: &FarmConfig) -> Self {
        Self {
            min_attacks: config.profile_min_attacks,
            low_average: config.low_loot_average,
            high_average: config.high_loot_average,
        }
    }

    /// Profile suggested by the looted attacks on a target
    ///
    /// `None` until more than `min_attacks` looted raids are on record, or
    /// when the average sits between the thresholds.
    pub fn assess<'a, I>(&self, target: VillageId, reports: I) -> Option<LootProfile>
    where
        I: IntoIterator<Item = &'a BattleReport>,
    {
        let (raids, total) = reports
            .into_iter()
            .filter(|r| r.kind == ReportKind::Attack && r.targets(target))
            .filter_map(|r| r.loot)
            .fold((0usize, 0u64), |(n, sum), loot| (n + 1, sum + loot.total()));

        if raids <= self.min_attacks {
            return None;
        }

        let average = total as f64 / raids as f64;
        if average < self.low_average {
            Some(LootProfile::Low)
        } else if average > self.high_average {
            Some(LootProfile::High)
        } else {
            None
        }
    }
}
