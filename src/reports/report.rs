//! Normalized battle report records
//!
//! Reports arrive already parsed from the game client. Every field the
//! game may omit is optional; the classifier treats missing data as
//! "no information" rather than as an error.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Resources, Timestamp, VillageId};
use crate::units::composition::TroopComposition;

/// What kind of report this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// An attack we sent that fought (may also carry scouting data)
    Attack,
    /// A pure reconnaissance run
    Scout,
    /// Support, trade and other reports that say nothing about safety
    Other,
}

/// Immutable record of one finished engagement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub report_id: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    #[serde(default)]
    pub origin_id: Option<VillageId>,
    #[serde(default)]
    pub dest_id: Option<VillageId>,
    #[serde(default)]
    pub when: Option<Timestamp>,
    #[serde(default)]
    pub units_sent: TroopComposition,
    /// Our own losses
    #[serde(default)]
    pub losses: TroopComposition,
    #[serde(default)]
    pub defender_units_seen: Option<TroopComposition>,
    #[serde(default)]
    pub defender_losses_seen: Option<TroopComposition>,
    #[serde(default)]
    pub loot: Option<Resources>,
    #[serde(default)]
    pub scouted_resources: Option<Resources>,
    #[serde(default)]
    pub scouted_buildings: Option<AHashMap<String, u32>>,
    #[serde(default)]
    pub units_away: Option<TroopComposition>,
}

impl BattleReport {
    pub fn new(report_id: impl Into<String>, kind: ReportKind) -> Self {
        Self {
            report_id: report_id.into(),
            kind,
            origin_id: None,
            dest_id: None,
            when: None,
            units_sent: TroopComposition::new(),
            losses: TroopComposition::new(),
            defender_units_seen: None,
            defender_losses_seen: None,
            loot: None,
            scouted_resources: None,
            scouted_buildings: None,
            units_away: None,
        }
    }

    /// Attack report from `origin` against `dest`
    pub fn attack(report_id: impl Into<String>, origin: VillageId, dest: VillageId, when: Timestamp) -> Self {
        Self::new(report_id, ReportKind::Attack).between(origin, dest, when)
    }

    /// Scout report from `origin` against `dest`
    pub fn scout(report_id: impl Into<String>, origin: VillageId, dest: VillageId, when: Timestamp) -> Self {
        Self::new(report_id, ReportKind::Scout).between(origin, dest, when)
    }

    fn between(mut self, origin: VillageId, dest: VillageId, when: Timestamp) -> Self {
        self.origin_id = Some(origin);
        self.dest_id = Some(dest);
        self.when = Some(when);
        self
    }

    pub fn with_sent(mut self, units: TroopComposition) -> Self {
        self.units_sent = units;
        self
    }

    pub fn with_losses(mut self, losses: TroopComposition) -> Self {
        self.losses = losses;
        self
    }

    pub fn with_defenders(mut self, seen: TroopComposition, lost: TroopComposition) -> Self {
        self.defender_units_seen = Some(seen);
        self.defender_losses_seen = Some(lost);
        self
    }

    pub fn with_loot(mut self, loot: Resources) -> Self {
        self.loot = Some(loot);
        self
    }

    pub fn with_scouted_resources(mut self, resources: Resources) -> Self {
        self.scouted_resources = Some(resources);
        self
    }

    pub fn targets(&self, village: VillageId) -> bool {
        self.dest_id == Some(village)
    }
}
