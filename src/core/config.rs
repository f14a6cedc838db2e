//! Farm configuration with documented defaults
//!
//! Values are read once per cycle and consumed as-is. The TOML layout is a
//! `[farms]` table plus optional `[units.<id>]` stat overrides.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::calendar::HourWindow;
use super::error::{FarmError, Result};
use super::types::VillageId;
use crate::farming::peace::PeaceWindow;
use crate::units::composition::TroopComposition;
use crate::units::stats::UnitOverride;

/// Configuration for the farm scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Master switch; a disabled config makes every cycle a no-op
    pub enabled: bool,

    // === DISCOVERY ===
    /// Maximum Euclidean distance (fields) from home to a target
    pub farm_radius: f64,

    /// Targets must have strictly more points than this
    pub min_points: u32,

    /// Targets must have strictly fewer points than this
    pub max_points: u32,

    /// Allow targets with at least as many points as the home village
    pub target_high_points: bool,

    /// Number of ranked candidates considered per cycle
    pub max_farms: usize,

    /// Player-owned villages that may be farmed anyway
    pub additional_farms: Vec<VillageId>,

    /// Local hours during which player-owned targets may be attacked
    pub player_attack_hours: HourWindow,

    /// Offset from UTC used when computing the local hour
    pub utc_offset_hours: i32,

    // === COOLDOWNS (seconds) ===
    /// Cooldown for normal-profile targets
    pub default_away_time: u64,

    /// Cooldown for high-profile targets ("full loot" returns)
    ///
    /// Half of this is used when the latest report still shows
    /// resources above `drain_min_loot`.
    pub high_prio_wait: u64,

    /// Cooldown for low-profile targets
    ///
    /// Twice this is also the age after which a hostile scout report
    /// is considered old enough to re-scout.
    pub low_prio_wait: u64,

    /// Age after which a target is re-scouted regardless of its safe flag
    pub stale_intel_after: u64,

    // === SCOUTING ===
    /// Scouting capability enabled
    ///
    /// When false, targets with no intel are attacked blind.
    pub force_scout: bool,

    /// Unit type used for reconnaissance probes
    pub scout_unit: String,

    /// Number of scout units per probe
    pub scout_amount: u32,

    /// Attack non-scout-derived unsafe targets anyway
    pub engage_unsafe: bool,

    // === PROFILING ===
    /// Minimum total scouted resources that triggers the drain cooldown
    pub drain_min_loot: u64,

    /// A target needs more than this many looted attacks to be profiled
    pub profile_min_attacks: usize,

    /// Average loot below this marks a target low profile
    pub low_loot_average: f64,

    /// Average loot above this marks a target high profile
    pub high_loot_average: f64,

    // === DISPATCH ===
    /// Windows (unix seconds) during which no attack may land
    pub forced_peace_window: Vec<PeaceWindow>,

    /// World speed multiplier for travel time
    pub world_speed: f64,

    /// Unit speed multiplier for travel time
    pub unit_speed: f64,

    /// Farm compositions, tried in order
    pub templates: Vec<TroopComposition>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            enabled: true,

            farm_radius: 50.0,
            min_points: 24,
            max_points: 1080,
            target_high_points: false,
            max_farms: 25,
            additional_farms: Vec::new(),
            player_attack_hours: HourWindow::default(),
            utc_offset_hours: 0,

            // high < default < low keeps cooldowns ordered by profile
            default_away_time: 3600,
            high_prio_wait: 1800,
            low_prio_wait: 7200,
            stale_intel_after: 12 * 3600,

            force_scout: true,
            scout_unit: "spy".to_string(),
            scout_amount: 5,
            engage_unsafe: false,

            drain_min_loot: 100,
            profile_min_attacks: 3,
            low_loot_average: 50.0,
            high_loot_average: 500.0,

            forced_peace_window: Vec::new(),
            world_speed: 1.0,
            unit_speed: 1.0,
            templates: vec![TroopComposition::from_pairs([("light", 5)])],
        }
    }
}

impl FarmConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_points >= self.max_points {
            return Err(FarmError::Config(format!(
                "min_points ({}) should be < max_points ({})",
                self.min_points, self.max_points
            )));
        }

        if !(self.high_prio_wait < self.default_away_time
            && self.default_away_time < self.low_prio_wait)
        {
            return Err(FarmError::Config(format!(
                "cooldowns must be ordered high ({}) < default ({}) < low ({})",
                self.high_prio_wait, self.default_away_time, self.low_prio_wait
            )));
        }

        if self.farm_radius <= 0.0 || !self.farm_radius.is_finite() {
            return Err(FarmError::Config("farm_radius must be positive".into()));
        }

        if self.world_speed <= 0.0 || self.unit_speed <= 0.0 {
            return Err(FarmError::Config("speed multipliers must be positive".into()));
        }

        if self.player_attack_hours.start > 23 || self.player_attack_hours.end > 24 {
            return Err(FarmError::Config(format!(
                "player_attack_hours out of range: {:?}",
                self.player_attack_hours
            )));
        }

        if self.low_loot_average >= self.high_loot_average {
            return Err(FarmError::Config(format!(
                "low_loot_average ({}) should be < high_loot_average ({})",
                self.low_loot_average, self.high_loot_average
            )));
        }

        if let Some(window) = self.forced_peace_window.iter().find(|w| w.start >= w.end) {
            return Err(FarmError::Config(format!(
                "forced peace window ends before it starts: {:?}",
                window
            )));
        }

        Ok(())
    }
}

/// Full settings file: farm config plus server-specific unit overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub farms: FarmConfig,
    pub units: AHashMap<String, UnitOverride>,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.farms.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
