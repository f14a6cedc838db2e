//! Farm target discovery
//!
//! Filters the known villages around a home base and ranks what is left by
//! distance, nearest first.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::calendar::hour_of_day;
use crate::core::config::FarmConfig;
use crate::core::types::{MapCoord, PlayerId, Timestamp, VillageId};

/// A village as known from the world map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillageInfo {
    pub village_id: VillageId,
    pub location: MapCoord,
    pub points: u32,
    #[serde(default)]
    pub owner: PlayerId,
}

/// A target that passed every filter
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub village: VillageInfo,
    pub distance: f64,
}

/// Why a village is not a farm target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    Home,
    /// Owned by a player and not in `additional_farms`
    PlayerOwned,
    TooManyPoints,
    TooFewPoints,
    HigherThanHome,
    /// Rejected earlier this session
    Ignored,
    /// Player-owned and outside `player_attack_hours`
    OutsidePlayerHours,
    TooFar,
}

/// First filter a village fails, if any
pub fn exclusion(
    home: &VillageInfo,
    village: &VillageInfo,
    config: &FarmConfig,
    ignored: &AHashSet<VillageId>,
    now: Timestamp,
) -> Option<Exclusion> {
    if village.village_id == home.village_id {
        return Some(Exclusion::Home);
    }

    let player_owned = !village.owner.is_barbarian();
    if player_owned && !config.additional_farms.contains(&village.village_id) {
        return Some(Exclusion::PlayerOwned);
    }
    if village.points >= config.max_points {
        return Some(Exclusion::TooManyPoints);
    }
    if village.points <= config.min_points {
        return Some(Exclusion::TooFewPoints);
    }
    if village.points >= home.points && !config.target_high_points {
        return Some(Exclusion::HigherThanHome);
    }
    if ignored.contains(&village.village_id) {
        return Some(Exclusion::Ignored);
    }
    if player_owned && !config.player_attack_hours.contains(hour_of_day(now, config.utc_offset_hours)) {
        return Some(Exclusion::OutsidePlayerHours);
    }
    if home.location.distance(&village.location) > config.farm_radius {
        return Some(Exclusion::TooFar);
    }
    None
}

/// Ranked farm targets for one home base, capped at `max_farms`
pub fn discover_targets(
    home: &VillageInfo,
    villages: &[VillageInfo],
    config: &FarmConfig,
    ignored: &AHashSet<VillageId>,
    now: Timestamp,
) -> Vec<Candidate> {
    let mut excluded = 0usize;
    let mut targets: Vec<Candidate> = villages
        .iter()
        .filter(|v| match exclusion(home, v, config, ignored, now) {
            Some(reason) => {
                if reason != Exclusion::Home {
                    tracing::trace!(village = %v.village_id, ?reason, "Not a farm target");
                    excluded += 1;
                }
                false
            }
            None => true,
        })
        .map(|v| Candidate {
            distance: home.location.distance(&v.location),
            village: v.clone(),
        })
        .collect();

    targets.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.village.village_id.cmp(&b.village.village_id))
    });
    targets.truncate(config.max_farms);

    tracing::info!(home = %home.village_id, targets = targets.len(), ignored = excluded, "Farm targets");
    targets
}
