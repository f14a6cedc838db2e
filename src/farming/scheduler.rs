//! Target safety and cooldown policy
//!
//! Every target is in one of four states, derived from its record:
//!
//! - `NoRecord`: never dispatched against. Attack if the reports already
//!   show it open, otherwise scout first (or go in blind when scouting is
//!   disabled).
//! - `Stale`: last dispatch older than `stale_intel_after`. Re-scout,
//!   whatever the safe flag says.
//! - `Unsafe`: re-read the reports if the record came from a scout run;
//!   hold otherwise.
//! - `Safe`: attack once the profile cooldown has passed.
//!
//! Decisions are pure functions of the record, the reports, scout
//! availability and the clock. Anything ambiguous resolves to `Withhold`.

use serde::{Deserialize, Serialize};

use crate::core::config::FarmConfig;
use crate::core::types::{Timestamp, VillageId};
use crate::farming::dispatch::DispatchKind;
use crate::farming::record::TargetRecord;
use crate::reports::classifier::{classify_safety, resources_remaining, Verdict};
use crate::reports::profile::{LootProfile, LootProfiler};
use crate::reports::report::BattleReport;

/// Policy state of a target for this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState<'r> {
    NoRecord,
    Stale(&'r TargetRecord),
    Unsafe(&'r TargetRecord),
    Safe(&'r TargetRecord),
}

impl<'r> TargetState<'r> {
    pub fn of(record: Option<&'r TargetRecord>, now: Timestamp, stale_after: u64) -> Self {
        match record {
            None => TargetState::NoRecord,
            Some(r) if r.age(now).is_some_and(|age| age > stale_after) => TargetState::Stale(r),
            Some(r) => Self::settled(r),
        }
    }

    /// State by safe flag alone, ignoring staleness
    pub fn settled(record: &'r TargetRecord) -> Self {
        if record.safe {
            TargetState::Safe(record)
        } else {
            TargetState::Unsafe(record)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithholdReason {
    /// Scout sent, report not in yet
    AwaitingReport,
    /// Reports show defenders; too recent to re-scout
    Hostile,
    /// Marked unsafe without scout evidence
    Unsafe,
    Cooldown { ready_at: Timestamp },
    NoScoutsAvailable,
    InsufficientTroops,
    /// Attack would land inside a forced peace window
    ForcedPeace,
    /// The game refused the dispatch
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// `blind` when no report backs the decision
    Attack { blind: bool },
    Scout,
    Withhold(WithholdReason),
}

pub struct Scheduler<'c> {
    config: &'c FarmConfig,
    profiler: LootProfiler,
}

impl<'c> Scheduler<'c> {
    pub fn new(config: &'c FarmConfig) -> Self {
        Self {
            config,
            profiler: LootProfiler::from_config(config),
        }
    }

    /// Base cooldown for a record's loot profile
    pub fn cooldown(&self, record: &TargetRecord) -> u64 {
        match record.profile {
            LootProfile::High => self.config.high_prio_wait,
            LootProfile::Normal => self.config.default_away_time,
            LootProfile::Low => self.config.low_prio_wait,
        }
    }

    /// Cooldown including the drain override
    ///
    /// A target whose latest report still shows loot above `drain_min_loot`
    /// is revisited after half the high-priority wait.
    pub fn min_cooldown(&self, record: &TargetRecord, reports: &[&BattleReport]) -> u64 {
        match resources_remaining(record.village_id, reports.iter().copied()) {
            Some(left) if left.total() > self.config.drain_min_loot => {
                tracing::debug!(village = %record.village_id, left = left.total(), "Draining farm of resources");
                self.config.high_prio_wait / 2
            }
            _ => self.cooldown(record),
        }
    }

    /// Decide what to do with a target this cycle
    pub fn decide(
        &self,
        target: VillageId,
        record: Option<&TargetRecord>,
        reports: &[&BattleReport],
        scouts_ready: bool,
        now: Timestamp,
    ) -> Decision {
        let state = TargetState::of(record, now, self.config.stale_intel_after);

        match state {
            TargetState::NoRecord => self.decide_unknown(target, reports, scouts_ready),
            // Stale intel is re-scouted whenever spies are home
            TargetState::Stale(r) if scouts_ready || self.config.force_scout => {
                tracing::debug!(village = %target, last_attack = ?r.last_attack_at, "Attacked long ago, re-scouting");
                self.probe(target, scouts_ready)
            }
            TargetState::Stale(r) => self.decide_settled(target, r, reports, scouts_ready, now),
            TargetState::Unsafe(r) | TargetState::Safe(r) => self.decide_settled(target, r, reports, scouts_ready, now),
        }
    }

    fn decide_settled(
        &self,
        target: VillageId,
        record: &TargetRecord,
        reports: &[&BattleReport],
        scouts_ready: bool,
        now: Timestamp,
    ) -> Decision {
        match TargetState::settled(record) {
            TargetState::Safe(r) => self.decide_safe(target, r, reports, scouts_ready, now),
            _ => self.decide_unsafe(target, record, reports, scouts_ready, now),
        }
    }

    fn probe(&self, target: VillageId, scouts_ready: bool) -> Decision {
        if scouts_ready {
            Decision::Scout
        } else {
            tracing::debug!(
                village = %target,
                unit = %self.config.scout_unit,
                "Cannot scout at the moment because of insufficient units"
            );
            Decision::Withhold(WithholdReason::NoScoutsAvailable)
        }
    }

    fn decide_unknown(&self, target: VillageId, reports: &[&BattleReport], scouts_ready: bool) -> Decision {
        if classify_safety(target, reports.iter().copied()) == Verdict::Engage {
            return Decision::Attack { blind: false };
        }
        if self.config.force_scout {
            return self.probe(target, scouts_ready);
        }
        tracing::warn!(village = %target, "Scouting disabled, going in blind");
        Decision::Attack { blind: true }
    }

    fn decide_unsafe(
        &self,
        target: VillageId,
        record: &TargetRecord,
        reports: &[&BattleReport],
        scouts_ready: bool,
        now: Timestamp,
    ) -> Decision {
        if !record.scouted {
            if self.config.engage_unsafe {
                tracing::info!(village = %target, "Unsafe target engaged by override");
                return Decision::Attack { blind: false };
            }
            tracing::debug!(village = %target, "Ignored because unsafe, set engage_unsafe to override");
            return Decision::Withhold(WithholdReason::Unsafe);
        }

        match classify_safety(target, reports.iter().copied()) {
            Verdict::Unknown => {
                tracing::info!(village = %target, "Scout report not yet available");
                Decision::Withhold(WithholdReason::AwaitingReport)
            }
            Verdict::Disengage => {
                let rescout_after = self.config.low_prio_wait * 2;
                if record.age(now).map_or(true, |age| age > rescout_after) {
                    tracing::info!(village = %target, "Old hostile report, re-scouting");
                    self.probe(target, scouts_ready)
                } else {
                    tracing::info!(village = %target, "Reports noted enemy units, ignoring");
                    Decision::Withhold(WithholdReason::Hostile)
                }
            }
            Verdict::Engage => {
                tracing::info!(village = %target, "Reports noted no enemy units, attacking");
                Decision::Attack { blind: false }
            }
        }
    }

    fn decide_safe(
        &self,
        target: VillageId,
        record: &TargetRecord,
        reports: &[&BattleReport],
        scouts_ready: bool,
        now: Timestamp,
    ) -> Decision {
        if !record.scouted && self.config.force_scout {
            return self.probe(target, scouts_ready);
        }

        let Some(last) = record.last_attack_at else {
            return Decision::Attack { blind: !record.scouted };
        };

        let min_time = self.min_cooldown(record, reports);
        let ready_at = last.saturating_add(min_time);
        if now >= ready_at {
            Decision::Attack { blind: !record.scouted }
        } else {
            tracing::debug!(village = %target, delay = min_time, "Ignored because of previous attack");
            Decision::Withhold(WithholdReason::Cooldown { ready_at })
        }
    }

    /// Record state after a confirmed dispatch
    pub fn record_dispatch(
        &self,
        target: VillageId,
        record: Option<TargetRecord>,
        kind: DispatchKind,
        blind: bool,
        now: Timestamp,
    ) -> TargetRecord {
        let mut updated = record.unwrap_or_else(|| TargetRecord::new(target));
        updated.last_attack_at = Some(now);
        match kind {
            DispatchKind::Scout => {
                updated.scouted = true;
                updated.safe = false;
            }
            DispatchKind::Attack => {
                updated.scouted = updated.scouted || !blind;
                updated.safe = true;
            }
        }
        updated
    }

    /// Fold newly arrived reports into an existing record
    ///
    /// Returns the changed record, or `None` if nothing changed.
    pub fn reconcile(&self, record: &TargetRecord, reports: &[&BattleReport]) -> Option<TargetRecord> {
        let mut updated = record.clone();

        if record.safe && classify_safety(record.village_id, reports.iter().copied()) == Verdict::Disengage {
            tracing::warn!(village = %record.village_id, "Losses reported, holding target until re-scouted");
            updated.safe = false;
            updated.scouted = true;
        }

        if let Some(profile) = self.profiler.assess(record.village_id, reports.iter().copied()) {
            if profile != record.profile {
                tracing::info!(village = %record.village_id, ?profile, "Loot profile changed");
                updated.profile = profile;
            }
        }

        (updated != *record).then_some(updated)
    }
}
