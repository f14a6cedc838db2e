//! One scheduling cycle for one home base
//!
//! The cycle owns the base's troop inventory while it runs. Candidates are
//! handled strictly in rank order and every confirmed dispatch is deducted
//! before the next target is looked at.

use ahash::AHashSet;
use serde::Serialize;

use super::discovery::{discover_targets, Candidate, VillageInfo};
use super::dispatch::{DispatchKind, DispatchOrder, DispatchOutcome, Dispatcher};
use super::peace::window_at;
use super::record::{TargetRecord, TargetStore};
use super::scheduler::{Decision, Scheduler, WithholdReason};
use crate::core::config::FarmConfig;
use crate::core::types::{Timestamp, VillageId};
use crate::reports::ledger::ReportLedger;
use crate::units::composition::{TroopComposition, TroopInventory};
use crate::units::stats::UnitStatTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Every candidate was considered
    Completed,
    /// No farm template could be fielded any more
    OutOfTroops,
    Disabled,
    /// A forced peace window is running
    ForcedPeace,
    /// Nothing at home to send
    NoTroops,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleSummary {
    pub status: CycleStatus,
    pub dispatched: Vec<DispatchOrder>,
    pub withheld: Vec<(VillageId, WithholdReason)>,
    /// Candidates looked at before the cycle ended
    pub considered: usize,
}

impl CycleSummary {
    fn idle(status: CycleStatus) -> Self {
        Self {
            status,
            dispatched: Vec::new(),
            withheld: Vec::new(),
            considered: 0,
        }
    }
}

/// Farm cycle runner for one home base
///
/// Targets the game rejected stay ignored for as long as the runner lives.
pub struct FarmCycle<'a> {
    config: &'a FarmConfig,
    table: &'a UnitStatTable,
    ignored: AHashSet<VillageId>,
}

impl<'a> FarmCycle<'a> {
    pub fn new(config: &'a FarmConfig, table: &'a UnitStatTable) -> Self {
        Self {
            config,
            table,
            ignored: AHashSet::new(),
        }
    }

    /// Targets ignored for the rest of the session
    pub fn ignored(&self) -> &AHashSet<VillageId> {
        &self.ignored
    }

    #[allow(clippy::too_many_arguments)]
    pub fn run<S, D>(
        &mut self,
        home: &VillageInfo,
        villages: &[VillageInfo],
        inventory: &mut TroopInventory,
        ledger: &ReportLedger,
        store: &mut S,
        dispatcher: &mut D,
        now: Timestamp,
    ) -> CycleSummary
    where
        S: TargetStore,
        D: Dispatcher,
    {
        if !self.config.enabled {
            tracing::debug!(home = %home.village_id, "Farming disabled");
            return CycleSummary::idle(CycleStatus::Disabled);
        }
        let running = window_at(&self.config.forced_peace_window, now);
        if let Some(window) = running {
            tracing::info!(home = %home.village_id, until = window.end, "Forced peace, not farming");
            return CycleSummary::idle(CycleStatus::ForcedPeace);
        }
        if inventory.is_empty() {
            tracing::debug!(home = %home.village_id, "No troops at home");
            return CycleSummary::idle(CycleStatus::NoTroops);
        }

        let candidates = discover_targets(home, villages, self.config, &self.ignored, now);
        let scheduler = Scheduler::new(self.config);
        let scout_party = TroopComposition::from_pairs([(self.config.scout_unit.as_str(), self.config.scout_amount)]);
        let mut exhausted = vec![false; self.config.templates.len()];

        let mut summary = CycleSummary::idle(CycleStatus::Completed);

        for candidate in &candidates {
            summary.considered += 1;
            let target = candidate.village.village_id;
            let reports = ledger.for_target(target);

            let mut record = store.get(target);
            if let Some(updated) = record.as_ref().and_then(|r| scheduler.reconcile(r, &reports)) {
                store.put(updated.clone());
                record = Some(updated);
            }

            let scouts_ready = !scout_party.is_empty() && inventory.check(&scout_party).is_ok();
            let decision = scheduler.decide(target, record.as_ref(), &reports, scouts_ready, now);

            let (composition, kind, blind) = match decision {
                Decision::Withhold(reason) => {
                    summary.withheld.push((target, reason));
                    continue;
                }
                Decision::Scout => (scout_party.clone(), DispatchKind::Scout, false),
                Decision::Attack { blind } => {
                    let Some(template) = self.pick_template(inventory, &mut exhausted) else {
                        tracing::info!(home = %home.village_id, "Not enough units for any farm template");
                        summary.withheld.push((target, WithholdReason::InsufficientTroops));
                        summary.status = CycleStatus::OutOfTroops;
                        break;
                    };
                    if self.lands_in_peace(candidate, &template, now) {
                        summary.withheld.push((target, WithholdReason::ForcedPeace));
                        continue;
                    }
                    (template, DispatchKind::Attack, blind)
                }
            };

            let order = DispatchOrder {
                village_id: target,
                composition,
                kind,
            };
            match dispatcher.dispatch(&order) {
                DispatchOutcome::Sent => {
                    if let Err(err) = inventory.reserve(&order.composition) {
                        tracing::error!(village = %target, %err, "Inventory out of step with dispatch");
                    }
                    store.put(scheduler.record_dispatch(target, record, kind, blind, now));
                    tracing::info!(village = %target, ?kind, distance = candidate.distance, "Dispatched");
                    summary.dispatched.push(order);
                }
                DispatchOutcome::Rejected(msg) => {
                    tracing::warn!(village = %target, ?kind, reason = %msg, "Dispatch rejected");
                    if kind == DispatchKind::Attack {
                        self.ignored.insert(target);
                    }
                    summary.withheld.push((target, WithholdReason::Rejected));
                }
            }
        }

        tracing::info!(
            home = %home.village_id,
            status = ?summary.status,
            sent = summary.dispatched.len(),
            withheld = summary.withheld.len(),
            "Farm cycle finished"
        );
        summary
    }

    /// First template the inventory can still field
    ///
    /// Templates that cannot be fielded are skipped for the rest of the cycle.
    fn pick_template(&self, inventory: &TroopInventory, exhausted: &mut [bool]) -> Option<TroopComposition> {
        for (i, template) in self.config.templates.iter().enumerate() {
            if exhausted[i] {
                continue;
            }
            match inventory.check(template) {
                Ok(()) => return Some(template.clone()),
                Err(err) => {
                    tracing::debug!(template = i, %err, "Farm template exhausted");
                    exhausted[i] = true;
                }
            }
        }
        None
    }

    fn lands_in_peace(&self, candidate: &Candidate, template: &TroopComposition, now: Timestamp) -> bool {
        let travel = self
            .table
            .travel_seconds(template, candidate.distance, self.config.world_speed, self.config.unit_speed)
            .unwrap_or(0);
        let arrival = now.saturating_add(travel);
        let blocking = window_at(&self.config.forced_peace_window, arrival);
        match blocking {
            Some(window) => {
                tracing::info!(
                    village = %candidate.village.village_id,
                    arrival,
                    peace_start = window.start,
                    "Attack would arrive during forced peace"
                );
                true
            }
            None => false,
        }
    }
}

/// Records for every target a summary dispatched against
pub fn touched_records<S: TargetStore>(summary: &CycleSummary, store: &S) -> Vec<TargetRecord> {
    summary
        .dispatched
        .iter()
        .filter_map(|order| store.get(order.village_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MapCoord, PlayerId};
    use crate::farming::dispatch::DryRunDispatcher;
    use crate::farming::peace::PeaceWindow;
    use crate::farming::record::MemoryTargetStore;
    use crate::reports::report::BattleReport;

    const NOW: Timestamp = 10 * 86400 + 12 * 3600;

    fn village(id: u32, x: i32) -> VillageInfo {
        VillageInfo {
            village_id: VillageId(id),
            location: MapCoord::new(x, 500),
            points: 300,
            owner: PlayerId::BARBARIAN,
        }
    }

    fn home() -> VillageInfo {
        VillageInfo {
            points: 3000,
            owner: PlayerId(42),
            ..village(1, 500)
        }
    }

    fn inventory(pairs: &[(&str, u32)]) -> TroopInventory {
        TroopInventory::new(pairs.iter().map(|&(u, c)| (u, c)).collect())
    }

    fn clean_raid(id: &str, target: u32) -> BattleReport {
        BattleReport::attack(id, VillageId(1), VillageId(target), NOW - 7200)
            .with_sent(TroopComposition::from_pairs([("light", 5)]))
    }

    struct RejectAll;

    impl Dispatcher for RejectAll {
        fn dispatch(&mut self, _order: &DispatchOrder) -> DispatchOutcome {
            DispatchOutcome::Rejected("beginner protection".into())
        }
    }

    #[test]
    fn test_attacks_known_clean_targets_in_order() {
        let config = FarmConfig::default();
        let table = UnitStatTable::standard();
        let mut cycle = FarmCycle::new(&config, &table);
        let ledger = ReportLedger::from_reports([clean_raid("a", 2), clean_raid("b", 3)]);
        let mut store = MemoryTargetStore::new();
        let mut dispatcher = DryRunDispatcher::new();
        let mut troops = inventory(&[("light", 12)]);

        let summary = cycle.run(
            &home(),
            &[village(3, 504), village(2, 502)],
            &mut troops,
            &ledger,
            &mut store,
            &mut dispatcher,
            NOW,
        );

        assert_eq!(summary.status, CycleStatus::Completed);
        let order: Vec<VillageId> = summary.dispatched.iter().map(|o| o.village_id).collect();
        assert_eq!(order, vec![VillageId(2), VillageId(3)]);
        assert_eq!(troops.available("light"), 2);
        assert_eq!(dispatcher.sent.len(), 2);

        let record = store.get(VillageId(2)).unwrap();
        assert!(record.safe && record.scouted);
        assert_eq!(record.last_attack_at, Some(NOW));
        assert_eq!(touched_records(&summary, &store).len(), 2);
    }

    #[test]
    fn test_runs_out_of_troops() {
        let config = FarmConfig::default();
        let table = UnitStatTable::standard();
        let mut cycle = FarmCycle::new(&config, &table);
        let ledger = ReportLedger::from_reports([clean_raid("a", 2), clean_raid("b", 3)]);
        let mut store = MemoryTargetStore::new();
        let mut troops = inventory(&[("light", 7)]);

        let summary = cycle.run(
            &home(),
            &[village(2, 502), village(3, 504)],
            &mut troops,
            &ledger,
            &mut store,
            &mut DryRunDispatcher::new(),
            NOW,
        );

        assert_eq!(summary.status, CycleStatus::OutOfTroops);
        assert_eq!(summary.dispatched.len(), 1);
        assert_eq!(summary.withheld, vec![(VillageId(3), WithholdReason::InsufficientTroops)]);
        assert!(store.get(VillageId(3)).is_none());
    }

    #[test]
    fn test_falls_back_to_next_template() {
        let config = FarmConfig {
            templates: vec![
                TroopComposition::from_pairs([("light", 5)]),
                TroopComposition::from_pairs([("axe", 20)]),
            ],
            ..FarmConfig::default()
        };
        let table = UnitStatTable::standard();
        let mut cycle = FarmCycle::new(&config, &table);
        let ledger = ReportLedger::from_reports([clean_raid("a", 2), clean_raid("b", 3)]);
        let mut troops = inventory(&[("light", 5), ("axe", 25)]);

        let summary = cycle.run(
            &home(),
            &[village(2, 502), village(3, 504)],
            &mut troops,
            &ledger,
            &mut MemoryTargetStore::new(),
            &mut DryRunDispatcher::new(),
            NOW,
        );

        assert_eq!(summary.status, CycleStatus::Completed);
        assert_eq!(summary.dispatched[0].composition.get("light"), 5);
        assert_eq!(summary.dispatched[1].composition.get("axe"), 20);
        assert!(troops.available("light") == 0 && troops.available("axe") == 5);
    }

    #[test]
    fn test_unknown_target_gets_scouted() {
        let config = FarmConfig::default();
        let table = UnitStatTable::standard();
        let mut cycle = FarmCycle::new(&config, &table);
        let mut store = MemoryTargetStore::new();
        let mut troops = inventory(&[("light", 10), ("spy", 5)]);

        let summary = cycle.run(
            &home(),
            &[village(2, 502), village(3, 504)],
            &mut troops,
            &ReportLedger::new(),
            &mut store,
            &mut DryRunDispatcher::new(),
            NOW,
        );

        assert_eq!(summary.dispatched.len(), 1);
        assert_eq!(summary.dispatched[0].kind, DispatchKind::Scout);
        assert_eq!(summary.withheld, vec![(VillageId(3), WithholdReason::NoScoutsAvailable)]);
        let record = store.get(VillageId(2)).unwrap();
        assert!(record.scouted && !record.safe);
        assert_eq!(troops.available("spy"), 0);
    }

    #[test]
    fn test_rejected_attack_is_ignored_afterwards() {
        let config = FarmConfig::default();
        let table = UnitStatTable::standard();
        let mut cycle = FarmCycle::new(&config, &table);
        let ledger = ReportLedger::from_reports([clean_raid("a", 2)]);
        let mut store = MemoryTargetStore::new();
        let mut troops = inventory(&[("light", 10)]);
        let villages = [village(2, 502)];

        let summary = cycle.run(&home(), &villages, &mut troops, &ledger, &mut store, &mut RejectAll, NOW);
        assert_eq!(summary.withheld, vec![(VillageId(2), WithholdReason::Rejected)]);
        assert_eq!(troops.available("light"), 10);
        assert!(cycle.ignored().contains(&VillageId(2)));

        let again = cycle.run(
            &home(),
            &villages,
            &mut troops,
            &ledger,
            &mut store,
            &mut DryRunDispatcher::new(),
            NOW + 60,
        );
        assert_eq!(again.considered, 0);
    }

    #[test]
    fn test_forced_peace() {
        let table = UnitStatTable::standard();
        let ledger = ReportLedger::from_reports([clean_raid("a", 2)]);
        let villages = [village(2, 502)];

        // Running window: nothing happens
        let config = FarmConfig {
            forced_peace_window: vec![PeaceWindow::new(NOW - 10, NOW + 10)],
            ..FarmConfig::default()
        };
        let mut troops = inventory(&[("light", 10)]);
        let summary = FarmCycle::new(&config, &table).run(
            &home(),
            &villages,
            &mut troops,
            &ledger,
            &mut MemoryTargetStore::new(),
            &mut DryRunDispatcher::new(),
            NOW,
        );
        assert_eq!(summary.status, CycleStatus::ForcedPeace);

        // Light cavalry needs 16 minutes for two fields
        let config = FarmConfig {
            forced_peace_window: vec![PeaceWindow::new(NOW + 600, NOW + 3600)],
            ..FarmConfig::default()
        };
        let summary = FarmCycle::new(&config, &table).run(
            &home(),
            &villages,
            &mut troops,
            &ledger,
            &mut MemoryTargetStore::new(),
            &mut DryRunDispatcher::new(),
            NOW,
        );
        assert_eq!(summary.withheld, vec![(VillageId(2), WithholdReason::ForcedPeace)]);
        assert_eq!(troops.available("light"), 10);
    }

    #[test]
    fn test_disabled_and_empty() {
        let table = UnitStatTable::standard();
        let config = FarmConfig {
            enabled: false,
            ..FarmConfig::default()
        };
        let summary = FarmCycle::new(&config, &table).run(
            &home(),
            &[village(2, 502)],
            &mut inventory(&[("light", 10)]),
            &ReportLedger::new(),
            &mut MemoryTargetStore::new(),
            &mut DryRunDispatcher::new(),
            NOW,
        );
        assert_eq!(summary.status, CycleStatus::Disabled);

        let config = FarmConfig::default();
        let summary = FarmCycle::new(&config, &table).run(
            &home(),
            &[village(2, 502)],
            &mut TroopInventory::default(),
            &ReportLedger::new(),
            &mut MemoryTargetStore::new(),
            &mut DryRunDispatcher::new(),
            NOW,
        );
        assert_eq!(summary.status, CycleStatus::NoTroops);
    }
}
