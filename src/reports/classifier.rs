//! Engagement safety verdicts from historical reports
//!
//! The newest report that says anything decides. Zero losses mean the
//! target is open; a scout that saw no defenders (or saw them all die) means
//! the same. Otherwise losing a whole unit type, or more than one unit of
//! any type, marks the target as defended. Losing a single unit is
//! treated as bad luck.

use serde::{Deserialize, Serialize};

use super::report::{BattleReport, ReportKind};
use crate::core::types::{Resources, VillageId};

/// Units that may be lost on a raid before the target counts as defended
pub const TOLERATED_LOSSES: u32 = 1;

/// Three-valued safety verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Engage,
    Disengage,
    /// No usable report for the target
    Unknown,
}

fn most_recent_first<'a, I>(target: VillageId, reports: I) -> Vec<&'a BattleReport>
where
    I: IntoIterator<Item = &'a BattleReport>,
{
    let mut relevant: Vec<&BattleReport> = reports.into_iter().filter(|r| r.targets(target)).collect();
    // Stable: equal timestamps keep the caller's order
    relevant.sort_by(|a, b| b.when.cmp(&a.when));
    relevant
}

/// What a single report says, if anything
fn assess(report: &BattleReport) -> Option<Verdict> {
    match report.kind {
        ReportKind::Other => return None,
        ReportKind::Attack if report.losses.is_empty() => return Some(Verdict::Engage),
        ReportKind::Scout if report.losses.is_empty() => {
            let seen = report.defender_units_seen.as_ref()?;
            let cleared = seen.is_empty() || report.defender_losses_seen.as_ref() == Some(seen);
            return Some(if cleared { Verdict::Engage } else { Verdict::Disengage });
        }
        _ => {}
    }

    // Losses without a record of what was sent cannot be tolerated
    if report.units_sent.is_empty() {
        return Some(Verdict::Disengage);
    }

    let wiped_type = report
        .units_sent
        .iter()
        .any(|(unit, sent)| report.losses.get(unit) >= sent);
    if wiped_type {
        return Some(Verdict::Disengage);
    }

    if report.losses.iter().all(|(_, lost)| lost <= TOLERATED_LOSSES) {
        Some(Verdict::Engage)
    } else {
        Some(Verdict::Disengage)
    }
}

/// Decide whether a target is currently safe to raid
pub fn classify_safety<'a, I>(target: VillageId, reports: I) -> Verdict
where
    I: IntoIterator<Item = &'a BattleReport>,
{
    most_recent_first(target, reports)
        .into_iter()
        .find_map(assess)
        .unwrap_or(Verdict::Unknown)
}

/// Resources seen at the target by its latest dated report
///
/// `None` when that report carries no (or an empty) resource reading.
pub fn resources_remaining<'a, I>(target: VillageId, reports: I) -> Option<Resources>
where
    I: IntoIterator<Item = &'a BattleReport>,
{
    most_recent_first(target, reports)
        .into_iter()
        .find(|r| r.when.is_some())
        .and_then(|r| r.scouted_resources)
        .filter(|res| !res.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::composition::TroopComposition;

    const HOME: VillageId = VillageId(1);
    const FARM: VillageId = VillageId(2);

    fn comp(pairs: &[(&str, u32)]) -> TroopComposition {
        pairs.iter().map(|&(u, c)| (u, c)).collect()
    }

    fn raid(id: &str, when: u64, sent: &[(&str, u32)], lost: &[(&str, u32)]) -> BattleReport {
        BattleReport::attack(id, HOME, FARM, when)
            .with_sent(comp(sent))
            .with_losses(comp(lost))
    }

    #[test]
    fn test_no_reports_is_unknown() {
        assert_eq!(classify_safety(FARM, &[]), Verdict::Unknown);
        let elsewhere = vec![BattleReport::attack("1", HOME, VillageId(3), 10).with_sent(comp(&[("axe", 1)]))];
        assert_eq!(classify_safety(FARM, &elsewhere), Verdict::Unknown);
    }

    #[test]
    fn test_clean_attack_engages() {
        let reports = vec![raid("1", 100, &[("light", 5)], &[])];
        assert_eq!(classify_safety(FARM, &reports), Verdict::Engage);
    }

    #[test]
    fn test_total_wipe_disengages() {
        let reports = vec![raid("1", 100, &[("spear", 10)], &[("spear", 10)])];
        assert_eq!(classify_safety(FARM, &reports), Verdict::Disengage);
    }

    #[test]
    fn test_single_unit_loss_tolerated() {
        let reports = vec![raid("1", 100, &[("light", 5), ("axe", 10)], &[("light", 1), ("axe", 1)])];
        assert_eq!(classify_safety(FARM, &reports), Verdict::Engage);
    }

    #[test]
    fn test_heavier_losses_disengage() {
        let reports = vec![raid("1", 100, &[("axe", 10)], &[("axe", 2)])];
        assert_eq!(classify_safety(FARM, &reports), Verdict::Disengage);
    }

    #[test]
    fn test_wipe_of_one_type_beats_tolerance() {
        let reports = vec![raid("1", 100, &[("light", 5), ("spear", 1)], &[("spear", 1)])];
        assert_eq!(classify_safety(FARM, &reports), Verdict::Disengage);
    }

    #[test]
    fn test_scout_reports() {
        let empty = BattleReport::scout("s1", HOME, FARM, 100)
            .with_sent(comp(&[("spy", 5)]))
            .with_defenders(TroopComposition::new(), TroopComposition::new());
        assert_eq!(classify_safety(FARM, [&empty]), Verdict::Engage);

        let all_dead = BattleReport::scout("s2", HOME, FARM, 100)
            .with_sent(comp(&[("spy", 5)]))
            .with_defenders(comp(&[("spy", 2)]), comp(&[("spy", 2)]));
        assert_eq!(classify_safety(FARM, [&all_dead]), Verdict::Engage);

        let defended = BattleReport::scout("s3", HOME, FARM, 100)
            .with_sent(comp(&[("spy", 5)]))
            .with_defenders(comp(&[("spear", 40)]), TroopComposition::new());
        assert_eq!(classify_safety(FARM, [&defended]), Verdict::Disengage);

        // Nothing about the defence: no information
        let malformed = BattleReport::scout("s4", HOME, FARM, 100).with_sent(comp(&[("spy", 5)]));
        assert_eq!(classify_safety(FARM, [&malformed]), Verdict::Unknown);
    }

    #[test]
    fn test_newest_report_decides() {
        let old_wipe = raid("1", 100, &[("spear", 10)], &[("spear", 10)]);
        let fresh_scout = BattleReport::scout("2", HOME, FARM, 500)
            .with_sent(comp(&[("spy", 5)]))
            .with_defenders(TroopComposition::new(), TroopComposition::new());

        assert_eq!(classify_safety(FARM, [&old_wipe, &fresh_scout]), Verdict::Engage);
        assert_eq!(classify_safety(FARM, [&fresh_scout, &old_wipe]), Verdict::Engage);
    }

    #[test]
    fn test_uninformative_reports_are_skipped() {
        let mut support = BattleReport::new("0", ReportKind::Other);
        support.dest_id = Some(FARM);
        support.when = Some(900);
        let blank_scout = BattleReport::scout("8", HOME, FARM, 800).with_sent(comp(&[("spy", 5)]));
        let wipe = raid("1", 100, &[("spear", 10)], &[("spear", 10)]);

        assert_eq!(classify_safety(FARM, [&support, &blank_scout, &wipe]), Verdict::Disengage);
    }

    #[test]
    fn test_attack_without_units_sent() {
        let clean = raid("1", 100, &[("light", 5)], &[]);

        // Losses alone are enough to back off
        let lost = BattleReport::attack("2", HOME, FARM, 200).with_losses(comp(&[("light", 5)]));
        assert_eq!(classify_safety(FARM, [&clean, &lost]), Verdict::Disengage);

        // No losses is a clean raid
        let bare = BattleReport::attack("3", HOME, FARM, 300);
        assert_eq!(classify_safety(FARM, [&bare]), Verdict::Engage);
        assert_eq!(classify_safety(FARM, [&lost, &bare]), Verdict::Engage);
    }

    #[test]
    fn test_resources_remaining_uses_latest_dated_report() {
        let older = raid("1", 100, &[("light", 5)], &[]).with_scouted_resources(Resources::new(900, 900, 900));
        let newer = raid("2", 200, &[("light", 5)], &[]).with_scouted_resources(Resources::new(40, 30, 50));
        let mut undated = raid("3", 0, &[("light", 5)], &[]).with_scouted_resources(Resources::new(1, 1, 1));
        undated.when = None;

        assert_eq!(
            resources_remaining(FARM, [&older, &newer, &undated]),
            Some(Resources::new(40, 30, 50))
        );
    }

    #[test]
    fn test_resources_remaining_absent() {
        let latest = raid("2", 200, &[("light", 5)], &[]);
        let older = raid("1", 100, &[("light", 5)], &[]).with_scouted_resources(Resources::new(500, 0, 0));
        assert_eq!(resources_remaining(FARM, [&older, &latest]), None);

        let emptied = raid("3", 300, &[("light", 5)], &[]).with_scouted_resources(Resources::default());
        assert_eq!(resources_remaining(FARM, [&emptied]), None);
        assert_eq!(resources_remaining(FARM, &[]), None);
    }
}
