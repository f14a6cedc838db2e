//! Append-only report store

use ahash::AHashMap;

use super::report::BattleReport;
use crate::core::types::VillageId;

/// All known reports, keyed by report id and indexed by target
#[derive(Debug, Clone, Default)]
pub struct ReportLedger {
    reports: Vec<BattleReport>,
    by_id: AHashMap<String, usize>,
    by_target: AHashMap<VillageId, Vec<usize>>,
}

impl ReportLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reports(reports: impl IntoIterator<Item = BattleReport>) -> Self {
        let mut ledger = Self::new();
        for report in reports {
            ledger.ingest(report);
        }
        ledger
    }

    /// Store a report; returns false if the id was already known
    pub fn ingest(&mut self, report: BattleReport) -> bool {
        if self.by_id.contains_key(&report.report_id) {
            tracing::debug!(report = %report.report_id, "Report already ingested");
            return false;
        }

        let idx = self.reports.len();
        self.by_id.insert(report.report_id.clone(), idx);
        if let Some(dest) = report.dest_id {
            self.by_target.entry(dest).or_default().push(idx);
        }
        tracing::debug!(report = %report.report_id, kind = ?report.kind, "Ingested report");
        self.reports.push(report);
        true
    }

    pub fn get(&self, report_id: &str) -> Option<&BattleReport> {
        self.by_id.get(report_id).map(|&i| &self.reports[i])
    }

    /// Reports against a target, most recent first
    ///
    /// Reports without a timestamp sort last; ties go to the later arrival.
    pub fn for_target(&self, target: VillageId) -> Vec<&BattleReport> {
        let Some(indices) = self.by_target.get(&target) else {
            return Vec::new();
        };

        let mut ordered: Vec<usize> = indices.clone();
        ordered.sort_by(|&a, &b| {
            let (wa, wb) = (self.reports[a].when, self.reports[b].when);
            wb.cmp(&wa).then(b.cmp(&a))
        });
        ordered.into_iter().map(|i| &self.reports[i]).collect()
    }

    /// Targets with at least one report
    pub fn targets(&self) -> impl Iterator<Item = VillageId> + '_ {
        self.by_target.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleReport> {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
