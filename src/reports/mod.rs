//! Battle reports and the verdicts drawn from them

pub mod classifier;
pub mod ledger;
pub mod profile;
pub mod report;

pub use classifier::{classify_safety, resources_remaining, Verdict};
pub use ledger::ReportLedger;
pub use profile::{LootProfile, LootProfiler};
pub use report::{BattleReport, ReportKind};
