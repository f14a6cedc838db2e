//! Farm targeting: which villages to hit, when, and with what
//!
//! One [`FarmCycle`] runs per home base. It walks the ranked candidate list
//! in order, asks the [`Scheduler`] for a decision per target, and
//! decrements the base's troop inventory for every dispatch that goes out.

pub mod cycle;
pub mod discovery;
pub mod dispatch;
pub mod peace;
pub mod record;
pub mod scheduler;

pub use cycle::{CycleStatus, CycleSummary, FarmCycle};
pub use discovery::{discover_targets, Candidate, Exclusion, VillageInfo};
pub use dispatch::{DispatchKind, DispatchOrder, DispatchOutcome, Dispatcher, DryRunDispatcher};
pub use peace::PeaceWindow;
pub use record::{MemoryTargetStore, TargetRecord, TargetStore};
pub use scheduler::{Decision, Scheduler, TargetState, WithholdReason};
