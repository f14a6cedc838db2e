//! Dispatch orders handed to the game client

use serde::{Deserialize, Serialize};

use crate::core::types::VillageId;
use crate::units::composition::TroopComposition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    Attack,
    Scout,
}

/// A decision to send troops, executed by an external collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOrder {
    pub village_id: VillageId,
    pub composition: TroopComposition,
    pub kind: DispatchKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    /// The game refused the command (protection, vanished village, ...)
    Rejected(String),
}

/// Executes dispatch orders against the game
pub trait Dispatcher {
    fn dispatch(&mut self, order: &DispatchOrder) -> DispatchOutcome;
}

/// Accepts every order and remembers it
#[derive(Debug, Default)]
pub struct DryRunDispatcher {
    pub sent: Vec<DispatchOrder>,
}

impl DryRunDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Dispatcher for DryRunDispatcher {
    fn dispatch(&mut self, order: &DispatchOrder) -> DispatchOutcome {
        self.sent.push(order.clone());
        DispatchOutcome::Sent
    }
}
