//! Forced peace windows
//!
//! Servers announce periods during which no attack may land. Nothing is
//! sent while one is running, and nothing is sent that would arrive inside
//! one.

use serde::{Deserialize, Serialize};

use crate::core::types::Timestamp;

/// Half-open `[start, end)` window in unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeaceWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl PeaceWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: Timestamp) -> bool {
        at >= self.start && at < self.end
    }
}

/// The window covering `at`, if any
pub fn window_at(windows: &[PeaceWindow], at: Timestamp) -> Option<&PeaceWindow> {
    windows.iter().find(|w| w.contains(at))
}
