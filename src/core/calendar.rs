//! Local time-of-day helpers
//!
//! Timestamps are unix seconds. The hour window check is what restricts
//! attacks on player-owned villages to waking hours.

use serde::{Deserialize, Serialize};

use super::types::Timestamp;

const SECONDS_PER_HOUR: i64 = 3600;
const HOURS_PER_DAY: i64 = 24;

/// Hour of day (0..24) for a timestamp shifted by a UTC offset in hours
pub fn hour_of_day(now: Timestamp, utc_offset_hours: i32) -> u32 {
    let shifted = now as i64 + i64::from(utc_offset_hours) * SECONDS_PER_HOUR;
    (shifted.div_euclid(SECONDS_PER_HOUR)).rem_euclid(HOURS_PER_DAY) as u32
}

/// Half-open hour range `[start, end)`; wraps past midnight when `start > end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        // 23h-8h is off limits
        Self { start: 8, end: 23 }
    }
}
