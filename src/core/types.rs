//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// Game-assigned village identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VillageId(pub u32);

impl VillageId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for VillageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game-assigned player identifier (0 = barbarian / unowned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl PlayerId {
    pub const BARBARIAN: PlayerId = PlayerId(0);

    pub fn is_barbarian(&self) -> bool {
        *self == Self::BARBARIAN
    }
}

/// Map coordinate of a village
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapCoord {
    pub x: i32,
    pub y: i32,
}

impl MapCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in fields
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Wood / stone / iron amounts (loot, scouted storage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub wood: u32,
    #[serde(default)]
    pub stone: u32,
    #[serde(default)]
    pub iron: u32,
}

impl Resources {
    pub fn new(wood: u32, stone: u32, iron: u32) -> Self {
        Self { wood, stone, iron }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.wood) + u64::from(self.stone) + u64::from(self.iron)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl std::ops::Add for Resources {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            wood: self.wood.saturating_add(rhs.wood),
            stone: self.stone.saturating_add(rhs.stone),
            iron: self.iron.saturating_add(rhs.iron),
        }
    }
}
