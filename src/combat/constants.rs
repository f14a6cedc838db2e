//! Combat constants - the game's battle formula values in one place

// Wall
pub const MAX_WALL_LEVEL: u32 = 20;
pub const WALL_BONUS_PER_LEVEL: f64 = 0.05;
pub const WALL_FLAT_GROWTH: f64 = 1.25;
pub const WALL_FLAT_BASE: f64 = 20.0;

// Rams
pub const RAM_WALL_RESISTANCE: f64 = 1.09;
pub const PRE_COMBAT_RAM_DIVISOR: f64 = 4.0;
pub const PARTIAL_WIN_RAM_DIVISOR: f64 = 8.0;

// Modifiers
pub const NIGHT_BONUS_MULTIPLIER: f64 = 2.0;
pub const MAX_LUCK_PCT: f64 = 100.0;

/// Safety net for compositions whose axes never resolve
pub const MAX_ROUNDS: u32 = 100;
