//! Farm Warden - farm targeting and combat risk engine
//!
//! Decides which nearby villages to raid, with what, and how often, and
//! predicts troop losses before anything is sent.

pub mod combat;
pub mod core;
pub mod farming;
pub mod reports;
pub mod units;
