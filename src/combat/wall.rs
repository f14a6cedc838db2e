//! Wall erosion by rams, before and after the fight

use super::constants::*;

fn ram_resistance(wall: u32) -> f64 {
    RAM_WALL_RESISTANCE.powi(wall as i32)
}

/// Wall level the defenders fight behind once rams have struck
pub fn pre_combat_wall(wall: u32, rams: u32) -> u32 {
    if wall == 0 || rams == 0 {
        return wall;
    }
    let eroded = (f64::from(rams) / (PRE_COMBAT_RAM_DIVISOR * ram_resistance(wall))).round();
    (f64::from(wall) - eroded).max(0.0) as u32
}

/// Defense multiplier granted by a wall level
pub fn wall_bonus(wall: u32) -> f64 {
    1.0 + f64::from(wall) * WALL_BONUS_PER_LEVEL
}

/// Flat defense a standing wall adds on its own
pub fn wall_flat_defense(wall: u32) -> f64 {
    if wall == 0 {
        return 0.0;
    }
    (WALL_FLAT_GROWTH.powi(wall as i32) * WALL_FLAT_BASE).round()
}

/// Wall level after the fight
///
/// `defender_loss_ratio` and `attacker_loss_ratio` are lost/committed unit
/// counts in `[0, 1]`. A wiped defence lets the rams strike at full force,
/// scaled down by how many attackers fell; otherwise they only chip away in
/// proportion to the defenders killed. The result never exceeds the level
/// the battle was fought at.
pub fn post_combat_wall(
    wall: u32,
    wall_during_combat: u32,
    rams: u32,
    ram_attack: u32,
    defender_loss_ratio: f64,
    attacker_loss_ratio: f64,
) -> u32 {
    if rams == 0 || wall == 0 {
        return wall.min(wall_during_combat);
    }

    let ram_power = f64::from(rams) * f64::from(ram_attack);
    let damage = if defender_loss_ratio >= 1.0 {
        let dmg = ram_power / (PRE_COMBAT_RAM_DIVISOR * ram_resistance(wall));
        dmg - 0.5 * dmg * attacker_loss_ratio
    } else {
        ram_power * defender_loss_ratio / (PARTIAL_WIN_RAM_DIVISOR * ram_resistance(wall))
    };

    let resulting = (f64::from(wall) - damage.round()).max(0.0) as u32;
    resulting.min(wall_during_combat)
}
