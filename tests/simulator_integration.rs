//! Combat simulator integration tests
//!
//! Properties that must hold for any valid input, plus a few worked raids.

use farm_warden::combat::{rank_templates, simulate, CombatModifiers};
use farm_warden::units::{TroopComposition, UnitStatTable};
use proptest::prelude::*;

const UNITS: &[&str] = &[
    "spear", "sword", "axe", "archer", "spy", "light", "marcher", "heavy", "ram", "catapult",
];

fn comp(pairs: &[(&str, u32)]) -> TroopComposition {
    TroopComposition::from_pairs(pairs.iter().copied())
}

fn composition() -> impl Strategy<Value = TroopComposition> {
    prop::collection::vec((prop::sample::select(UNITS), 0u32..400), 0..5)
        .prop_map(|pairs| TroopComposition::from_pairs(pairs))
}

fn modifiers() -> impl Strategy<Value = CombatModifiers> {
    (any::<bool>(), 1u32..=100, -100i32..=100).prop_map(|(night_bonus, morale, luck)| CombatModifiers {
        night_bonus,
        morale_pct: f64::from(morale),
        luck_pct: f64::from(luck),
    })
}

proptest! {
    #[test]
    fn losses_never_exceed_what_was_sent(
        attacker in composition(),
        defender in composition(),
        wall in 0u32..=20,
        mods in modifiers(),
    ) {
        let table = UnitStatTable::standard();
        let result = simulate(&table, &attacker, &defender, wall, mods).unwrap();

        for (unit, lost) in result.attacker_losses.iter() {
            prop_assert!(lost <= attacker.get(unit), "{} lost {} of {}", unit, lost, attacker.get(unit));
        }
        for (unit, lost) in result.defender_losses.iter() {
            prop_assert!(lost <= defender.get(unit), "{} lost {} of {}", unit, lost, defender.get(unit));
        }
    }

    #[test]
    fn wall_only_goes_down(
        attacker in composition(),
        defender in composition(),
        wall in 0u32..=20,
        mods in modifiers(),
    ) {
        let table = UnitStatTable::standard();
        let result = simulate(&table, &attacker, &defender, wall, mods).unwrap();

        prop_assert_eq!(result.wall_before, wall);
        prop_assert!(result.wall_during_combat <= result.wall_before);
        prop_assert!(result.wall_after <= result.wall_during_combat);
    }

    #[test]
    fn empty_defence_costs_nothing(attacker in composition(), wall in 0u32..=20, mods in modifiers()) {
        let table = UnitStatTable::standard();
        let result = simulate(&table, &attacker, &TroopComposition::new(), wall, mods).unwrap();

        prop_assert!(result.attacker_losses.is_empty());
        prop_assert!(result.defender_losses.is_empty());
        prop_assert_eq!(result.wall_after, wall);
    }

    #[test]
    fn empty_attack_costs_nothing(defender in composition(), wall in 0u32..=20, mods in modifiers()) {
        let table = UnitStatTable::standard();
        let result = simulate(&table, &TroopComposition::new(), &defender, wall, mods).unwrap();

        prop_assert!(result.attacker_losses.is_empty());
        prop_assert!(result.defender_losses.is_empty());
        prop_assert_eq!(result.wall_after, wall);
    }

    #[test]
    fn simulation_is_deterministic(
        attacker in composition(),
        defender in composition(),
        wall in 0u32..=20,
        mods in modifiers(),
    ) {
        let table = UnitStatTable::standard();
        let first = simulate(&table, &attacker, &defender, wall, mods).unwrap();
        let second = simulate(&table, &attacker, &defender, wall, mods).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_light_cavalry_clears_barbarian_village() {
    let table = UnitStatTable::standard();
    let attacker = comp(&[("light", 5)]);
    let defender = comp(&[("spear", 2)]);

    let result = simulate(&table, &attacker, &defender, 0, CombatModifiers::default()).unwrap();
    assert_eq!(result.defender_losses.get("spear"), 2);
    assert!(result.defender_wiped(&table, &defender));
    assert!(result.attacker_losses.get("light") <= 1);
}

#[test]
fn test_wall_above_limit_rejected() {
    let table = UnitStatTable::standard();
    let err = simulate(&table, &comp(&[("axe", 1)]), &comp(&[("spear", 1)]), 21, CombatModifiers::default());
    assert!(err.is_err());
}

#[test]
fn test_ranking_prefers_clearing_template() {
    let table = UnitStatTable::standard();
    let templates = vec![comp(&[("light", 1)]), comp(&[("light", 50)])];
    let defender = comp(&[("spear", 10)]);

    let ranked = rank_templates(&table, &templates, &defender, 0, CombatModifiers::default()).unwrap();
    assert_eq!(ranked[0].index, 1);
    assert!(ranked[0].clears_defence);
    assert!(!ranked[1].clears_defence);
}
