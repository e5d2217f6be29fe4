//! Evaluator behavior against hand-built rule sets

use aggro_types::{EventKind, LogEvent, school};

use crate::actor::{Actor, ActorKey, ActorKind, PlayerClass, Position};
use crate::config::{
    AuraModifierDef, ClassEntry, ClassRules, ConfigBuilder, GameVersion, ThreatConfig, ThreatFormula,
    ThreatOp,
};
use crate::fight::{Enemy, FightState};
use crate::handlers::{ChainOutcome, HandlerRegistry};

use super::evaluate_event;

fn key(id: i64) -> ActorKey {
    ActorKey::new(id, None)
}

fn player(id: i64, class: PlayerClass) -> Actor {
    Actor {
        id,
        name: format!("player{id}"),
        kind: ActorKind::Player,
        class: Some(class),
        pet_owner: None,
    }
}

fn enemy(id: i64) -> Enemy {
    Enemy { id, instance: 0, name: format!("enemy{id}") }
}

fn warrior_config() -> ThreatConfig {
    let mut rules = ClassRules::new();
    rules.exclusive_groups.push(vec![71, 2457, 2458]);
    rules.modifiers.insert(71, AuraModifierDef::stance("Defensive Stance", 1.3));
    rules.modifiers.insert(
        12792,
        AuraModifierDef::talent("Defiance", 1.15),
    );
    rules.abilities.insert(355, ThreatFormula::taunt());
    ClassEntry { class: PlayerClass::Warrior, rules }
    .into_config()
}

trait IntoConfig {
    fn into_config(self) -> ThreatConfig;
}

impl IntoConfig for ClassEntry {
    fn into_config(self) -> ThreatConfig {
        ConfigBuilder::new().class(self).build(GameVersion::Classic)
    }
}

fn fight() -> (FightState, HandlerRegistry) {
    let state = FightState::new(
        &[player(1, PlayerClass::Warrior), player(2, PlayerClass::Warrior)],
        &[enemy(100), enemy(101)],
        None,
    );
    (state, HandlerRegistry::new())
}

fn damage(source: i64, target: i64, ability: u32, amount: f64) -> LogEvent {
    LogEvent {
        kind: EventKind::Damage,
        source_id: source,
        target_id: target,
        ability_id: Some(ability),
        amount: Some(amount),
        hit_type: Some(1),
        ..LogEvent::default()
    }
}

fn cast(source: i64, target: i64, ability: u32) -> LogEvent {
    LogEvent {
        kind: EventKind::Cast,
        source_id: source,
        target_id: target,
        ability_id: Some(ability),
        ..LogEvent::default()
    }
}

fn eval(
    event: &LogEvent,
    state: &mut FightState,
    config: &ThreatConfig,
    registry: &mut HandlerRegistry,
) -> Option<super::ThreatBlock> {
    evaluate_event(event, state, config, registry, ChainOutcome::default(), Vec::new())
}

#[test]
fn damage_with_stance_modifier() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();
    state.set_aura(&config, key(1), 71);

    let event = damage(1, 100, 78, 100.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();

    assert_eq!(block.calculation.base_value, 100.0);
    assert_eq!(block.calculation.modified_value, 130.0);
    assert_eq!(block.changes.len(), 1);
    let change = &block.changes[0];
    assert_eq!(change.source_actor, 1);
    assert_eq!(change.target_enemy, 100);
    assert_eq!(change.operator, ThreatOp::Add);
    assert_eq!(change.amount, 130.0);
    assert_eq!(change.running_total, 130.0);
    assert_eq!(state.threat(key(1), key(100)), 130.0);
}

#[test]
fn taunt_pulls_to_top_plus_bonus() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();
    state.ensure_instance(key(1)).add_threat(key(100), 100.0);
    state.ensure_instance(key(2)).add_threat(key(100), 500.0);

    let event = cast(1, 100, 355);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();

    assert_eq!(block.changes.len(), 1);
    let change = &block.changes[0];
    assert_eq!(change.operator, ThreatOp::Set);
    assert_eq!(change.amount, 500.0);
    assert_eq!(change.running_total, 500.0);
    assert_eq!(state.threat(key(1), key(100)), 500.0);
}

#[test]
fn taunt_never_reduces_a_leading_caster() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();
    state.ensure_instance(key(1)).add_threat(key(100), 900.0);
    state.ensure_instance(key(2)).add_threat(key(100), 500.0);

    let event = cast(1, 100, 355);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.changes[0].running_total, 900.0);
    assert_eq!(state.threat(key(1), key(100)), 900.0);
}

#[test]
fn split_buff_threat_divides_across_enemies() {
    let mut rules = ClassRules::new();
    rules.abilities.insert(25898, ThreatFormula::buff_split(60.0));
    let config = ClassEntry { class: PlayerClass::Paladin, rules }.into_config();

    let mut state = FightState::new(
        &[player(1, PlayerClass::Paladin)],
        &[enemy(100), enemy(101)],
        None,
    );
    let mut registry = HandlerRegistry::new();

    let mut event = LogEvent {
        kind: EventKind::ApplyBuff,
        source_id: 1,
        target_id: 2,
        ability_id: Some(25898),
        ..LogEvent::default()
    };
    event.timestamp = 10;
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();

    assert!(block.calculation.is_split);
    assert_eq!(block.changes.len(), 2);
    let total: f64 = block.changes.iter().map(|c| c.amount).sum();
    assert!((total - 60.0).abs() < f64::EPSILON);
    for change in &block.changes {
        assert_eq!(change.amount, 30.0);
    }
}

#[test]
fn split_with_no_live_enemies_emits_empty_changes() {
    let mut rules = ClassRules::new();
    rules.abilities.insert(25898, ThreatFormula::buff_split(60.0));
    let config = ClassEntry { class: PlayerClass::Paladin, rules }.into_config();

    let mut state = FightState::new(&[player(1, PlayerClass::Paladin)], &[], None);
    let mut registry = HandlerRegistry::new();
    let event = LogEvent {
        kind: EventKind::ApplyBuff,
        source_id: 1,
        target_id: 1,
        ability_id: Some(25898),
        ..LogEvent::default()
    };
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert!(block.calculation.is_split);
    assert!(block.changes.is_empty());
}

#[test]
fn boss_wipe_zeroes_every_table_entry() {
    // Attach the wipe as a shared rule so the hostile caster resolves it.
    let mut shared = crate::config::SharedRules::default();
    shared.abilities.insert(29210, ThreatFormula::wipe_on_cast());
    let config = ConfigBuilder::new().shared(shared).build(GameVersion::Classic);

    let mut state = FightState::new(
        &[player(1, PlayerClass::Warrior), player(2, PlayerClass::Warrior)],
        &[enemy(15954)],
        None,
    );
    let mut registry = HandlerRegistry::new();
    let noth = key(15954);
    state.ensure_instance(key(1)).add_threat(noth, 800.0);
    state.ensure_instance(key(2)).add_threat(noth, 450.0);

    let event = cast(15954, aggro_types::ENVIRONMENT_ID, 29210);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();

    assert_eq!(block.changes.len(), 2);
    for change in &block.changes {
        assert_eq!(change.operator, ThreatOp::Set);
        assert_eq!(change.running_total, 0.0);
    }
    assert_eq!(state.threat(key(1), noth), 0.0);
    assert_eq!(state.threat(key(2), noth), 0.0);
}

#[test]
fn hateful_strike_adds_to_melee_top_targets() {
    let mut shared = crate::config::SharedRules::default();
    shared.abilities.insert(
        28308,
        ThreatFormula::HatefulStrike { amount: 500.0, targets: 4, melee_range: 15.0 },
    );
    let config = ConfigBuilder::new().shared(shared).build(GameVersion::Classic);

    let mut state = FightState::new(&[], &[enemy(16028)], None);
    let mut registry = HandlerRegistry::new();
    let boss = key(16028);
    state.ensure_instance(boss).set_position(Position { x: 0.0, y: 0.0 });
    for (id, threat, x) in [
        (1_i64, 1000.0, 1.0),
        (2, 900.0, 2.0),
        (3, 800.0, 3.0),
        (4, 700.0, 500.0), // out of melee range
        (5, 600.0, 5.0),
    ] {
        let inst = state.ensure_instance(key(id));
        inst.add_threat(boss, threat);
        inst.set_position(Position { x, y: 0.0 });
    }

    let event = damage(16028, 1, 28308, 4000.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();

    let recipients: Vec<i64> = block.changes.iter().map(|c| c.source_actor).collect();
    // Direct target first, then top-threat actors in range; actor 4 is
    // far away and is passed over for actor 5.
    assert_eq!(recipients, vec![1, 2, 3, 5]);
    for change in &block.changes {
        assert_eq!(change.amount, 500.0);
        assert_eq!(change.operator, ThreatOp::Add);
    }
    assert_eq!(state.threat(key(1), boss), 1500.0);
}

#[test]
fn hateful_strike_without_positions_uses_pure_threat_order() {
    let mut shared = crate::config::SharedRules::default();
    shared.abilities.insert(
        28308,
        ThreatFormula::HatefulStrike { amount: 500.0, targets: 4, melee_range: 15.0 },
    );
    let config = ConfigBuilder::new().shared(shared).build(GameVersion::Classic);

    let mut state = FightState::new(&[], &[enemy(16028)], None);
    let mut registry = HandlerRegistry::new();
    let boss = key(16028);
    for (id, threat) in [(1_i64, 1000.0), (2, 900.0), (3, 800.0), (4, 700.0), (5, 600.0)] {
        state.ensure_instance(key(id)).add_threat(boss, threat);
    }

    let event = damage(16028, 1, 28308, 4000.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    let recipients: Vec<i64> = block.changes.iter().map(|c| c.source_actor).collect();
    assert_eq!(recipients, vec![1, 2, 3, 4]);
}

#[test]
fn knock_away_scales_victim_threat() {
    let mut shared = crate::config::SharedRules::default();
    shared.abilities.insert(19633, ThreatFormula::ModifyThreatOnHit { mult: 0.75 });
    let config = ConfigBuilder::new().shared(shared).build(GameVersion::Classic);

    let mut state = FightState::new(&[player(1, PlayerClass::Warrior)], &[enemy(10184)], None);
    let mut registry = HandlerRegistry::new();
    let ony = key(10184);
    state.ensure_instance(key(1)).add_threat(ony, 1000.0);

    let event = damage(10184, 1, 19633, 200.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert_eq!(state.threat(key(1), ony), 750.0);
    let set = block.changes.iter().find(|c| c.operator == ThreatOp::Set).unwrap();
    assert_eq!(set.running_total, 750.0);
}

#[test]
fn avoided_knock_away_leaves_threat_alone() {
    let mut shared = crate::config::SharedRules::default();
    shared.abilities.insert(19633, ThreatFormula::ModifyThreatOnHit { mult: 0.75 });
    let config = ConfigBuilder::new().shared(shared).build(GameVersion::Classic);

    let mut state = FightState::new(&[player(1, PlayerClass::Warrior)], &[enemy(10184)], None);
    let mut registry = HandlerRegistry::new();
    state.ensure_instance(key(1)).add_threat(key(10184), 1000.0);

    let mut event = damage(10184, 1, 19633, 0.0);
    event.hit_type = Some(7); // dodge
    let block = eval(&event, &mut state, &config, &mut registry);
    assert!(block.is_none());
    assert_eq!(state.threat(key(1), key(10184)), 1000.0);
}

#[test]
fn rage_energize_is_split_and_unmultiplied() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();
    // Stance up: must NOT multiply resource threat.
    state.set_aura(&config, key(1), 71);

    let event = LogEvent {
        kind: EventKind::Energize,
        source_id: 1,
        target_id: 1,
        ability_id: Some(29131),
        resource_change: Some(10.0),
        resource_change_type: Some(1),
        waste: Some(2.0),
        ..LogEvent::default()
    };
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();

    // (10 - 2) · 5 = 40, split between two enemies.
    assert_eq!(block.calculation.modified_value, 40.0);
    assert!(block.calculation.modifiers.is_empty());
    assert_eq!(block.changes.len(), 2);
    assert_eq!(block.changes[0].amount, 20.0);
}

#[test]
fn heal_threat_is_halved_split_and_modified() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();

    let event = LogEvent {
        kind: EventKind::Heal,
        source_id: 1,
        target_id: 2,
        ability_id: Some(2055),
        amount: Some(400.0),
        overheal: Some(100.0),
        ..LogEvent::default()
    };
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    // Wire amount is already effective healing; 400 · 0.5 = 200 over 2.
    assert_eq!(block.calculation.modified_value, 200.0);
    assert_eq!(block.changes.len(), 2);
    assert_eq!(block.changes[0].amount, 100.0);
}

#[test]
fn dead_enemies_are_excluded_from_splits() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();
    state.ensure_instance(key(101)).mark_dead();

    let event = LogEvent {
        kind: EventKind::Heal,
        source_id: 1,
        target_id: 2,
        ability_id: Some(2055),
        amount: Some(400.0),
        ..LogEvent::default()
    };
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.changes.len(), 1);
    assert_eq!(block.changes[0].target_enemy, 100);
    assert_eq!(block.changes[0].amount, 200.0);
}

#[test]
fn on_successful_hit_ignores_avoided_swings() {
    let mut rules = ClassRules::new();
    rules.abilities.insert(11601, ThreatFormula::bonus_on_hit(261.0));
    let config = ClassEntry { class: PlayerClass::Warrior, rules }.into_config();
    let (mut state, mut registry) = fight();

    for hit in [0_i64, 7, 8, 10, 14, 3] {
        let mut event = damage(1, 100, 11601, 0.0);
        event.hit_type = Some(hit);
        assert!(eval(&event, &mut state, &config, &mut registry).is_none(), "hit {hit}");
    }
    let event = damage(1, 100, 11601, 0.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.calculation.modified_value, 261.0);
}

#[test]
fn school_masked_modifier_needs_school_intersection() {
    let mut rules = ClassRules::new();
    rules.modifiers.insert(
        25780,
        AuraModifierDef::buff("Righteous Fury", 1.6).for_school(school::HOLY),
    );
    let config = ClassEntry { class: PlayerClass::Paladin, rules }.into_config();

    let mut state = FightState::new(&[player(1, PlayerClass::Paladin)], &[enemy(100)], None);
    let mut registry = HandlerRegistry::new();
    state.set_aura(&config, key(1), 25780);

    let mut holy = damage(1, 100, 635, 100.0);
    holy.spell_school = Some(school::HOLY);
    let block = eval(&holy, &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.calculation.modified_value, 160.0);

    let mut physical = damage(1, 100, 635, 100.0);
    physical.spell_school = Some(school::PHYSICAL);
    let block = eval(&physical, &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.calculation.modified_value, 100.0);

    // No school on the event: masked modifiers never match.
    let plain = damage(1, 100, 635, 100.0);
    let block = eval(&plain, &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.calculation.modified_value, 100.0);
}

#[test]
fn modifier_report_orders_stance_before_talent() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();
    state.set_aura(&config, key(1), 12792);
    state.set_aura(&config, key(1), 71);

    let event = damage(1, 100, 78, 100.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();

    let names: Vec<&str> = block.calculation.modifiers.iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["Defensive Stance", "Defiance"]);
    // 100 · 1.3 · 1.15, order-independent by commutativity.
    assert!((block.calculation.modified_value - 149.5).abs() < 1e-9);
}

#[test]
fn class_baseline_factor_applies() {
    let mut rules = ClassRules::new();
    rules.base_factor = Some(0.71);
    let config = ClassEntry { class: PlayerClass::Rogue, rules }.into_config();
    let mut state = FightState::new(&[player(1, PlayerClass::Rogue)], &[enemy(100)], None);
    let mut registry = HandlerRegistry::new();

    let event = damage(1, 100, 1752, 100.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert!((block.calculation.modified_value - 71.0).abs() < 1e-9);
    assert_eq!(block.calculation.modifiers.len(), 1);
    assert_eq!(block.calculation.modifiers[0].value, 0.71);
}

#[test]
fn negative_flat_threat_clamps_at_zero() {
    let mut rules = ClassRules::new();
    rules.abilities.insert(25302, ThreatFormula::bonus_on_hit(-800.0));
    let config = ClassEntry { class: PlayerClass::Rogue, rules }.into_config();
    let mut state = FightState::new(&[player(1, PlayerClass::Rogue)], &[enemy(100)], None);
    let mut registry = HandlerRegistry::new();
    state.ensure_instance(key(1)).add_threat(key(100), 300.0);

    let event = damage(1, 100, 25302, 0.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.changes[0].running_total, 0.0);
    assert_eq!(state.threat(key(1), key(100)), 0.0);
}

#[test]
fn transplant_swaps_top_actors_between_paired_bosses() {
    let mut shared = crate::config::SharedRules::default();
    shared.abilities.insert(
        28338,
        ThreatFormula::ThreatTransplant { pair: (15930, 15929) },
    );
    let config = ConfigBuilder::new().shared(shared).build(GameVersion::Classic);

    let mut state = FightState::new(&[], &[enemy(15930), enemy(15929)], None);
    let mut registry = HandlerRegistry::new();
    let feugen = key(15930);
    let stalagg = key(15929);
    state.ensure_instance(key(1)).add_threat(feugen, 2000.0);
    state.ensure_instance(key(2)).add_threat(stalagg, 1500.0);

    let event = cast(15930, 1, 28338);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();

    assert_eq!(block.changes.len(), 4);
    assert_eq!(state.threat(key(2), feugen), 2000.0);
    assert_eq!(state.threat(key(1), feugen), 0.0);
    assert_eq!(state.threat(key(1), stalagg), 1500.0);
    assert_eq!(state.threat(key(2), stalagg), 0.0);
}

#[test]
fn redirect_override_changes_the_recipient() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();

    let event = damage(1, 100, 78, 100.0);
    let outcome = ChainOutcome { skip: false, recipient: Some(key(2)), threat: None };
    let block =
        evaluate_event(&event, &mut state, &config, &mut registry, outcome, Vec::new()).unwrap();

    assert_eq!(block.changes[0].source_actor, 2);
    assert_eq!(state.threat(key(2), key(100)), 100.0);
    assert_eq!(state.threat(key(1), key(100)), 0.0);
}

#[test]
fn threat_override_flows_even_when_the_formula_is_quiet() {
    let mut rules = ClassRules::new();
    rules.abilities.insert(20736, ThreatFormula::CastRollbackOnMiss { amount: 600.0 });
    let config = ClassEntry { class: PlayerClass::Hunter, rules }.into_config();
    let mut state = FightState::new(&[player(1, PlayerClass::Hunter)], &[enemy(100)], None);
    let mut registry = HandlerRegistry::new();

    // Cast: threat up front, handler installed.
    let block = eval(&cast(1, 100, 20736), &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.changes[0].amount, 600.0);
    assert_eq!(registry.len(), 1);

    // The resist arrives: the formula ignores the damage event, but the
    // chain override still lands the refund.
    let mut resist = damage(1, 100, 20736, 0.0);
    resist.hit_type = Some(14);
    let outcome = ChainOutcome { skip: false, recipient: None, threat: Some(-600.0) };
    let block =
        evaluate_event(&resist, &mut state, &config, &mut registry, outcome, Vec::new()).unwrap();
    assert_eq!(block.changes[0].amount, -600.0);
    assert_eq!(state.threat(key(1), key(100)), 0.0);
}

#[test]
fn unknown_ability_falls_back_to_base_damage_rule() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();
    let event = damage(1, 100, 999999, 250.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert_eq!(block.calculation.modified_value, 250.0);
}

#[test]
fn enemy_damage_generates_no_threat() {
    let config = warrior_config();
    let (mut state, mut registry) = fight();
    let event = damage(100, 1, 5, 300.0);
    let block = eval(&event, &mut state, &config, &mut registry).unwrap();
    assert!(block.changes.is_empty());
}
