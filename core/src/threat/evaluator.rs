//! Per-event threat evaluation
//!
//! Resolution order per event: encounter abilities, raid/era abilities,
//! the caster's class table, then the era base rule for the event type.
//! The first matching rule wins; its result runs through the caster's
//! modifier stack, is split if requested, and lands on the threat
//! tables together with any requested side-effects.

use aggro_types::{EventKind, LogEvent};

use crate::actor::{ActorInstance, ActorKey};
use crate::config::{
    FlatThreat, ThreatAssignment, ThreatConfig, ThreatEffect, ThreatFormula, ThreatOp,
    ThreatResult, ThreatScope,
};
use crate::fight::{Enemy, FightState};
use crate::handlers::{ChainOutcome, HandlerRegistry, RedirectThreat, RollbackOnMiss};

use super::{AppliedModifier, Calculation, ThreatBlock, ThreatChange};

/// Event kinds an unrestricted `Flat` rule fires on: the amount-bearing
/// ones. Cast-driven flat threat states its event types explicitly.
fn flat_applies(kind: EventKind, gate: Option<&'static [EventKind]>) -> bool {
    match gate {
        Some(kinds) => kinds.contains(&kind),
        None => matches!(
            kind,
            EventKind::Damage
                | EventKind::Absorbed
                | EventKind::Heal
                | EventKind::Energize
                | EventKind::ResourceChange
        ),
    }
}

/// Base amount for the event: damage and effective healing as logged,
/// resource gains net of waste.
fn resolve_amount(event: &LogEvent) -> f64 {
    match event.kind {
        EventKind::Damage | EventKind::Absorbed | EventKind::Heal => {
            event.amount.unwrap_or(0.0)
        }
        EventKind::Energize | EventKind::ResourceChange => {
            (event.resource_change.unwrap_or(0.0) - event.waste.unwrap_or(0.0)).max(0.0)
        }
        _ => 0.0,
    }
}

/// Era default rule when no ability table matched.
fn base_formula(event: &LogEvent, config: &ThreatConfig) -> Option<ThreatFormula> {
    match event.kind {
        EventKind::Damage => Some(ThreatFormula::Flat(FlatThreat::default())),
        EventKind::Heal => Some(ThreatFormula::Flat(FlatThreat {
            mult: config.base().heal_factor,
            split: true,
            ..FlatThreat::default()
        })),
        EventKind::Energize | EventKind::ResourceChange => {
            let factor = event
                .resource_kind()
                .map(|k| config.base().resource_factor(k))
                .unwrap_or(0.0);
            Some(ThreatFormula::Flat(FlatThreat {
                mult: factor,
                split: true,
                apply_source_modifiers: false,
                ..FlatThreat::default()
            }))
        }
        _ => None,
    }
}

/// Interpret one formula against the event. `None` means no threat
/// contribution.
fn compute(
    formula: ThreatFormula,
    event: &LogEvent,
    amount: f64,
    state: &FightState,
    source: ActorKey,
    target: ActorKey,
) -> Option<ThreatResult> {
    use ThreatFormula::*;
    match formula {
        Flat(f) => flat_applies(event.kind, f.on).then(|| {
            let mut r = ThreatResult::value(amount * f.mult + f.bonus)
                .split(f.split)
                .with_mult(f.mult);
            if !f.apply_source_modifiers {
                r = r.unmodified();
            }
            r
        }),
        OnSuccessfulHit { mult, bonus } => {
            if event.kind != EventKind::Damage {
                return None;
            }
            if event.hit_type().map(|h| h.is_avoided()).unwrap_or(false) {
                return None;
            }
            Some(ThreatResult::value(amount * mult + bonus).with_mult(mult))
        }
        OnDebuff { bonus } => event
            .kind
            .is_debuff_apply()
            .then(|| ThreatResult::value(bonus)),
        OnDebuffOrDamage { bonus } => {
            if event.kind.is_debuff_apply() {
                Some(ThreatResult::value(bonus))
            } else if event.kind == EventKind::Damage {
                Some(ThreatResult::value(amount))
            } else {
                None
            }
        }
        OnBuff { bonus, split } => event
            .kind
            .is_buff_apply()
            .then(|| ThreatResult::value(bonus).split(split)),
        OnBuffOrDamage { bonus } => {
            if event.kind.is_buff_apply() {
                Some(ThreatResult::value(bonus))
            } else if event.kind == EventKind::Damage {
                Some(ThreatResult::value(amount))
            } else {
                None
            }
        }
        CastRollbackOnMiss { amount: cast_threat } => {
            if event.kind != EventKind::Cast {
                return None;
            }
            let ability = event.ability_id?;
            // The up-front threat skips the modifier stack so the
            // rollback restores exactly what was added.
            Some(
                ThreatResult::value(cast_threat)
                    .unmodified()
                    .with_effect(ThreatEffect::InstallHandler(Box::new(RollbackOnMiss {
                        caster: source,
                        ability,
                        amount: cast_threat,
                    }))),
            )
        }
        Taunt { mult, bonus } => {
            if !matches!(
                event.kind,
                EventKind::Cast | EventKind::ApplyDebuff | EventKind::RefreshDebuff
            ) {
                return None;
            }
            if !state.is_enemy(target.id) {
                return None;
            }
            let top = state
                .top_by_threat(target, 1)
                .first()
                .map(|(_, t)| *t)
                .unwrap_or(0.0);
            let current = state.threat(source, target);
            let pulled = (top + amount * mult + bonus).max(current);
            Some(
                ThreatResult::value(0.0)
                    .unmodified()
                    .with_effect(ThreatEffect::CustomThreat {
                        changes: vec![ThreatAssignment {
                            actor: source,
                            enemy: target,
                            op: ThreatOp::Set,
                            amount: pulled,
                        }],
                    }),
            )
        }
        ModifyThreat { mult, scope, on } => {
            if let Some(kinds) = on
                && !kinds.contains(&event.kind)
            {
                return None;
            }
            Some(
                ThreatResult::value(0.0)
                    .unmodified()
                    .with_effect(ThreatEffect::ModifyThreat { mult, scope }),
            )
        }
        ModifyThreatOnHit { mult } => {
            if event.kind != EventKind::Damage {
                return None;
            }
            if !event.hit_type().map(|h| h.connects()).unwrap_or(true) {
                return None;
            }
            Some(
                ThreatResult::value(0.0)
                    .unmodified()
                    .with_effect(ThreatEffect::ModifyThreat {
                        mult,
                        scope: ThreatScope::Target,
                    }),
            )
        }
        HatefulStrike { amount: strike, targets, melee_range } => {
            if event.kind != EventKind::Damage {
                return None;
            }
            let boss_position = state.position(source);
            let mut recipients = vec![target];
            for (key, _) in state.top_by_threat(source, usize::MAX) {
                if recipients.len() >= targets {
                    break;
                }
                if key == target {
                    continue;
                }
                // With no distance data at all, pure threat order wins.
                let in_range = match boss_position {
                    None => true,
                    Some(bp) => state
                        .position(key)
                        .map(|p| bp.distance_to(p) <= melee_range)
                        .unwrap_or(false),
                };
                if in_range {
                    recipients.push(key);
                }
            }
            let changes = recipients
                .into_iter()
                .map(|actor| ThreatAssignment {
                    actor,
                    enemy: source,
                    op: ThreatOp::Add,
                    amount: strike,
                })
                .collect();
            Some(
                ThreatResult::value(0.0)
                    .unmodified()
                    .with_effect(ThreatEffect::CustomThreat { changes }),
            )
        }
        ThreatTransplant { pair } => {
            if event.kind != EventKind::Cast {
                return None;
            }
            let partner_id = match source.id {
                id if id == pair.0 => pair.1,
                id if id == pair.1 => pair.0,
                _ => return None,
            };
            let partner = state
                .enemies()
                .iter()
                .find(|e| e.id == partner_id)
                .map(Enemy::key)?;
            let (first, _) = *state.top_by_threat(source, 1).first()?;
            let (second, _) = *state.top_by_threat(partner, 1).first()?;
            if first == second {
                return None;
            }
            let a1 = state.threat(first, source);
            let a2 = state.threat(second, source);
            let b1 = state.threat(first, partner);
            let b2 = state.threat(second, partner);
            let changes = vec![
                ThreatAssignment { actor: first, enemy: source, op: ThreatOp::Set, amount: a2 },
                ThreatAssignment { actor: second, enemy: source, op: ThreatOp::Set, amount: a1 },
                ThreatAssignment { actor: first, enemy: partner, op: ThreatOp::Set, amount: b2 },
                ThreatAssignment { actor: second, enemy: partner, op: ThreatOp::Set, amount: b1 },
            ];
            Some(
                ThreatResult::value(0.0)
                    .unmodified()
                    .with_effect(ThreatEffect::CustomThreat { changes }),
            )
        }
        RedirectNext { events } => {
            if event.kind != EventKind::Cast {
                return None;
            }
            Some(
                ThreatResult::value(0.0)
                    .unmodified()
                    .with_effect(ThreatEffect::InstallHandler(Box::new(RedirectThreat {
                        caster: source,
                        recipient: target,
                        remaining: events,
                    }))),
            )
        }
        NoThreat => None,
    }
}

/// Collect the caster's applicable modifiers: stance, talent, buff,
/// gear order, stable by aura id inside a category.
fn collect_modifiers(
    state: &FightState,
    config: &ThreatConfig,
    source: ActorKey,
    ability: Option<u32>,
    school: Option<u8>,
) -> Vec<AppliedModifier> {
    // Formulas see a detached snapshot of the caster, not the live
    // instance.
    let Some(view) = state.instance(source).map(ActorInstance::runtime_view) else {
        return Vec::new();
    };
    let mut rows: Vec<(u32, AppliedModifier)> = view
        .auras
        .iter()
        .filter_map(|&aura| {
            let def = config.modifier_for(aura)?;
            def.applies_to(ability, school).then_some((
                aura,
                AppliedModifier {
                    source: def.source,
                    name: def.name,
                    value: def.value,
                    school_mask: def.school_mask,
                },
            ))
        })
        .collect();
    rows.sort_by_key(|(aura, m)| (m.source, *aura));
    let mods: Vec<AppliedModifier> = rows.into_iter().map(|(_, m)| m).collect();
    for m in &mods {
        if let Some(mask) = m.school_mask {
            tracing::trace!(
                name = m.name,
                value = m.value,
                school = %super::school_name(mask),
                "school-scoped modifier applied"
            );
        }
    }
    mods
}

/// Evaluate one event and mutate the fight's threat tables.
///
/// `outcome` carries the folded handler-chain overrides; `hook_effects`
/// are the effects encounter hooks merged into this event.
pub(crate) fn evaluate_event(
    event: &LogEvent,
    state: &mut FightState,
    config: &ThreatConfig,
    registry: &mut HandlerRegistry,
    outcome: ChainOutcome,
    hook_effects: Vec<ThreatEffect>,
) -> Option<ThreatBlock> {
    let source = ActorKey::new(event.source_id, event.source_instance);
    let target = ActorKey::new(event.target_id, event.target_instance);
    let amount = resolve_amount(event);
    let class = state.class_of(source.id);

    let formula = config
        .formula_for(state.encounter_id(), event.ability_id, class)
        .copied()
        .or_else(|| base_formula(event, config));

    let mut result = formula.and_then(|f| compute(f, event, amount, state, source, target));

    // A handler override must still flow when the formula stayed quiet
    // (rollbacks ride on avoided hits the formula ignores).
    if result.is_none() && outcome.threat.is_some() {
        result = Some(ThreatResult::value(0.0).unmodified());
    }
    let mut result = match result {
        Some(r) => r,
        None if !hook_effects.is_empty() => ThreatResult::value(0.0).unmodified(),
        None => return None,
    };

    // Modifier stack.
    let mut modifiers = Vec::new();
    let mut modified_value = result.base_value;
    if result.apply_source_modifiers {
        modifiers = collect_modifiers(state, config, source, event.ability_id, event.spell_school);
        let product: f64 = modifiers.iter().map(|m| m.value).product();
        let class_factor = config.class_factor(class);
        if class_factor != 1.0 {
            modifiers.push(AppliedModifier {
                source: crate::config::ModifierSource::Aura,
                name: "class threat baseline",
                value: class_factor,
                school_mask: None,
            });
        }
        modified_value = result.base_value * product * class_factor;
    }
    if let Some(override_value) = outcome.threat {
        modified_value = override_value;
    }

    let mut calc = Calculation {
        description: formula
            .map(|f| f.describe())
            .unwrap_or_else(|| "encounter hook".to_string()),
        base_amount: amount,
        base_value: result.base_value,
        modified_value,
        modifiers,
        is_split: result.split,
    };

    let mut changes: Vec<ThreatChange> = Vec::new();

    // Default add changes. Threat always lands on a friendly actor's
    // table; redirected threat lands on the override recipient.
    let actor = outcome.recipient.unwrap_or(source);
    if modified_value != 0.0 && !state.is_enemy(actor.id) {
        if result.split {
            let recipients = state.alive_enemy_keys();
            if recipients.is_empty() {
                tracing::trace!("split threat with no live enemies");
            } else {
                let share = modified_value / recipients.len() as f64;
                for enemy in recipients {
                    push_add(state, &mut changes, actor, enemy, share);
                }
            }
        } else if state.is_enemy(target.id) {
            push_add(state, &mut changes, actor, target, modified_value);
        }
    }

    // Effects: encounter-hook effects first, then the formula's own.
    for effect in hook_effects.into_iter().chain(result.effects.drain(..)) {
        apply_effect(effect, event, state, registry, source, target, &mut changes, &mut calc);
    }

    Some(ThreatBlock { calculation: calc, changes })
}

fn push_add(
    state: &mut FightState,
    changes: &mut Vec<ThreatChange>,
    actor: ActorKey,
    enemy: ActorKey,
    amount: f64,
) {
    let total = state.ensure_instance(actor).add_threat(enemy, amount);
    changes.push(ThreatChange {
        source_actor: actor.id,
        source_actor_instance: actor.instance,
        target_enemy: enemy.id,
        target_enemy_instance: enemy.instance,
        operator: ThreatOp::Add,
        amount,
        running_total: total,
    });
}

#[allow(clippy::too_many_arguments)]
fn apply_effect(
    effect: ThreatEffect,
    event: &LogEvent,
    state: &mut FightState,
    registry: &mut HandlerRegistry,
    source: ActorKey,
    target: ActorKey,
    changes: &mut Vec<ThreatChange>,
    calc: &mut Calculation,
) {
    match effect {
        ThreatEffect::ModifyThreat { mult, scope } => {
            apply_modify(state, source, target, mult, scope, changes);
        }
        ThreatEffect::CustomThreat { changes: assignments } => {
            for a in assignments {
                let instance = state.ensure_instance(a.actor);
                let total = match a.op {
                    ThreatOp::Add => instance.add_threat(a.enemy, a.amount),
                    ThreatOp::Set => instance.set_threat(a.enemy, a.amount.max(0.0)),
                };
                changes.push(ThreatChange {
                    source_actor: a.actor.id,
                    source_actor_instance: a.actor.instance,
                    target_enemy: a.enemy.id,
                    target_enemy_instance: a.enemy.instance,
                    operator: a.op,
                    amount: a.amount,
                    running_total: total,
                });
            }
        }
        ThreatEffect::InstallHandler(handler) => {
            registry.install(handler, event.timestamp);
        }
        ThreatEffect::Marker(note) => {
            if calc.description.is_empty() {
                calc.description = note.to_string();
            } else {
                calc.description = format!("{} [{}]", calc.description, note);
            }
        }
    }
}

/// Scale existing threat. A friendly caster scales its own tables; a
/// hostile caster scales the threat held against it (its victim's for
/// `Target`, everyone's for `AllEnemies`).
fn apply_modify(
    state: &mut FightState,
    source: ActorKey,
    target: ActorKey,
    mult: f64,
    scope: ThreatScope,
    changes: &mut Vec<ThreatChange>,
) {
    if state.is_enemy(source.id) {
        let enemy = source;
        match scope {
            ThreatScope::Target => {
                scale_pair(state, target, enemy, mult, changes);
            }
            ThreatScope::AllEnemies => {
                if mult == 0.0 {
                    tracing::debug!(enemy = enemy.id, "threat wipe");
                }
                let mut holders: Vec<ActorKey> = state
                    .instances()
                    .filter_map(|(k, inst)| (inst.threat_against(enemy) != 0.0).then_some(k))
                    .collect();
                holders.sort_unstable();
                for actor in holders {
                    scale_pair(state, actor, enemy, mult, changes);
                }
            }
        }
    } else {
        match scope {
            ThreatScope::Target => {
                if state.is_enemy(target.id) {
                    scale_pair(state, source, target, mult, changes);
                }
            }
            ThreatScope::AllEnemies => {
                if mult == 0.0 {
                    tracing::debug!(actor = source.id, "self threat wipe");
                }
                let enemies: Vec<ActorKey> = state.enemies().iter().map(Enemy::key).collect();
                for enemy in enemies {
                    if state.threat(source, enemy) != 0.0 {
                        scale_pair(state, source, enemy, mult, changes);
                    }
                }
            }
        }
    }
}

fn scale_pair(
    state: &mut FightState,
    actor: ActorKey,
    enemy: ActorKey,
    mult: f64,
    changes: &mut Vec<ThreatChange>,
) {
    let prior = state.threat(actor, enemy);
    if prior == 0.0 {
        return;
    }
    let scaled = prior * mult;
    let total = state.ensure_instance(actor).set_threat(enemy, scaled);
    changes.push(ThreatChange {
        source_actor: actor.id,
        source_actor_instance: actor.instance,
        target_enemy: enemy.id,
        target_enemy_instance: enemy.instance,
        operator: ThreatOp::Set,
        amount: scaled,
        running_total: total,
    });
}
