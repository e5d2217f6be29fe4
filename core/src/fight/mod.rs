//! Fight-scoped mutable state
//!
//! `FightState` owns every actor instance seen in a fight, routes
//! non-threat bookkeeping (auras, deaths, targets, positions) before
//! formula evaluation, and answers the queries formulas and handlers
//! ask: positions, distances, threat standings, target history.

mod combatant_info;

use std::cmp::Ordering;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use aggro_types::{EventKind, LogEvent};

use crate::actor::{Actor, ActorInstance, ActorKey, PlayerClass, Position};
use crate::config::ThreatConfig;

/// An enemy instance tracked by the fight, known from the fight's NPC
/// and pet lists before any event arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: i64,
    #[serde(default)]
    pub instance: i32,
    #[serde(default)]
    pub name: String,
}

impl Enemy {
    pub fn key(&self) -> ActorKey {
        ActorKey::new(self.id, Some(self.instance))
    }
}

/// Which side of an event owns its coordinates.
enum PositionSide {
    Source,
    Target,
    Neither,
}

fn position_side(kind: EventKind) -> PositionSide {
    use EventKind::*;
    match kind {
        Damage | Absorbed | Heal | ApplyBuff | RefreshBuff | ApplyBuffStack | RemoveBuff
        | RemoveBuffStack | ApplyDebuff | RefreshDebuff | ApplyDebuffStack | RemoveDebuff
        | RemoveDebuffStack | Death | Resurrect => PositionSide::Target,
        Cast | BeginCast | Interrupt | Energize | ResourceChange | Summon | CombatantInfo => {
            PositionSide::Source
        }
        Unknown => PositionSide::Neither,
    }
}

/// All mutable state of one fight.
#[derive(Debug, Default)]
pub struct FightState {
    /// Report master data, by actor id.
    roster: HashMap<i64, Actor>,
    enemies: Vec<Enemy>,
    enemy_ids: HashSet<i64>,
    actors: HashMap<ActorKey, ActorInstance>,
    encounter_id: Option<i64>,
}

impl FightState {
    pub fn new(friendlies: &[Actor], enemies: &[Enemy], encounter_id: Option<i64>) -> Self {
        Self {
            roster: friendlies.iter().map(|a| (a.id, a.clone())).collect(),
            enemy_ids: enemies.iter().map(|e| e.id).collect(),
            enemies: enemies.to_vec(),
            actors: HashMap::new(),
            encounter_id,
        }
    }

    pub fn encounter_id(&self) -> Option<i64> {
        self.encounter_id
    }

    // ─── Actors ─────────────────────────────────────────────────────────────

    pub fn actor(&self, id: i64) -> Option<&Actor> {
        self.roster.get(&id)
    }

    /// Class for rule resolution. Pets resolve through their owner's
    /// class so pet abilities hit the owner's ability table.
    pub fn class_of(&self, id: i64) -> Option<PlayerClass> {
        let actor = self.roster.get(&id)?;
        if let Some(class) = actor.class {
            return Some(class);
        }
        actor
            .pet_owner
            .and_then(|owner| self.roster.get(&owner))
            .and_then(|owner| owner.class)
    }

    pub fn instance(&self, key: ActorKey) -> Option<&ActorInstance> {
        self.actors.get(&key)
    }

    /// Instance for a key, created on first reference. Actors absent
    /// from the master data get a minimal classless stand-in.
    pub fn ensure_instance(&mut self, key: ActorKey) -> &mut ActorInstance {
        self.roster
            .entry(key.id)
            .or_insert_with(|| Actor::unknown(key.id));
        self.actors.entry(key).or_insert_with(ActorInstance::new)
    }

    pub fn instances(&self) -> impl Iterator<Item = (ActorKey, &ActorInstance)> {
        self.actors.iter().map(|(k, v)| (*k, v))
    }

    // ─── Enemies ────────────────────────────────────────────────────────────

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn is_enemy(&self, id: i64) -> bool {
        self.enemy_ids.contains(&id)
    }

    /// Enemy instances that can still hold aggro. Unseen enemies count
    /// as alive.
    pub fn alive_enemy_keys(&self) -> Vec<ActorKey> {
        self.enemies
            .iter()
            .map(Enemy::key)
            .filter(|k| self.is_alive(*k))
            .collect()
    }

    // ─── Bookkeeping ────────────────────────────────────────────────────────

    /// Absorb an event's non-threat side-effects. Runs before formula
    /// evaluation; malformed events degrade to whatever is safe.
    pub fn process_event(&mut self, event: &LogEvent, config: &ThreatConfig) {
        let source = ActorKey::new(event.source_id, event.source_instance);
        let target = ActorKey::new(event.target_id, event.target_instance);

        match event.kind {
            EventKind::CombatantInfo => self.absorb_combatant_info(event, config),
            k if k.is_aura_apply() => {
                if let Some(ability) = event.ability_id {
                    self.ensure_instance(target)
                        .add_aura(config.exclusives(), ability);
                }
            }
            k if k.is_aura_remove() => {
                if let Some(ability) = event.ability_id {
                    self.ensure_instance(target).remove_aura(ability);
                }
            }
            k if k.is_stack_remove() => {
                if let Some(ability) = event.ability_id
                    && event.stacks.unwrap_or(1) <= 0
                {
                    self.ensure_instance(target).remove_aura(ability);
                }
            }
            EventKind::Cast | EventKind::BeginCast => {
                let targets_environment = event.targets_environment();
                let inst = self.ensure_instance(source);
                // Any observed cast proves the caster is up again.
                inst.mark_alive();
                if !targets_environment {
                    inst.set_target(target);
                }
                if event.kind == EventKind::Cast
                    && let Some(ability) = event.ability_id
                {
                    let class = self.class_of(source.id);
                    if let Some(aura) = config.cast_implication(class, ability) {
                        tracing::trace!(actor = source.id, aura, "cast-implied aura");
                        self.ensure_instance(source)
                            .add_aura(config.exclusives(), aura);
                    }
                }
            }
            EventKind::Damage => {
                if event.overkill.unwrap_or(0.0) > 0.0 {
                    self.ensure_instance(target).mark_dead();
                }
            }
            EventKind::Death => {
                self.ensure_instance(target).mark_dead();
            }
            EventKind::Resurrect => {
                self.ensure_instance(target).mark_alive();
            }
            _ => {}
        }

        self.update_position(event, source, target);
    }

    fn update_position(&mut self, event: &LogEvent, source: ActorKey, target: ActorKey) {
        if !event.has_position() {
            return;
        }
        let owner = match position_side(event.kind) {
            PositionSide::Source => source,
            PositionSide::Target => target,
            PositionSide::Neither => return,
        };
        if owner.id == aggro_types::ENVIRONMENT_ID {
            return;
        }
        let position = Position {
            x: event.x.unwrap_or(0.0),
            y: event.y.unwrap_or(0.0),
        };
        self.ensure_instance(owner).set_position(position);
    }

    // ─── Aura corrections (handlers and hooks) ──────────────────────────────

    pub fn set_aura(&mut self, config: &ThreatConfig, actor: ActorKey, spell: u32) {
        self.ensure_instance(actor).add_aura(config.exclusives(), spell);
    }

    pub fn remove_aura(&mut self, actor: ActorKey, spell: u32) {
        if let Some(inst) = self.actors.get_mut(&actor) {
            inst.remove_aura(spell);
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn position(&self, key: ActorKey) -> Option<Position> {
        self.actors.get(&key).and_then(ActorInstance::position)
    }

    /// Euclidean distance; `None` when either side has no known
    /// position.
    pub fn distance(&self, a: ActorKey, b: ActorKey) -> Option<f64> {
        Some(self.position(a)?.distance_to(self.position(b)?))
    }

    /// Actor keys with a known position within `max_distance` of the
    /// given actor, excluding it.
    pub fn actors_in_range(&self, center: ActorKey, max_distance: f64) -> Vec<ActorKey> {
        let Some(origin) = self.position(center) else {
            return Vec::new();
        };
        let mut found: Vec<ActorKey> = self
            .actors
            .iter()
            .filter(|(k, _)| **k != center)
            .filter_map(|(k, inst)| {
                let p = inst.position()?;
                (origin.distance_to(p) <= max_distance).then_some(*k)
            })
            .collect();
        found.sort_unstable();
        found
    }

    pub fn threat(&self, actor: ActorKey, enemy: ActorKey) -> f64 {
        self.actors
            .get(&actor)
            .map(|i| i.threat_against(enemy))
            .unwrap_or(0.0)
    }

    /// Actors by descending threat against an enemy; ties break by
    /// ascending actor id.
    pub fn top_by_threat(&self, enemy: ActorKey, count: usize) -> Vec<(ActorKey, f64)> {
        let mut rows: Vec<(ActorKey, f64)> = self
            .actors
            .iter()
            .filter_map(|(k, inst)| {
                let threat = inst.threat_against(enemy);
                (threat > 0.0).then_some((*k, threat))
            })
            .collect();
        rows.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        rows.truncate(count);
        rows
    }

    pub fn is_alive(&self, key: ActorKey) -> bool {
        self.actors.get(&key).map(ActorInstance::is_alive).unwrap_or(true)
    }

    pub fn current_target(&self, key: ActorKey) -> Option<ActorKey> {
        self.actors.get(&key).and_then(ActorInstance::current_target)
    }

    pub fn last_target(&self, key: ActorKey) -> Option<ActorKey> {
        self.actors.get(&key).and_then(ActorInstance::last_target)
    }
}
