//! Fight replay pipeline
//!
//! Drives one fight end to end: encounter hooks, bookkeeping, the
//! handler chain, evaluation, and augmented-event emission. Fights are
//! independent; `replay_fights` fans them out on a worker pool with the
//! merged config shared by reference.

use rayon::prelude::*;
use serde::Deserialize;

use aggro_types::{EventKind, LogEvent};

use crate::actor::Actor;
use crate::config::{EncounterHook, ThreatConfig, ThreatEffect};
use crate::fight::{Enemy, FightState};
use crate::handlers::{HandlerRegistry, ThreatHandler};
use crate::threat::{AugmentedEvent, evaluate_event};

/// A fight ready for replay: the actor rosters known up front plus the
/// time-ordered event stream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fight {
    pub id: u64,
    pub name: String,
    pub encounter_id: Option<i64>,
    pub friendlies: Vec<Actor>,
    pub enemies: Vec<Enemy>,
    pub events: Vec<LogEvent>,
}

/// Replay driver for a single fight.
pub struct FightReplay<'a> {
    config: &'a ThreatConfig,
    state: FightState,
    registry: HandlerRegistry,
    hooks: Vec<Box<dyn EncounterHook>>,
}

impl<'a> FightReplay<'a> {
    pub fn new(config: &'a ThreatConfig, fight: &Fight) -> Self {
        let state = FightState::new(&fight.friendlies, &fight.enemies, fight.encounter_id);
        let hooks: Vec<Box<dyn EncounterHook>> = config
            .hooks_for(fight.encounter_id)
            .iter()
            .map(|factory| factory())
            .collect();
        if !hooks.is_empty() {
            tracing::debug!(encounter = ?fight.encounter_id, hooks = hooks.len(), "encounter hooks armed");
        }
        Self {
            config,
            state,
            registry: HandlerRegistry::new(),
            hooks,
        }
    }

    pub fn state(&self) -> &FightState {
        &self.state
    }

    /// Install an extra handler, the way an install effect would.
    pub fn install_handler(&mut self, handler: Box<dyn ThreatHandler>, installed_at: i64) -> u64 {
        self.registry.install(handler, installed_at)
    }

    /// Drop every installed handler (fight-state reuse in tests).
    pub fn clear_handlers(&mut self) {
        self.registry.clear();
    }

    /// Process one event: hooks, bookkeeping, handler chain, threat.
    pub fn process(&mut self, event: &LogEvent) -> AugmentedEvent {
        if event.kind == EventKind::Unknown {
            return AugmentedEvent { event: event.clone(), threat: None };
        }

        let mut hook_effects: Vec<ThreatEffect> = Vec::new();
        for hook in &mut self.hooks {
            hook_effects.extend(hook.on_event(event, &self.state));
        }

        self.state.process_event(event, self.config);

        let outcome = self.registry.dispatch(event, &mut self.state, self.config);
        if outcome.skip {
            return AugmentedEvent { event: event.clone(), threat: None };
        }

        let threat = evaluate_event(
            event,
            &mut self.state,
            self.config,
            &mut self.registry,
            outcome,
            hook_effects,
        );
        AugmentedEvent { event: event.clone(), threat }
    }

    /// Drain a whole event stream, consuming the replay.
    pub fn run(mut self, events: &[LogEvent]) -> Vec<AugmentedEvent> {
        events.iter().map(|e| self.process(e)).collect()
    }
}

/// Replay one fight against a merged config.
pub fn replay_fight(config: &ThreatConfig, fight: &Fight) -> Vec<AugmentedEvent> {
    FightReplay::new(config, fight).run(&fight.events)
}

/// Replay many fights in parallel. Output order matches input order.
pub fn replay_fights(config: &ThreatConfig, fights: &[Fight]) -> Vec<Vec<AugmentedEvent>> {
    fights
        .par_iter()
        .map(|fight| replay_fight(config, fight))
        .collect()
}
