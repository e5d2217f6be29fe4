//! Per-encounter rules and hooks
//!
//! Encounters override abilities at the highest priority and may
//! install stateful hooks that watch every event of the fight and emit
//! extra effects (threat wipes on teleports and the like). Hooks are
//! created per fight from a factory so the merged config stays
//! shareable across fights.

use hashbrown::HashMap;

use aggro_types::LogEvent;

use crate::fight::FightState;

use super::formula::{ThreatEffect, ThreatFormula};

/// Stateful per-fight observer owned by the pipeline.
pub trait EncounterHook: std::fmt::Debug + Send {
    /// Inspect an event before evaluation and emit extra effects to be
    /// merged with the formula's own.
    fn on_event(&mut self, event: &LogEvent, fight: &FightState) -> Vec<ThreatEffect>;
}

/// Factory for a fresh hook instance at fight start.
pub type HookFactory = fn() -> Box<dyn EncounterHook>;

/// Rules for a single encounter, keyed by the boss id.
#[derive(Default)]
pub struct EncounterRules {
    pub abilities: HashMap<u32, ThreatFormula>,
    pub hooks: Vec<HookFactory>,
}

impl EncounterRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a child layer: abilities replace by id, hooks accumulate.
    pub fn merge(&mut self, other: EncounterRules) {
        self.abilities.extend(other.abilities);
        self.hooks.extend(other.hooks);
    }
}

impl std::fmt::Debug for EncounterRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncounterRules")
            .field("abilities", &self.abilities)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
