//! Declarative threat rule configuration
//!
//! Rules compose leaves-first: base era defaults, then era-wide rules,
//! then raid rules, then encounter rules, then class rules. Child
//! entries replace parent entries by primary key; sets union. The
//! merged `ThreatConfig` is immutable and shared by reference across
//! fights.

mod class;
mod encounter;
mod formula;
mod modifier;

pub use class::{ClassEntry, ClassRules, GearRule, TalentRule, TreeFallback};
pub use encounter::{EncounterHook, EncounterRules, HookFactory};
pub use formula::{
    FlatThreat, ThreatAssignment, ThreatEffect, ThreatFormula, ThreatOp, ThreatResult, ThreatScope,
};
pub use modifier::{AuraModifierDef, ModifierSource};

use std::str::FromStr;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use aggro_types::ResourceKind;

use crate::actor::PlayerClass;
use crate::error::ReplayError;

/// Supported rule eras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVersion {
    Classic,
    #[serde(rename = "tbc")]
    BurningCrusade,
}

impl FromStr for GameVersion {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "vanilla" => Ok(Self::Classic),
            "tbc" | "bc" | "burning-crusade" | "burningcrusade" => Ok(Self::BurningCrusade),
            _ => Err(ReplayError::UnknownGameVersion(s.to_string())),
        }
    }
}

impl std::fmt::Display for GameVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => f.write_str("classic"),
            Self::BurningCrusade => f.write_str("tbc"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Exclusive Groups
// ─────────────────────────────────────────────────────────────────────────────

/// Consolidated at-most-one-active aura groups (stances, forms,
/// blessings). Cross-class by construction: whichever actor holds the
/// aura is bound by the group.
#[derive(Debug, Clone, Default)]
pub struct ExclusiveGroups {
    groups: Vec<Box<[u32]>>,
}

impl ExclusiveGroups {
    pub fn from_groups(groups: Vec<Vec<u32>>) -> Self {
        Self {
            groups: groups.into_iter().map(Vec::into_boxed_slice).collect(),
        }
    }

    pub fn push(&mut self, group: Vec<u32>) {
        self.groups.push(group.into_boxed_slice());
    }

    /// Other members of every group containing `spell`.
    pub fn rivals_of(&self, spell: u32) -> impl Iterator<Item = u32> + '_ {
        self.groups
            .iter()
            .filter(move |g| g.contains(&spell))
            .flat_map(|g| g.iter().copied())
            .filter(move |&m| m != spell)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Base Rules
// ─────────────────────────────────────────────────────────────────────────────

/// Era defaults applied when no per-ability rule matches.
#[derive(Debug, Clone)]
pub struct BaseRules {
    /// Heal threat per point of effective healing; split among enemies.
    pub heal_factor: f64,
    /// Threat per point of resource gained, by resource class. Missing
    /// kinds generate nothing. Resource threat is split and never
    /// multiplied by caster modifiers.
    pub resource_factors: Vec<(ResourceKind, f64)>,
}

impl Default for BaseRules {
    fn default() -> Self {
        Self {
            heal_factor: 0.5,
            resource_factors: vec![(ResourceKind::Rage, 5.0), (ResourceKind::Mana, 0.5)],
        }
    }
}

impl BaseRules {
    pub fn resource_factor(&self, kind: ResourceKind) -> f64 {
        self.resource_factors
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared Layers
// ─────────────────────────────────────────────────────────────────────────────

/// Era- or raid-wide rules: abilities by spell id plus aura modifiers
/// available to any actor (shared aggro-loss buffs, quest trinkets).
#[derive(Debug, Default)]
pub struct SharedRules {
    pub abilities: HashMap<u32, ThreatFormula>,
    pub modifiers: HashMap<u32, AuraModifierDef>,
    pub fixate_auras: Vec<u32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Merged Config
// ─────────────────────────────────────────────────────────────────────────────

/// The merged, immutable rule set for one game version.
#[derive(Debug)]
pub struct ThreatConfig {
    version: GameVersion,
    base: BaseRules,
    /// Era + raid abilities, raid entries winning by spell id.
    shared_abilities: HashMap<u32, ThreatFormula>,
    /// All aura modifiers, any class, keyed by aura id.
    modifiers: HashMap<u32, AuraModifierDef>,
    classes: HashMap<PlayerClass, ClassRules>,
    encounters: HashMap<i64, EncounterRules>,
    exclusives: ExclusiveGroups,
    fixate_auras: HashSet<u32>,
    /// Global gear implications (threat enchants and the like).
    gear_implications: Vec<GearRule>,
}

impl ThreatConfig {
    pub fn version(&self) -> GameVersion {
        self.version
    }

    pub fn base(&self) -> &BaseRules {
        &self.base
    }

    pub fn exclusives(&self) -> &ExclusiveGroups {
        &self.exclusives
    }

    pub fn class(&self, class: PlayerClass) -> Option<&ClassRules> {
        self.classes.get(&class)
    }

    /// Baseline threat factor for a caster of the given class.
    pub fn class_factor(&self, class: Option<PlayerClass>) -> f64 {
        class
            .and_then(|c| self.classes.get(&c))
            .and_then(|r| r.base_factor)
            .unwrap_or(1.0)
    }

    /// Resolve the rule for an ability: encounter, then raid/era, then
    /// the caster's class table. Base rules are applied by the
    /// evaluator when this returns `None`.
    pub fn formula_for(
        &self,
        encounter: Option<i64>,
        ability: Option<u32>,
        class: Option<PlayerClass>,
    ) -> Option<&ThreatFormula> {
        let ability = ability?;
        if let Some(id) = encounter
            && let Some(rules) = self.encounters.get(&id)
            && let Some(f) = rules.abilities.get(&ability)
        {
            return Some(f);
        }
        if let Some(f) = self.shared_abilities.get(&ability) {
            return Some(f);
        }
        class
            .and_then(|c| self.classes.get(&c))
            .and_then(|r| r.abilities.get(&ability))
    }

    pub fn modifier_for(&self, aura: u32) -> Option<&AuraModifierDef> {
        self.modifiers.get(&aura)
    }

    pub fn is_fixate(&self, aura: u32) -> bool {
        self.fixate_auras.contains(&aura)
    }

    pub fn hooks_for(&self, encounter: Option<i64>) -> &[HookFactory] {
        encounter
            .and_then(|id| self.encounters.get(&id))
            .map(|r| r.hooks.as_slice())
            .unwrap_or(&[])
    }

    pub fn cast_implication(&self, class: Option<PlayerClass>, ability: u32) -> Option<u32> {
        class
            .and_then(|c| self.classes.get(&c))
            .and_then(|r| r.cast_implications.get(&ability))
            .copied()
    }

    pub fn gear_implications(&self) -> &[GearRule] {
        &self.gear_implications
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Assembles a `ThreatConfig` from layered rule sets, leaves last and
/// leaves winning.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    base: BaseRules,
    shared_abilities: HashMap<u32, ThreatFormula>,
    modifiers: HashMap<u32, AuraModifierDef>,
    classes: HashMap<PlayerClass, ClassRules>,
    encounters: HashMap<i64, EncounterRules>,
    exclusive_groups: Vec<Vec<u32>>,
    fixate_auras: HashSet<u32>,
    gear_implications: Vec<GearRule>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the era base rules wholesale.
    pub fn base_rules(mut self, base: BaseRules) -> Self {
        self.base = base;
        self
    }

    /// Merge an era- or raid-wide layer. Later layers win by key.
    pub fn shared(mut self, rules: SharedRules) -> Self {
        self.shared_abilities.extend(rules.abilities);
        self.modifiers.extend(rules.modifiers);
        self.fixate_auras.extend(rules.fixate_auras);
        self
    }

    /// Merge an encounter layer under the given boss id.
    pub fn encounter(mut self, boss: i64, rules: EncounterRules) -> Self {
        self.encounters.entry(boss).or_default().merge(rules);
        self
    }

    /// Merge a class layer: abilities/implications replace by key,
    /// modifiers join the global table, groups and fixates union.
    pub fn class(mut self, entry: ClassEntry) -> Self {
        let ClassEntry { class, rules } = entry;
        self.modifiers.extend(rules.modifiers.clone());
        self.exclusive_groups.extend(rules.exclusive_groups.clone());
        self.fixate_auras.extend(rules.fixate_auras.iter().copied());
        self.classes
            .entry(class)
            .or_insert_with(ClassRules::new)
            .merge(rules);
        self
    }

    /// Add a global gear implication.
    pub fn gear(mut self, rule: GearRule) -> Self {
        self.gear_implications.push(rule);
        self
    }

    /// Add a cross-class exclusive group directly.
    pub fn exclusive_group(mut self, group: Vec<u32>) -> Self {
        self.exclusive_groups.push(group);
        self
    }

    pub fn build(self, version: GameVersion) -> ThreatConfig {
        tracing::debug!(
            %version,
            shared = self.shared_abilities.len(),
            modifiers = self.modifiers.len(),
            classes = self.classes.len(),
            encounters = self.encounters.len(),
            "threat config merged"
        );
        ThreatConfig {
            version,
            base: self.base,
            shared_abilities: self.shared_abilities,
            modifiers: self.modifiers,
            classes: self.classes,
            encounters: self.encounters,
            exclusives: ExclusiveGroups::from_groups(self.exclusive_groups),
            fixate_auras: self.fixate_auras,
            gear_implications: self.gear_implications,
        }
    }
}
