//! Aura-driven threat modifiers
//!
//! A modifier is a multiplicative adjustment contributed by an aura on
//! the caster: stances, talents, raid buffs, enchants. Modifiers can be
//! restricted to an ability list or a spell-school mask.

use serde::Serialize;

/// Where a modifier comes from. Also fixes the reporting order of the
/// applied-modifier list: stance, talent, buff, gear, then other auras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierSource {
    Stance,
    Talent,
    Buff,
    Gear,
    Aura,
}

/// Declarative modifier attached to an aura spell id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuraModifierDef {
    pub source: ModifierSource,
    pub name: &'static str,
    /// Multiplier; 1.0 is neutral.
    pub value: f64,
    /// When set, only these ability ids are affected.
    pub spell_scope: Option<&'static [u32]>,
    /// When set, only events whose school intersects this mask are
    /// affected. Events without a school never match a masked modifier.
    pub school_mask: Option<u8>,
}

impl AuraModifierDef {
    pub const fn new(source: ModifierSource, name: &'static str, value: f64) -> Self {
        Self {
            source,
            name,
            value,
            spell_scope: None,
            school_mask: None,
        }
    }

    pub const fn stance(name: &'static str, value: f64) -> Self {
        Self::new(ModifierSource::Stance, name, value)
    }

    pub const fn talent(name: &'static str, value: f64) -> Self {
        Self::new(ModifierSource::Talent, name, value)
    }

    pub const fn buff(name: &'static str, value: f64) -> Self {
        Self::new(ModifierSource::Buff, name, value)
    }

    pub const fn gear(name: &'static str, value: f64) -> Self {
        Self::new(ModifierSource::Gear, name, value)
    }

    pub const fn for_school(mut self, mask: u8) -> Self {
        self.school_mask = Some(mask);
        self
    }

    pub const fn for_spells(mut self, spells: &'static [u32]) -> Self {
        self.spell_scope = Some(spells);
        self
    }

    /// Whether this modifier applies to an event with the given ability
    /// and school.
    pub fn applies_to(&self, ability: Option<u32>, school: Option<u8>) -> bool {
        let spell_ok = match self.spell_scope {
            Some(scope) => ability.is_some_and(|id| scope.contains(&id)),
            // Unscoped modifiers still require an ability on the event.
            None => ability.is_some(),
        };
        if !spell_ok {
            return false;
        }
        match self.school_mask {
            Some(mask) => school.is_some_and(|s| mask & s != 0),
            None => true,
        }
    }
}
