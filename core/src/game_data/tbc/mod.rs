//! Burning Crusade rule assembly
//!
//! Starts from the full classic layering and overrides by key:
//! Misdirection arrives for hunters, and improved Righteous Fury
//! becomes the baseline tanking assumption at 1.9.

use aggro_types::school;

use crate::actor::PlayerClass;
use crate::config::{
    AuraModifierDef, ClassEntry, ClassRules, GameVersion, SharedRules, ThreatConfig, ThreatFormula,
};

use super::classic;

pub const MISDIRECTION: u32 = 34477;

fn era_overrides() -> SharedRules {
    let mut shared = SharedRules::default();
    // Improved Righteous Fury; replaces the classic 1.6 entry.
    shared.modifiers.insert(
        25780,
        AuraModifierDef::buff("Righteous Fury", 1.9).for_school(school::HOLY),
    );
    shared
}

fn hunter_additions() -> ClassEntry {
    let mut rules = ClassRules::new();
    rules
        .abilities
        .insert(MISDIRECTION, ThreatFormula::RedirectNext { events: 3 });
    ClassEntry { class: PlayerClass::Hunter, rules }
}

pub fn config() -> ThreatConfig {
    classic::builder()
        .shared(era_overrides())
        .class(hunter_additions())
        .build(GameVersion::BurningCrusade)
}
