//! Shaman threat rules

use crate::actor::PlayerClass;
use crate::config::{AuraModifierDef, ClassEntry, ClassRules, TalentRule, ThreatFormula, TreeFallback};

/// Tranquil Air Totem aura on whoever stands in it.
pub const TRANQUIL_AIR: u32 = 25909;

const EARTH_SHOCK: [u32; 7] = [8042, 8044, 8045, 8046, 10412, 10413, 10414];
const FROST_SHOCK: [u32; 4] = [8056, 8058, 10472, 10473];

const HEALING_GRACE_RANKS: [u32; 3] = [29187, 29189, 29191];
const HEALING_GRACE_VALUES: [f64; 3] = [0.95, 0.90, 0.85];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();

    rules
        .modifiers
        .insert(TRANQUIL_AIR, AuraModifierDef::buff("Tranquil Air Totem", 0.8));

    for id in EARTH_SHOCK.iter().chain(FROST_SHOCK.iter()) {
        rules.abilities.insert(*id, ThreatFormula::scaled(2.0));
    }

    for (id, value) in HEALING_GRACE_RANKS.iter().zip(HEALING_GRACE_VALUES) {
        rules
            .modifiers
            .insert(*id, AuraModifierDef::talent("Healing Grace", value));
    }
    rules.talents.push(TalentRule {
        name: "Healing Grace",
        rank_spell_ids: &HEALING_GRACE_RANKS,
        tree_fallback: Some(TreeFallback { tree: 2, min_points: 3 }),
    });

    ClassEntry { class: PlayerClass::Shaman, rules }
}
