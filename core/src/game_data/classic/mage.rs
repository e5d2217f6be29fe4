//! Mage threat rules

use aggro_types::{EventKind, school};

use crate::actor::PlayerClass;
use crate::config::{
    AuraModifierDef, ClassEntry, ClassRules, FlatThreat, TalentRule, ThreatFormula, TreeFallback,
};

const ARCANE_SUBTLETY_RANKS: [u32; 2] = [11210, 12592];
const ARCANE_SUBTLETY_VALUES: [f64; 2] = [0.8, 0.6];

const BURNING_SOUL_RANKS: [u32; 2] = [11083, 12351];
const BURNING_SOUL_VALUES: [f64; 2] = [0.85, 0.7];

const FROST_CHANNELING_RANKS: [u32; 3] = [11160, 12518, 12519];
const FROST_CHANNELING_VALUES: [f64; 3] = [0.9, 0.8, 0.7];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();

    for (id, value) in ARCANE_SUBTLETY_RANKS.iter().zip(ARCANE_SUBTLETY_VALUES) {
        rules.modifiers.insert(
            *id,
            AuraModifierDef::talent("Arcane Subtlety", value).for_school(school::ARCANE),
        );
    }
    rules.talents.push(TalentRule {
        name: "Arcane Subtlety",
        rank_spell_ids: &ARCANE_SUBTLETY_RANKS,
        tree_fallback: Some(TreeFallback { tree: 0, min_points: 2 }),
    });

    for (id, value) in BURNING_SOUL_RANKS.iter().zip(BURNING_SOUL_VALUES) {
        rules.modifiers.insert(
            *id,
            AuraModifierDef::talent("Burning Soul", value).for_school(school::FIRE),
        );
    }
    rules.talents.push(TalentRule {
        name: "Burning Soul",
        rank_spell_ids: &BURNING_SOUL_RANKS,
        tree_fallback: Some(TreeFallback { tree: 1, min_points: 3 }),
    });

    for (id, value) in FROST_CHANNELING_RANKS.iter().zip(FROST_CHANNELING_VALUES) {
        rules.modifiers.insert(
            *id,
            AuraModifierDef::talent("Frost Channeling", value).for_school(school::FROST),
        );
    }
    rules.talents.push(TalentRule {
        name: "Frost Channeling",
        rank_spell_ids: &FROST_CHANNELING_RANKS,
        tree_fallback: Some(TreeFallback { tree: 2, min_points: 12 }),
    });

    // Counterspell threat rides the cast; interrupts log no damage.
    rules.abilities.insert(
        2139,
        ThreatFormula::Flat(FlatThreat {
            bonus: 300.0,
            on: Some(&[EventKind::Cast]),
            ..FlatThreat::default()
        }),
    );

    ClassEntry { class: PlayerClass::Mage, rules }
}
