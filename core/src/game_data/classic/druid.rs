//! Druid threat rules
//!
//! Forms mirror warrior stances: Bear runs hot at 1.3, Cat cold at
//! 0.71. Feral ability casts imply the form they require, so a Rake in
//! the log proves Cat Form even without an aura event.

use aggro_types::EventKind;

use crate::actor::PlayerClass;
use crate::config::{
    AuraModifierDef, ClassEntry, ClassRules, FlatThreat, TalentRule, ThreatFormula, TreeFallback,
};

pub const BEAR_FORM: u32 = 5487;
pub const DIRE_BEAR_FORM: u32 = 9634;
pub const CAT_FORM: u32 = 768;
pub const MOONKIN_FORM: u32 = 24858;
pub const TRAVEL_FORM: u32 = 783;
pub const AQUATIC_FORM: u32 = 1066;

pub const GROWL: u32 = 6795;

const MAUL: [(u32, f64); 7] = [
    (6807, 25.0),
    (6808, 43.0),
    (6809, 67.0),
    (8972, 101.0),
    (9745, 132.0),
    (9880, 154.0),
    (9881, 176.0),
];

const SWIPE: [u32; 5] = [779, 780, 769, 9754, 9908];

const DEMORALIZING_ROAR: [(u32, f64); 5] =
    [(99, 9.0), (1735, 15.0), (9490, 20.0), (9747, 30.0), (9898, 39.0)];

const FAERIE_FIRE: [(u32, f64); 4] = [(770, 20.0), (778, 45.0), (9749, 75.0), (9907, 108.0)];

const COWER: [(u32, f64); 3] = [(8998, -240.0), (9000, -390.0), (9892, -600.0)];

const RAKE: [u32; 4] = [1822, 1823, 1824, 9904];
const CLAW: [u32; 5] = [1082, 3029, 5201, 9849, 9850];

const FERAL_INSTINCT_RANKS: [u32; 5] = [16947, 16948, 16949, 16950, 16951];
const FERAL_INSTINCT_VALUES: [f64; 5] = [1.03, 1.06, 1.09, 1.12, 1.15];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();

    rules.exclusive_groups.push(vec![
        BEAR_FORM,
        DIRE_BEAR_FORM,
        CAT_FORM,
        MOONKIN_FORM,
        TRAVEL_FORM,
        AQUATIC_FORM,
    ]);
    rules.modifiers.insert(BEAR_FORM, AuraModifierDef::stance("Bear Form", 1.3));
    rules
        .modifiers
        .insert(DIRE_BEAR_FORM, AuraModifierDef::stance("Dire Bear Form", 1.3));
    rules.modifiers.insert(CAT_FORM, AuraModifierDef::stance("Cat Form", 0.71));

    for (id, value) in FERAL_INSTINCT_RANKS.iter().zip(FERAL_INSTINCT_VALUES) {
        rules
            .modifiers
            .insert(*id, AuraModifierDef::talent("Feral Instinct", value));
    }
    rules.talents.push(TalentRule {
        name: "Feral Instinct",
        rank_spell_ids: &FERAL_INSTINCT_RANKS,
        tree_fallback: Some(TreeFallback { tree: 1, min_points: 10 }),
    });

    for (id, bonus) in MAUL {
        rules.abilities.insert(id, ThreatFormula::bonus_on_hit(bonus));
        rules.cast_implications.insert(id, BEAR_FORM);
    }
    for id in SWIPE {
        rules.abilities.insert(id, ThreatFormula::scaled(1.75));
        rules.cast_implications.insert(id, BEAR_FORM);
    }
    for (id, bonus) in DEMORALIZING_ROAR {
        rules.abilities.insert(id, ThreatFormula::debuff(bonus));
    }
    for (id, bonus) in FAERIE_FIRE {
        rules.abilities.insert(id, ThreatFormula::debuff(bonus));
    }
    for (id, bonus) in COWER {
        rules.abilities.insert(
            id,
            ThreatFormula::Flat(FlatThreat {
                bonus,
                on: Some(&[EventKind::Cast]),
                ..FlatThreat::default()
            }),
        );
        rules.cast_implications.insert(id, CAT_FORM);
    }
    for id in RAKE.iter().chain(CLAW.iter()) {
        rules.cast_implications.insert(*id, CAT_FORM);
    }

    rules.abilities.insert(GROWL, ThreatFormula::taunt());
    rules.cast_implications.insert(GROWL, BEAR_FORM);
    rules.fixate_auras.push(GROWL);

    ClassEntry { class: PlayerClass::Druid, rules }
}
