//! Warlock threat rules

use crate::actor::PlayerClass;
use crate::config::{AuraModifierDef, ClassEntry, ClassRules, TalentRule, ThreatFormula, TreeFallback};

const SEARING_PAIN: [u32; 6] = [5676, 17919, 17920, 17921, 17922, 17923];

const MASTER_DEMONOLOGIST_RANKS: [u32; 5] = [23785, 23822, 23823, 23824, 23825];
const MASTER_DEMONOLOGIST_VALUES: [f64; 5] = [0.96, 0.92, 0.88, 0.84, 0.80];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();

    for id in SEARING_PAIN {
        rules.abilities.insert(id, ThreatFormula::scaled(2.0));
    }

    for (id, value) in MASTER_DEMONOLOGIST_RANKS.iter().zip(MASTER_DEMONOLOGIST_VALUES) {
        rules.modifiers.insert(
            *id,
            AuraModifierDef::talent("Master Demonologist", value),
        );
    }
    rules.talents.push(TalentRule {
        name: "Master Demonologist",
        rank_spell_ids: &MASTER_DEMONOLOGIST_RANKS,
        tree_fallback: Some(TreeFallback { tree: 1, min_points: 30 }),
    });

    ClassEntry { class: PlayerClass::Warlock, rules }
}
