//! Priest threat rules

use crate::actor::PlayerClass;
use crate::config::{AuraModifierDef, ClassEntry, ClassRules, TalentRule, ThreatFormula, TreeFallback};

use aggro_types::school;

const SILENT_RESOLVE_RANKS: [u32; 5] = [14523, 14784, 14785, 14786, 14787];
const SILENT_RESOLVE_VALUES: [f64; 5] = [0.96, 0.92, 0.88, 0.84, 0.80];

const SHADOW_AFFINITY_RANKS: [u32; 3] = [15318, 15272, 15320];
const SHADOW_AFFINITY_VALUES: [f64; 3] = [0.92, 0.84, 0.75];

const HOLY_NOVA: [u32; 3] = [15237, 15430, 15431];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();

    for (id, value) in SILENT_RESOLVE_RANKS.iter().zip(SILENT_RESOLVE_VALUES) {
        rules
            .modifiers
            .insert(*id, AuraModifierDef::talent("Silent Resolve", value));
    }
    rules.talents.push(TalentRule {
        name: "Silent Resolve",
        rank_spell_ids: &SILENT_RESOLVE_RANKS,
        tree_fallback: Some(TreeFallback { tree: 0, min_points: 10 }),
    });

    for (id, value) in SHADOW_AFFINITY_RANKS.iter().zip(SHADOW_AFFINITY_VALUES) {
        rules.modifiers.insert(
            *id,
            AuraModifierDef::talent("Shadow Affinity", value).for_school(school::SHADOW),
        );
    }
    rules.talents.push(TalentRule {
        name: "Shadow Affinity",
        rank_spell_ids: &SHADOW_AFFINITY_RANKS,
        tree_fallback: Some(TreeFallback { tree: 2, min_points: 15 }),
    });

    // Holy Nova is threat-free by design of the spell itself.
    for id in HOLY_NOVA {
        rules.abilities.insert(id, ThreatFormula::NoThreat);
    }

    ClassEntry { class: PlayerClass::Priest, rules }
}
