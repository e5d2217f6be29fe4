//! Rogue threat rules
//!
//! Rogues run a 0.71 baseline on everything they do; Feint sheds flat
//! threat when it lands and Vanish empties the tables outright.

use crate::actor::PlayerClass;
use crate::config::{ClassEntry, ClassRules, ThreatFormula};

const FEINT: [(u32, f64); 5] = [
    (1966, -150.0),
    (6768, -240.0),
    (8637, -390.0),
    (11303, -600.0),
    (25302, -800.0),
];

const VANISH: [u32; 2] = [1856, 1857];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();
    rules.base_factor = Some(0.71);

    for (id, bonus) in FEINT {
        rules.abilities.insert(id, ThreatFormula::bonus_on_hit(bonus));
    }
    for id in VANISH {
        rules.abilities.insert(id, ThreatFormula::wipe_on_cast());
    }

    ClassEntry { class: PlayerClass::Rogue, rules }
}
