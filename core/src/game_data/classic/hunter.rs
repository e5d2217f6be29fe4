//! Hunter and hunter-pet threat rules
//!
//! Distracting Shot is the odd one: the threat lands with the cast and
//! is refunded if the shot then fails to connect.

use aggro_types::EventKind;

use crate::actor::PlayerClass;
use crate::config::{ClassEntry, ClassRules, FlatThreat, ThreatFormula};

pub const FEIGN_DEATH: u32 = 5384;

const DISENGAGE: [(u32, f64); 3] = [(781, -140.0), (14272, -280.0), (14273, -405.0)];

const DISTRACTING_SHOT: [(u32, f64); 6] = [
    (20736, 100.0),
    (14274, 200.0),
    (15629, 300.0),
    (15630, 400.0),
    (15631, 500.0),
    (15632, 600.0),
];

/// Pet Growl: flat threat on cast, no taunt component in this era.
const PET_GROWL: [(u32, f64); 6] = [
    (2649, 50.0),
    (14916, 90.0),
    (14917, 135.0),
    (14918, 180.0),
    (14919, 230.0),
    (14920, 290.0),
];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();

    rules.abilities.insert(FEIGN_DEATH, ThreatFormula::wipe_on_cast());
    // Disengage never deals damage; the drop rides the cast.
    for (id, bonus) in DISENGAGE {
        rules.abilities.insert(
            id,
            ThreatFormula::Flat(FlatThreat {
                bonus,
                on: Some(&[EventKind::Cast]),
                ..FlatThreat::default()
            }),
        );
    }
    for (id, amount) in DISTRACTING_SHOT {
        rules
            .abilities
            .insert(id, ThreatFormula::CastRollbackOnMiss { amount });
    }
    for (id, bonus) in PET_GROWL {
        rules.abilities.insert(
            id,
            ThreatFormula::Flat(FlatThreat {
                bonus,
                on: Some(&[EventKind::Cast]),
                ..FlatThreat::default()
            }),
        );
    }

    ClassEntry { class: PlayerClass::Hunter, rules }
}
