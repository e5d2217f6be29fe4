//! Onyxia encounter rules

use crate::config::{ConfigBuilder, EncounterRules, ThreatFormula};

pub const ONYXIA: i64 = 10184;

/// Knock Away sheds a quarter of the victim's standing when it lands.
const KNOCK_AWAY: u32 = 19633;
/// Wing Buffet halves it.
const WING_BUFFET: u32 = 18500;

fn onyxia() -> EncounterRules {
    let mut rules = EncounterRules::new();
    rules
        .abilities
        .insert(KNOCK_AWAY, ThreatFormula::ModifyThreatOnHit { mult: 0.75 });
    rules
        .abilities
        .insert(WING_BUFFET, ThreatFormula::ModifyThreatOnHit { mult: 0.5 });
    rules
}

pub(super) fn register(builder: ConfigBuilder) -> ConfigBuilder {
    builder.encounter(ONYXIA, onyxia())
}
