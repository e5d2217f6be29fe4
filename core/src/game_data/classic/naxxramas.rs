//! Naxxramas raid and encounter rules
//!
//! Patchwerk's Hateful Strike spreads flat threat across the melee
//! stack, Noth's Blink empties his table, and the Thaddius-wing
//! constructs exchange their tanks with Magnetic Pull.

use crate::config::{
    AuraModifierDef, ConfigBuilder, EncounterRules, ModifierSource, SharedRules, ThreatFormula,
};

pub const PATCHWERK: i64 = 16028;
pub const NOTH: i64 = 15954;
pub const THADDIUS: i64 = 15928;
pub const FEUGEN: i64 = 15930;
pub const STALAGG: i64 = 15929;

pub const HATEFUL_STRIKE: u32 = 28308;
const BLINK: [u32; 3] = [29208, 29210, 29211];
const MAGNETIC_PULL: [u32; 2] = [28338, 28339];

/// Kel'Thuzad quest trinket; users shed a third of their threat output
/// while it runs.
const EYE_OF_DIMINUTION: u32 = 28862;

fn patchwerk() -> EncounterRules {
    let mut rules = EncounterRules::new();
    rules.abilities.insert(
        HATEFUL_STRIKE,
        ThreatFormula::HatefulStrike { amount: 500.0, targets: 4, melee_range: 15.0 },
    );
    rules
}

fn noth() -> EncounterRules {
    let mut rules = EncounterRules::new();
    for id in BLINK {
        rules.abilities.insert(id, ThreatFormula::wipe_on_cast());
    }
    rules
}

fn thaddius() -> EncounterRules {
    let mut rules = EncounterRules::new();
    for id in MAGNETIC_PULL {
        rules
            .abilities
            .insert(id, ThreatFormula::ThreatTransplant { pair: (FEUGEN, STALAGG) });
    }
    rules
}

pub(super) fn register(builder: ConfigBuilder) -> ConfigBuilder {
    let mut shared = SharedRules::default();
    shared.modifiers.insert(
        EYE_OF_DIMINUTION,
        AuraModifierDef::new(ModifierSource::Aura, "The Eye of Diminution", 0.65),
    );
    builder
        .shared(shared)
        .encounter(PATCHWERK, patchwerk())
        .encounter(NOTH, noth())
        .encounter(THADDIUS, thaddius())
}
