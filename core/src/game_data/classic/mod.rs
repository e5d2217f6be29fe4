//! Classic-era rule assembly
//!
//! Layer order is the merge order: base rules, era-wide shared rules,
//! raid layers, then the class tables. Later layers replace earlier
//! entries by key; groups and fixates union.

mod ahn_qiraj;
mod druid;
mod hunter;
mod mage;
mod naxxramas;
mod onyxia;
mod paladin;
mod priest;
mod rogue;
mod shaman;
mod warlock;
mod warrior;

pub use naxxramas::{FEUGEN, HATEFUL_STRIKE, NOTH, PATCHWERK, STALAGG, THADDIUS};
pub use onyxia::ONYXIA;

use crate::config::{
    AuraModifierDef, BaseRules, ConfigBuilder, GameVersion, GearRule, SharedRules, ThreatConfig,
};

/// Glove enchant: +2% threat. The enchant id doubles as the synthetic
/// aura id.
const ENCHANT_GLOVES_THREAT: u32 = 2613;
/// Cloak enchant: Subtlety, −2% threat.
const ENCHANT_CLOAK_SUBTLETY: u32 = 2621;

fn era_rules() -> SharedRules {
    let mut shared = SharedRules::default();
    shared.modifiers.insert(
        ENCHANT_GLOVES_THREAT,
        AuraModifierDef::gear("Enchant Gloves - Threat", 1.02),
    );
    shared.modifiers.insert(
        ENCHANT_CLOAK_SUBTLETY,
        AuraModifierDef::gear("Enchant Cloak - Subtlety", 0.98),
    );
    shared
}

/// The layered classic builder, shared with the Burning Crusade
/// assembly which stacks its overrides on top.
pub(super) fn builder() -> ConfigBuilder {
    let builder = ConfigBuilder::new()
        .base_rules(BaseRules::default())
        .shared(era_rules())
        .gear(GearRule::Enchant { enchant: ENCHANT_GLOVES_THREAT, aura: ENCHANT_GLOVES_THREAT })
        .gear(GearRule::Enchant { enchant: ENCHANT_CLOAK_SUBTLETY, aura: ENCHANT_CLOAK_SUBTLETY });

    let builder = naxxramas::register(builder);
    let builder = ahn_qiraj::register(builder);
    let builder = onyxia::register(builder);

    builder
        .class(warrior::rules())
        .class(druid::rules())
        .class(paladin::rules())
        .class(priest::rules())
        .class(mage::rules())
        .class(rogue::rules())
        .class(hunter::rules())
        .class(warlock::rules())
        .class(shaman::rules())
}

pub fn config() -> ThreatConfig {
    builder().build(GameVersion::Classic)
}
