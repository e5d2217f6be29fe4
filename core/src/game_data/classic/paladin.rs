//! Paladin threat rules
//!
//! Righteous Fury multiplies Holy threat only. Blessings are exclusive
//! on whichever actor receives them, which is why the group lands in
//! the consolidated table rather than staying paladin-private.

use aggro_types::{EventKind, school};

use crate::actor::PlayerClass;
use crate::config::{AuraModifierDef, ClassEntry, ClassRules, FlatThreat, ThreatFormula};

pub const RIGHTEOUS_FURY: u32 = 25780;
pub const BLESSING_OF_SALVATION: u32 = 1038;
pub const GREATER_BLESSING_OF_SALVATION: u32 = 25895;

/// Every blessing, normal and greater. One per paladin per target.
const BLESSINGS: [u32; 22] = [
    1038, 25895, // Salvation
    20217, 25898, // Kings
    19740, 19834, 19835, 19836, 19837, 19838, 25782, // Might
    19742, 19850, 19852, 19853, 19854, 25290, 25894, // Wisdom
    19977, 19978, 19979, // Light
    20911, // Sanctuary
];

const BLESSING_OF_KINGS: [u32; 2] = [20217, 25898];

const HOLY_SHIELD: [u32; 3] = [20925, 20927, 20928];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();

    rules.exclusive_groups.push(BLESSINGS.to_vec());
    rules.modifiers.insert(
        RIGHTEOUS_FURY,
        AuraModifierDef::buff("Righteous Fury", 1.6).for_school(school::HOLY),
    );
    rules.modifiers.insert(
        BLESSING_OF_SALVATION,
        AuraModifierDef::buff("Blessing of Salvation", 0.7),
    );
    rules.modifiers.insert(
        GREATER_BLESSING_OF_SALVATION,
        AuraModifierDef::buff("Greater Blessing of Salvation", 0.7),
    );

    for id in BLESSING_OF_KINGS {
        rules.abilities.insert(id, ThreatFormula::buff_split(60.0));
    }
    for id in HOLY_SHIELD {
        rules.abilities.insert(id, ThreatFormula::scaled(1.2));
    }
    // Cleanse threat lands on cast, there is no damage event to ride.
    rules.abilities.insert(
        4987,
        ThreatFormula::Flat(FlatThreat {
            bonus: 40.0,
            on: Some(&[EventKind::Cast]),
            ..FlatThreat::default()
        }),
    );

    ClassEntry { class: PlayerClass::Paladin, rules }
}
