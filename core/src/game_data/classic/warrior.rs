//! Warrior threat rules
//!
//! Stances carry the big swings: Defensive multiplies everything by
//! 1.3, Battle and Berserker by 0.8. Defiance stacks on top and is
//! inferred from talents at pull.

use crate::actor::PlayerClass;
use crate::config::{
    AuraModifierDef, ClassEntry, ClassRules, TalentRule, ThreatFormula, TreeFallback,
};

pub const BATTLE_STANCE: u32 = 2457;
pub const DEFENSIVE_STANCE: u32 = 71;
pub const BERSERKER_STANCE: u32 = 2458;

pub const TAUNT: u32 = 355;

const SUNDER_ARMOR: [(u32, f64); 5] = [
    (7386, 100.0),
    (7405, 140.0),
    (8380, 180.0),
    (11596, 232.0),
    (11597, 261.0),
];

const HEROIC_STRIKE: [(u32, f64); 7] = [
    (78, 20.0),
    (284, 39.0),
    (285, 59.0),
    (1608, 78.0),
    (11564, 98.0),
    (11565, 118.0),
    (11566, 145.0),
];

const REVENGE: [(u32, f64); 5] = [
    (6572, 155.0),
    (6574, 175.0),
    (7379, 195.0),
    (11600, 215.0),
    (11601, 243.0),
];

const SHIELD_SLAM: [(u32, f64); 4] = [(23922, 160.0), (23923, 190.0), (23924, 220.0), (23925, 250.0)];

const SHIELD_BASH: [(u32, f64); 3] = [(72, 180.0), (1671, 230.0), (1672, 280.0)];

const CLEAVE: [(u32, f64); 5] = [(845, 10.0), (7369, 40.0), (11608, 60.0), (11609, 70.0), (20569, 100.0)];

const HAMSTRING: [(u32, f64); 3] = [(1715, 61.0), (7372, 101.0), (7373, 145.0)];

const THUNDER_CLAP: [u32; 6] = [6343, 8198, 8204, 8205, 11580, 11581];

const EXECUTE: [u32; 5] = [5308, 20658, 20660, 20661, 20662];

const BATTLE_SHOUT: [(u32, f64); 7] = [
    (6673, 5.0),
    (5242, 10.0),
    (6192, 17.0),
    (11549, 25.0),
    (11550, 32.0),
    (11551, 41.0),
    (25289, 52.0),
];

const DEMORALIZING_SHOUT: [(u32, f64); 5] =
    [(1160, 11.0), (6190, 17.0), (11554, 21.0), (11555, 32.0), (11556, 43.0)];

const DEFIANCE_RANKS: [u32; 5] = [12303, 12788, 12789, 12791, 12792];
const DEFIANCE_VALUES: [f64; 5] = [1.03, 1.06, 1.09, 1.12, 1.15];

pub(super) fn rules() -> ClassEntry {
    let mut rules = ClassRules::new();

    rules
        .exclusive_groups
        .push(vec![BATTLE_STANCE, DEFENSIVE_STANCE, BERSERKER_STANCE]);
    rules
        .modifiers
        .insert(BATTLE_STANCE, AuraModifierDef::stance("Battle Stance", 0.8));
    rules
        .modifiers
        .insert(DEFENSIVE_STANCE, AuraModifierDef::stance("Defensive Stance", 1.3));
    rules
        .modifiers
        .insert(BERSERKER_STANCE, AuraModifierDef::stance("Berserker Stance", 0.8));

    for (id, value) in DEFIANCE_RANKS.iter().zip(DEFIANCE_VALUES) {
        rules.modifiers.insert(*id, AuraModifierDef::talent("Defiance", value));
    }
    rules.talents.push(TalentRule {
        name: "Defiance",
        rank_spell_ids: &DEFIANCE_RANKS,
        tree_fallback: Some(TreeFallback { tree: 2, min_points: 20 }),
    });

    for (id, bonus) in SUNDER_ARMOR {
        rules.abilities.insert(id, ThreatFormula::bonus_on_hit(bonus));
    }
    for (id, bonus) in HEROIC_STRIKE {
        rules.abilities.insert(id, ThreatFormula::bonus(bonus));
    }
    for (id, bonus) in REVENGE {
        rules.abilities.insert(id, ThreatFormula::bonus_on_hit(bonus));
    }
    for (id, bonus) in SHIELD_SLAM {
        rules.abilities.insert(id, ThreatFormula::bonus(bonus));
    }
    for (id, bonus) in SHIELD_BASH {
        rules.abilities.insert(id, ThreatFormula::bonus_on_hit(bonus));
    }
    for (id, bonus) in CLEAVE {
        rules.abilities.insert(id, ThreatFormula::bonus(bonus));
    }
    for (id, bonus) in HAMSTRING {
        rules.abilities.insert(id, ThreatFormula::bonus(bonus));
    }
    for id in THUNDER_CLAP {
        rules.abilities.insert(id, ThreatFormula::scaled(1.75));
    }
    for id in EXECUTE {
        rules.abilities.insert(id, ThreatFormula::scaled(1.25));
    }
    for (id, bonus) in BATTLE_SHOUT {
        rules.abilities.insert(id, ThreatFormula::buff_split(bonus));
    }
    for (id, bonus) in DEMORALIZING_SHOUT {
        rules.abilities.insert(id, ThreatFormula::debuff(bonus));
    }
    rules.abilities.insert(676, ThreatFormula::bonus_on_hit(104.0)); // Disarm

    rules.abilities.insert(TAUNT, ThreatFormula::taunt());
    rules.fixate_auras.push(TAUNT);
    // Mocking Blow and Challenging Shout fixate without moving the table.
    for id in [694, 7400, 7402, 20559, 20560, 1161] {
        rules.fixate_auras.push(id);
    }

    ClassEntry { class: PlayerClass::Warrior, rules }
}
