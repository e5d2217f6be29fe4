//! Embedded rule tables
//!
//! One module per supported era. Configs merge once, lazily, and are
//! shared by reference across every fight replayed in the process.

pub mod classic;
pub mod tbc;

use std::sync::LazyLock;

use crate::config::{GameVersion, ThreatConfig};

static CLASSIC: LazyLock<ThreatConfig> = LazyLock::new(classic::config);
static BURNING_CRUSADE: LazyLock<ThreatConfig> = LazyLock::new(tbc::config);

/// The merged rule set for a game version.
pub fn config_for(version: GameVersion) -> &'static ThreatConfig {
    match version {
        GameVersion::Classic => &CLASSIC,
        GameVersion::BurningCrusade => &BURNING_CRUSADE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::PlayerClass;
    use crate::config::ThreatFormula;

    #[test]
    fn classic_tables_cover_the_staple_rules() {
        let config = config_for(GameVersion::Classic);

        // Warrior taunt resolves through the class table.
        match config.formula_for(None, Some(355), Some(PlayerClass::Warrior)) {
            Some(ThreatFormula::Taunt { .. }) => {}
            other => panic!("unexpected taunt rule: {other:?}"),
        }
        // Sunder is on-hit flat threat at rank 5.
        match config.formula_for(None, Some(11597), Some(PlayerClass::Warrior)) {
            Some(ThreatFormula::OnSuccessfulHit { bonus, .. }) => assert_eq!(*bonus, 261.0),
            other => panic!("unexpected sunder rule: {other:?}"),
        }
        // Defensive stance modifier.
        let stance = config.modifier_for(71).expect("defensive stance modifier");
        assert_eq!(stance.value, 1.3);
        // Rogue baseline.
        assert_eq!(config.class_factor(Some(PlayerClass::Rogue)), 0.71);
        // Stances are exclusive.
        let rivals: Vec<u32> = config.exclusives().rivals_of(2457).collect();
        assert!(rivals.contains(&71));
        assert!(rivals.contains(&2458));
        // Taunt debuff fixates.
        assert!(config.is_fixate(355));
    }

    #[test]
    fn classic_encounter_rules_resolve_inside_their_encounter() {
        let config = config_for(GameVersion::Classic);
        match config.formula_for(Some(classic::PATCHWERK), Some(classic::HATEFUL_STRIKE), None) {
            Some(ThreatFormula::HatefulStrike { amount, targets, .. }) => {
                assert_eq!(*amount, 500.0);
                assert_eq!(*targets, 4);
            }
            other => panic!("unexpected hateful strike rule: {other:?}"),
        }
        // Outside the encounter the ability is unknown.
        assert!(config.formula_for(None, Some(classic::HATEFUL_STRIKE), None).is_none());
        // The twins ship a hook, not an ability rule.
        assert_eq!(config.hooks_for(Some(15275)).len(), 1);
        assert_eq!(config.hooks_for(Some(classic::PATCHWERK)).len(), 0);
    }

    #[test]
    fn tbc_layers_override_classic_by_key() {
        let classic_cfg = config_for(GameVersion::Classic);
        let tbc_cfg = config_for(GameVersion::BurningCrusade);

        assert_eq!(classic_cfg.modifier_for(25780).unwrap().value, 1.6);
        assert_eq!(tbc_cfg.modifier_for(25780).unwrap().value, 1.9);

        // Misdirection exists only in the later era.
        assert!(
            classic_cfg
                .formula_for(None, Some(tbc::MISDIRECTION), Some(PlayerClass::Hunter))
                .is_none()
        );
        match tbc_cfg.formula_for(None, Some(tbc::MISDIRECTION), Some(PlayerClass::Hunter)) {
            Some(ThreatFormula::RedirectNext { events }) => assert_eq!(*events, 3),
            other => panic!("unexpected misdirection rule: {other:?}"),
        }

        // Classic rules carry through the layering untouched.
        match tbc_cfg.formula_for(None, Some(11597), Some(PlayerClass::Warrior)) {
            Some(ThreatFormula::OnSuccessfulHit { .. }) => {}
            other => panic!("unexpected sunder rule in tbc: {other:?}"),
        }
    }
}
