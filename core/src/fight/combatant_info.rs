//! Combatant-info seeding and implications
//!
//! A combatant-info event describes a player at pull: pre-existing
//! auras, equipped gear, and talents. Beyond the direct aura seed, the
//! engine synthesises auras from three implication sources — global
//! gear rules, class gear rules, and class talent rules — and feeds the
//! whole batch through the exclusive-group cascade.

use aggro_types::LogEvent;

use crate::actor::ActorKey;
use crate::config::ThreatConfig;

use super::FightState;

impl FightState {
    pub(super) fn absorb_combatant_info(&mut self, event: &LogEvent, config: &ThreatConfig) {
        // Reports have carried the described player on either side over
        // the years; the environment sentinel marks the unused one.
        let subject = if event.targets_environment() {
            ActorKey::new(event.source_id, event.source_instance)
        } else {
            ActorKey::new(event.target_id, event.target_instance)
        };

        let mut auras: Vec<u32> = event
            .auras
            .iter()
            .flatten()
            .filter_map(|a| a.ability)
            .collect();

        let gear = event.gear.clone().unwrap_or_default();

        // Implication sources, in order: global gear, class gear, class
        // talents. Classless actors get no implication work at all.
        let mut synthetic: Vec<u32> = Vec::new();
        if let Some(rules) = self.class_of(subject.id).and_then(|c| config.class(c)) {
            for rule in config.gear_implications() {
                synthetic.extend(rule.implied_aura(&gear));
            }
            for rule in &rules.gear {
                synthetic.extend(rule.implied_aura(&gear));
            }
            for talent in &rules.talents {
                let payloads = [
                    event.talents.as_deref(),
                    event.talent_rows.as_deref(),
                    event.talent_tree.as_deref(),
                ];
                for payload in payloads.into_iter().flatten() {
                    if let Some(aura) = talent.infer(payload) {
                        tracing::trace!(actor = subject.id, talent = talent.name, aura, "talent implied aura");
                        synthetic.push(aura);
                        break;
                    }
                }
            }
        }
        synthetic.sort_unstable();
        synthetic.dedup();
        auras.extend(synthetic);

        let inst = self.ensure_instance(subject);
        inst.set_gear(gear);
        inst.seed_auras(config.exclusives(), auras);
    }
}
