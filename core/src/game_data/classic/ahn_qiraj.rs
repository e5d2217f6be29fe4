//! Ahn'Qiraj encounter rules
//!
//! The Twin Emperors swap places on Twin Teleport and come back with
//! clean tables; the hook watches the casts and wipes both brothers at
//! once, which a per-ability rule cannot express for the twin that did
//! not cast.

use aggro_types::{EventKind, LogEvent};

use crate::actor::ActorKey;
use crate::config::{
    ConfigBuilder, EncounterHook, EncounterRules, ThreatAssignment, ThreatEffect, ThreatOp,
};
use crate::fight::FightState;

pub const VEKLOR: i64 = 15276;
pub const VEKNILASH: i64 = 15275;

const TWIN_TELEPORT: [u32; 2] = [799, 800];

/// Wipes every standing against both emperors when either teleports.
#[derive(Debug, Default)]
struct TwinTeleport;

impl EncounterHook for TwinTeleport {
    fn on_event(&mut self, event: &LogEvent, fight: &FightState) -> Vec<ThreatEffect> {
        if event.kind != EventKind::Cast
            || !event.ability_id.map(|a| TWIN_TELEPORT.contains(&a)).unwrap_or(false)
            || !(event.source_id == VEKLOR || event.source_id == VEKNILASH)
        {
            return Vec::new();
        }
        let twins: Vec<ActorKey> = fight
            .enemies()
            .iter()
            .filter(|e| e.id == VEKLOR || e.id == VEKNILASH)
            .map(|e| e.key())
            .collect();
        let mut changes = Vec::new();
        for twin in twins {
            let mut holders: Vec<ActorKey> = fight
                .instances()
                .filter_map(|(k, inst)| (inst.threat_against(twin) != 0.0).then_some(k))
                .collect();
            holders.sort_unstable();
            for actor in holders {
                changes.push(ThreatAssignment {
                    actor,
                    enemy: twin,
                    op: ThreatOp::Set,
                    amount: 0.0,
                });
            }
        }
        if changes.is_empty() {
            Vec::new()
        } else {
            tracing::debug!(caster = event.source_id, wiped = changes.len(), "twin teleport wipe");
            vec![ThreatEffect::CustomThreat { changes }]
        }
    }
}

fn twin_teleport_hook() -> Box<dyn EncounterHook> {
    Box::new(TwinTeleport)
}

fn twin_emperors() -> EncounterRules {
    let mut rules = EncounterRules::new();
    rules.hooks.push(twin_teleport_hook);
    rules
}

pub(super) fn register(builder: ConfigBuilder) -> ConfigBuilder {
    builder
        .encounter(VEKLOR, twin_emperors())
        .encounter(VEKNILASH, twin_emperors())
}
