pub mod actor;
pub mod config;
pub mod error;
pub mod fight;
pub mod game_data;
pub mod handlers;
pub mod pipeline;
pub mod query;
pub mod threat;


// Re-exports for convenience
pub use actor::{Actor, ActorInstance, ActorKey, ActorKind, PlayerClass};
pub use aggro_types::{EventKind, HitType, LogEvent, ResourceKind};
pub use config::{
    AuraModifierDef, ClassEntry, ClassRules, ConfigBuilder, EncounterHook, EncounterRules,
    GameVersion, ThreatConfig, ThreatEffect, ThreatFormula,
};
pub use error::ReplayError;
pub use fight::{Enemy, FightState};
pub use game_data::config_for;
pub use handlers::{HandlerRegistry, HandlerVerdict, ThreatHandler};
pub use pipeline::{Fight, FightReplay, replay_fight, replay_fights};
pub use query::ThreatStandings;
pub use threat::{AugmentedEvent, ThreatBlock, ThreatChange};
