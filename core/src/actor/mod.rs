//! Actor identity and per-instance runtime state

mod instance;

pub use instance::{ActorInstance, ActorView, Position};

use serde::{Deserialize, Serialize};

/// Key for a live actor manifestation: `(actor id, instance id)`.
///
/// Instance ids disambiguate concurrent copies of one actor id (twin
/// bosses and the like). Absent and zero instance ids are the same
/// manifestation; keys are always stored normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorKey {
    pub id: i64,
    pub instance: i32,
}

impl ActorKey {
    pub fn new(id: i64, instance: Option<i32>) -> Self {
        Self {
            id,
            instance: instance.unwrap_or(0),
        }
    }
}

impl From<(i64, i32)> for ActorKey {
    fn from((id, instance): (i64, i32)) -> Self {
        Self { id, instance }
    }
}

/// What sort of actor this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Player,
    Pet,
    Npc,
    /// Seen in events but absent from the report master data.
    #[default]
    Unknown,
}

/// Player classes across all supported game versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerClass {
    Warrior,
    Paladin,
    Hunter,
    Rogue,
    Priest,
    Shaman,
    Mage,
    Warlock,
    Druid,
    DeathKnight,
    Monk,
    DemonHunter,
}

/// Actor master data from the report. Read-only during a fight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub kind: ActorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<PlayerClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_owner: Option<i64>,
}

impl Actor {
    /// Minimal stand-in for an actor the master data never described.
    pub fn unknown(id: i64) -> Self {
        Self {
            id,
            name: String::new(),
            kind: ActorKind::Unknown,
            class: None,
            pet_owner: None,
        }
    }
}
