//! Shared combat-log event types for AGGRO
//!
//! This crate contains the wire-level schema for report events as they
//! arrive from a log-hosting provider, shared between the engine
//! (aggro-core) and the replay driver (aggro-cli). Events are a flat
//! record: a small set of common fields plus per-type extras, all
//! optional on the wire.

use serde::{Deserialize, Serialize};

/// Target id used for environmental actions (falling damage, etc.).
/// Never participates in target tracking.
pub const ENVIRONMENT_ID: i64 = -1;

/// Spell school bit masks as they appear in the log.
pub mod school {
    pub const PHYSICAL: u8 = 0x01;
    pub const HOLY: u8 = 0x02;
    pub const FIRE: u8 = 0x04;
    pub const NATURE: u8 = 0x08;
    pub const FROST: u8 = 0x10;
    pub const SHADOW: u8 = 0x20;
    pub const ARCANE: u8 = 0x40;
}

// ─────────────────────────────────────────────────────────────────────────────
// Event Kind
// ─────────────────────────────────────────────────────────────────────────────

/// The closed set of event types the engine understands.
///
/// Anything else on the wire deserialises to `Unknown` and is ignored
/// without any state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Damage,
    Absorbed,
    Heal,
    ApplyBuff,
    RefreshBuff,
    ApplyBuffStack,
    RemoveBuff,
    RemoveBuffStack,
    ApplyDebuff,
    RefreshDebuff,
    ApplyDebuffStack,
    RemoveDebuff,
    RemoveDebuffStack,
    Energize,
    ResourceChange,
    Cast,
    BeginCast,
    Interrupt,
    Death,
    Resurrect,
    Summon,
    CombatantInfo,
    #[default]
    #[serde(other)]
    Unknown,
}

impl EventKind {
    /// Buff gains: apply, refresh, or stack increase.
    pub fn is_buff_apply(self) -> bool {
        matches!(
            self,
            Self::ApplyBuff | Self::RefreshBuff | Self::ApplyBuffStack
        )
    }

    /// Debuff gains: apply, refresh, or stack increase.
    pub fn is_debuff_apply(self) -> bool {
        matches!(
            self,
            Self::ApplyDebuff | Self::RefreshDebuff | Self::ApplyDebuffStack
        )
    }

    /// Any aura gain on the target side.
    pub fn is_aura_apply(self) -> bool {
        self.is_buff_apply() || self.is_debuff_apply()
    }

    /// Full aura removal (stack removals are handled separately).
    pub fn is_aura_remove(self) -> bool {
        matches!(self, Self::RemoveBuff | Self::RemoveDebuff)
    }

    /// Stack-count decrease that may or may not remove the aura.
    pub fn is_stack_remove(self) -> bool {
        matches!(self, Self::RemoveBuffStack | Self::RemoveDebuffStack)
    }

    /// Resource gain events (both historical spellings).
    pub fn is_energize(self) -> bool {
        matches!(self, Self::Energize | Self::ResourceChange)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hit Types
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a damage event, decoded from the numeric `hitType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitType {
    Miss,
    Hit,
    Crit,
    Absorb,
    Block,
    CritBlock,
    Glancing,
    Dodge,
    Parry,
    Immune,
    Resist,
    Crushing,
    PartialResist,
    CritPartialResist,
}

impl HitType {
    /// Decode the wire value. Unknown codes return `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Miss,
            1 => Self::Hit,
            2 => Self::Crit,
            3 => Self::Absorb,
            4 => Self::Block,
            5 => Self::CritBlock,
            6 => Self::Glancing,
            7 => Self::Dodge,
            8 => Self::Parry,
            10 => Self::Immune,
            14 => Self::Resist,
            15 => Self::Crushing,
            16 => Self::PartialResist,
            17 => Self::CritPartialResist,
            _ => return None,
        })
    }

    /// The attack was fully avoided: no damage, no on-hit riders.
    pub fn is_avoided(self) -> bool {
        matches!(
            self,
            Self::Miss | Self::Absorb | Self::Dodge | Self::Parry | Self::Immune | Self::Resist
        )
    }

    /// The attack connected (possibly partially).
    pub fn connects(self) -> bool {
        !self.is_avoided()
    }
}

/// Resource classes seen in energize events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Mana,
    Rage,
    Focus,
    Energy,
    ComboPoints,
    RunicPower,
    HolyPower,
}

impl ResourceKind {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Mana,
            1 => Self::Rage,
            2 => Self::Focus,
            3 => Self::Energy,
            4 => Self::ComboPoints,
            6 => Self::RunicPower,
            9 => Self::HolyPower,
            _ => return None,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Combatant Info Payloads
// ─────────────────────────────────────────────────────────────────────────────

/// One equipped item from a combatant-info event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GearPiece {
    pub id: u32,
    #[serde(rename = "setID", skip_serializing_if = "Option::is_none")]
    pub set_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_enchant: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_enchant: Option<u32>,
}

/// One pre-existing aura from a combatant-info event.
///
/// Different report iterations used `ability` or `abilityGameID` for the
/// spell id; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuraSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<i64>,
    #[serde(alias = "abilityGameID", skip_serializing_if = "Option::is_none")]
    pub ability: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacks: Option<u32>,
}

/// One talent entry. Two historical payload shapes exist: bare per-tree
/// point totals, and per-talent records carrying a spell id and rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TalentEntry {
    Points(u32),
    Ranked(TalentRank),
}

/// Per-talent record shape. Field names varied across log iterations;
/// all observed spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalentRank {
    #[serde(rename = "spellID", alias = "spellId", skip_serializing_if = "Option::is_none")]
    pub spell_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

impl TalentRank {
    /// Best-effort spell id: `spellId` wins over `id`.
    pub fn spell(&self) -> Option<u32> {
        self.spell_id.or(self.id)
    }

    /// Best-effort rank: `rank` wins over `points`.
    pub fn rank(&self) -> Option<u32> {
        self.rank.or(self.points)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Log Event
// ─────────────────────────────────────────────────────────────────────────────

/// A single combat-log event.
///
/// Timestamps are milliseconds from report start, non-decreasing within a
/// fight. All numeric quantities are carried as doubles; the engine does
/// no rounding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogEvent {
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: EventKind,

    #[serde(rename = "sourceID")]
    pub source_id: i64,
    #[serde(rename = "targetID")]
    pub target_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_instance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_instance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_is_friendly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_is_friendly: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    #[serde(rename = "abilityGameID", skip_serializing_if = "Option::is_none")]
    pub ability_id: Option<u32>,
    /// School bit mask of the ability, when the report carries it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_school: Option<u8>,

    // ─── damage / heal / absorbed ───────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absorbed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overkill: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overheal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multistrike: Option<bool>,

    // ─── energize ───────────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_change_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste: Option<f64>,

    // ─── aura events ────────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacks: Option<i32>,

    // ─── combatant info ─────────────────────────────────────────────────────
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gear: Option<Vec<GearPiece>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auras: Option<Vec<AuraSnapshot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talents: Option<Vec<TalentEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talent_rows: Option<Vec<TalentEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talent_tree: Option<Vec<TalentEntry>>,
    #[serde(rename = "specID", alias = "specId", skip_serializing_if = "Option::is_none")]
    pub spec_id: Option<u32>,
}

impl LogEvent {
    /// Decoded hit type, if the event carries one.
    pub fn hit_type(&self) -> Option<HitType> {
        self.hit_type.and_then(HitType::from_code)
    }

    /// Decoded resource kind, if the event carries one.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        self.resource_change_type.and_then(ResourceKind::from_code)
    }

    /// Whether the event carries map coordinates.
    pub fn has_position(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    /// Whether the target id is the environment sentinel.
    pub fn targets_environment(&self) -> bool {
        self.target_id == ENVIRONMENT_ID
    }
}
