//! Threat computation and augmented output
//!
//! The evaluator resolves a formula for each event, runs the caster's
//! modifier stack, mutates the fight's threat tables, and reports what
//! it did as a `ThreatBlock` attached to the emitted event.

mod evaluator;
#[cfg(test)]
mod evaluator_tests;

pub(crate) use evaluator::evaluate_event;

use phf::phf_map;
use serde::Serialize;

use aggro_types::LogEvent;

use crate::config::{ModifierSource, ThreatOp};

/// Names of the single-bit spell schools, for display.
static SCHOOL_NAMES: phf::Map<u8, &'static str> = phf_map! {
    0x01u8 => "physical",
    0x02u8 => "holy",
    0x04u8 => "fire",
    0x08u8 => "nature",
    0x10u8 => "frost",
    0x20u8 => "shadow",
    0x40u8 => "arcane",
};

/// Human-readable name for a school mask ("fire", "frost+shadow").
pub fn school_name(mask: u8) -> String {
    let mut names: Vec<&str> = Vec::new();
    for bit in [0x01u8, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40] {
        if mask & bit != 0
            && let Some(name) = SCHOOL_NAMES.get(&bit)
        {
            names.push(*name);
        }
    }
    if names.is_empty() {
        format!("school#{mask}")
    } else {
        names.join("+")
    }
}

/// One applied mutation of a threat table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatChange {
    pub source_actor: i64,
    pub source_actor_instance: i32,
    pub target_enemy: i64,
    pub target_enemy_instance: i32,
    pub operator: ThreatOp,
    pub amount: f64,
    pub running_total: f64,
}

/// A modifier that participated in the final value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedModifier {
    pub source: ModifierSource,
    pub name: &'static str,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_mask: Option<u8>,
}

/// How the final value came to be.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub description: String,
    pub base_amount: f64,
    pub base_value: f64,
    pub modified_value: f64,
    pub modifiers: Vec<AppliedModifier>,
    pub is_split: bool,
}

/// The threat annotation attached to an emitted event.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThreatBlock {
    pub calculation: Calculation,
    pub changes: Vec<ThreatChange>,
}

/// An input event plus what the engine computed for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedEvent {
    #[serde(flatten)]
    pub event: LogEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat: Option<ThreatBlock>,
}

impl AugmentedEvent {
    /// Changes, empty when no threat moved.
    pub fn changes(&self) -> &[ThreatChange] {
        self.threat.as_ref().map(|t| t.changes.as_slice()).unwrap_or(&[])
    }
}
