//! Threat formulas and their results
//!
//! A formula is plain data: a tagged variant the evaluator interprets
//! against an event. Rule tables construct variants directly or through
//! the convenience constructors; everything is inspectable in tests.

use aggro_types::EventKind;

use crate::actor::ActorKey;
use crate::handlers::ThreatHandler;

/// How a threat-scaling effect ranges over enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatScope {
    /// Only against the event's enemy.
    Target,
    /// Against every tracked enemy.
    AllEnemies,
}

/// How a threat change is applied to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatOp {
    Add,
    Set,
}

/// An explicit threat assignment requested by a formula or hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatAssignment {
    pub actor: ActorKey,
    pub enemy: ActorKey,
    pub op: ThreatOp,
    pub amount: f64,
}

/// Side-effect requested alongside (or instead of) numeric threat.
#[derive(Debug)]
pub enum ThreatEffect {
    /// Scale the friendly side's existing threat. A multiplier of zero
    /// is a wipe.
    ModifyThreat { mult: f64, scope: ThreatScope },
    /// Apply the given assignments exactly.
    CustomThreat { changes: Vec<ThreatAssignment> },
    /// Register an event handler that observes subsequent events.
    InstallHandler(Box<dyn ThreatHandler>),
    /// Annotation only; no state change.
    Marker(&'static str),
}

/// Interpreted output of a formula for one event.
#[derive(Debug, Default)]
pub struct ThreatResult {
    pub base_value: f64,
    /// Divide the final value equally among tracked enemies.
    pub split: bool,
    /// Whether the caster's aura/class multipliers apply.
    pub apply_source_modifiers: bool,
    /// The ability-level multiplier that produced `base_value`, for the
    /// emitted calculation block.
    pub spell_mult: Option<f64>,
    pub effects: Vec<ThreatEffect>,
    pub note: Option<&'static str>,
}

impl ThreatResult {
    pub fn value(base_value: f64) -> Self {
        Self {
            base_value,
            apply_source_modifiers: true,
            ..Self::default()
        }
    }

    pub fn split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    pub fn unmodified(mut self) -> Self {
        self.apply_source_modifiers = false;
        self
    }

    pub fn with_mult(mut self, mult: f64) -> Self {
        self.spell_mult = Some(mult);
        self
    }

    pub fn with_effect(mut self, effect: ThreatEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// `value = amount · mult + bonus`, with optional split and event-type
/// gating. The workhorse rule shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatThreat {
    pub mult: f64,
    pub bonus: f64,
    pub split: bool,
    pub apply_source_modifiers: bool,
    /// When set, the rule only fires for these event types.
    pub on: Option<&'static [EventKind]>,
}

impl Default for FlatThreat {
    fn default() -> Self {
        Self {
            mult: 1.0,
            bonus: 0.0,
            split: false,
            apply_source_modifiers: true,
            on: None,
        }
    }
}

/// A threat rule, resolved per (event type, ability id).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThreatFormula {
    /// `amount · mult + bonus` on any matching event.
    Flat(FlatThreat),
    /// As `Flat`, but nothing on avoided attacks (miss, dodge, parry,
    /// absorb, immune, resist).
    OnSuccessfulHit { mult: f64, bonus: f64 },
    /// Flat bonus when the debuff lands (apply/refresh/stack).
    OnDebuff { bonus: f64 },
    /// Flat bonus on debuff application; plain amount threat on damage.
    OnDebuffOrDamage { bonus: f64 },
    /// Flat bonus when the buff lands, optionally split among enemies.
    OnBuff { bonus: f64, split: bool },
    /// Flat bonus on buff application; plain amount threat on damage.
    OnBuffOrDamage { bonus: f64 },
    /// Threat up front on cast; rolled back if the spell then misses,
    /// is resisted, or hits an immune target.
    CastRollbackOnMiss { amount: f64 },
    /// Set caster threat against the target to at least the table top
    /// plus `amount · mult + bonus`.
    Taunt { mult: f64, bonus: f64 },
    /// Scale the friendly side's threat, optionally gated to certain
    /// event types. `mult = 0, AllEnemies` is a full wipe.
    ModifyThreat {
        mult: f64,
        scope: ThreatScope,
        on: Option<&'static [EventKind]>,
    },
    /// `ModifyThreat { scope: Target }` that only fires when the attack
    /// lands.
    ModifyThreatOnHit { mult: f64 },
    /// Boss strike that adds flat threat to the direct target plus the
    /// next top-threat actors inside melee range.
    HatefulStrike {
        amount: f64,
        targets: usize,
        melee_range: f64,
    },
    /// Exchange the top-threat actors' table entries between the two
    /// paired bosses.
    ThreatTransplant { pair: (i64, i64) },
    /// Redirect the caster's next N damage-event threat changes to the
    /// cast target.
    RedirectNext { events: u32 },
    /// Explicitly threat-free ability.
    NoThreat,
}

impl ThreatFormula {
    /// `value = amount · mult`.
    pub const fn scaled(mult: f64) -> Self {
        Self::Flat(FlatThreat {
            mult,
            bonus: 0.0,
            split: false,
            apply_source_modifiers: true,
            on: None,
        })
    }

    /// `value = amount + bonus`.
    pub const fn bonus(bonus: f64) -> Self {
        Self::Flat(FlatThreat {
            mult: 1.0,
            bonus,
            split: false,
            apply_source_modifiers: true,
            on: None,
        })
    }

    /// Flat bonus that only counts when the swing lands.
    pub const fn bonus_on_hit(bonus: f64) -> Self {
        Self::OnSuccessfulHit { mult: 1.0, bonus }
    }

    pub const fn buff(bonus: f64) -> Self {
        Self::OnBuff { bonus, split: false }
    }

    pub const fn buff_split(bonus: f64) -> Self {
        Self::OnBuff { bonus, split: true }
    }

    pub const fn debuff(bonus: f64) -> Self {
        Self::OnDebuff { bonus }
    }

    pub const fn taunt() -> Self {
        Self::Taunt { mult: 0.0, bonus: 0.0 }
    }

    /// Full table wipe against every enemy, fired on cast.
    pub const fn wipe_on_cast() -> Self {
        Self::ModifyThreat {
            mult: 0.0,
            scope: ThreatScope::AllEnemies,
            on: Some(&[EventKind::Cast]),
        }
    }

    /// Short human-readable shape of the rule, for the emitted
    /// calculation block.
    pub fn describe(&self) -> String {
        match self {
            Self::Flat(f) if f.split => format!("amount × {} + {} (split)", f.mult, f.bonus),
            Self::Flat(f) => format!("amount × {} + {}", f.mult, f.bonus),
            Self::OnSuccessfulHit { mult, bonus } => {
                format!("on hit: amount × {mult} + {bonus}")
            }
            Self::OnDebuff { bonus } => format!("debuff: {bonus}"),
            Self::OnDebuffOrDamage { bonus } => format!("debuff {bonus} / damage amount"),
            Self::OnBuff { bonus, split: true } => format!("buff: {bonus} (split)"),
            Self::OnBuff { bonus, split: false } => format!("buff: {bonus}"),
            Self::OnBuffOrDamage { bonus } => format!("buff {bonus} / damage amount"),
            Self::CastRollbackOnMiss { amount } => format!("cast: {amount}, rollback on miss"),
            Self::Taunt { mult, bonus } => format!("taunt: top + amount × {mult} + {bonus}"),
            Self::ModifyThreat { mult, scope: ThreatScope::AllEnemies, .. } => {
                format!("threat × {mult} (all enemies)")
            }
            Self::ModifyThreat { mult, .. } => format!("threat × {mult} (target)"),
            Self::ModifyThreatOnHit { mult } => format!("on hit: threat × {mult} (target)"),
            Self::HatefulStrike { amount, targets, .. } => {
                format!("hateful strike: {amount} to top {targets}")
            }
            Self::ThreatTransplant { .. } => "threat transplant".to_string(),
            Self::RedirectNext { events } => format!("redirect next {events} events"),
            Self::NoThreat => "no threat".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_are_inspectable() {
        match ThreatFormula::scaled(1.75) {
            ThreatFormula::Flat(f) => {
                assert_eq!(f.mult, 1.75);
                assert_eq!(f.bonus, 0.0);
                assert!(f.apply_source_modifiers);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
        match ThreatFormula::wipe_on_cast() {
            ThreatFormula::ModifyThreat { mult, scope, on } => {
                assert_eq!(mult, 0.0);
                assert_eq!(scope, ThreatScope::AllEnemies);
                assert_eq!(on, Some(&[EventKind::Cast][..]));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }
}
