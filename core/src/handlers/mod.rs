//! Installed event handlers
//!
//! Formulas can install handlers that observe every subsequent event of
//! the fight and redirect, suppress, or override the threat it would
//! generate. Handlers run in insertion order, may correct auras through
//! the fight state, and uninstall themselves in the same dispatch round
//! that consumes their last charge.

use aggro_types::{EventKind, HitType, LogEvent};

use crate::actor::ActorKey;
use crate::config::ThreatConfig;
use crate::fight::FightState;

/// What a handler wants done with the current event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HandlerVerdict {
    /// Continue with the default evaluation.
    #[default]
    Passthrough,
    /// Suppress threat generation for this event entirely.
    Skip,
    /// Rewrite the threat recipient and/or the final amount.
    Augment {
        recipient: Option<ActorKey>,
        threat: Option<f64>,
    },
}

/// Verdict plus the handler's own lifecycle request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandlerDecision {
    pub verdict: HandlerVerdict,
    pub uninstall: bool,
}

impl HandlerDecision {
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn skip() -> Self {
        Self {
            verdict: HandlerVerdict::Skip,
            uninstall: false,
        }
    }
}

/// An installed per-event observer.
pub trait ThreatHandler: std::fmt::Debug + Send {
    fn on_event(
        &mut self,
        event: &LogEvent,
        fight: &mut FightState,
        config: &ThreatConfig,
    ) -> HandlerDecision;
}

/// Folded result of running the whole chain for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChainOutcome {
    pub skip: bool,
    pub recipient: Option<ActorKey>,
    pub threat: Option<f64>,
}

impl ChainOutcome {
    pub fn is_neutral(&self) -> bool {
        !self.skip && self.recipient.is_none() && self.threat.is_none()
    }
}

struct Installed {
    id: u64,
    installed_at: i64,
    handler: Box<dyn ThreatHandler>,
}

impl std::fmt::Debug for Installed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installed")
            .field("id", &self.id)
            .field("installed_at", &self.installed_at)
            .field("handler", &self.handler)
            .finish()
    }
}

/// Insertion-ordered registry with monotonic handles.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Installed>,
    next_id: u64,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, handler: Box<dyn ThreatHandler>, installed_at: i64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        tracing::debug!(id, installed_at, ?handler, "handler installed");
        self.handlers.push(Installed { id, installed_at, handler });
        id
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Run every handler against the event, folding verdicts. Any skip
    /// wins; augment fields merge with later handlers overriding
    /// earlier ones. Self-uninstalls are honoured after their verdict
    /// is counted.
    pub fn dispatch(
        &mut self,
        event: &LogEvent,
        fight: &mut FightState,
        config: &ThreatConfig,
    ) -> ChainOutcome {
        let mut outcome = ChainOutcome::default();
        let mut removed: Vec<u64> = Vec::new();
        for entry in &mut self.handlers {
            let decision = entry.handler.on_event(event, fight, config);
            match decision.verdict {
                HandlerVerdict::Passthrough => {}
                HandlerVerdict::Skip => outcome.skip = true,
                HandlerVerdict::Augment { recipient, threat } => {
                    if recipient.is_some() {
                        outcome.recipient = recipient;
                    }
                    if threat.is_some() {
                        outcome.threat = threat;
                    }
                }
            }
            if decision.uninstall {
                removed.push(entry.id);
            }
        }
        if !removed.is_empty() {
            self.handlers.retain(|h| !removed.contains(&h.id));
            tracing::debug!(?removed, "handlers uninstalled");
        }
        outcome
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Rolls back the up-front cast threat of an ability if its damage then
/// fails to land (miss, immune, full resist). Uninstalls on the first
/// damage event of the watched ability either way.
#[derive(Debug)]
pub struct RollbackOnMiss {
    pub caster: ActorKey,
    pub ability: u32,
    pub amount: f64,
}

impl ThreatHandler for RollbackOnMiss {
    fn on_event(
        &mut self,
        event: &LogEvent,
        _fight: &mut FightState,
        _config: &ThreatConfig,
    ) -> HandlerDecision {
        if event.kind != EventKind::Damage
            || event.ability_id != Some(self.ability)
            || ActorKey::new(event.source_id, event.source_instance) != self.caster
        {
            return HandlerDecision::passthrough();
        }
        let failed = matches!(
            event.hit_type(),
            Some(HitType::Miss | HitType::Immune | HitType::Resist)
        );
        let verdict = if failed {
            HandlerVerdict::Augment {
                recipient: None,
                threat: Some(-self.amount),
            }
        } else {
            HandlerVerdict::Passthrough
        };
        HandlerDecision { verdict, uninstall: true }
    }
}

/// Redirects the caster's next N damage-event threat changes to another
/// actor, then uninstalls.
#[derive(Debug)]
pub struct RedirectThreat {
    pub caster: ActorKey,
    pub recipient: ActorKey,
    pub remaining: u32,
}

impl ThreatHandler for RedirectThreat {
    fn on_event(
        &mut self,
        event: &LogEvent,
        _fight: &mut FightState,
        _config: &ThreatConfig,
    ) -> HandlerDecision {
        if event.kind != EventKind::Damage
            || ActorKey::new(event.source_id, event.source_instance) != self.caster
            || self.remaining == 0
        {
            return HandlerDecision::passthrough();
        }
        self.remaining -= 1;
        HandlerDecision {
            verdict: HandlerVerdict::Augment {
                recipient: Some(self.recipient),
                threat: None,
            },
            uninstall: self.remaining == 0,
        }
    }
}
