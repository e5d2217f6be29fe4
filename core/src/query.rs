//! Post-replay standings
//!
//! Folds a fight's augmented events into final per-actor threat totals
//! against each enemy, for summary output and assertions. The fold only
//! needs the emitted changes; running totals carry the table state.

use hashbrown::HashMap;

use crate::actor::ActorKey;
use crate::threat::AugmentedEvent;

/// Final threat standings reconstructed from emitted changes.
#[derive(Debug, Default)]
pub struct ThreatStandings {
    totals: HashMap<(ActorKey, ActorKey), f64>,
}

impl ThreatStandings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one augmented event's changes in.
    pub fn absorb(&mut self, event: &AugmentedEvent) {
        for change in event.changes() {
            let actor = ActorKey::new(change.source_actor, Some(change.source_actor_instance));
            let enemy = ActorKey::new(change.target_enemy, Some(change.target_enemy_instance));
            if change.running_total == 0.0 {
                self.totals.remove(&(actor, enemy));
            } else {
                self.totals.insert((actor, enemy), change.running_total);
            }
        }
    }

    pub fn from_events<'a, I: IntoIterator<Item = &'a AugmentedEvent>>(events: I) -> Self {
        let mut standings = Self::new();
        for event in events {
            standings.absorb(event);
        }
        standings
    }

    pub fn threat(&self, actor: ActorKey, enemy: ActorKey) -> f64 {
        self.totals.get(&(actor, enemy)).copied().unwrap_or(0.0)
    }

    /// Enemies with at least one standing, ascending by key.
    pub fn enemies(&self) -> Vec<ActorKey> {
        let mut enemies: Vec<ActorKey> = self.totals.keys().map(|(_, e)| *e).collect();
        enemies.sort_unstable();
        enemies.dedup();
        enemies
    }

    /// Standings against one enemy, descending by threat with ties
    /// broken by ascending actor key.
    pub fn standings_for(&self, enemy: ActorKey) -> Vec<(ActorKey, f64)> {
        let mut rows: Vec<(ActorKey, f64)> = self
            .totals
            .iter()
            .filter(|((_, e), _)| *e == enemy)
            .map(|((a, _), t)| (*a, *t))
            .collect();
        rows.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        rows
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
