//! Per-instance runtime state
//!
//! An `ActorInstance` owns everything the engine tracks about one live
//! manifestation of an actor: active auras, equipped gear, position,
//! target rotation, life state, and the threat it holds against each
//! enemy instance.

use hashbrown::{HashMap, HashSet};

use aggro_types::GearPiece;

use super::ActorKey;
use crate::config::ExclusiveGroups;

/// Map coordinates in engine-internal units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn distance_to(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Runtime state of one actor instance in a fight.
#[derive(Debug, Clone, Default)]
pub struct ActorInstance {
    auras: HashSet<u32>,
    gear: Vec<GearPiece>,
    alive: bool,
    position: Option<Position>,
    current_target: Option<ActorKey>,
    last_target: Option<ActorKey>,
    /// Threat held against each enemy instance. Entries are strictly
    /// positive; mutations clamp at zero and drop the entry.
    threat: HashMap<ActorKey, f64>,
}

impl ActorInstance {
    pub fn new() -> Self {
        Self {
            alive: true,
            ..Self::default()
        }
    }

    // ─── Auras ──────────────────────────────────────────────────────────────

    /// Add an aura, evicting every other member of its exclusive group
    /// first so the group invariant holds before the add is visible.
    pub fn add_aura(&mut self, exclusives: &ExclusiveGroups, spell: u32) {
        for member in exclusives.rivals_of(spell) {
            if self.auras.remove(&member) {
                tracing::debug!(evicted = member, incoming = spell, "exclusive aura displaced");
            }
        }
        self.auras.insert(spell);
    }

    pub fn remove_aura(&mut self, spell: u32) {
        self.auras.remove(&spell);
    }

    /// Seed a batch of auras left-to-right; within an exclusive group the
    /// last one wins.
    pub fn seed_auras<I: IntoIterator<Item = u32>>(&mut self, exclusives: &ExclusiveGroups, spells: I) {
        for spell in spells {
            self.add_aura(exclusives, spell);
        }
    }

    pub fn has_aura(&self, spell: u32) -> bool {
        self.auras.contains(&spell)
    }

    pub fn auras(&self) -> impl Iterator<Item = u32> + '_ {
        self.auras.iter().copied()
    }

    // ─── Gear ───────────────────────────────────────────────────────────────

    pub fn set_gear(&mut self, items: Vec<GearPiece>) {
        self.gear = items;
    }

    pub fn gear(&self) -> &[GearPiece] {
        &self.gear
    }

    // ─── Life state ─────────────────────────────────────────────────────────

    pub fn mark_dead(&mut self) {
        self.alive = false;
    }

    pub fn mark_alive(&mut self) {
        self.alive = true;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    // ─── Position ───────────────────────────────────────────────────────────

    pub fn set_position(&mut self, position: Position) {
        self.position = Some(position);
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    // ─── Target rotation ────────────────────────────────────────────────────

    /// Record a new target. On change, the previous current target
    /// becomes the last target.
    pub fn set_target(&mut self, target: ActorKey) {
        if self.current_target == Some(target) {
            return;
        }
        self.last_target = self.current_target.replace(target);
    }

    pub fn current_target(&self) -> Option<ActorKey> {
        self.current_target
    }

    pub fn last_target(&self) -> Option<ActorKey> {
        self.last_target
    }

    // ─── Threat table ───────────────────────────────────────────────────────

    pub fn threat_against(&self, enemy: ActorKey) -> f64 {
        self.threat.get(&enemy).copied().unwrap_or(0.0)
    }

    /// Add (possibly negative) threat against an enemy. Returns the new
    /// total after clamping at zero.
    pub fn add_threat(&mut self, enemy: ActorKey, amount: f64) -> f64 {
        let total = self.threat_against(enemy) + amount;
        self.store_threat(enemy, total)
    }

    /// Overwrite threat against an enemy. Returns the clamped total.
    pub fn set_threat(&mut self, enemy: ActorKey, amount: f64) -> f64 {
        self.store_threat(enemy, amount)
    }

    /// Drop the entry for an enemy, returning the prior value.
    pub fn clear_threat(&mut self, enemy: ActorKey) -> f64 {
        self.threat.remove(&enemy).unwrap_or(0.0)
    }

    pub fn threat_entries(&self) -> impl Iterator<Item = (ActorKey, f64)> + '_ {
        self.threat.iter().map(|(k, v)| (*k, *v))
    }

    pub fn has_threat(&self) -> bool {
        !self.threat.is_empty()
    }

    fn store_threat(&mut self, enemy: ActorKey, total: f64) -> f64 {
        if total <= 0.0 {
            self.threat.remove(&enemy);
            0.0
        } else {
            self.threat.insert(enemy, total);
            total
        }
    }

    /// Immutable snapshot handed to formulas and handlers. Mutating the
    /// view never affects the instance.
    pub fn runtime_view(&self) -> ActorView {
        ActorView {
            auras: self.auras.clone(),
            alive: self.alive,
            position: self.position,
            current_target: self.current_target,
            last_target: self.last_target,
        }
    }
}

/// Detached snapshot of an instance's observable state.
#[derive(Debug, Clone)]
pub struct ActorView {
    pub auras: HashSet<u32>,
    pub alive: bool,
    pub position: Option<Position>,
    pub current_target: Option<ActorKey>,
    pub last_target: Option<ActorKey>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExclusiveGroups;

    fn stances() -> ExclusiveGroups {
        ExclusiveGroups::from_groups(vec![vec![71, 2457, 2458]])
    }

    #[test]
    fn threat_clamps_at_zero_and_drops_entry() {
        let mut a = ActorInstance::new();
        let enemy = ActorKey::new(100, None);
        assert_eq!(a.add_threat(enemy, 130.0), 130.0);
        assert_eq!(a.add_threat(enemy, -500.0), 0.0);
        assert!(!a.has_threat());
        assert_eq!(a.threat_against(enemy), 0.0);
    }

    #[test]
    fn set_threat_zero_removes_entry() {
        let mut a = ActorInstance::new();
        let enemy = ActorKey::new(100, None);
        a.add_threat(enemy, 42.0);
        a.set_threat(enemy, 0.0);
        assert!(!a.has_threat());
    }

    #[test]
    fn exclusive_group_keeps_single_member() {
        let mut a = ActorInstance::new();
        let ex = stances();
        a.add_aura(&ex, 71);
        a.add_aura(&ex, 2457);
        assert!(!a.has_aura(71));
        assert!(a.has_aura(2457));
        assert_eq!(a.auras().count(), 1);
    }

    #[test]
    fn seed_auras_last_group_member_wins() {
        let mut a = ActorInstance::new();
        let ex = stances();
        a.seed_auras(&ex, [71, 466, 2458]);
        assert!(a.has_aura(466));
        assert!(a.has_aura(2458));
        assert!(!a.has_aura(71));
    }

    #[test]
    fn target_rotation() {
        let mut a = ActorInstance::new();
        let first = ActorKey::new(100, None);
        let second = ActorKey::new(101, None);
        a.set_target(first);
        assert_eq!(a.current_target(), Some(first));
        assert_eq!(a.last_target(), None);
        // Re-targeting the same actor does not rotate.
        a.set_target(first);
        assert_eq!(a.last_target(), None);
        a.set_target(second);
        assert_eq!(a.current_target(), Some(second));
        assert_eq!(a.last_target(), Some(first));
    }

    #[test]
    fn runtime_view_is_detached() {
        let mut a = ActorInstance::new();
        let ex = stances();
        a.add_aura(&ex, 71);
        let mut view = a.runtime_view();
        view.auras.insert(9999);
        assert!(!a.has_aura(9999));
    }
}
