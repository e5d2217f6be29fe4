//! Per-class rule sets
//!
//! Each class contributes an ability table, aura modifiers, exclusive
//! aura groups, and the implication rules that synthesise auras from
//! observed gear, talents, and casts.

use hashbrown::HashMap;

use aggro_types::{GearPiece, TalentEntry};

use crate::actor::PlayerClass;

use super::formula::ThreatFormula;
use super::modifier::AuraModifierDef;

/// Infers a talent's presence from combatant-info payloads.
///
/// Two payload shapes are supported: per-talent records carrying one of
/// the rank spell ids directly, and bare per-tree point totals where the
/// talent is assumed at max rank once the tree investment is deep
/// enough.
#[derive(Debug, Clone, Copy)]
pub struct TalentRule {
    pub name: &'static str,
    /// Rank spell ids, rank 1 first. The matched rank's spell id is the
    /// synthesised aura.
    pub rank_spell_ids: &'static [u32],
    pub tree_fallback: Option<TreeFallback>,
}

/// Tree-point fallback: `tree` is the index into the point array.
#[derive(Debug, Clone, Copy)]
pub struct TreeFallback {
    pub tree: usize,
    pub min_points: u32,
}

impl TalentRule {
    /// Synthetic aura for one ranked talent record, if it names this
    /// talent.
    pub fn aura_for_record(&self, spell: u32, rank: Option<u32>) -> Option<u32> {
        if !self.rank_spell_ids.contains(&spell) {
            return None;
        }
        match rank {
            Some(r) if r >= 1 && (r as usize) <= self.rank_spell_ids.len() => {
                Some(self.rank_spell_ids[r as usize - 1])
            }
            // The logged id already encodes the rank.
            _ => Some(spell),
        }
    }

    /// Synthetic aura from tree point totals (max rank assumed).
    pub fn aura_for_trees(&self, points: &[u32]) -> Option<u32> {
        let fb = self.tree_fallback?;
        if points.get(fb.tree).copied().unwrap_or(0) >= fb.min_points {
            self.rank_spell_ids.last().copied()
        } else {
            None
        }
    }

    /// Apply this rule against a full talent payload.
    pub fn infer(&self, entries: &[TalentEntry]) -> Option<u32> {
        let mut tree_points = Vec::new();
        for entry in entries {
            match entry {
                TalentEntry::Points(p) => tree_points.push(*p),
                TalentEntry::Ranked(r) => {
                    if let Some(spell) = r.spell() {
                        if let Some(aura) = self.aura_for_record(spell, r.rank()) {
                            return Some(aura);
                        }
                        // Tree-shaped records: small id used as tree index.
                        if r.spell_id.is_none() && spell < 3 {
                            let idx = spell as usize;
                            if tree_points.len() <= idx {
                                tree_points.resize(idx + 1, 0);
                            }
                            tree_points[idx] = r.rank().unwrap_or(0);
                        }
                    }
                }
            }
        }
        self.aura_for_trees(&tree_points)
    }
}

/// Infers an aura from equipped gear (enchants, specific items).
#[derive(Debug, Clone, Copy)]
pub enum GearRule {
    Enchant { enchant: u32, aura: u32 },
    Item { item: u32, aura: u32 },
}

impl GearRule {
    pub fn implied_aura(&self, gear: &[GearPiece]) -> Option<u32> {
        match *self {
            Self::Enchant { enchant, aura } => gear
                .iter()
                .any(|g| {
                    g.permanent_enchant == Some(enchant) || g.temporary_enchant == Some(enchant)
                })
                .then_some(aura),
            Self::Item { item, aura } => gear.iter().any(|g| g.id == item).then_some(aura),
        }
    }
}

/// Everything one class contributes to the merged rule set.
#[derive(Debug, Clone, Default)]
pub struct ClassRules {
    /// Baseline threat factor applied to everything the class does.
    /// `None` means the layer leaves the factor alone; the merged
    /// default is 1.0.
    pub base_factor: Option<f64>,
    /// Ability id → rule.
    pub abilities: HashMap<u32, ThreatFormula>,
    /// Aura id → modifier. Merged into the global modifier table so
    /// cross-class buffs work on any recipient.
    pub modifiers: HashMap<u32, AuraModifierDef>,
    /// Aura groups with at-most-one-active semantics.
    pub exclusive_groups: Vec<Vec<u32>>,
    /// Auras that force the enemy's targeting.
    pub fixate_auras: Vec<u32>,
    /// Cast ability id → implied aura (e.g. a cat-only ability implies
    /// Cat Form).
    pub cast_implications: HashMap<u32, u32>,
    pub talents: Vec<TalentRule>,
    pub gear: Vec<GearRule>,
}

impl ClassRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `other` into `self`, child entries winning by key. A layer
    /// that never set the factor leaves the merged one untouched.
    pub fn merge(&mut self, other: ClassRules) {
        if let Some(factor) = other.base_factor {
            self.base_factor = Some(factor);
        }
        self.abilities.extend(other.abilities);
        self.modifiers.extend(other.modifiers);
        self.exclusive_groups.extend(other.exclusive_groups);
        self.fixate_auras.extend(other.fixate_auras);
        self.cast_implications.extend(other.cast_implications);
        self.talents.extend(other.talents);
        self.gear.extend(other.gear);
    }
}

/// A class rule set tagged with its class, as rule tables produce it.
#[derive(Debug, Clone)]
pub struct ClassEntry {
    pub class: PlayerClass,
    pub rules: ClassRules,
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggro_types::TalentRank;

    const DEFIANCE: TalentRule = TalentRule {
        name: "Defiance",
        rank_spell_ids: &[12303, 12788, 12789, 12791, 12792],
        tree_fallback: Some(TreeFallback { tree: 2, min_points: 30 }),
    };

    fn ranked(spell: u32, rank: u32) -> TalentEntry {
        TalentEntry::Ranked(TalentRank {
            spell_id: Some(spell),
            rank: Some(rank),
            ..TalentRank::default()
        })
    }

    #[test]
    fn ranked_record_selects_rank_aura() {
        let entries = vec![ranked(12303, 5)];
        assert_eq!(DEFIANCE.infer(&entries), Some(12792));
    }

    #[test]
    fn rank_spell_id_without_rank_is_taken_verbatim() {
        let entries = vec![TalentEntry::Ranked(TalentRank {
            spell_id: Some(12789),
            ..TalentRank::default()
        })];
        assert_eq!(DEFIANCE.infer(&entries), Some(12789));
    }

    #[test]
    fn tree_points_fall_back_to_max_rank() {
        let entries = vec![
            TalentEntry::Points(5),
            TalentEntry::Points(8),
            TalentEntry::Points(38),
        ];
        assert_eq!(DEFIANCE.infer(&entries), Some(12792));
        let shallow = vec![
            TalentEntry::Points(31),
            TalentEntry::Points(20),
            TalentEntry::Points(0),
        ];
        assert_eq!(DEFIANCE.infer(&shallow), None);
    }

    #[test]
    fn gear_enchant_rule_checks_both_enchant_slots() {
        let rule = GearRule::Enchant { enchant: 2613, aura: 2613 };
        let gear = vec![GearPiece {
            id: 19137,
            permanent_enchant: Some(2613),
            ..GearPiece::default()
        }];
        assert_eq!(rule.implied_aura(&gear), Some(2613));
        let bare = vec![GearPiece { id: 19137, ..GearPiece::default() }];
        assert_eq!(rule.implied_aura(&bare), None);
    }
}
