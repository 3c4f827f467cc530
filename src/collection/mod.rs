//! Collaborator-facing resources: the item ledger (persistent counters),
//! player settings and progression flags.
//!
//! The core reads and writes these through their methods only; how they are
//! persisted is the outer game's concern.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::catalog::{GameEdition, LootContext};

/// Per-name collected-item counters plus the "ever found" record.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemLedger {
    counts: HashMap<String, u64>,
    ever_found: HashSet<String>,
}

impl ItemLedger {
    /// Current count for a name; unknown names count zero.
    pub fn count(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Credit items and record the first find.
    pub fn add(&mut self, name: &str, delta: u64) {
        if delta == 0 {
            return;
        }
        *self.counts.entry(name.to_string()).or_insert(0) += delta;
        self.ever_found.insert(name.to_string());
    }

    /// Debit items, saturating at zero.
    pub fn remove(&mut self, name: &str, delta: u64) {
        if let Some(count) = self.counts.get_mut(name) {
            *count = count.saturating_sub(delta);
        }
    }

    pub fn has_ever_found(&self, name: &str) -> bool {
        self.ever_found.contains(name)
    }

    /// True when every line of an item-denominated cost is covered.
    pub fn can_afford(&self, cost: &[(String, u64)]) -> bool {
        cost.iter().all(|(name, amount)| self.count(name) >= *amount)
    }

    /// Deduct a cost if affordable. Returns whether payment happened.
    pub fn pay(&mut self, cost: &[(String, u64)]) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for (name, amount) in cost {
            self.remove(name, *amount);
        }
        true
    }
}

/// Player-facing settings relevant to the core: which edition's loot pool
/// applies, plus the screen-shake flag the renderer reads.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct MineSettings {
    pub edition: GameEdition,
    /// Presentation-only; carried here because the settings screen owns it
    pub screen_shake: bool,
}

impl Default for MineSettings {
    fn default() -> Self {
        Self {
            edition: GameEdition::Dawn,
            screen_shake: true,
        }
    }
}

impl MineSettings {
    /// Resolve the active rarity context from edition and progression.
    pub fn loot_context(&self, progress: &PlayerProgress) -> LootContext {
        LootContext::from_parts(self.edition, progress.expanded_pool)
    }
}

/// Progression state consumed by modifier gating.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Whether the expanded (post-progression) loot pool is unlocked
    pub expanded_pool: bool,
    /// Completed badge count, used by appearance conditions
    pub badge_count: u32,
}
