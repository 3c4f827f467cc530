//! Round modifiers: named strategy values that intercept the core's
//! decision points.
//!
//! A modifier is immutable configuration plus a set of optional hook
//! closures; absent hooks mean identity behavior, so the unmodified game is
//! just `Modifier::identity()`. Behavior is composed by setting hook fields
//! on a preset, never by subtyping. Offers are weighted externally through
//! `selection_weight`, which folds in the appearance condition and the
//! progression availability gate.

pub mod presets;

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::GridObject;
use crate::collection::{ItemLedger, PlayerProgress};
use crate::hammer::Hammer;
use crate::mining::{GameState, MineGrid};
use crate::placement::PlacementPools;
use crate::weighted::weighted_select;

pub use presets::modifier_catalog;

/// Which progression stage a modifier can be offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// Only before the expanded pool unlocks
    Standard,
    /// Only after the expanded pool unlocks
    Expanded,
    Both,
}

impl Availability {
    fn multiplier(&self, expanded: bool) -> u32 {
        match (self, expanded) {
            (Self::Standard, false) | (Self::Expanded, true) | (Self::Both, _) => 1,
            _ => 0,
        }
    }
}

/// What a terminal round grants, as decided by the payout hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub grant_items: bool,
    /// Flavour lines for the notification collaborator to surface
    pub messages: Vec<String>,
}

impl Payout {
    /// Default rule: found items are granted on success, nothing on failure.
    pub fn standard(state: &GameState) -> Self {
        Self {
            grant_items: !state.failed,
            messages: Vec::new(),
        }
    }
}

pub type TerrainReplaceFn = Box<dyn Fn(&mut MineGrid, u64) + Send + Sync>;
pub type TerrainNoiseFn = Box<dyn Fn(f64, usize, usize) -> f64 + Send + Sync>;
pub type TerrainLevelFn = Box<dyn Fn(u32, usize, usize) -> u32 + Send + Sync>;
pub type RateFn = Box<dyn Fn(&GridObject, u32) -> u32 + Send + Sync>;
pub type ItemAmountFn = Box<dyn Fn(u32) -> u32 + Send + Sync>;
pub type PlacementFn =
    Box<dyn Fn(&mut MineGrid, &mut Xoshiro256PlusPlus, &PlacementPools<'_>) + Send + Sync>;
pub type HammerDamageFn = Box<dyn Fn(u32) -> u32 + Send + Sync>;
pub type HammerSwapFn = Box<dyn Fn(&Hammer) -> Hammer + Send + Sync>;
pub type PayoutFn = Box<dyn Fn(&GameState) -> Payout + Send + Sync>;
pub type WeightFn = Box<dyn Fn(&PlayerProgress) -> u32 + Send + Sync>;
pub type AppearanceFn = Box<dyn Fn(&PlayerProgress) -> bool + Send + Sync>;

/// The interception points. Every field defaults to `None` (identity).
#[derive(Default)]
pub struct ModifierHooks {
    /// Replace terrain generation wholesale
    pub generate_terrain: Option<TerrainReplaceFn>,
    /// Runs before normal item placement, e.g. fixed blocking shapes
    pub pre_object_placement: Option<PlacementFn>,
    /// Adjust the raw noise value before clamping
    pub modify_terrain_noise: Option<TerrainNoiseFn>,
    /// Adjust the final per-cell depth
    pub modify_terrain_level: Option<TerrainLevelFn>,
    /// Adjust an item's effective placement weight
    pub modify_rate: Option<RateFn>,
    /// Adjust how many items a round places
    pub modify_item_amount: Option<ItemAmountFn>,
    /// Replace the default item placement pass
    pub place_objects: Option<PlacementFn>,
    /// Replace the default bedrock placement pass
    pub place_bedrock: Option<PlacementFn>,
    /// Adjust the per-strike health cost
    pub modify_hammer_damage: Option<HammerDamageFn>,
    /// Swap the active hammer variant
    pub modify_hammer: Option<HammerSwapFn>,
    /// Decide the terminal payout
    pub on_game_over: Option<PayoutFn>,
}

/// A named, immutable round modifier.
pub struct Modifier {
    pub name: String,
    /// Item-denominated activation cost
    pub cost: Vec<(String, u64)>,
    pub availability: Availability,
    /// Whether the modifier may be taken again after a round with it
    pub repeatable: bool,
    /// Offer weight when no computed weight is set
    pub base_weight: u32,
    /// Computed offer weight; captures collected-item counts at catalog build
    pub weight_fn: Option<WeightFn>,
    /// Chance the modifier applies for free when offered
    pub guaranteed_chance: f64,
    /// When present and false for the current progress, the offer weight is zero
    pub appearance_condition: Option<AppearanceFn>,
    pub hooks: ModifierHooks,
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modifier")
            .field("name", &self.name)
            .field("availability", &self.availability)
            .field("repeatable", &self.repeatable)
            .field("base_weight", &self.base_weight)
            .field("guaranteed_chance", &self.guaranteed_chance)
            .finish_non_exhaustive()
    }
}

impl Default for Modifier {
    fn default() -> Self {
        Self::identity()
    }
}

impl Modifier {
    /// The unmodified game: every hook absent, never offered.
    pub fn identity() -> Self {
        Self::named("none")
    }

    /// Base for preset construction: identity hooks under a name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cost: Vec::new(),
            availability: Availability::Both,
            repeatable: true,
            base_weight: 0,
            weight_fn: None,
            guaranteed_chance: 0.0,
            appearance_condition: None,
            hooks: ModifierHooks::default(),
        }
    }

    // Hook dispatch. Each defaults to identity when the hook is absent.

    pub fn modify_terrain_noise(&self, value: f64, x: usize, y: usize) -> f64 {
        match &self.hooks.modify_terrain_noise {
            Some(hook) => hook(value, x, y),
            None => value,
        }
    }

    pub fn modify_terrain_level(&self, depth: u32, x: usize, y: usize) -> u32 {
        match &self.hooks.modify_terrain_level {
            Some(hook) => hook(depth, x, y),
            None => depth,
        }
    }

    /// Run the terrain replacement hook if present. Returns whether it ran.
    pub fn replace_terrain(&self, grid: &mut MineGrid, seed: u64) -> bool {
        match &self.hooks.generate_terrain {
            Some(hook) => {
                hook(grid, seed);
                true
            }
            None => false,
        }
    }

    pub fn run_pre_object_placement(
        &self,
        grid: &mut MineGrid,
        rng: &mut Xoshiro256PlusPlus,
        pools: &PlacementPools<'_>,
    ) {
        if let Some(hook) = &self.hooks.pre_object_placement {
            hook(grid, rng, pools);
        }
    }

    /// Run the item placement replacement if present. Returns whether it ran.
    pub fn replace_item_placement(
        &self,
        grid: &mut MineGrid,
        rng: &mut Xoshiro256PlusPlus,
        pools: &PlacementPools<'_>,
    ) -> bool {
        match &self.hooks.place_objects {
            Some(hook) => {
                hook(grid, rng, pools);
                true
            }
            None => false,
        }
    }

    /// Run the bedrock placement replacement if present. Returns whether it ran.
    pub fn replace_bedrock_placement(
        &self,
        grid: &mut MineGrid,
        rng: &mut Xoshiro256PlusPlus,
        pools: &PlacementPools<'_>,
    ) -> bool {
        match &self.hooks.place_bedrock {
            Some(hook) => {
                hook(grid, rng, pools);
                true
            }
            None => false,
        }
    }

    pub fn modify_rate(&self, object: &GridObject, rate: u32) -> u32 {
        match &self.hooks.modify_rate {
            Some(hook) => hook(object, rate),
            None => rate,
        }
    }

    pub fn modify_item_amount(&self, count: u32) -> u32 {
        match &self.hooks.modify_item_amount {
            Some(hook) => hook(count),
            None => count,
        }
    }

    pub fn modify_hammer_damage(&self, damage: u32) -> u32 {
        match &self.hooks.modify_hammer_damage {
            Some(hook) => hook(damage),
            None => damage,
        }
    }

    /// The hammer actually used for a strike.
    pub fn effective_hammer(&self, base: &Hammer) -> Hammer {
        match &self.hooks.modify_hammer {
            Some(hook) => hook(base),
            None => base.clone(),
        }
    }

    /// Terminal payout for a finished round.
    pub fn payout(&self, state: &GameState) -> Payout {
        match &self.hooks.on_game_over {
            Some(hook) => hook(state),
            None => Payout::standard(state),
        }
    }

    /// Offer weight for the current progression: zero when the appearance
    /// condition fails, otherwise the (possibly computed) weight scaled by
    /// the availability gate.
    pub fn selection_weight(&self, progress: &PlayerProgress) -> u32 {
        if let Some(condition) = &self.appearance_condition {
            if !condition(progress) {
                return 0;
            }
        }
        let weight = match &self.weight_fn {
            Some(computed) => computed(progress),
            None => self.base_weight,
        };
        weight * self.availability.multiplier(progress.expanded_pool)
    }

    /// Roll the guaranteed-application chance.
    pub fn roll_guaranteed(&self, rng: &mut impl Rng) -> bool {
        self.guaranteed_chance > 0.0 && rng.gen_bool(self.guaranteed_chance.clamp(0.0, 1.0))
    }

    pub fn can_afford(&self, ledger: &ItemLedger) -> bool {
        ledger.can_afford(&self.cost)
    }
}

/// Weighted offer over a modifier catalog for the current progression.
/// Returns `None` when nothing is offerable (all weights zero and the
/// catalog empty, or the catalog empty outright).
pub fn select_offer<'a>(
    rng: &mut impl Rng,
    catalog: &'a [Modifier],
    progress: &PlayerProgress,
) -> Option<&'a Modifier> {
    weighted_select(rng, catalog, progress, |modifier, progress| {
        modifier.selection_weight(progress)
    })
}
