//! The modifier catalog: preset constructors for every offered modifier.
//!
//! Built fresh from the current item ledger each time offers are rolled,
//! because some weights capture collected counts at construction time.

use tracing::debug;

use super::{Availability, Modifier, Payout};
use crate::collection::ItemLedger;
use crate::constants::{DEPTH_TIER_BASE, FLOOD_MISS_LIMIT};
use crate::placement;

/// Every neighbor hit one depth unit stronger. The struck cell keeps its
/// fixed amount.
pub fn strong_hammers() -> Modifier {
    let mut modifier = Modifier::named("strong_hammers");
    modifier.cost = vec![("Iron Lump".to_string(), 2)];
    modifier.base_weight = 20;
    modifier.hooks.modify_hammer = Some(Box::new(|hammer| hammer.strengthened()));
    modifier
}

/// Strikes cost one less health.
pub fn feather_grip() -> Modifier {
    let mut modifier = Modifier::named("feather_grip");
    modifier.cost = vec![("Luminous Pearl".to_string(), 1)];
    modifier.base_weight = 15;
    modifier.hooks.modify_hammer_damage = Some(Box::new(|damage| damage.saturating_sub(1)));
    modifier
}

/// Two extra items, and shards and weather stones turn up twice as often.
pub fn rich_vein() -> Modifier {
    let mut modifier = Modifier::named("rich_vein");
    modifier.cost = vec![("Small Ember Sphere".to_string(), 5)];
    modifier.base_weight = 18;
    modifier.guaranteed_chance = 0.1;
    modifier.hooks.modify_item_amount = Some(Box::new(|count| count + 2));
    modifier.hooks.modify_rate = Some(Box::new(|object, rate| {
        use crate::catalog::Collection;
        match object.collection {
            Collection::Shards | Collection::WeatherStones => rate.saturating_mul(2),
            _ => rate,
        }
    }));
    modifier
}

/// The whole board sits deeper: raw noise shifted up a quarter.
pub fn deep_sediment() -> Modifier {
    let mut modifier = Modifier::named("deep_sediment");
    modifier.cost = vec![("Hard Stone".to_string(), 2)];
    modifier.base_weight = 12;
    modifier.hooks.modify_terrain_noise = Some(Box::new(|value, _, _| value + 0.25));
    modifier
}

/// Every cell two levels shallower, floored at the base tier.
pub fn loose_topsoil() -> Modifier {
    let mut modifier = Modifier::named("loose_topsoil");
    modifier.cost = vec![("Small Tide Sphere".to_string(), 3)];
    modifier.base_weight = 12;
    modifier.hooks.modify_terrain_level = Some(Box::new(|depth, _, _| {
        depth.saturating_sub(2).max(DEPTH_TIER_BASE)
    }));
    modifier
}

/// Replaces terrain generation with a uniform shallow pane.
pub fn glass_quarry() -> Modifier {
    let mut modifier = Modifier::named("glass_quarry");
    modifier.cost = vec![("Frost Orb".to_string(), 1)];
    modifier.availability = Availability::Expanded;
    modifier.base_weight = 8;
    modifier.hooks.generate_terrain = Some(Box::new(|grid, _seed| {
        for y in 0..grid.height {
            for x in 0..grid.width {
                grid.cell_mut(x, y).depth = DEPTH_TIER_BASE + 2;
            }
        }
    }));
    modifier
}

/// Drops a vertical bedrock column through the board center before the
/// normal item placement runs.
pub fn sealed_chamber() -> Modifier {
    let mut modifier = Modifier::named("sealed_chamber");
    modifier.cost = vec![("Hard Stone".to_string(), 3)];
    modifier.base_weight = 10;
    modifier.hooks.pre_object_placement = Some(Box::new(|grid, _rng, pools| {
        // The vertical rotation of the vein shape
        let Some(column) = pools
            .bedrock
            .iter()
            .find(|shape| shape.name == "Bedrock Vein" && shape.height() > shape.width())
        else {
            debug!("sealed_chamber: no vertical vein in the bedrock pool");
            return;
        };
        let x = grid.width / 2;
        for anchor in [(x, 1), (x, grid.height.saturating_sub(5))] {
            if placement::can_place(grid, column, anchor) {
                placement::place(grid, column, anchor);
            }
        }
    }));
    modifier
}

/// Replaces item placement with a fill-until-no-room pass over the pool.
pub fn hoarders_haul(ledger: &ItemLedger) -> Modifier {
    let cores = ledger.count("Star Core") as u32;
    let mut modifier = Modifier::named("hoarders_haul");
    modifier.cost = vec![("Star Core".to_string(), 1)];
    modifier.availability = Availability::Expanded;
    modifier.repeatable = false;
    modifier.weight_fn = Some(Box::new(move |_| 6 + (cores / 2).min(8)));
    modifier.hooks.place_objects = Some(Box::new(|grid, rng, pools| {
        let mut misses = 0u32;
        while misses < FLOOD_MISS_LIMIT {
            let Some(object) = placement::choose_item_with(grid, rng, pools, |_, rate| rate)
            else {
                break;
            };
            if placement::place_at_random_valid_position(grid, rng, &object).is_some() {
                misses = 0;
            } else {
                misses += 1;
            }
        }
    }));
    modifier
}

/// Replaces bedrock placement with a saturation loop: keep making passes
/// over every shape until a full pass places nothing.
pub fn bedrock_storm() -> Modifier {
    let mut modifier = Modifier::named("bedrock_storm");
    modifier.cost = vec![("Iron Lump".to_string(), 4)];
    modifier.availability = Availability::Expanded;
    modifier.base_weight = 6;
    modifier.appearance_condition = Some(Box::new(|progress| progress.badge_count >= 4));
    modifier.hooks.place_bedrock = Some(Box::new(|grid, rng, pools| {
        loop {
            let mut placed_any = false;
            for shape in pools.bedrock {
                if placement::place_at_random_valid_position(grid, rng, shape).is_some() {
                    placed_any = true;
                }
            }
            if !placed_any {
                break;
            }
        }
    }));
    modifier
}

/// Gamble payout: a failed round forfeits everything found.
pub fn all_or_nothing(ledger: &ItemLedger) -> Modifier {
    let void_plates = ledger.count("Void Plate") as u32;
    let mut modifier = Modifier::named("all_or_nothing");
    modifier.cost = vec![("Shadow Plate".to_string(), 1)];
    modifier.availability = Availability::Expanded;
    modifier.repeatable = false;
    modifier.guaranteed_chance = 0.25;
    modifier.appearance_condition = Some(Box::new(|progress| progress.badge_count >= 8));
    modifier.weight_fn = Some(Box::new(move |_| 4 + void_plates.min(10)));
    modifier.hooks.on_game_over = Some(Box::new(|state| {
        if state.failed {
            Payout {
                grant_items: false,
                messages: vec!["The wager is lost. The digsite keeps its relics.".to_string()],
            }
        } else {
            Payout {
                grant_items: true,
                messages: vec!["The wager pays out.".to_string()],
            }
        }
    }));
    modifier
}

/// The full offer catalog, built from the current ledger state.
pub fn modifier_catalog(ledger: &ItemLedger) -> Vec<Modifier> {
    vec![
        strong_hammers(),
        feather_grip(),
        rich_vein(),
        deep_sediment(),
        loose_topsoil(),
        glass_quarry(),
        sealed_chamber(),
        hoarders_haul(ledger),
        bedrock_storm(),
        all_or_nothing(ledger),
    ]
}
