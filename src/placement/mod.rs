//! Placement engine: mask geometry, collision checks and board population.
//!
//! Placement works on anchors: the top-left grid coordinate a mask is
//! applied at. A shape occupies exactly the solid cells of its mask. A grid
//! too full to fit a shape is an expected outcome, not an error; the shape
//! is silently dropped and the round proceeds with fewer objects.

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use crate::catalog::{GridObject, LootContext, OccupantKind};
use crate::constants::{
    BEDROCK_COUNT_BASE, BEDROCK_COUNT_SPREAD, ITEM_COUNT_MAX, ITEM_COUNT_MIN, PLATE_REROLL_LIMIT,
};
use crate::mining::{ActiveObject, MineGrid};
use crate::modifiers::Modifier;
use crate::weighted::{uniform_select, weighted_select};

/// The candidate pools one population pass draws from.
pub struct PlacementPools<'a> {
    pub items: &'a [GridObject],
    pub bedrock: &'a [GridObject],
    pub context: LootContext,
}

/// Absolute coordinates the object's solid mask cells cover from an anchor.
pub fn positions_for(object: &GridObject, anchor: (usize, usize)) -> Vec<(usize, usize)> {
    let (ax, ay) = anchor;
    let mut positions = Vec::with_capacity(object.solid_cells());
    for (row, cells) in object.mask.iter().enumerate() {
        for (col, solid) in cells.iter().enumerate() {
            if *solid {
                positions.push((ax + col, ay + row));
            }
        }
    }
    positions
}

/// True iff every occupied coordinate is in bounds and currently empty.
pub fn can_place(grid: &MineGrid, object: &GridObject, anchor: (usize, usize)) -> bool {
    positions_for(object, anchor).into_iter().all(|(x, y)| {
        x < grid.width && y < grid.height && grid.cell(x, y).occupant == OccupantKind::Nothing
    })
}

/// Every anchor on the grid at which the object currently fits.
pub fn all_valid_anchors(grid: &MineGrid, object: &GridObject) -> Vec<(usize, usize)> {
    let mut anchors = Vec::new();
    for y in 0..grid.height {
        for x in 0..grid.width {
            if can_place(grid, object, (x, y)) {
                anchors.push((x, y));
            }
        }
    }
    anchors
}

/// Write the object onto the grid at an anchor already validated by
/// `can_place`. Invalid anchors are caller bugs, not recoverable states.
pub fn place(grid: &mut MineGrid, object: &GridObject, anchor: (usize, usize)) {
    debug_assert!(
        can_place(grid, object, anchor),
        "place() called on invalid anchor {anchor:?} for {}",
        object.name
    );
    let placement = if object.kind == OccupantKind::Item {
        Some(grid.active_objects.len())
    } else {
        None
    };
    let (ax, ay) = anchor;
    for (row, cells) in object.mask.iter().enumerate() {
        for (col, solid) in cells.iter().enumerate() {
            if *solid {
                let cell = grid.cell_mut(ax + col, ay + row);
                cell.occupant = object.kind;
                cell.placement = placement;
                // Sub-tile the renderer shows for this cell of the sprite
                cell.sprite_offset = Some((col as u8, row as u8));
            }
        }
    }
    if object.kind == OccupantKind::Item {
        grid.active_objects.push(ActiveObject {
            object: object.clone(),
            anchor,
            found: false,
        });
    }
}

/// Place at a uniformly chosen valid anchor. `None` means the grid has no
/// room for this shape; callers drop the shape and move on.
pub fn place_at_random_valid_position(
    grid: &mut MineGrid,
    rng: &mut impl Rng,
    object: &GridObject,
) -> Option<(usize, usize)> {
    let anchors = all_valid_anchors(grid, object);
    let anchor = *uniform_select(rng, &anchors)?;
    place(grid, object, anchor);
    Some(anchor)
}

/// Draw one item from the weighted pool, honoring the plate rule: a plate
/// whose name is already placed this round is rerolled, up to a bound, after
/// which placed plates are filtered out of the pool and the draw retried
/// once. Returns `None` only for an empty or fully excluded pool.
pub fn choose_item_with(
    grid: &MineGrid,
    rng: &mut impl Rng,
    pools: &PlacementPools<'_>,
    rate: impl Fn(&GridObject, u32) -> u32,
) -> Option<GridObject> {
    let weight =
        |object: &GridObject, context: &LootContext| rate(object, object.rarity.rate(*context));

    for _ in 0..PLATE_REROLL_LIMIT {
        let candidate = weighted_select(rng, pools.items, &pools.context, &weight)?;
        if candidate.is_plate() && grid.has_active_object(&candidate.name) {
            continue;
        }
        return Some(candidate.clone());
    }

    // Reroll budget spent (a heavy-plate pool, or a pathological rate
    // modifier). Exclude the placed plates outright and draw once.
    let filtered: Vec<GridObject> = pools
        .items
        .iter()
        .filter(|object| !(object.is_plate() && grid.has_active_object(&object.name)))
        .cloned()
        .collect();
    weighted_select(rng, &filtered, &pools.context, &weight).cloned()
}

fn place_items_default(
    grid: &mut MineGrid,
    rng: &mut Xoshiro256PlusPlus,
    pools: &PlacementPools<'_>,
    modifier: &Modifier,
) {
    let base = rng.gen_range(ITEM_COUNT_MIN..=ITEM_COUNT_MAX);
    let count = modifier.modify_item_amount(base);
    for _ in 0..count {
        let Some(object) = choose_item_with(grid, rng, pools, |o, r| modifier.modify_rate(o, r))
        else {
            continue;
        };
        if place_at_random_valid_position(grid, rng, &object).is_none() {
            debug!(name = %object.name, "no valid anchor for item, dropped from round");
        }
    }
}

fn place_bedrock_default(
    grid: &mut MineGrid,
    rng: &mut Xoshiro256PlusPlus,
    pools: &PlacementPools<'_>,
) {
    // floor(sqrt(uniform(0, 8))) + 4 shapes: usually 4-5, occasionally 6
    let spread = rng.gen_range(0.0..BEDROCK_COUNT_SPREAD).sqrt().floor() as u32;
    let count = BEDROCK_COUNT_BASE + spread;
    for _ in 0..count {
        let Some(shape) = uniform_select(rng, pools.bedrock).cloned() else {
            return;
        };
        if place_at_random_valid_position(grid, rng, &shape).is_none() {
            debug!(name = %shape.name, "no valid anchor for bedrock, dropped");
        }
    }
}

/// Seed the board for a round: the modifier's pre-placement hook, then item
/// placement, then bedrock. Either placement phase may be wholly replaced
/// by the modifier.
pub fn populate_board(
    grid: &mut MineGrid,
    rng: &mut Xoshiro256PlusPlus,
    pools: &PlacementPools<'_>,
    modifier: &Modifier,
) {
    modifier.run_pre_object_placement(grid, rng, pools);
    if !modifier.replace_item_placement(grid, rng, pools) {
        place_items_default(grid, rng, pools, modifier);
    }
    if !modifier.replace_bedrock_placement(grid, rng, pools) {
        place_bedrock_default(grid, rng, pools);
    }
    debug!(
        items = grid.active_objects.len(),
        "board populated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, Collection, Rarity};
    use rand::SeedableRng;

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    fn square(name: &str, side: usize) -> GridObject {
        GridObject::new(
            name,
            Collection::Tools,
            OccupantKind::Item,
            Rarity::uniform(10),
            vec![vec![true; side]; side],
        )
    }

    fn plate(name: &str) -> GridObject {
        GridObject::new(
            name,
            Collection::Plates,
            OccupantKind::Item,
            Rarity::uniform(10),
            vec![vec![true; 2]; 2],
        )
    }

    #[test]
    fn test_positions_match_solid_mask_cells() {
        let object = GridObject::new(
            "corner",
            Collection::Tools,
            OccupantKind::Item,
            Rarity::uniform(1),
            vec![vec![true, false], vec![true, true]],
        );
        let positions = positions_for(&object, (3, 5));
        assert_eq!(positions.len(), object.solid_cells());
        assert_eq!(positions, vec![(3, 5), (3, 6), (4, 6)]);
    }

    #[test]
    fn test_can_place_rejects_out_of_bounds() {
        let grid = MineGrid::new(3, 3);
        let object = square("big", 2);
        assert!(can_place(&grid, &object, (0, 0)));
        assert!(can_place(&grid, &object, (1, 1)));
        assert!(!can_place(&grid, &object, (2, 2)), "extends past the edge");
        assert!(!can_place(&grid, &object, (3, 0)), "anchor outside grid");
    }

    #[test]
    fn test_place_marks_cells_and_blocks_overlap() {
        let mut grid = MineGrid::new(3, 3);
        let first = square("first", 2);
        place(&mut grid, &first, (0, 0));

        for (x, y) in positions_for(&first, (0, 0)) {
            assert_eq!(grid.cell(x, y).occupant, OccupantKind::Item);
            assert_eq!(grid.cell(x, y).placement, Some(0));
        }
        assert_eq!(grid.cell(0, 0).sprite_offset, Some((0, 0)));
        assert_eq!(grid.cell(1, 1).sprite_offset, Some((1, 1)));

        // Overlapping anchor collides at (1, 1)
        let second = square("second", 2);
        assert!(!can_place(&grid, &second, (1, 1)));
    }

    #[test]
    fn test_bedrock_produces_no_active_object() {
        let mut grid = MineGrid::new(4, 4);
        let shape = catalog::bedrock_shapes()
            .into_iter()
            .find(|s| s.name == "Bedrock Knot")
            .unwrap();
        place(&mut grid, &shape, (0, 0));
        assert!(grid.active_objects.is_empty());
        assert_eq!(grid.cell(0, 0).occupant, OccupantKind::Bedrock);
        assert_eq!(grid.cell(0, 0).placement, None);
    }

    #[test]
    fn test_all_valid_anchors_counts() {
        let grid = MineGrid::new(3, 3);
        let object = square("blk", 2);
        // A 2x2 in an empty 3x3 fits at the four top-left anchors
        assert_eq!(all_valid_anchors(&grid, &object).len(), 4);

        let exact = square("fill", 3);
        assert_eq!(all_valid_anchors(&grid, &exact), vec![(0, 0)]);
    }

    #[test]
    fn test_random_placement_returns_none_when_full() {
        let mut grid = MineGrid::new(2, 2);
        let object = square("fill", 2);
        assert!(place_at_random_valid_position(&mut grid, &mut rng(1), &object).is_some());
        assert!(
            place_at_random_valid_position(&mut grid, &mut rng(2), &object).is_none(),
            "full grid must report no placement, not panic"
        );
    }

    #[test]
    fn test_choose_item_rerolls_placed_plates() {
        let mut grid = MineGrid::new(10, 10);
        let ember = plate("Ember Plate");
        let tide = plate("Tide Plate");
        place(&mut grid, &ember, (0, 0));

        let pool = vec![ember.clone(), tide.clone()];
        let pools = PlacementPools {
            items: &pool,
            bedrock: &[],
            context: LootContext::DawnStandard,
        };
        for seed in 0..100 {
            let picked = choose_item_with(&grid, &mut rng(seed), &pools, |_, r| r).unwrap();
            assert_eq!(picked.name, "Tide Plate", "placed plate must never be drawn again");
        }
    }

    #[test]
    fn test_choose_item_bounded_when_only_placed_plate_has_weight() {
        let mut grid = MineGrid::new(10, 10);
        let ember = plate("Ember Plate");
        place(&mut grid, &ember, (0, 0));

        let pool = vec![ember.clone()];
        let pools = PlacementPools {
            items: &pool,
            bedrock: &[],
            context: LootContext::DawnStandard,
        };
        // The pathological pool: all weight on an already placed plate. The
        // bounded reroll must terminate with an empty draw.
        let picked = choose_item_with(&grid, &mut rng(3), &pools, |_, r| r);
        assert!(picked.is_none());
    }

    #[test]
    fn test_duplicate_non_plates_allowed() {
        let mut grid = MineGrid::new(10, 10);
        let lump = square("Iron Lump", 2);
        place(&mut grid, &lump, (0, 0));

        let pool = vec![lump.clone()];
        let pools = PlacementPools {
            items: &pool,
            bedrock: &[],
            context: LootContext::DawnStandard,
        };
        let picked = choose_item_with(&grid, &mut rng(4), &pools, |_, r| r).unwrap();
        assert_eq!(picked.name, "Iron Lump");
    }

    #[test]
    fn test_populate_board_item_count_in_range() {
        let items = catalog::item_catalog();
        let bedrock = catalog::bedrock_catalog();
        let modifier = Modifier::identity();
        for seed in 0..30 {
            let mut grid = MineGrid::new(25, 12);
            let pools = PlacementPools {
                items: &items,
                bedrock: &bedrock,
                context: LootContext::DawnStandard,
            };
            populate_board(&mut grid, &mut rng(seed), &pools, &modifier);
            let count = grid.active_objects.len();
            assert!(
                (1..=4).contains(&count),
                "seed {seed}: {count} items placed (2-4 drawn, drops allowed)"
            );
        }
    }

    #[test]
    fn test_populate_board_never_duplicates_plates() {
        let items = catalog::item_catalog();
        let bedrock = catalog::bedrock_catalog();
        let mut plate_heavy = Modifier::identity();
        // Skew every draw toward plates to stress the duplicate rule
        plate_heavy.hooks.modify_rate = Some(Box::new(|object, rate| {
            if object.is_plate() {
                rate.saturating_mul(100)
            } else {
                rate / 10
            }
        }));
        plate_heavy.hooks.modify_item_amount = Some(Box::new(|count| count + 6));

        for seed in 0..40 {
            let mut grid = MineGrid::new(25, 12);
            let pools = PlacementPools {
                items: &items,
                bedrock: &bedrock,
                context: LootContext::DawnExpanded,
            };
            populate_board(&mut grid, &mut rng(seed), &pools, &plate_heavy);
            let mut plate_names: Vec<_> = grid
                .active_objects
                .iter()
                .filter(|active| active.object.is_plate())
                .map(|active| active.object.name.clone())
                .collect();
            let before = plate_names.len();
            plate_names.sort();
            plate_names.dedup();
            assert_eq!(plate_names.len(), before, "seed {seed}: duplicate plate placed");
        }
    }

    #[test]
    fn test_populate_tiny_grid_drops_silently() {
        let items = catalog::item_catalog();
        let bedrock = catalog::bedrock_catalog();
        let modifier = Modifier::identity();
        let mut grid = MineGrid::new(1, 1);
        let pools = PlacementPools {
            items: &items,
            bedrock: &bedrock,
            context: LootContext::DawnStandard,
        };
        // Nothing in the catalog fits a single cell; population must finish
        // cleanly with an empty board.
        populate_board(&mut grid, &mut rng(9), &pools, &modifier);
        assert!(grid.active_objects.is_empty());
    }
}
