//! Grid object catalog.
//!
//! Static definitions of every placeable shape: collectible relics and the
//! bedrock blockers. Each entry carries a row-major collision mask, a
//! per-context rarity and a collection tag used by the outer game's
//! collection UI. Rotated duplicates are separate entries sharing a name,
//! with the base rarity pre-divided across the instances.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rarity-weighting bucket: game edition crossed with progression stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootContext {
    DawnStandard,
    DawnExpanded,
    DuskStandard,
    DuskExpanded,
}

/// Game edition half of the loot context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEdition {
    Dawn,
    Dusk,
}

impl LootContext {
    /// Combine an edition with the expanded-pool progression flag.
    pub fn from_parts(edition: GameEdition, expanded: bool) -> Self {
        match (edition, expanded) {
            (GameEdition::Dawn, false) => Self::DawnStandard,
            (GameEdition::Dawn, true) => Self::DawnExpanded,
            (GameEdition::Dusk, false) => Self::DuskStandard,
            (GameEdition::Dusk, true) => Self::DuskExpanded,
        }
    }
}

/// Placement weights per loot context. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rarity {
    pub dawn_standard: u32,
    pub dawn_expanded: u32,
    pub dusk_standard: u32,
    pub dusk_expanded: u32,
}

impl Rarity {
    pub const fn new(
        dawn_standard: u32,
        dawn_expanded: u32,
        dusk_standard: u32,
        dusk_expanded: u32,
    ) -> Self {
        Self {
            dawn_standard,
            dawn_expanded,
            dusk_standard,
            dusk_expanded,
        }
    }

    /// Same weight in every context.
    pub const fn uniform(weight: u32) -> Self {
        Self::new(weight, weight, weight, weight)
    }

    /// Weight for a context.
    pub fn rate(&self, context: LootContext) -> u32 {
        match context {
            LootContext::DawnStandard => self.dawn_standard,
            LootContext::DawnExpanded => self.dawn_expanded,
            LootContext::DuskStandard => self.dusk_standard,
            LootContext::DuskExpanded => self.dusk_expanded,
        }
    }

    /// Sum over all contexts. Debugging aid only.
    pub fn total(&self) -> u32 {
        self.dawn_standard + self.dawn_expanded + self.dusk_standard + self.dusk_expanded
    }

    /// Divide every weight by the number of catalog instances sharing it.
    /// Used for rotated duplicates so the shape family keeps its overall rate.
    pub const fn split(self, instances: u32) -> Self {
        Self::new(
            self.dawn_standard / instances,
            self.dawn_expanded / instances,
            self.dusk_standard / instances,
            self.dusk_expanded / instances,
        )
    }
}

/// What a cell holds once something is placed over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OccupantKind {
    #[default]
    Nothing,
    Item,
    Bedrock,
}

/// Collection partition. The UI groups finds by these, and plates get
/// special placement rules (no duplicates within a round, no rerolling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    SmallSpheres,
    LargeSpheres,
    Fossils,
    EvolutionStones,
    Shards,
    WeatherStones,
    Tools,
    Plates,
    Bedrock,
}

/// A placeable shape: collision mask plus classification and rarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridObject {
    /// Stable key for counters and modifier costs
    pub name: String,
    pub kind: OccupantKind,
    pub collection: Collection,
    pub rarity: Rarity,
    /// Row-major, top-to-bottom; `true` cells are solid
    pub mask: Vec<Vec<bool>>,
}

impl GridObject {
    pub fn new(
        name: &str,
        collection: Collection,
        kind: OccupantKind,
        rarity: Rarity,
        mask: Vec<Vec<bool>>,
    ) -> Self {
        debug_assert!(!mask.is_empty() && !mask[0].is_empty(), "empty mask: {name}");
        debug_assert!(
            mask.iter().all(|row| row.len() == mask[0].len()),
            "ragged mask: {name}"
        );
        Self {
            name: name.to_string(),
            kind,
            collection,
            rarity,
            mask,
        }
    }

    pub fn width(&self) -> usize {
        self.mask.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.mask.len()
    }

    /// Number of solid cells in the mask.
    pub fn solid_cells(&self) -> usize {
        self.mask.iter().flatten().filter(|solid| **solid).count()
    }

    pub fn is_plate(&self) -> bool {
        self.collection == Collection::Plates
    }

    /// Same entry with the mask rotated 90 degrees clockwise. Rotations share
    /// the name; callers are expected to pre-split the rarity across instances.
    pub fn rotated(&self) -> Self {
        let h = self.height();
        let w = self.width();
        let mut mask = vec![vec![false; h]; w];
        for (row, cells) in self.mask.iter().enumerate() {
            for (col, solid) in cells.iter().enumerate() {
                mask[col][h - 1 - row] = *solid;
            }
        }
        Self {
            mask,
            ..self.clone()
        }
    }
}

/// Catalog lookups that fail indicate a corrupted table or caller misuse,
/// never a user-triggerable state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown catalog object: {0}")]
    UnknownObject(String),
}

/// Parse mask art: `#` is solid, anything else is empty.
fn mask_of(rows: &[&str]) -> Vec<Vec<bool>> {
    rows.iter()
        .map(|row| row.chars().map(|c| c == '#').collect())
        .collect()
}

// =====================================================
// Partition tables
// =====================================================

pub fn small_spheres() -> Vec<GridObject> {
    let mask = mask_of(&["##", "##"]);
    [
        ("Small Ember Sphere", Rarity::new(180, 120, 160, 110)),
        ("Small Tide Sphere", Rarity::new(160, 110, 180, 120)),
        ("Small Gale Sphere", Rarity::new(150, 100, 150, 100)),
    ]
    .into_iter()
    .map(|(name, rarity)| {
        GridObject::new(
            name,
            Collection::SmallSpheres,
            OccupantKind::Item,
            rarity,
            mask.clone(),
        )
    })
    .collect()
}

pub fn large_spheres() -> Vec<GridObject> {
    let mask = mask_of(&[".#.", "###", ".#."]);
    [
        ("Large Ember Sphere", Rarity::new(60, 80, 50, 70)),
        ("Large Tide Sphere", Rarity::new(50, 70, 60, 80)),
        ("Large Gale Sphere", Rarity::new(45, 65, 45, 65)),
    ]
    .into_iter()
    .map(|(name, rarity)| {
        GridObject::new(
            name,
            Collection::LargeSpheres,
            OccupantKind::Item,
            rarity,
            mask.clone(),
        )
    })
    .collect()
}

pub fn fossils() -> Vec<GridObject> {
    let talon = GridObject::new(
        "Talon Fossil",
        Collection::Fossils,
        OccupantKind::Item,
        // Two rotations in the table; base rate 30 split across them
        Rarity::new(30, 24, 30, 24).split(2),
        mask_of(&["#..", "##.", ".##", ".##"]),
    );
    let talon_rotated = talon.rotated();
    vec![
        GridObject::new(
            "Spiral Fossil",
            Collection::Fossils,
            OccupantKind::Item,
            Rarity::new(40, 30, 0, 0),
            mask_of(&[".##.", "####", "####", ".##."]),
        ),
        GridObject::new(
            "Crown Fossil",
            Collection::Fossils,
            OccupantKind::Item,
            Rarity::new(0, 0, 40, 30),
            mask_of(&["#.#.#", "#####", "#####", ".###."]),
        ),
        GridObject::new(
            "Fern Fossil",
            Collection::Fossils,
            OccupantKind::Item,
            Rarity::new(0, 25, 0, 25),
            mask_of(&["..#..", ".###.", "#####", ".###.", "..#.."]),
        ),
        talon,
        talon_rotated,
    ]
}

pub fn evolution_stones() -> Vec<GridObject> {
    let block = mask_of(&["###", "###", "###"]);
    vec![
        GridObject::new(
            "Flame Stone",
            Collection::EvolutionStones,
            OccupantKind::Item,
            Rarity::new(30, 25, 20, 18),
            block.clone(),
        ),
        GridObject::new(
            "Tide Stone",
            Collection::EvolutionStones,
            OccupantKind::Item,
            Rarity::new(20, 18, 30, 25),
            block.clone(),
        ),
        GridObject::new(
            "Moss Stone",
            Collection::EvolutionStones,
            OccupantKind::Item,
            Rarity::new(25, 22, 25, 22),
            block,
        ),
        GridObject::new(
            "Spark Stone",
            Collection::EvolutionStones,
            OccupantKind::Item,
            Rarity::new(22, 20, 22, 20),
            mask_of(&["###", "###"]),
        ),
        GridObject::new(
            "Lunar Stone",
            Collection::EvolutionStones,
            OccupantKind::Item,
            Rarity::new(0, 16, 0, 16),
            mask_of(&[".##", "###", "##."]),
        ),
    ]
}

pub fn shards() -> Vec<GridObject> {
    [
        ("Crimson Shard", mask_of(&["###", "#..", "##."])),
        ("Azure Shard", mask_of(&["###", "..#", ".##"])),
        ("Jade Shard", mask_of(&["##.", "###", "#.."])),
        ("Amber Shard", mask_of(&[".##", "###", "..#"])),
    ]
    .into_iter()
    .map(|(name, mask)| {
        GridObject::new(
            name,
            Collection::Shards,
            OccupantKind::Item,
            Rarity::new(0, 35, 0, 35),
            mask,
        )
    })
    .collect()
}

pub fn weather_stones() -> Vec<GridObject> {
    [
        ("Heat Orb", mask_of(&["###", "##."])),
        ("Frost Orb", mask_of(&["###", ".##"])),
        ("Storm Orb", mask_of(&[".#.", "###"])),
    ]
    .into_iter()
    .map(|(name, mask)| {
        GridObject::new(
            name,
            Collection::WeatherStones,
            OccupantKind::Item,
            Rarity::new(20, 20, 20, 20),
            mask,
        )
    })
    .collect()
}

pub fn tools() -> Vec<GridObject> {
    vec![
        GridObject::new(
            "Iron Lump",
            Collection::Tools,
            OccupantKind::Item,
            Rarity::new(100, 60, 100, 60),
            mask_of(&["####", "####"]),
        ),
        GridObject::new(
            "Hard Stone",
            Collection::Tools,
            OccupantKind::Item,
            Rarity::new(90, 60, 90, 60),
            mask_of(&["##", "##"]),
        ),
        GridObject::new(
            "Luminous Pearl",
            Collection::Tools,
            OccupantKind::Item,
            Rarity::new(50, 50, 50, 50),
            mask_of(&["##", "##"]),
        ),
        GridObject::new(
            "Star Core",
            Collection::Tools,
            OccupantKind::Item,
            Rarity::new(10, 15, 10, 15),
            mask_of(&[".#.", "###", ".#."]),
        ),
    ]
}

pub fn plates() -> Vec<GridObject> {
    let slab = mask_of(&["####", "####", "####"]);
    [
        "Ember Plate",
        "Tide Plate",
        "Stone Plate",
        "Gale Plate",
        "Void Plate",
        "Shadow Plate",
    ]
    .into_iter()
    .map(|name| {
        GridObject::new(
            name,
            Collection::Plates,
            OccupantKind::Item,
            Rarity::new(5, 12, 5, 12),
            slab.clone(),
        )
    })
    .collect()
}

pub fn bedrock_shapes() -> Vec<GridObject> {
    let vein = GridObject::new(
        "Bedrock Vein",
        Collection::Bedrock,
        OccupantKind::Bedrock,
        Rarity::uniform(1),
        mask_of(&["####"]),
    );
    let vein_rotated = vein.rotated();
    vec![
        GridObject::new(
            "Bedrock Knot",
            Collection::Bedrock,
            OccupantKind::Bedrock,
            Rarity::uniform(1),
            mask_of(&["##", "##"]),
        ),
        vein,
        vein_rotated,
        GridObject::new(
            "Bedrock Spur",
            Collection::Bedrock,
            OccupantKind::Bedrock,
            Rarity::uniform(1),
            mask_of(&["#..", "#..", "###"]),
        ),
        GridObject::new(
            "Bedrock Mass",
            Collection::Bedrock,
            OccupantKind::Bedrock,
            Rarity::uniform(1),
            mask_of(&[".#.", "###", ".#."]),
        ),
        GridObject::new(
            "Bedrock Ridge",
            Collection::Bedrock,
            OccupantKind::Bedrock,
            Rarity::uniform(1),
            mask_of(&["#####", "###.."]),
        ),
    ]
}

// =====================================================
// Assembled catalogs
// =====================================================

/// Every collectible entry, rotations included. This is the placement pool;
/// do not dedup it, rotated instances carry pre-split rarity.
pub fn item_catalog() -> Vec<GridObject> {
    let mut items = Vec::new();
    items.extend(small_spheres());
    items.extend(large_spheres());
    items.extend(fossils());
    items.extend(evolution_stones());
    items.extend(shards());
    items.extend(weather_stones());
    items.extend(tools());
    items.extend(plates());
    items
}

/// Every bedrock blocker shape.
pub fn bedrock_catalog() -> Vec<GridObject> {
    bedrock_shapes()
}

/// The collection-grouped view the UI renders. Groups overlap the flat
/// catalog, so consumers dedup by name before counting.
pub fn ui_collections() -> Vec<(Collection, Vec<GridObject>)> {
    vec![
        (Collection::SmallSpheres, small_spheres()),
        (Collection::LargeSpheres, large_spheres()),
        (Collection::Fossils, fossils()),
        (Collection::EvolutionStones, evolution_stones()),
        (Collection::Shards, shards()),
        (Collection::WeatherStones, weather_stones()),
        (Collection::Tools, tools()),
        (Collection::Plates, plates()),
    ]
}

/// One entry per distinct collectible name, for counter displays.
pub fn collectible_names() -> Vec<String> {
    dedup_by_name(item_catalog())
        .into_iter()
        .map(|object| object.name)
        .collect()
}

/// Find a catalog entry by name, searching items then bedrock. Failure is a
/// programmer error (corrupted table or misspelled key), not a game state.
pub fn lookup(name: &str) -> Result<GridObject, CatalogError> {
    item_catalog()
        .into_iter()
        .chain(bedrock_catalog())
        .find(|object| object.name == name)
        .ok_or_else(|| CatalogError::UnknownObject(name.to_string()))
}

/// Keep the first entry for each name, dropping later duplicates. Used when
/// overlapping sub-lists are concatenated for the collection UI.
pub fn dedup_by_name(objects: Vec<GridObject>) -> Vec<GridObject> {
    let mut seen = std::collections::HashSet::new();
    objects
        .into_iter()
        .filter(|object| seen.insert(object.name.clone()))
        .collect()
}
