//! The mining grid and round state machine.
//!
//! A round owns the grid, the placed objects, the health pool and the
//! active modifier. Strikes run to completion synchronously: center damage,
//! area propagation, uncover rescan, then the health check. Object
//! completion is checked before health, so a strike that both finishes the
//! collection and drains the last health ends the round as a win.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, GridObject, LootContext, OccupantKind};
use crate::collection::{ItemLedger, MineSettings, PlayerProgress};
use crate::constants::{CENTER_STRIKE_DEPTH, GRID_HEIGHT, GRID_WIDTH, MAX_HEALTH};
use crate::events::{
    CellExcavatedEvent, HealthChangedEvent, ItemFoundEvent, RoundOverEvent, StrikeEvent,
};
use crate::hammer::Hammer;
use crate::modifiers::{Modifier, Payout};
use crate::placement::{self, PlacementPools};
use crate::terrain;

pub struct MiningPlugin;

impl Plugin for MiningPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ItemLedger::default())
            .insert_resource(MineSettings::default())
            .insert_resource(PlayerProgress::default())
            .insert_resource(MiningSession::new(
                rand::random(),
                LootContext::DawnStandard,
            ))
            .add_event::<StrikeEvent>()
            .add_event::<HealthChangedEvent>()
            .add_event::<CellExcavatedEvent>()
            .add_event::<ItemFoundEvent>()
            .add_event::<RoundOverEvent>()
            .add_systems(Update, (process_strikes, apply_round_payouts).chain());
    }
}

/// One grid position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Remaining undug thickness; 0 means excavated
    pub depth: u32,
    pub occupant: OccupantKind,
    /// Index into the round's active objects, for item cells
    pub placement: Option<usize>,
    /// Which sub-tile of the placed sprite this cell shows
    pub sprite_offset: Option<(u8, u8)>,
}

/// A placed collectible tracked for the win condition. Bedrock placements
/// never produce one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveObject {
    pub object: GridObject,
    pub anchor: (usize, usize),
    pub found: bool,
}

/// The board: cells in row-major order plus the round's placed objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineGrid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
    pub active_objects: Vec<ActiveObject>,
}

impl MineGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            active_objects: Vec::new(),
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of bounds");
        y * self.width + x
    }

    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let index = self.index(x, y);
        &mut self.cells[index]
    }

    /// Whether an object of this name is already placed this round.
    pub fn has_active_object(&self, name: &str) -> bool {
        self.active_objects
            .iter()
            .any(|active| active.object.name == name)
    }

    /// True when at least one object is placed and all are uncovered.
    pub fn all_objects_found(&self) -> bool {
        !self.active_objects.is_empty() && self.active_objects.iter().all(|active| active.found)
    }
}

/// Per-round terminal state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub health: u32,
    pub is_over: bool,
    pub failed: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            health: MAX_HEALTH,
            is_over: false,
            failed: false,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters the UI shows at round end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    pub strikes: u32,
    pub cells_excavated: u32,
    pub items_found: u32,
    pub health_spent: u32,
}

/// Per-object outcome included in the round report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectOutcome {
    pub name: String,
    pub found: bool,
}

/// Everything the round-end callback receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// The terminal game state
    pub state: GameState,
    pub objects: Vec<ObjectOutcome>,
    pub payout: Payout,
    pub stats: RoundStats,
}

impl RoundReport {
    pub fn found_names(&self) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|outcome| outcome.found)
            .map(|outcome| outcome.name.as_str())
            .collect()
    }
}

/// What one strike did, for the reporting systems.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrikeOutcome {
    /// Strike arrived outside an active round or off the grid
    pub ignored: bool,
    /// Cells whose depth reached zero this strike
    pub excavated: Vec<(usize, usize)>,
    /// Objects newly uncovered this strike
    pub found: Vec<String>,
    pub health_after: u32,
    /// Present exactly when this strike ended the round
    pub report: Option<RoundReport>,
}

impl StrikeOutcome {
    fn ignored() -> Self {
        Self {
            ignored: true,
            ..Self::default()
        }
    }
}

/// The round owner: grid, state, hammer, modifier and RNG streams. Replaced
/// wholesale on reset; nothing mutates it but the strike path.
#[derive(Resource)]
pub struct MiningSession {
    pub grid: MineGrid,
    pub state: GameState,
    pub hammer: Hammer,
    pub modifier: Modifier,
    pub stats: RoundStats,
    pub loot_context: LootContext,
    item_pool: Vec<GridObject>,
    bedrock_pool: Vec<GridObject>,
    round_seed: u64,
    rng: Xoshiro256PlusPlus,
}

impl MiningSession {
    pub fn new(seed: u64, loot_context: LootContext) -> Self {
        let mut session = Self {
            grid: MineGrid::new(GRID_WIDTH, GRID_HEIGHT),
            state: GameState::new(),
            hammer: Hammer::light(),
            modifier: Modifier::identity(),
            stats: RoundStats::default(),
            loot_context,
            item_pool: catalog::item_catalog(),
            bedrock_pool: catalog::bedrock_catalog(),
            round_seed: seed,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        };
        session.reset_with_seed(seed);
        session
    }

    pub fn round_seed(&self) -> u64 {
        self.round_seed
    }

    /// Swap the hammer the next strikes use.
    pub fn set_hammer(&mut self, hammer: Hammer) {
        self.hammer = hammer;
    }

    /// Install the modifier for upcoming rounds. Takes full effect at the
    /// next reset; hammer and payout hooks also apply mid-round.
    pub fn set_modifier(&mut self, modifier: Modifier) {
        self.modifier = modifier;
    }

    pub fn set_loot_context(&mut self, loot_context: LootContext) {
        self.loot_context = loot_context;
    }

    /// Start a fresh round on a newly drawn seed.
    pub fn reset(&mut self) {
        let seed = self.rng.gen();
        self.reset_with_seed(seed);
    }

    /// Start a fresh round on a fixed seed: regenerate terrain, repopulate
    /// the board, restore health.
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.round_seed = seed;
        self.grid = MineGrid::new(GRID_WIDTH, GRID_HEIGHT);
        terrain::generate(
            &mut self.grid,
            terrain::stream_seed(seed, "terrain"),
            &self.modifier,
        );

        let mut placement_rng =
            Xoshiro256PlusPlus::seed_from_u64(terrain::stream_seed(seed, "placement"));
        let pools = PlacementPools {
            items: &self.item_pool,
            bedrock: &self.bedrock_pool,
            context: self.loot_context,
        };
        placement::populate_board(&mut self.grid, &mut placement_rng, &pools, &self.modifier);

        self.state = GameState::new();
        self.stats = RoundStats::default();
        info!(
            seed,
            items = self.grid.active_objects.len(),
            modifier = %self.modifier.name,
            "round started"
        );
    }

    /// Process one strike to completion. Ignored outside an active round.
    pub fn strike(&mut self, x: usize, y: usize) -> StrikeOutcome {
        if self.state.is_over || x >= self.grid.width || y >= self.grid.height {
            return StrikeOutcome::ignored();
        }

        let hammer = self.modifier.effective_hammer(&self.hammer);
        let mut excavated = Vec::new();

        // The struck cell always loses the fixed center amount; the
        // hammer's damage field is a health cost, not a dig amount.
        let center = self.grid.cell_mut(x, y);
        let was_buried = center.depth > 0;
        center.depth = center.depth.saturating_sub(CENTER_STRIKE_DEPTH);
        if was_buried && center.depth == 0 {
            excavated.push((x, y));
        }
        // Hitting the bottom face of bedrock absorbs the blow: no area
        // propagation this strike.
        let suppress_area = center.occupant == OccupantKind::Bedrock && center.depth == 0;

        if !suppress_area {
            for area in &hammer.pattern {
                let tx = x as i64 + area.dx as i64;
                let ty = y as i64 + area.dy as i64;
                if tx < 0 || ty < 0 || tx >= self.grid.width as i64 || ty >= self.grid.height as i64
                {
                    continue;
                }
                let neighbor = self.grid.cell_mut(tx as usize, ty as usize);
                let was_buried = neighbor.depth > 0;
                neighbor.depth = neighbor.depth.saturating_sub(area.amount);
                if was_buried && neighbor.depth == 0 {
                    excavated.push((tx as usize, ty as usize));
                }
            }
        }

        // Uncover rescan. Success is decided before the health check below
        // so a simultaneously fatal final strike still wins.
        let mut found = Vec::new();
        let pending: Vec<(usize, Vec<(usize, usize)>)> = self
            .grid
            .active_objects
            .iter()
            .enumerate()
            .filter(|(_, active)| !active.found)
            .map(|(index, active)| (index, placement::positions_for(&active.object, active.anchor)))
            .collect();
        for (index, positions) in pending {
            if positions
                .iter()
                .all(|&(px, py)| self.grid.cell(px, py).depth == 0)
            {
                self.grid.active_objects[index].found = true;
                let name = self.grid.active_objects[index].object.name.clone();
                debug!(item = %name, "object uncovered");
                found.push(name);
            }
        }
        if self.grid.all_objects_found() {
            self.state.is_over = true;
            self.state.failed = false;
        }

        let damage = self.modifier.modify_hammer_damage(hammer.damage);
        let spent = damage.min(self.state.health);
        self.state.health -= spent;
        if !self.state.is_over && self.state.health == 0 {
            self.state.is_over = true;
            self.state.failed = true;
        }

        self.stats.strikes += 1;
        self.stats.cells_excavated += excavated.len() as u32;
        self.stats.items_found += found.len() as u32;
        self.stats.health_spent += spent;

        let report = if self.state.is_over {
            let payout = self.modifier.payout(&self.state);
            info!(
                failed = self.state.failed,
                strikes = self.stats.strikes,
                "round over"
            );
            Some(RoundReport {
                state: self.state,
                objects: self
                    .grid
                    .active_objects
                    .iter()
                    .map(|active| ObjectOutcome {
                        name: active.object.name.clone(),
                        found: active.found,
                    })
                    .collect(),
                payout,
                stats: self.stats,
            })
        } else {
            None
        };

        StrikeOutcome {
            ignored: false,
            excavated,
            found,
            health_after: self.state.health,
            report,
        }
    }
}

/// Serializable view of the session for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major depth levels
    pub depths: Vec<Vec<u32>>,
    pub occupants: Vec<Vec<OccupantKind>>,
    pub health: u32,
    pub is_over: bool,
    pub failed: bool,
    pub objects: Vec<ObjectOutcome>,
    pub stats: RoundStats,
}

impl SessionSnapshot {
    pub fn capture(session: &MiningSession) -> Self {
        let grid = &session.grid;
        let row = |y: usize| (0..grid.width).map(move |x| grid.cell(x, y));
        Self {
            width: grid.width,
            height: grid.height,
            depths: (0..grid.height)
                .map(|y| row(y).map(|cell| cell.depth).collect())
                .collect(),
            occupants: (0..grid.height)
                .map(|y| row(y).map(|cell| cell.occupant).collect())
                .collect(),
            health: session.state.health,
            is_over: session.state.is_over,
            failed: session.state.failed,
            objects: grid
                .active_objects
                .iter()
                .map(|active| ObjectOutcome {
                    name: active.object.name.clone(),
                    found: active.found,
                })
                .collect(),
            stats: session.stats,
        }
    }
}

// Systems

/// Drain strike events through the session and report the results outward.
pub fn process_strikes(
    mut session: ResMut<MiningSession>,
    mut strikes: EventReader<StrikeEvent>,
    mut health_events: EventWriter<HealthChangedEvent>,
    mut excavated_events: EventWriter<CellExcavatedEvent>,
    mut found_events: EventWriter<ItemFoundEvent>,
    mut over_events: EventWriter<RoundOverEvent>,
) {
    for strike in strikes.read() {
        let outcome = session.strike(strike.x, strike.y);
        if outcome.ignored {
            continue;
        }
        health_events.send(HealthChangedEvent {
            health: outcome.health_after,
            max: MAX_HEALTH,
        });
        for (x, y) in &outcome.excavated {
            excavated_events.send(CellExcavatedEvent { x: *x, y: *y });
        }
        for name in &outcome.found {
            found_events.send(ItemFoundEvent { name: name.clone() });
        }
        if let Some(report) = outcome.report {
            over_events.send(RoundOverEvent { report });
        }
    }
}

/// Credit found items into the ledger when the payout grants them.
pub fn apply_round_payouts(
    mut ledger: ResMut<ItemLedger>,
    mut rounds: EventReader<RoundOverEvent>,
) {
    for round in rounds.read() {
        if !round.report.payout.grant_items {
            continue;
        }
        for name in round.report.found_names() {
            ledger.add(name, 1);
        }
    }
}
