//! Digsite - Mining Mini-Game Simulation Core
//!
//! This crate provides the deterministic simulation behind the digging
//! mini-game:
//! - Weighted rarity model and selection primitive
//! - Grid object catalog (relics, plates, bedrock shapes)
//! - Noise-based terrain generation (seeded, reproducible)
//! - Shape-aware placement engine with collision checking
//! - Hammer strike model (area-of-effect damage patterns)
//! - Mining grid and win/loss state machine
//! - Modifier system hooking every decision point
//!
//! Rendering, animation and persistence are collaborators: the core reports
//! through events and reads counters/settings through resources.

use bevy::prelude::*;

pub mod catalog;
pub mod collection;
pub mod constants;
pub mod events;
pub mod hammer;
pub mod logging;
pub mod mining;
pub mod modifiers;
pub mod placement;
pub mod terrain;
pub mod weighted;

/// Everything the embedding game needs: logging plus the mining simulation.
pub struct DigsiteCorePlugin;

impl Plugin for DigsiteCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(logging::LoggingPlugin)
            .add_plugins(mining::MiningPlugin);
    }
}
