//! Event surface between the core and its collaborators.
//!
//! `StrikeEvent` is the only inbound call the state machine accepts while a
//! round is active. The remaining events report state changes outward for
//! the presentation and collection layers; the core never consumes them.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::mining::RoundReport;

/// A hammer blow at grid coordinates, already translated from device input.
#[derive(Event, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrikeEvent {
    pub x: usize,
    pub y: usize,
}

/// Health changed after a strike.
#[derive(Event, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthChangedEvent {
    pub health: u32,
    pub max: u32,
}

/// A cell's depth reached zero this strike.
#[derive(Event, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellExcavatedEvent {
    pub x: usize,
    pub y: usize,
}

/// A placed object became fully uncovered.
#[derive(Event, Debug, Clone, Serialize, Deserialize)]
pub struct ItemFoundEvent {
    pub name: String,
}

/// The round reached a terminal state. Fired exactly once per round.
#[derive(Event, Debug, Clone, Serialize, Deserialize)]
pub struct RoundOverEvent {
    pub report: RoundReport,
}
