//! Centralized game constants for the digsite simulation core.
//!
//! Eliminates magic numbers duplicated across the terrain, placement and
//! mining modules. Per-module tables (object catalog, hammer patterns,
//! modifier presets) remain in their respective modules as the single
//! source of truth.

// =====================================================
// Grid
// =====================================================

/// Board width in cells
pub const GRID_WIDTH: usize = 25;

/// Board height in cells
pub const GRID_HEIGHT: usize = 12;

// =====================================================
// Terrain
// =====================================================

/// Spatial scale of the base noise octave
pub const NOISE_SCALE_BASE: f64 = 10.0;

/// Spatial scale of the second noise octave
pub const NOISE_SCALE_MID: f64 = 16.0;

/// Spatial scale of the third noise octave
pub const NOISE_SCALE_FINE: f64 = 23.0;

/// Amplitude of the base octave (octave amplitudes sum to 1.0)
pub const NOISE_AMP_BASE: f64 = 0.60;

/// Amplitude of the second octave
pub const NOISE_AMP_MID: f64 = 0.25;

/// Amplitude of the third octave
pub const NOISE_AMP_FINE: f64 = 0.15;

/// Upper clamp on the summed noise value; keeps the top tier boundary unreachable
pub const NOISE_CLAMP_MAX: f64 = 0.99;

/// Number of discrete depth tiers produced by quantization
pub const DEPTH_TIER_COUNT: u32 = 4;

/// Shallowest initial cell depth; tier N adds `DEPTH_TIER_STEP * N`
pub const DEPTH_TIER_BASE: u32 = 2;

/// Depth added per tier
pub const DEPTH_TIER_STEP: u32 = 2;

// =====================================================
// Strikes
// =====================================================

/// Depth removed from the struck cell itself, for every hammer variant.
/// The hammer's own `damage` field only feeds the health cost.
pub const CENTER_STRIKE_DEPTH: u32 = 2;

/// Health pool at round start
pub const MAX_HEALTH: u32 = 50;

// =====================================================
// Board population
// =====================================================

/// Minimum items drawn for a round (inclusive)
pub const ITEM_COUNT_MIN: u32 = 2;

/// Maximum items drawn for a round (inclusive)
pub const ITEM_COUNT_MAX: u32 = 4;

/// Flat bedrock count added on top of the random draw
pub const BEDROCK_COUNT_BASE: u32 = 4;

/// Upper bound of the uniform draw whose square root varies the bedrock count
pub const BEDROCK_COUNT_SPREAD: f64 = 8.0;

/// Retry bound for the plate duplicate-avoidance reroll before the pool is
/// filtered directly
pub const PLATE_REROLL_LIMIT: u32 = 16;

/// Consecutive placement failures after which a fill-until-full strategy stops
pub const FLOOD_MISS_LIMIT: u32 = 20;
