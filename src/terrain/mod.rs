//! Terrain generation: per-cell initial depth from layered coherent noise.
//!
//! Every cell samples three Perlin octaves at distinct spatial scales, the
//! amplitudes summing to one. The summed value is clamped below 1.0 so the
//! top tier boundary stays unreachable, then quantized into four depth
//! tiers. A fresh seed is drawn per round; given that seed the pass is
//! fully deterministic.

use noise::{NoiseFn, Perlin};
use sha3::{Digest, Sha3_256};

use crate::constants::{
    DEPTH_TIER_BASE, DEPTH_TIER_COUNT, DEPTH_TIER_STEP, NOISE_AMP_BASE, NOISE_AMP_FINE,
    NOISE_AMP_MID, NOISE_CLAMP_MAX, NOISE_SCALE_BASE, NOISE_SCALE_FINE, NOISE_SCALE_MID,
};
use crate::mining::MineGrid;
use crate::modifiers::Modifier;

/// Deterministic sub-seed for a named stream within a round, so terrain and
/// placement draw from independent sequences of one round seed.
pub fn stream_seed(round_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(label.as_bytes());
    hasher.update(round_seed.to_le_bytes());
    let digest = hasher.finalize();
    u64::from_le_bytes(digest[0..8].try_into().expect("digest is 32 bytes"))
}

/// Seeded octave sampler for one round.
pub struct TerrainGenerator {
    perlin: Perlin,
}

impl TerrainGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            perlin: Perlin::new(seed as u32),
        }
    }

    /// Raw summed octave value for a cell, in [0, 1] before modifiers.
    pub fn noise_at(&self, x: usize, y: usize) -> f64 {
        let sample = |scale: f64| {
            let raw = self.perlin.get([x as f64 / scale, y as f64 / scale]);
            (raw + 1.0) / 2.0
        };
        NOISE_AMP_BASE * sample(NOISE_SCALE_BASE)
            + NOISE_AMP_MID * sample(NOISE_SCALE_MID)
            + NOISE_AMP_FINE * sample(NOISE_SCALE_FINE)
    }

    /// Initial depth for a cell, with the modifier's noise and level hooks
    /// applied at their interception points.
    pub fn depth_at(&self, x: usize, y: usize, modifier: &Modifier) -> u32 {
        let value = modifier.modify_terrain_noise(self.noise_at(x, y), x, y);
        let value = value.clamp(0.0, NOISE_CLAMP_MAX);
        let tier = (value * DEPTH_TIER_COUNT as f64).floor() as u32;
        let depth = DEPTH_TIER_BASE + tier * DEPTH_TIER_STEP;
        modifier.modify_terrain_level(depth, x, y)
    }
}

/// Assign every cell its initial depth. A modifier may replace the whole
/// pass; otherwise the octave sampler runs per cell.
pub fn generate(grid: &mut MineGrid, seed: u64, modifier: &Modifier) {
    if modifier.replace_terrain(grid, seed) {
        return;
    }
    let generator = TerrainGenerator::new(seed);
    for y in 0..grid.height {
        for x in 0..grid.width {
            grid.cell_mut(x, y).depth = generator.depth_at(x, y, modifier);
        }
    }
}
