//! Hammer variants and their area-of-effect strike patterns.
//!
//! A pattern lists the offsets around the struck cell and the depth each
//! loses. The struck cell itself is not part of the pattern: it always
//! loses `CENTER_STRIKE_DEPTH`, whatever the variant. The `damage` field
//! feeds the per-strike health cost only; it does not change how much
//! terrain the center loses. That asymmetry is inherited from the original
//! balance and is kept on purpose.

use serde::{Deserialize, Serialize};

/// Base hammer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HammerKind {
    Light,
    Heavy,
}

/// One neighbor hit: relative offset plus the depth it removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaHit {
    pub dx: i32,
    pub dy: i32,
    pub amount: u32,
}

const fn hit(dx: i32, dy: i32, amount: u32) -> AreaHit {
    AreaHit { dx, dy, amount }
}

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// A hammer variant: nominal damage (health cost) and area pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hammer {
    pub kind: HammerKind,
    /// True for the variants that swap orthogonal/diagonal emphasis
    pub alternate: bool,
    /// Health removed from the player per strike (before modifiers)
    pub damage: u32,
    /// Neighbor hits; never contains the (0, 0) offset
    pub pattern: Vec<AreaHit>,
}

fn ring(offsets: &[(i32, i32)], amount: u32) -> impl Iterator<Item = AreaHit> + '_ {
    offsets.iter().map(move |(dx, dy)| hit(*dx, *dy, amount))
}

impl Hammer {
    /// Center 2, four orthogonal neighbors 1 each.
    pub fn light() -> Self {
        Self {
            kind: HammerKind::Light,
            alternate: false,
            damage: 1,
            pattern: ring(&ORTHOGONAL, 1).collect(),
        }
    }

    /// Center 2, orthogonal neighbors 2, diagonal neighbors 1.
    pub fn heavy() -> Self {
        Self {
            kind: HammerKind::Heavy,
            alternate: false,
            damage: 2,
            pattern: ring(&ORTHOGONAL, 2).chain(ring(&DIAGONAL, 1)).collect(),
        }
    }

    /// Light pattern on the diagonals instead of the orthogonals.
    pub fn light_alternate() -> Self {
        Self {
            kind: HammerKind::Light,
            alternate: true,
            damage: 1,
            pattern: ring(&DIAGONAL, 1).collect(),
        }
    }

    /// Heavy with the emphasis swapped: orthogonal 1, diagonal 2.
    pub fn heavy_alternate() -> Self {
        Self {
            kind: HammerKind::Heavy,
            alternate: true,
            damage: 2,
            pattern: ring(&ORTHOGONAL, 1).chain(ring(&DIAGONAL, 2)).collect(),
        }
    }

    /// New hammer with every neighbor hit strengthened by one depth unit.
    /// The center amount is issued separately by the strike path and is not
    /// affected, matching the original behavior.
    pub fn strengthened(&self) -> Self {
        Self {
            pattern: self
                .pattern
                .iter()
                .map(|area| AreaHit {
                    amount: area.amount + 1,
                    ..*area
                })
                .collect(),
            ..self.clone()
        }
    }
}

impl Default for Hammer {
    fn default() -> Self {
        Self::light()
    }
}
