//! Weight-proportional random selection.
//!
//! The single selection primitive behind item draws, bedrock shape picks and
//! modifier offers. Candidates expose a non-negative integer weight as a
//! function of an arbitrary context value; selection probability is
//! proportional to that weight.

use rand::Rng;

/// Select one candidate with probability proportional to its weight.
///
/// Sums all weights, draws a uniform roll in `[0, total)`, then walks the
/// sequence accumulating weights and returns the first candidate whose
/// cumulative sum strictly exceeds the roll.
///
/// Degenerate inputs have defined outcomes rather than errors:
/// - an empty slice returns `None`
/// - a total weight of zero falls back to the first candidate
pub fn weighted_select<'a, T, C>(
    rng: &mut impl Rng,
    candidates: &'a [T],
    context: &C,
    weight: impl Fn(&T, &C) -> u32,
) -> Option<&'a T> {
    let first = candidates.first()?;

    let total: u64 = candidates.iter().map(|c| weight(c, context) as u64).sum();
    if total == 0 {
        return Some(first);
    }

    let roll = rng.gen_range(0..total);
    let mut cumulative: u64 = 0;
    for candidate in candidates {
        cumulative += weight(candidate, context) as u64;
        if cumulative > roll {
            return Some(candidate);
        }
    }

    // Unreachable for a correct total, but the walk above must not fall
    // through silently if it ever is.
    Some(first)
}

/// Uniform pick over a slice, expressed through the same primitive so both
/// pools share one selection path.
pub fn uniform_select<'a, T>(rng: &mut impl Rng, candidates: &'a [T]) -> Option<&'a T> {
    weighted_select(rng, candidates, &(), |_, _| 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    #[test]
    fn test_empty_slice_returns_none() {
        let empty: Vec<u32> = vec![];
        let picked = weighted_select(&mut rng(1), &empty, &(), |w, _| *w);
        assert!(picked.is_none());
    }

    #[test]
    fn test_single_candidate_always_selected() {
        let pool = vec!["only"];
        for seed in 0..20 {
            let picked = weighted_select(&mut rng(seed), &pool, &(), |_, _| 7);
            assert_eq!(picked, Some(&"only"));
        }
    }

    #[test]
    fn test_zero_total_weight_falls_back_to_first() {
        let pool = vec!["a", "b", "c"];
        for seed in 0..20 {
            let picked = weighted_select(&mut rng(seed), &pool, &(), |_, _| 0);
            assert_eq!(picked, Some(&"a"), "zero total weight must pick the first candidate");
        }
    }

    #[test]
    fn test_zero_weight_candidate_never_selected() {
        let pool = vec![("never", 0u32), ("always", 10)];
        for seed in 0..200 {
            let picked = weighted_select(&mut rng(seed), &pool, &(), |(_, w), _| *w).unwrap();
            assert_eq!(picked.0, "always");
        }
    }

    #[test]
    fn test_context_drives_weight() {
        let pool = vec!["light", "heavy"];
        let ctx = 1usize; // index of the candidate that gets all the weight
        for seed in 0..100 {
            let picked = weighted_select(&mut rng(seed), &pool, &ctx, |c, favored| {
                if *c == pool[*favored] {
                    100
                } else {
                    0
                }
            });
            assert_eq!(picked, Some(&"heavy"));
        }
    }

    #[test]
    fn test_empirical_frequencies_track_weights() {
        let pool = vec![("rare", 1u32), ("common", 9)];
        let mut r = rng(42);
        let mut common = 0u32;
        let trials = 10_000;
        for _ in 0..trials {
            let picked = weighted_select(&mut r, &pool, &(), |(_, w), _| *w).unwrap();
            if picked.0 == "common" {
                common += 1;
            }
        }
        let frequency = common as f64 / trials as f64;
        assert!(
            (frequency - 0.9).abs() < 0.03,
            "common picked {frequency} of the time, expected ~0.9"
        );
    }

    #[test]
    fn test_uniform_select_covers_all_candidates() {
        let pool = vec![0usize, 1, 2, 3];
        let mut seen = [false; 4];
        let mut r = rng(7);
        for _ in 0..500 {
            let picked = uniform_select(&mut r, &pool).unwrap();
            seen[*picked] = true;
        }
        assert!(seen.iter().all(|s| *s), "uniform pick should reach every candidate");
    }
}
