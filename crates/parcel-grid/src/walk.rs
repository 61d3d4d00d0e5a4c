//! The outward ring walk: a deterministic total ordering over plot ids.
//!
//! The walk starts at the origin and traverses concentric Chebyshev rings.
//! Ring `r` (all ids with `max(|x|, |y|) == r`) is entered at `(r-1, r)`
//! and covered in four fixed edges:
//!
//! 1. top edge `y == r`, x decreasing to `-r`
//! 2. left edge `x == -r`, y decreasing to `-r`
//! 3. bottom edge `y == -r`, x increasing to `r`
//! 4. right edge `x == r`, y increasing, finishing on the corner `(r, r)`
//!
//! The corner then steps to `(r, r+1)`, the entry of the next ring. The
//! orbit therefore never revisits an id: bounded scans terminate after one
//! cycle over the covering ring, unbounded scans make monotone outward
//! progress.
//!
//! [`rank`] and [`unrank`] give the closed-form position of an id in this
//! orbit and its inverse, so a scan can resume or wrap without replaying
//! the walk step by step.

use parcel_core::PlotId;

/// Largest coordinate magnitude for which [`rank`] arithmetic is exact.
///
/// `rank` of a ring-`r` id is below `(2r+1)^2`; keeping `|x|, |y|` within
/// this bound keeps every intermediate inside `u64`.
pub const MAX_RING: i32 = 1 << 30;

/// The successor of `id` in the ring walk.
///
/// Total on the id space. Equivalent to `unrank(rank(id) + 1)` (verified
/// by property test) but branch-only, no multiplication.
pub fn next(id: PlotId) -> PlotId {
    let PlotId { x, y } = id;
    let ax = x.abs();
    let ay = y.abs();
    if ax > ay {
        if x > 0 {
            PlotId::new(x, y + 1)
        } else {
            PlotId::new(x, y - 1)
        }
    } else if ay > ax {
        if y > 0 {
            PlotId::new(x - 1, y)
        } else {
            PlotId::new(x + 1, y)
        }
    } else if x == y && x > 0 {
        // Corner (r, r): enter the next ring.
        PlotId::new(x, y + 1)
    } else if x == ax {
        // (r, -r) and the origin: start climbing the right edge.
        PlotId::new(x, y + 1)
    } else if y == ay {
        // (-r, r): start descending the left edge.
        PlotId::new(x, y - 1)
    } else {
        // (-r, -r): start crossing the bottom edge.
        PlotId::new(x + 1, y)
    }
}

/// Position of `id` in the walk orbit; `rank(ORIGIN) == 0`.
///
/// Ring `r` occupies ranks `[(2r-1)^2, (2r+1)^2)`.
pub fn rank(id: PlotId) -> u64 {
    let x = i64::from(id.x);
    let y = i64::from(id.y);
    let r = x.abs().max(y.abs());
    debug_assert!(r <= i64::from(MAX_RING), "id beyond MAX_RING");
    if r == 0 {
        return 0;
    }
    let base = ((2 * r - 1) * (2 * r - 1)) as u64;
    let off = if y == r && x < r {
        // Top edge, x descending from r-1.
        r - 1 - x
    } else if x == -r {
        // Left edge, y descending from r-1.
        2 * r + (r - 1 - y)
    } else if y == -r {
        // Bottom edge, x ascending from -r+1.
        4 * r + (x + r - 1)
    } else {
        // Right edge, y ascending from -r+1, corner (r, r) last.
        6 * r + (y + r - 1)
    };
    base + off as u64
}

/// The id at orbit position `n`; inverse of [`rank`].
pub fn unrank(n: u64) -> PlotId {
    if n == 0 {
        return PlotId::ORIGIN;
    }
    // (2r-1)^2 <= n < (2r+1)^2  =>  r = (isqrt(n) + 1) / 2
    let r = (isqrt(n) + 1) / 2;
    let base = (2 * r - 1) * (2 * r - 1);
    let off = n - base;
    let edge = 2 * r;
    let (seg, k) = (off / edge, (off % edge) as i64);
    let r = r as i64;
    let (x, y) = match seg {
        0 => (r - 1 - k, r),
        1 => (-r, r - 1 - k),
        2 => (-r + 1 + k, -r),
        _ => (r, -r + 1 + k),
    };
    PlotId::new(x as i32, y as i32)
}

/// Number of ids in the orbit cycle covering every ring up to `radius`.
pub fn cycle_len(radius: u32) -> u64 {
    let d = 2 * u64::from(radius) + 1;
    d * d
}

/// Integer square root (floor).
fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut s = (n as f64).sqrt() as u64;
    // Float rounding can land one off in either direction.
    while s.saturating_mul(s) > n {
        s -= 1;
    }
    while (s + 1).saturating_mul(s + 1) <= n {
        s += 1;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_ring_in_walk_order() {
        let mut id = PlotId::ORIGIN;
        let mut seen = Vec::new();
        for _ in 0..9 {
            seen.push(id);
            id = next(id);
        }
        assert_eq!(
            seen,
            vec![
                PlotId::new(0, 0),
                PlotId::new(0, 1),
                PlotId::new(-1, 1),
                PlotId::new(-1, 0),
                PlotId::new(-1, -1),
                PlotId::new(0, -1),
                PlotId::new(1, -1),
                PlotId::new(1, 0),
                PlotId::new(1, 1),
            ]
        );
        // The corner hands over to the entry of ring 2.
        assert_eq!(id, PlotId::new(1, 2));
    }

    #[test]
    fn walk_covers_each_ring_before_leaving_it() {
        let mut id = PlotId::ORIGIN;
        let mut seen = std::collections::HashSet::new();
        for n in 0..cycle_len(5) {
            assert!(seen.insert(id), "revisited {id} at step {n}");
            let ring = id.x.abs().max(id.y.abs()) as u64;
            // Step n lives in ring floor((isqrt(n)+1)/2).
            assert!(ring <= (isqrt(n) + 1) / 2);
            id = next(id);
        }
        assert_eq!(seen.len() as u64, cycle_len(5));
        // Every id within radius 5 was visited.
        for x in -5i32..=5 {
            for y in -5i32..=5 {
                assert!(seen.contains(&PlotId::new(x, y)), "missed ({x},{y})");
            }
        }
    }

    #[test]
    fn rank_of_ring_entries() {
        assert_eq!(rank(PlotId::ORIGIN), 0);
        assert_eq!(rank(PlotId::new(0, 1)), 1);
        assert_eq!(rank(PlotId::new(1, 1)), 8);
        assert_eq!(rank(PlotId::new(1, 2)), 9);
        assert_eq!(rank(PlotId::new(2, 2)), 24);
    }

    #[test]
    fn unrank_inverts_rank_on_small_orbit() {
        for n in 0..cycle_len(8) {
            assert_eq!(rank(unrank(n)), n, "at orbit position {n}");
        }
    }

    #[test]
    fn isqrt_exact_on_squares_and_neighbours() {
        for v in [0u64, 1, 2, 3, 4, 8, 9, 15, 16, 24, 25, 10_000, 10_001] {
            let s = isqrt(v);
            assert!(s * s <= v && (s + 1) * (s + 1) > v, "isqrt({v}) = {s}");
        }
    }

    proptest! {
        #[test]
        fn next_matches_unrank_of_rank_plus_one(x in -200i32..200, y in -200i32..200) {
            let id = PlotId::new(x, y);
            prop_assert_eq!(next(id), unrank(rank(id) + 1));
        }

        #[test]
        fn rank_unrank_roundtrip(n in 0u64..1_000_000) {
            prop_assert_eq!(rank(unrank(n)), n);
        }

        #[test]
        fn rank_is_injective(x1 in -100i32..100, y1 in -100i32..100,
                             x2 in -100i32..100, y2 in -100i32..100) {
            let a = PlotId::new(x1, y1);
            let b = PlotId::new(x2, y2);
            prop_assert_eq!(a == b, rank(a) == rank(b));
        }
    }
}
