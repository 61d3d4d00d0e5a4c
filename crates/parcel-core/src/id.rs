//! Strongly-typed identifiers for plots, players, and areas.

use std::fmt;

/// Addresses one claimable grid cell as an `(x, y)` coordinate pair.
///
/// Plot ids are logical grid coordinates, not world positions: `(0, 0)` is
/// the plot at the area origin and `(0, 1)` is its immediate neighbour.
/// Ordering is lexicographic on `(x, y)`; the allocation walk order is
/// defined separately by `parcel-grid`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlotId {
    /// Grid column.
    pub x: i32,
    /// Grid row.
    pub y: i32,
}

impl PlotId {
    /// Construct a plot id from its components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin cell `(0, 0)`.
    pub const ORIGIN: PlotId = PlotId::new(0, 0);
}

impl fmt::Display for PlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for PlotId {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Identifies one player (or other owning identity).
///
/// Opaque to the engine; the identity-resolution pipeline maps display
/// names to these values. Ordering is used as the deterministic tie-break
/// when a departing co-owner's plot is handed to the lowest remaining
/// identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player:{}", self.0)
    }
}

impl From<u64> for PlayerId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies one area (a bounded or unbounded partitioned space).
///
/// Plot coordinates repeat across areas; `(AreaId, PlotId)` is globally
/// unique.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(pub u32);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area:{}", self.0)
    }
}

impl From<u32> for AreaId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
