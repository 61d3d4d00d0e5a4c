//! Axis-aligned rectangles of plot ids.

use parcel_core::PlotId;
use std::fmt;

/// An inclusive, axis-aligned rectangle of plot ids.
///
/// Always normalized: `min` is the bottom-left corner and `max` the
/// top-right, componentwise (`min.x <= max.x`, `min.y <= max.y`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlotRect {
    min: PlotId,
    max: PlotId,
}

impl PlotRect {
    /// Build a rectangle from two opposite corners, in any order.
    pub fn from_corners(a: PlotId, b: PlotId) -> Self {
        Self {
            min: PlotId::new(a.x.min(b.x), a.y.min(b.y)),
            max: PlotId::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// The single-cell rectangle covering `id`.
    pub fn cell(id: PlotId) -> Self {
        Self { min: id, max: id }
    }

    /// Bottom-left corner.
    pub fn min(&self) -> PlotId {
        self.min
    }

    /// Top-right corner.
    pub fn max(&self) -> PlotId {
        self.max
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        (i64::from(self.max.x) - i64::from(self.min.x) + 1) as u32
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        (i64::from(self.max.y) - i64::from(self.min.y) + 1) as u32
    }

    /// Number of cells: `(x2 - x1 + 1) * (y2 - y1 + 1)`.
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Whether `id` lies inside the rectangle.
    pub fn contains(&self, id: PlotId) -> bool {
        id.x >= self.min.x && id.x <= self.max.x && id.y >= self.min.y && id.y <= self.max.y
    }

    /// Whether the whole of `other` lies inside this rectangle.
    pub fn contains_rect(&self, other: &PlotRect) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Whether the rectangles share at least one cell.
    ///
    /// True iff the projections overlap on both axes; adjacent rectangles
    /// (touching edges, no shared cell) do not intersect.
    pub fn intersects(&self, other: &PlotRect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Integer midpoint, rounding toward the bottom-left corner.
    pub fn center(&self) -> PlotId {
        let cx = (i64::from(self.min.x) + i64::from(self.max.x)).div_euclid(2);
        let cy = (i64::from(self.min.y) + i64::from(self.max.y)).div_euclid(2);
        PlotId::new(cx as i32, cy as i32)
    }

    /// Largest Chebyshev distance from `from` to any cell of the rectangle.
    ///
    /// The walk orbit of this many rings around `from` covers the whole
    /// rectangle; bounded scans use it as their cycle radius.
    pub fn chebyshev_reach(&self, from: PlotId) -> u32 {
        let dx = (i64::from(self.min.x) - i64::from(from.x))
            .abs()
            .max((i64::from(self.max.x) - i64::from(from.x)).abs());
        let dy = (i64::from(self.min.y) - i64::from(from.y))
            .abs()
            .max((i64::from(self.max.y) - i64::from(from.y)).abs());
        dx.max(dy) as u32
    }

    /// Iterate the cells in row-major order (`y` outer, `x` inner).
    pub fn cells(&self) -> RectCells {
        RectCells {
            rect: *self,
            next: Some(self.min),
        }
    }
}

impl fmt::Display for PlotRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Row-major iterator over the cells of a [`PlotRect`].
#[derive(Clone, Debug)]
pub struct RectCells {
    rect: PlotRect,
    next: Option<PlotId>,
}

impl Iterator for RectCells {
    type Item = PlotId;

    fn next(&mut self) -> Option<PlotId> {
        let current = self.next?;
        self.next = if current.x < self.rect.max.x {
            Some(PlotId::new(current.x + 1, current.y))
        } else if current.y < self.rect.max.y {
            Some(PlotId::new(self.rect.min.x, current.y + 1))
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            None => (0, Some(0)),
            Some(at) => {
                let full_rows = i64::from(self.rect.max.y) - i64::from(at.y);
                let in_row = i64::from(self.rect.max.x) - i64::from(at.x) + 1;
                let remaining = (full_rows * i64::from(self.rect.width()) + in_row) as usize;
                (remaining, Some(remaining))
            }
        }
    }
}

impl ExactSizeIterator for RectCells {}
