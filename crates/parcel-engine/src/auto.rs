//! Strategy-dispatched automatic allocation.

use crate::config::EngineConfig;
use crate::reservation::ReservationLedger;
use parcel_area::{Area, AreaKind};
use parcel_core::{AllocError, PlayerId, PlotId};
use parcel_grid::PlotRect;

// ── AutoQuery ──────────────────────────────────────────────────────

/// One allocation request against one area.
#[derive(Clone, Debug)]
pub struct AutoQuery {
    /// Who the granted plots will belong to.
    pub requester: PlayerId,
    /// Where the single-cell scan starts; `None` means the area default.
    pub start: Option<PlotId>,
    /// Requested width in cells.
    pub size_x: u32,
    /// Requested height in cells.
    pub size_z: u32,
}

impl AutoQuery {
    /// A 1x1 request with the default scan start.
    pub fn single(requester: PlayerId) -> Self {
        Self {
            requester,
            start: None,
            size_x: 1,
            size_z: 1,
        }
    }

    /// A `size_x` by `size_z` block request.
    pub fn block(requester: PlayerId, size_x: u32, size_z: u32) -> Self {
        Self {
            requester,
            start: None,
            size_x,
            size_z,
        }
    }
}

// ── AllocationStrategy ─────────────────────────────────────────────

/// One way of finding and reserving free plots.
///
/// Strategies run with the area lock held: the eligibility check, the
/// reservation, and any marker advance are one atomic unit per area.
/// A strategy returns the reserved cells; the engine claims them and
/// releases the reservations once ownership is committed.
pub trait AllocationStrategy: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this strategy serves `query` on `area`.
    fn applies(&self, area: &Area, query: &AutoQuery) -> bool;

    /// Find and reserve a grant. `Err(NoFreeSpace)` when the search is
    /// exhausted; any reservations taken along the way are released.
    fn allocate(
        &self,
        area: &mut Area,
        ledger: &ReservationLedger,
        query: &AutoQuery,
        config: &EngineConfig,
    ) -> Result<Vec<PlotId>, AllocError>;
}

/// Run `query` through `strategies` in priority order.
///
/// The first strategy whose predicate matches handles the request
/// outright. If none matches the allocator declines with an empty grant
/// rather than guessing.
pub fn dispatch(
    strategies: &[Box<dyn AllocationStrategy>],
    area: &mut Area,
    ledger: &ReservationLedger,
    query: &AutoQuery,
    config: &EngineConfig,
) -> Result<Vec<PlotId>, AllocError> {
    for strategy in strategies {
        if strategy.applies(area, query) {
            tracing::debug!(
                "allocating {}x{} in area {} via {}",
                query.size_x,
                query.size_z,
                area.id(),
                strategy.name()
            );
            return strategy.allocate(area, ledger, query, config);
        }
    }
    tracing::debug!(
        "no strategy serves {}x{} in area {}, declining",
        query.size_x,
        query.size_z,
        area.id()
    );
    Ok(Vec::new())
}

// ── SingleCellStrategy ─────────────────────────────────────────────

/// Serves 1x1 requests by walking the area's scan order.
///
/// Asks the area for the next claimable cell at or after the cursor and
/// tries to reserve it; a reservation collision (a concurrent request in
/// another area sharing the ledger, or a not-yet-committed grant) moves
/// the cursor past the cell instead of retrying it.
#[derive(Debug, Default)]
pub struct SingleCellStrategy;

impl AllocationStrategy for SingleCellStrategy {
    fn name(&self) -> &'static str {
        "single-cell"
    }

    fn applies(&self, _area: &Area, query: &AutoQuery) -> bool {
        query.size_x == 1 && query.size_z == 1
    }

    fn allocate(
        &self,
        area: &mut Area,
        ledger: &ReservationLedger,
        query: &AutoQuery,
        _config: &EngineConfig,
    ) -> Result<Vec<PlotId>, AllocError> {
        // Bounded areas yield at most one candidate per cell per cycle;
        // capping collisions at the cycle length guarantees termination
        // even when every free cell carries a live reservation.
        let mut budget = area.scan_cycle_cells();
        let mut cursor = query.start;
        loop {
            let Some(id) = area.next_claimable(cursor) else {
                return Err(AllocError::NoFreeSpace);
            };
            if ledger.reserve(area.id(), id) {
                return Ok(vec![id]);
            }
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(AllocError::NoFreeSpace);
                }
                *remaining -= 1;
            }
            cursor = Some(area.successor(id));
        }
    }
}

// ── BlockStrategy ──────────────────────────────────────────────────

/// Serves rectangular requests in areas with full grid control.
///
/// Drives the area's scan marker, advancing it unconditionally on every
/// attempt so repeated failures still make forward progress and no
/// region is permanently skipped under contention. Each attempt places
/// the candidate rectangle at the marker's successor, checks that every
/// cell is claimable and no cluster intersects, then reserves the whole
/// rectangle atomically.
#[derive(Debug, Default)]
pub struct BlockStrategy;

impl AllocationStrategy for BlockStrategy {
    fn name(&self) -> &'static str {
        "block"
    }

    fn applies(&self, area: &Area, query: &AutoQuery) -> bool {
        area.kind() != AreaKind::Partial && query.size_x >= 1 && query.size_z >= 1
    }

    fn allocate(
        &self,
        area: &mut Area,
        ledger: &ReservationLedger,
        query: &AutoQuery,
        config: &EngineConfig,
    ) -> Result<Vec<PlotId>, AllocError> {
        // One full cycle of origins for bounded areas; the configured
        // budget otherwise. Without a cap the marker walk would spin
        // forever once no eligible rectangle remains.
        let mut attempts = area
            .scan_cycle_cells()
            .unwrap_or(config.max_block_attempts);
        while attempts > 0 {
            attempts -= 1;
            let origin = area.advance_marker();
            let rect = block_at(origin, query.size_x, query.size_z);
            if !area.is_claimable_rect(&rect) {
                continue;
            }
            if ledger.reserve_rect(area.id(), &rect) {
                return Ok(rect.cells().collect());
            }
        }
        Err(AllocError::NoFreeSpace)
    }
}

fn block_at(origin: PlotId, size_x: u32, size_z: u32) -> PlotRect {
    let far = PlotId::new(
        origin.x.saturating_add(size_x as i32 - 1),
        origin.y.saturating_add(size_z as i32 - 1),
    );
    PlotRect::from_corners(origin, far)
}
