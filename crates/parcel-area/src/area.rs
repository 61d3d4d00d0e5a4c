//! The per-area store: plots, clusters, bounds, and the scan marker.

use crate::cluster::Cluster;
use crate::plot::Plot;
use indexmap::IndexMap;
use parcel_core::{AreaId, PlayerId, PlotId};
use parcel_grid::{walk, PlotRect};

/// How an area was provisioned, which decides what allocation supports.
///
/// `Partial` areas are irregular slices of a shared world; the block
/// allocator does not serve them (single-cell allocation still does).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaKind {
    /// A dedicated grid world.
    Normal,
    /// A grid overlaid on existing terrain.
    Augmented,
    /// A bounded, irregular slice of a shared world.
    Partial,
}

/// One area's complete claim state.
///
/// Owns the plot map (claimed cells only), the cluster map (keyed by
/// unique name), and the block-scan marker. All mutation goes through an
/// engine-held lock; the store itself is single-threaded by construction.
#[derive(Debug)]
pub struct Area {
    id: AreaId,
    kind: AreaKind,
    bounds: Option<PlotRect>,
    plots: IndexMap<PlotId, Plot>,
    clusters: IndexMap<String, Cluster>,
    scan_marker: PlotId,
}

impl Area {
    /// An unbounded area; the walk enumerates outward indefinitely.
    pub fn unbounded(id: AreaId, kind: AreaKind) -> Self {
        Self {
            id,
            kind,
            bounds: None,
            plots: IndexMap::new(),
            clusters: IndexMap::new(),
            scan_marker: PlotId::ORIGIN,
        }
    }

    /// A bounded area; scans cycle over exactly the cells of `bounds`.
    pub fn bounded(id: AreaId, kind: AreaKind, bounds: PlotRect) -> Self {
        Self {
            id,
            kind,
            bounds: Some(bounds),
            plots: IndexMap::new(),
            clusters: IndexMap::new(),
            scan_marker: bounds.center(),
        }
    }

    /// This area's id.
    pub fn id(&self) -> AreaId {
        self.id
    }

    /// Provisioning kind.
    pub fn kind(&self) -> AreaKind {
        self.kind
    }

    /// Bounds rectangle, `None` for unbounded areas.
    pub fn bounds(&self) -> Option<PlotRect> {
        self.bounds
    }

    /// Whether `id` lies inside the area.
    pub fn contains(&self, id: PlotId) -> bool {
        self.bounds.map_or(true, |b| b.contains(id))
    }

    /// Whether the whole rectangle lies inside the area.
    pub fn contains_rect(&self, rect: &PlotRect) -> bool {
        self.bounds.map_or(true, |b| b.contains_rect(rect))
    }

    // ── Plots ──────────────────────────────────────────────────────

    /// The claimed plot at `id`, if any.
    pub fn plot(&self, id: PlotId) -> Option<&Plot> {
        self.plots.get(&id)
    }

    /// Number of claimed plots.
    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }

    /// All claimed plots, in claim order.
    pub fn plots(&self) -> impl Iterator<Item = &Plot> {
        self.plots.values()
    }

    /// Whether `id` is free for allocation: inside the area and unclaimed.
    pub fn is_claimable(&self, id: PlotId) -> bool {
        self.contains(id) && !self.plots.contains_key(&id)
    }

    /// Whether every cell of `rect` may be granted as one block: the
    /// rectangle is inside the area, every cell unclaimed, and no existing
    /// cluster intersects it.
    pub fn is_claimable_rect(&self, rect: &PlotRect) -> bool {
        self.contains_rect(rect)
            && self.first_intersecting_cluster(rect).is_none()
            && rect.cells().all(|id| !self.plots.contains_key(&id))
    }

    /// Claim an unowned cell for `owner`, wiring the cluster back-reference
    /// if a cluster covers it. Returns `false` if the cell is already
    /// claimed or outside the area.
    pub fn claim(&mut self, id: PlotId, owner: PlayerId) -> bool {
        if !self.is_claimable(id) {
            return false;
        }
        let mut plot = Plot::new(id, owner);
        if let Some(c) = self.cluster_at(id) {
            plot.set_cluster(Some(c.name().to_string()));
        }
        self.plots.insert(id, plot);
        true
    }

    /// Add a co-owner to a claimed cell. Returns `false` if unclaimed.
    pub fn add_owner(&mut self, id: PlotId, owner: PlayerId) -> bool {
        match self.plots.get_mut(&id) {
            Some(plot) => {
                plot.add_owner(owner);
                true
            }
            None => false,
        }
    }

    /// Remove one owner from a claimed cell.
    ///
    /// If `player` was the sole owner the plot reverts to unclaimed and is
    /// dropped. Otherwise ownership stays with the remaining co-owners,
    /// the lowest of which becomes the primary. Returns the outcome, or
    /// `None` if the cell is unclaimed or `player` does not own it.
    pub fn remove_owner(&mut self, id: PlotId, player: PlayerId) -> Option<Departure> {
        let plot = self.plots.get_mut(&id)?;
        if !plot.is_owner(player) {
            return None;
        }
        if plot.remove_owner(player) {
            self.plots.shift_remove(&id);
            Some(Departure::Unclaimed)
        } else {
            Some(Departure::TransferredTo(plot.primary_owner()))
        }
    }

    /// Revert a cell to unclaimed regardless of its owner list.
    pub fn unclaim(&mut self, id: PlotId) -> Option<Plot> {
        self.plots.shift_remove(&id)
    }

    /// Claimed plots inside `rect`, in claim order.
    pub fn owned_in(&self, rect: &PlotRect) -> impl Iterator<Item = &Plot> + '_ {
        let rect = *rect;
        self.plots.values().filter(move |p| rect.contains(p.id()))
    }

    // ── Scanning ───────────────────────────────────────────────────

    /// Where scans start when the caller gives no position: the bounds
    /// midpoint for bounded areas, the origin otherwise.
    pub fn scan_origin(&self) -> PlotId {
        self.bounds.map_or(PlotId::ORIGIN, |b| b.center())
    }

    /// The next cell after `id` in this area's walk order.
    ///
    /// Unbounded areas follow the ring walk directly. Bounded areas walk
    /// the orbit around the scan origin and wrap after one full cycle over
    /// the ring covering the bounds, so repeated application visits every
    /// in-bounds id exactly once per cycle (out-of-bounds orbit cells are
    /// stepped over, not returned — the wrap keeps the orbit aligned).
    /// An `id` outside the bounds restarts the walk at the scan origin,
    /// keeping the orbit arithmetic within the covering ring.
    pub fn successor(&self, id: PlotId) -> PlotId {
        match self.bounds {
            None => walk::next(id),
            Some(bounds) => {
                let center = bounds.center();
                let id = if bounds.contains(id) { id } else { center };
                let cycle = walk::cycle_len(bounds.chebyshev_reach(center));
                let mut n = walk::rank(offset_from(id, center));
                loop {
                    n = (n + 1) % cycle;
                    let candidate = offset_apply(center, walk::unrank(n));
                    if bounds.contains(candidate) {
                        return candidate;
                    }
                }
            }
        }
    }

    /// The first claimable cell at or after `from` (or the scan origin)
    /// in walk order.
    ///
    /// A `from` hint outside the bounds falls back to the scan origin;
    /// hints are caller-supplied and must never take the orbit arithmetic
    /// outside the ring covering the bounds.
    ///
    /// Bounded areas return `None` once a full cycle finds nothing.
    /// Unbounded areas always succeed eventually: only finitely many cells
    /// are claimed, and the walk reaches every cell.
    pub fn next_claimable(&self, from: Option<PlotId>) -> Option<PlotId> {
        let start = from
            .filter(|id| self.contains(*id))
            .unwrap_or_else(|| self.scan_origin());
        match self.bounds {
            Some(bounds) => {
                let center = bounds.center();
                let cycle = walk::cycle_len(bounds.chebyshev_reach(center));
                let start_rank = walk::rank(offset_from(start, center));
                for step in 0..cycle {
                    let n = (start_rank + step) % cycle;
                    let id = offset_apply(center, walk::unrank(n));
                    if self.is_claimable(id) {
                        return Some(id);
                    }
                }
                None
            }
            None => {
                let mut id = start;
                loop {
                    if self.is_claimable(id) {
                        return Some(id);
                    }
                    id = walk::next(id);
                }
            }
        }
    }

    /// Number of cells one scan cycle visits: the bounds area for bounded
    /// areas, `None` (unbounded) otherwise.
    pub fn scan_cycle_cells(&self) -> Option<u64> {
        self.bounds.map(|b| b.area())
    }

    /// The block-scan marker: the last attempted block origin.
    pub fn scan_marker(&self) -> PlotId {
        self.scan_marker
    }

    /// Reset the marker, e.g. when restoring persisted area state.
    pub fn set_scan_marker(&mut self, marker: PlotId) {
        self.scan_marker = marker;
    }

    /// Advance the marker one walk step and return its new value.
    ///
    /// Called on every block attempt, success or failure, so repeated
    /// failures still make forward progress and no region is permanently
    /// skipped under contention.
    pub fn advance_marker(&mut self) -> PlotId {
        self.scan_marker = self.successor(self.scan_marker);
        self.scan_marker
    }

    // ── Clusters ───────────────────────────────────────────────────

    /// The cluster with the given name.
    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.get(name)
    }

    /// The cluster whose rectangle covers `id`, if any.
    ///
    /// At most one exists: cluster rectangles never intersect.
    pub fn cluster_at(&self, id: PlotId) -> Option<&Cluster> {
        self.clusters.values().find(|c| c.rect().contains(id))
    }

    /// All clusters, in creation order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    /// The first existing cluster whose rectangle intersects `rect`.
    pub fn first_intersecting_cluster(&self, rect: &PlotRect) -> Option<&Cluster> {
        self.clusters.values().find(|c| c.rect().intersects(rect))
    }

    /// Sum of rectangle areas over the clusters `owner` owns here.
    pub fn claimed_cluster_area(&self, owner: PlayerId) -> u64 {
        self.clusters
            .values()
            .filter(|c| c.owner() == owner)
            .map(Cluster::claimed_area)
            .sum()
    }

    /// Insert a validated cluster and set back-references on the claimed
    /// plots inside its rectangle.
    ///
    /// The caller (cluster lifecycle) has already checked name uniqueness
    /// and non-overlap; this is the state write, not the validation.
    pub fn insert_cluster(&mut self, cluster: Cluster) {
        let name = cluster.name().to_string();
        let rect = cluster.rect();
        for plot in self.plots.values_mut() {
            if rect.contains(plot.id()) {
                plot.set_cluster(Some(name.clone()));
            }
        }
        self.clusters.insert(name, cluster);
    }

    /// Remove a cluster and clear back-references. Plot ownership is
    /// untouched.
    pub fn remove_cluster(&mut self, name: &str) -> Option<Cluster> {
        let cluster = self.clusters.shift_remove(name)?;
        for plot in self.plots.values_mut() {
            if plot.cluster() == Some(name) {
                plot.set_cluster(None);
            }
        }
        Some(cluster)
    }

    /// Replace a cluster's rectangle and rewire back-references for the
    /// cells entering and leaving. Returns `false` if the name is unknown.
    pub fn resize_cluster(&mut self, name: &str, rect: PlotRect) -> bool {
        let Some(cluster) = self.clusters.get_mut(name) else {
            return false;
        };
        let old = cluster.rect();
        cluster.set_rect(rect);
        for plot in self.plots.values_mut() {
            let inside_new = rect.contains(plot.id());
            if inside_new && plot.cluster().is_none() {
                plot.set_cluster(Some(name.to_string()));
            } else if !inside_new && old.contains(plot.id()) && plot.cluster() == Some(name) {
                plot.set_cluster(None);
            }
        }
        true
    }

    /// Add `player` to the cluster's invited set. Returns `false` if the
    /// player was already invited.
    pub fn cluster_add_invited(&mut self, name: &str, player: PlayerId) -> bool {
        self.clusters
            .get_mut(name)
            .map_or(false, |c| c.add_invited(player))
    }

    /// Remove `player` from both role sets.
    pub fn cluster_remove_member(&mut self, name: &str, player: PlayerId) {
        if let Some(c) = self.clusters.get_mut(name) {
            c.remove_helper(player);
            c.remove_invited(player);
        }
    }

    /// Promote an invited member to helper. The player leaves the
    /// invited set; the two roles never overlap.
    pub fn cluster_add_helper(&mut self, name: &str, player: PlayerId) -> bool {
        self.clusters.get_mut(name).map_or(false, |c| {
            c.remove_invited(player);
            c.add_helper(player)
        })
    }

    /// Demote a helper back to plain (invited) membership.
    pub fn cluster_remove_helper(&mut self, name: &str, player: PlayerId) -> bool {
        self.clusters.get_mut(name).map_or(false, |c| {
            if c.remove_helper(player) {
                c.add_invited(player);
                true
            } else {
                false
            }
        })
    }
}

/// Outcome of removing one owner from a plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Departure {
    /// The departing player was the sole owner; the cell is unclaimed.
    Unclaimed,
    /// Ownership passed to the lowest remaining co-owner.
    TransferredTo(PlayerId),
}

fn offset_from(id: PlotId, center: PlotId) -> PlotId {
    PlotId::new(id.x.wrapping_sub(center.x), id.y.wrapping_sub(center.y))
}

fn offset_apply(center: PlotId, offset: PlotId) -> PlotId {
    PlotId::new(center.x.wrapping_add(offset.x), center.y.wrapping_add(offset.y))
}
