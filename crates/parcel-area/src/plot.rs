//! A claimed grid cell and its owner list.

use parcel_core::{PlayerId, PlotId};
use smallvec::{smallvec, SmallVec};

/// One claimed cell.
///
/// A `Plot` exists only while it has at least one owner: the store creates
/// it when a cell is first claimed and drops it when the last owner is
/// removed. The owner list is kept sorted ascending, so `owners()[0]` is
/// the deterministic handoff target when a co-owner departs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plot {
    id: PlotId,
    owners: SmallVec<[PlayerId; 2]>,
    cluster: Option<String>,
}

impl Plot {
    /// A freshly claimed plot with a single owner.
    pub fn new(id: PlotId, owner: PlayerId) -> Self {
        Self {
            id,
            owners: smallvec![owner],
            cluster: None,
        }
    }

    /// The cell this plot occupies.
    pub fn id(&self) -> PlotId {
        self.id
    }

    /// All owners, sorted ascending. Never empty.
    pub fn owners(&self) -> &[PlayerId] {
        &self.owners
    }

    /// The lowest owner identity.
    pub fn primary_owner(&self) -> PlayerId {
        self.owners[0]
    }

    /// Whether `player` owns this plot.
    pub fn is_owner(&self, player: PlayerId) -> bool {
        self.owners.binary_search(&player).is_ok()
    }

    /// Add a co-owner. No-op if already present.
    pub fn add_owner(&mut self, player: PlayerId) {
        if let Err(at) = self.owners.binary_search(&player) {
            self.owners.insert(at, player);
        }
    }

    /// Remove an owner. Returns `true` if the plot is now ownerless and
    /// must be dropped from the store.
    pub fn remove_owner(&mut self, player: PlayerId) -> bool {
        if let Ok(at) = self.owners.binary_search(&player) {
            self.owners.remove(at);
        }
        self.owners.is_empty()
    }

    /// Name of the cluster whose rectangle covers this plot, if any.
    ///
    /// A back-reference only: the cluster does not own the plot.
    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// Set or clear the cluster back-reference.
    pub fn set_cluster(&mut self, name: Option<String>) {
        self.cluster = name;
    }
}
