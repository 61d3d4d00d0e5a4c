//! Test utilities and mock collaborators for Parcel development.
//!
//! Provides canned implementations of the collaborator traits: a
//! [`StaticPermissions`] oracle, a [`RecordingSink`] commit sink with an
//! injectable fault, and a [`TableResolver`] identity pipeline.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use parcel_area::CommitSink;
use parcel_core::{
    AreaId, Capability, CommitError, IdentityResolver, PermissionOracle, PlayerId, PlotId,
    ResolveError,
};
use parcel_grid::PlotRect;

// ── StaticPermissions ──────────────────────────────────────────────

/// Permission oracle with a fixed answer set.
///
/// Grants every capability by default; deny specific ones with
/// [`allow_all_except`](StaticPermissions::allow_all_except) or cap the
/// quota allowance with [`with_allowance`](StaticPermissions::with_allowance).
pub struct StaticPermissions {
    denied: HashSet<Capability>,
    allowance: Option<u64>,
}

impl StaticPermissions {
    pub fn allow_all() -> Self {
        Self {
            denied: HashSet::new(),
            allowance: None,
        }
    }

    pub fn allow_all_except(capability: Capability) -> Self {
        let mut denied = HashSet::new();
        denied.insert(capability);
        Self {
            denied,
            allowance: None,
        }
    }

    pub fn deny(mut self, capability: Capability) -> Self {
        self.denied.insert(capability);
        self
    }

    /// Cap the quota allowance below the engine ceiling.
    pub fn with_allowance(mut self, allowance: u64) -> Self {
        self.allowance = Some(allowance);
        self
    }
}

impl PermissionOracle for StaticPermissions {
    fn has_capability(&self, _actor: PlayerId, capability: Capability) -> bool {
        !self.denied.contains(&capability)
    }

    fn allowance_for(&self, _actor: PlayerId, _capability: Capability, ceiling: u64) -> u64 {
        match self.allowance {
            Some(allowance) => allowance.min(ceiling),
            None => ceiling,
        }
    }
}

// ── RecordingSink ──────────────────────────────────────────────────

/// Every write the engine handed to the durable store, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    CreateCluster {
        area: AreaId,
        name: String,
        rect: PlotRect,
        owner: PlayerId,
    },
    ResizeCluster {
        area: AreaId,
        name: String,
        rect: PlotRect,
    },
    DeleteCluster {
        area: AreaId,
        name: String,
    },
    AddInvited {
        area: AreaId,
        name: String,
        player: PlayerId,
    },
    RemoveMember {
        area: AreaId,
        name: String,
        player: PlayerId,
    },
    AddHelper {
        area: AreaId,
        name: String,
        player: PlayerId,
    },
    RemoveHelper {
        area: AreaId,
        name: String,
        player: PlayerId,
    },
    ClaimPlot {
        area: AreaId,
        id: PlotId,
        owner: PlayerId,
    },
    SetPlotOwners {
        area: AreaId,
        id: PlotId,
        owners: Vec<PlayerId>,
    },
    ClearPlot {
        area: AreaId,
        id: PlotId,
    },
}

/// Commit sink that records every event; optionally refuses all writes.
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    failing: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    /// A sink whose every write returns `CommitError::Unavailable`.
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Players invited to the named cluster, in commit order.
    pub fn invited_of(&self, cluster: &str) -> Vec<PlayerId> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::AddInvited { name, player, .. } if name == cluster => Some(*player),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: SinkEvent) -> Result<(), CommitError> {
        if self.failing {
            return Err(CommitError::Unavailable {
                reason: "sink configured to fail".to_string(),
            });
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitSink for RecordingSink {
    fn create_cluster(
        &self,
        area: AreaId,
        name: &str,
        rect: PlotRect,
        owner: PlayerId,
    ) -> Result<(), CommitError> {
        self.record(SinkEvent::CreateCluster {
            area,
            name: name.to_string(),
            rect,
            owner,
        })
    }

    fn resize_cluster(&self, area: AreaId, name: &str, rect: PlotRect) -> Result<(), CommitError> {
        self.record(SinkEvent::ResizeCluster {
            area,
            name: name.to_string(),
            rect,
        })
    }

    fn delete_cluster(&self, area: AreaId, name: &str) -> Result<(), CommitError> {
        self.record(SinkEvent::DeleteCluster {
            area,
            name: name.to_string(),
        })
    }

    fn add_invited(&self, area: AreaId, name: &str, player: PlayerId) -> Result<(), CommitError> {
        self.record(SinkEvent::AddInvited {
            area,
            name: name.to_string(),
            player,
        })
    }

    fn remove_member(&self, area: AreaId, name: &str, player: PlayerId) -> Result<(), CommitError> {
        self.record(SinkEvent::RemoveMember {
            area,
            name: name.to_string(),
            player,
        })
    }

    fn add_helper(&self, area: AreaId, name: &str, player: PlayerId) -> Result<(), CommitError> {
        self.record(SinkEvent::AddHelper {
            area,
            name: name.to_string(),
            player,
        })
    }

    fn remove_helper(&self, area: AreaId, name: &str, player: PlayerId) -> Result<(), CommitError> {
        self.record(SinkEvent::RemoveHelper {
            area,
            name: name.to_string(),
            player,
        })
    }

    fn claim_plot(&self, area: AreaId, id: PlotId, owner: PlayerId) -> Result<(), CommitError> {
        self.record(SinkEvent::ClaimPlot { area, id, owner })
    }

    fn set_plot_owners(
        &self,
        area: AreaId,
        id: PlotId,
        owners: &[PlayerId],
    ) -> Result<(), CommitError> {
        self.record(SinkEvent::SetPlotOwners {
            area,
            id,
            owners: owners.to_vec(),
        })
    }

    fn clear_plot(&self, area: AreaId, id: PlotId) -> Result<(), CommitError> {
        self.record(SinkEvent::ClearPlot { area, id })
    }
}

// ── TableResolver ──────────────────────────────────────────────────

/// Identity resolver backed by a fixed name table.
///
/// Unknown names answer `UnknownName`; names registered with
/// [`timing_out`](TableResolver::timing_out) answer `Timeout`, for
/// exercising the recoverable path.
#[derive(Default)]
pub struct TableResolver {
    table: HashMap<String, PlayerId>,
    slow: HashSet<String>,
}

impl TableResolver {
    pub fn with(mut self, name: &str, id: PlayerId) -> Self {
        self.table.insert(name.to_string(), id);
        self
    }

    pub fn timing_out(mut self, name: &str) -> Self {
        self.slow.insert(name.to_string());
        self
    }
}

impl IdentityResolver for TableResolver {
    fn resolve(&self, name: &str, _timeout: Duration) -> Result<PlayerId, ResolveError> {
        if self.slow.contains(name) {
            return Err(ResolveError::Timeout);
        }
        self.table
            .get(name)
            .copied()
            .ok_or_else(|| ResolveError::UnknownName {
                name: name.to_string(),
            })
    }
}
