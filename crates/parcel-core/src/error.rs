//! Error types for the Parcel land engine.
//!
//! One enum per subsystem: cluster lifecycle, auto-allocation, identity
//! resolution, durable commits, and engine configuration (the latter lives
//! in `parcel-engine` next to the config it validates).

use crate::capability::Capability;
use crate::id::{AreaId, PlayerId, PlotId};
use std::error::Error;
use std::fmt;

/// Errors from cluster create/resize/delete/membership operations.
///
/// Terminal for the given input: the caller must correct the request.
/// Every variant carries enough context to do so. No partial state change
/// accompanies any of these; validation completes before the first write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClusterError {
    /// The proposed cluster name is already used in this area.
    NameTaken {
        /// The conflicting name.
        name: String,
    },
    /// The rectangle extends outside the area bounds.
    OutOfBounds {
        /// Bottom-left corner of the rejected rectangle.
        min: PlotId,
        /// Top-right corner of the rejected rectangle.
        max: PlotId,
    },
    /// The rectangle overlaps an existing cluster in the same area.
    Intersection {
        /// Name of the cluster already occupying part of the rectangle.
        existing: String,
        /// Bottom-left corner of that cluster.
        min: PlotId,
        /// Top-right corner of that cluster.
        max: PlotId,
    },
    /// The actor lacks the capability the operation requires.
    PermissionDenied {
        /// The missing capability.
        capability: Capability,
    },
    /// The actor's total claimed cluster area would exceed their allowance.
    QuotaExceeded {
        /// Cells already claimed by the actor's clusters in this area.
        current: u64,
        /// Cells the rejected operation would add (signed delta for resize).
        requested: i64,
        /// The permission-derived allowance.
        allowed: u64,
    },
    /// No cluster with the given name exists in this area.
    NotFound {
        /// The unknown name.
        name: String,
    },
    /// The engine holds no area with the given id.
    UnknownArea {
        /// The unregistered id.
        area: AreaId,
    },
    /// The target player is not a member of the cluster.
    NotMember {
        /// The non-member.
        player: PlayerId,
    },
    /// The distinguished owner can never be kicked or leave; only deletion
    /// removes the owner's association.
    OwnerImmutable,
    /// A malformed request (empty name, degenerate shape, self-kick).
    Validation {
        /// What was malformed.
        reason: String,
    },
    /// The durable store refused the commit. Already-applied writes are not
    /// rolled back; reconciliation is the caller's concern.
    Commit(CommitError),
    /// A name lookup through the identity pipeline failed. The `Timeout`
    /// case is recoverable; the caller may retry.
    Resolve(ResolveError),
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTaken { name } => write!(f, "cluster name '{name}' is taken"),
            Self::OutOfBounds { min, max } => {
                write!(f, "rectangle [{min}, {max}] extends outside the area")
            }
            Self::Intersection { existing, min, max } => {
                write!(f, "rectangle intersects cluster '{existing}' [{min}, {max}]")
            }
            Self::PermissionDenied { capability } => {
                write!(f, "missing capability {capability}")
            }
            Self::QuotaExceeded {
                current,
                requested,
                allowed,
            } => write!(
                f,
                "quota exceeded: {current} claimed {requested:+} requested, {allowed} allowed"
            ),
            Self::NotFound { name } => write!(f, "no cluster named '{name}'"),
            Self::UnknownArea { area } => write!(f, "no area {area}"),
            Self::NotMember { player } => write!(f, "{player} is not a member"),
            Self::OwnerImmutable => {
                write!(f, "the cluster owner cannot be kicked or leave")
            }
            Self::Validation { reason } => write!(f, "invalid request: {reason}"),
            Self::Commit(e) => write!(f, "commit failed: {e}"),
            Self::Resolve(e) => write!(f, "identity resolution failed: {e}"),
        }
    }
}

impl Error for ClusterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Commit(e) => Some(e),
            Self::Resolve(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CommitError> for ClusterError {
    fn from(e: CommitError) -> Self {
        Self::Commit(e)
    }
}

impl From<ResolveError> for ClusterError {
    fn from(e: ResolveError) -> Self {
        Self::Resolve(e)
    }
}

/// Errors from the auto-allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The search exhausted the area (or its attempt budget) without
    /// finding a claimable cell or block. Recoverable; retry later.
    NoFreeSpace,
    /// The engine holds no area with the given id.
    UnknownArea {
        /// The unregistered id.
        area: AreaId,
    },
    /// The durable store refused the ownership commit. In-flight
    /// reservations have been released.
    Commit(CommitError),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFreeSpace => write!(f, "no free space in area"),
            Self::UnknownArea { area } => write!(f, "no area {area}"),
            Self::Commit(e) => write!(f, "commit failed: {e}"),
        }
    }
}

impl Error for AllocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Commit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CommitError> for AllocError {
    fn from(e: CommitError) -> Self {
        Self::Commit(e)
    }
}

/// Errors from the identity-resolution pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// The bounded wait elapsed before the pipeline answered.
    /// Recoverable; retry later.
    Timeout,
    /// The pipeline answered but knows no identity for the name.
    UnknownName {
        /// The unresolvable name.
        name: String,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "identity resolution timed out"),
            Self::UnknownName { name } => write!(f, "unknown player name '{name}'"),
        }
    }
}

impl Error for ResolveError {}

/// Faults from the durable store.
///
/// The engine surfaces these unmodified and never retries or rolls back on
/// the caller's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitError {
    /// The store is unreachable or refused the connection.
    Unavailable {
        /// Store-provided description.
        reason: String,
    },
    /// The store rejected this specific write.
    Rejected {
        /// Store-provided description.
        reason: String,
    },
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
            Self::Rejected { reason } => write!(f, "store rejected write: {reason}"),
        }
    }
}

impl Error for CommitError {}
