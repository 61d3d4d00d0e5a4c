//! Collaborator traits the engine consumes but never implements itself.

use crate::capability::Capability;
use crate::error::ResolveError;
use crate::id::PlayerId;
use std::time::Duration;

/// Pure permission queries.
///
/// Implementations must be side-effect free; the engine queries on every
/// operation and assumes nothing about caching. Answers may change between
/// calls (a rank change mid-session) and the engine will honour whatever
/// the oracle says at validation time.
pub trait PermissionOracle: Send + Sync {
    /// Whether `actor` currently holds `capability`.
    fn has_capability(&self, actor: PlayerId, capability: Capability) -> bool;

    /// The numeric allowance `actor` holds under `capability`, clamped to
    /// `ceiling`. Used for the cluster-area quota.
    fn allowance_for(&self, actor: PlayerId, capability: Capability, ceiling: u64) -> u64;
}

/// Asynchronous name → identity resolution with a bounded wait.
///
/// The only suspending collaborator. Implementations must return within
/// roughly `timeout`; a caller thread is never parked indefinitely.
pub trait IdentityResolver: Send + Sync {
    /// Resolve a display name to an identity, waiting at most `timeout`.
    fn resolve(&self, name: &str, timeout: Duration) -> Result<PlayerId, ResolveError>;
}
