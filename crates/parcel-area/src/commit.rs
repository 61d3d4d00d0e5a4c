//! Durable persistence seam for state changes the engine has accepted.

use parcel_core::{AreaId, CommitError, PlayerId, PlotId};
use parcel_grid::PlotRect;

/// Receives every accepted state change, in the order the engine applied
/// it, for durable storage.
///
/// Implementations may write to a database, a log, or nothing at all. A
/// returned [`CommitError`] is surfaced to the caller of the operation
/// that triggered the write; the in-memory state is already updated and
/// is not rolled back, so implementations should be idempotent on replay.
pub trait CommitSink: Send + Sync {
    /// A new cluster was created.
    fn create_cluster(
        &self,
        area: AreaId,
        name: &str,
        rect: PlotRect,
        owner: PlayerId,
    ) -> Result<(), CommitError>;

    /// A cluster's rectangle changed.
    fn resize_cluster(&self, area: AreaId, name: &str, rect: PlotRect) -> Result<(), CommitError>;

    /// A cluster was deleted.
    fn delete_cluster(&self, area: AreaId, name: &str) -> Result<(), CommitError>;

    /// A player entered a cluster's invited set.
    fn add_invited(&self, area: AreaId, name: &str, player: PlayerId) -> Result<(), CommitError>;

    /// A player left a cluster's membership entirely.
    fn remove_member(&self, area: AreaId, name: &str, player: PlayerId) -> Result<(), CommitError>;

    /// A member was promoted to helper.
    fn add_helper(&self, area: AreaId, name: &str, player: PlayerId) -> Result<(), CommitError>;

    /// A helper was demoted to plain membership.
    fn remove_helper(&self, area: AreaId, name: &str, player: PlayerId)
        -> Result<(), CommitError>;

    /// A cell was claimed for `owner`.
    fn claim_plot(&self, area: AreaId, id: PlotId, owner: PlayerId) -> Result<(), CommitError>;

    /// A cell's owner list changed without the plot being dropped.
    fn set_plot_owners(
        &self,
        area: AreaId,
        id: PlotId,
        owners: &[PlayerId],
    ) -> Result<(), CommitError>;

    /// A cell reverted to unclaimed.
    fn clear_plot(&self, area: AreaId, id: PlotId) -> Result<(), CommitError>;
}

/// Discards every write. The default sink for in-memory deployments.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl CommitSink for NullSink {
    fn create_cluster(
        &self,
        _area: AreaId,
        _name: &str,
        _rect: PlotRect,
        _owner: PlayerId,
    ) -> Result<(), CommitError> {
        Ok(())
    }

    fn resize_cluster(&self, _area: AreaId, _name: &str, _rect: PlotRect) -> Result<(), CommitError> {
        Ok(())
    }

    fn delete_cluster(&self, _area: AreaId, _name: &str) -> Result<(), CommitError> {
        Ok(())
    }

    fn add_invited(&self, _area: AreaId, _name: &str, _player: PlayerId) -> Result<(), CommitError> {
        Ok(())
    }

    fn remove_member(
        &self,
        _area: AreaId,
        _name: &str,
        _player: PlayerId,
    ) -> Result<(), CommitError> {
        Ok(())
    }

    fn add_helper(&self, _area: AreaId, _name: &str, _player: PlayerId) -> Result<(), CommitError> {
        Ok(())
    }

    fn remove_helper(
        &self,
        _area: AreaId,
        _name: &str,
        _player: PlayerId,
    ) -> Result<(), CommitError> {
        Ok(())
    }

    fn claim_plot(&self, _area: AreaId, _id: PlotId, _owner: PlayerId) -> Result<(), CommitError> {
        Ok(())
    }

    fn set_plot_owners(
        &self,
        _area: AreaId,
        _id: PlotId,
        _owners: &[PlayerId],
    ) -> Result<(), CommitError> {
        Ok(())
    }

    fn clear_plot(&self, _area: AreaId, _id: PlotId) -> Result<(), CommitError> {
        Ok(())
    }
}
