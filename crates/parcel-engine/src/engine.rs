//! The engine facade: per-area locking around allocation and lifecycle.

use crate::auto::{dispatch, AllocationStrategy, AutoQuery, BlockStrategy, SingleCellStrategy};
use crate::cluster::ClusterOps;
use crate::config::{ConfigError, EngineConfig};
use crate::reservation::ReservationLedger;
use parcel_area::{Area, CommitSink};
use parcel_core::{
    AllocError, AreaId, ClusterError, IdentityResolver, PermissionOracle, PlayerId, PlotId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The land engine: a registry of areas, one lock per area, and the
/// collaborators every operation consults.
///
/// Exactly one allocation or cluster-mutating operation runs at a time
/// per area; operations against different areas never block each other.
/// The reservation ledger is the one piece of cross-area shared state
/// and takes only short, internal lock holds.
pub struct ClaimEngine {
    config: EngineConfig,
    areas: Mutex<HashMap<AreaId, Arc<Mutex<Area>>>>,
    ledger: ReservationLedger,
    strategies: Vec<Box<dyn AllocationStrategy>>,
    permissions: Arc<dyn PermissionOracle>,
    resolver: Arc<dyn IdentityResolver>,
    sink: Arc<dyn CommitSink>,
}

impl ClaimEngine {
    /// Build an engine with the default strategy order: single-cell
    /// first, block second.
    pub fn new(
        config: EngineConfig,
        permissions: Arc<dyn PermissionOracle>,
        resolver: Arc<dyn IdentityResolver>,
        sink: Arc<dyn CommitSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let ledger = ReservationLedger::new(config.reservation_ttl);
        Ok(Self {
            config,
            areas: Mutex::new(HashMap::new()),
            ledger,
            strategies: vec![Box::new(SingleCellStrategy), Box::new(BlockStrategy)],
            permissions,
            resolver,
            sink,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The process-wide reservation ledger.
    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    /// Register an area. Replaces any previous area under the same id.
    pub fn insert_area(&self, area: Area) {
        let id = area.id();
        self.areas
            .lock()
            .unwrap()
            .insert(id, Arc::new(Mutex::new(area)));
        tracing::info!("registered area {}", id);
    }

    /// The handle for an area, if registered. The registry lock is not
    /// held once this returns; callers lock the area itself.
    pub fn area(&self, id: AreaId) -> Option<Arc<Mutex<Area>>> {
        self.areas.lock().unwrap().get(&id).cloned()
    }

    // ── Allocation ─────────────────────────────────────────────────

    /// Allocate plots for `query` in one area.
    ///
    /// The whole candidate-check / reserve / marker-advance / claim /
    /// commit sequence runs under the area lock. On success the grant is
    /// owned by the requester, durably committed, and its reservations
    /// released. An empty `Ok` means no strategy served the request and
    /// the allocator declined.
    pub fn allocate(&self, area_id: AreaId, query: &AutoQuery) -> Result<Vec<PlotId>, AllocError> {
        let handle = self
            .area(area_id)
            .ok_or(AllocError::UnknownArea { area: area_id })?;
        let mut area = handle.lock().unwrap();
        let grant = dispatch(&self.strategies, &mut area, &self.ledger, query, &self.config)?;
        if grant.is_empty() {
            return Ok(grant);
        }
        for id in &grant {
            area.claim(*id, query.requester);
        }
        let mut fault = None;
        for id in &grant {
            if let Err(e) = self.sink.claim_plot(area_id, *id, query.requester) {
                fault = Some(e);
                break;
            }
        }
        // Ownership is now authoritative in the store (or the fault is
        // the caller's to reconcile); either way the shields come off.
        for id in &grant {
            self.ledger.release(area_id, *id);
        }
        match fault {
            Some(e) => {
                tracing::warn!("claim commit failed in area {}: {}", area_id, e);
                Err(AllocError::Commit(e))
            }
            None => {
                tracing::info!(
                    "granted {} plot(s) to {} in area {}",
                    grant.len(),
                    query.requester,
                    area_id
                );
                Ok(grant)
            }
        }
    }

    // ── Cluster lifecycle ──────────────────────────────────────────

    /// Create a cluster over the rectangle spanned by two corners.
    pub fn create_cluster(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
        corner_a: PlotId,
        corner_b: PlotId,
    ) -> Result<(), ClusterError> {
        self.with_area(area, |ops, area| {
            ops.create(area, actor, name, corner_a, corner_b)
        })
    }

    /// Replace a cluster's rectangle.
    pub fn resize_cluster(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
        corner_a: PlotId,
        corner_b: PlotId,
    ) -> Result<(), ClusterError> {
        self.with_area(area, |ops, area| {
            ops.resize(area, actor, name, corner_a, corner_b)
        })
    }

    /// Delete a cluster, leaving plot ownership untouched.
    pub fn delete_cluster(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
    ) -> Result<(), ClusterError> {
        self.with_area(area, |ops, area| ops.delete(area, actor, name))
    }

    /// Invite a player to a cluster.
    pub fn invite(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
        target: PlayerId,
    ) -> Result<(), ClusterError> {
        self.with_area(area, |ops, area| ops.invite(area, actor, name, target))
    }

    /// Invite a player looked up by display name.
    ///
    /// Resolution happens before the area lock is taken; a slow pipeline
    /// delays only this caller, never other operations on the area.
    pub fn invite_by_name(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
        player_name: &str,
    ) -> Result<(), ClusterError> {
        let target = self
            .resolver
            .resolve(player_name, self.config.resolve_timeout)?;
        self.invite(area, actor, name, target)
    }

    /// Kick a member and hand off their plots inside the rectangle.
    pub fn kick(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
        target: PlayerId,
    ) -> Result<(), ClusterError> {
        self.with_area(area, |ops, area| ops.kick(area, actor, name, target))
    }

    /// Kick a member looked up by display name.
    pub fn kick_by_name(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
        player_name: &str,
    ) -> Result<(), ClusterError> {
        let target = self
            .resolver
            .resolve(player_name, self.config.resolve_timeout)?;
        self.kick(area, actor, name, target)
    }

    /// Leave a cluster voluntarily.
    pub fn leave(&self, area: AreaId, actor: PlayerId, name: &str) -> Result<(), ClusterError> {
        self.with_area(area, |ops, area| ops.leave(area, actor, name))
    }

    /// Promote an invited member to helper.
    pub fn promote_helper(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
        target: PlayerId,
    ) -> Result<(), ClusterError> {
        self.with_area(area, |ops, area| {
            ops.promote_helper(area, actor, name, target)
        })
    }

    /// Demote a helper back to plain membership.
    pub fn demote_helper(
        &self,
        area: AreaId,
        actor: PlayerId,
        name: &str,
        target: PlayerId,
    ) -> Result<(), ClusterError> {
        self.with_area(area, |ops, area| {
            ops.demote_helper(area, actor, name, target)
        })
    }

    /// Every member of a cluster: the owner first, then helpers, then
    /// invited members, each set in insertion order.
    pub fn cluster_members(
        &self,
        area: AreaId,
        name: &str,
    ) -> Result<Vec<PlayerId>, ClusterError> {
        let handle = self
            .area(area)
            .ok_or(ClusterError::UnknownArea { area })?;
        let guard = handle.lock().unwrap();
        let cluster = guard.cluster(name).ok_or_else(|| ClusterError::NotFound {
            name: name.to_string(),
        })?;
        let mut members = vec![cluster.owner()];
        members.extend(cluster.helpers().iter().copied());
        members.extend(cluster.invited().iter().copied());
        Ok(members)
    }

    fn with_area<T>(
        &self,
        area: AreaId,
        f: impl FnOnce(&ClusterOps<'_>, &mut Area) -> Result<T, ClusterError>,
    ) -> Result<T, ClusterError> {
        let handle = self
            .area(area)
            .ok_or(ClusterError::UnknownArea { area })?;
        let mut guard = handle.lock().unwrap();
        let ops = ClusterOps::new(&*self.permissions, &*self.sink, &self.config);
        f(&ops, &mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_area::AreaKind;
    use parcel_grid::PlotRect;
    use parcel_test_utils::{RecordingSink, StaticPermissions, TableResolver};

    fn engine() -> ClaimEngine {
        ClaimEngine::new(
            EngineConfig::default(),
            Arc::new(StaticPermissions::allow_all()),
            Arc::new(TableResolver::default()),
            Arc::new(RecordingSink::new()),
        )
        .unwrap()
    }

    fn bounded(id: u32, x2: i32, y2: i32) -> Area {
        Area::bounded(
            AreaId(id),
            AreaKind::Normal,
            PlotRect::from_corners(PlotId::new(0, 0), PlotId::new(x2, y2)),
        )
    }

    #[test]
    fn allocate_claims_commits_and_releases_reservation() {
        let engine = engine();
        engine.insert_area(bounded(1, 4, 4));
        let grant = engine
            .allocate(AreaId(1), &AutoQuery::single(PlayerId(7)))
            .unwrap();
        assert_eq!(grant.len(), 1);
        let handle = engine.area(AreaId(1)).unwrap();
        let area = handle.lock().unwrap();
        assert!(area.plot(grant[0]).unwrap().is_owner(PlayerId(7)));
        assert!(!engine.ledger().is_reserved(AreaId(1), grant[0]));
    }

    #[test]
    fn allocate_unknown_area_is_typed() {
        let engine = engine();
        match engine.allocate(AreaId(9), &AutoQuery::single(PlayerId(1))) {
            Err(AllocError::UnknownArea { area }) => assert_eq!(area, AreaId(9)),
            other => panic!("expected UnknownArea, got {other:?}"),
        }
    }

    #[test]
    fn allocate_block_grants_full_rectangle() {
        let engine = engine();
        engine.insert_area(bounded(1, 7, 7));
        let grant = engine
            .allocate(AreaId(1), &AutoQuery::block(PlayerId(7), 2, 3))
            .unwrap();
        assert_eq!(grant.len(), 6);
        let handle = engine.area(AreaId(1)).unwrap();
        let area = handle.lock().unwrap();
        for id in grant {
            assert!(area.plot(id).unwrap().is_owner(PlayerId(7)));
        }
    }

    #[test]
    fn cluster_round_trip_through_facade() {
        let engine = engine();
        engine.insert_area(bounded(1, 9, 9));
        engine
            .create_cluster(AreaId(1), PlayerId(1), "farm", PlotId::new(0, 0), PlotId::new(2, 2))
            .unwrap();
        engine.invite(AreaId(1), PlayerId(1), "farm", PlayerId(2)).unwrap();
        engine
            .promote_helper(AreaId(1), PlayerId(1), "farm", PlayerId(2))
            .unwrap();
        assert_eq!(
            engine.cluster_members(AreaId(1), "farm").unwrap(),
            vec![PlayerId(1), PlayerId(2)]
        );
        engine.delete_cluster(AreaId(1), PlayerId(1), "farm").unwrap();
        match engine.cluster_members(AreaId(1), "farm") {
            Err(ClusterError::NotFound { .. }) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn invite_by_name_resolves_through_the_pipeline() {
        let resolver = TableResolver::default().with("alice", PlayerId(42));
        let engine = ClaimEngine::new(
            EngineConfig::default(),
            Arc::new(StaticPermissions::allow_all()),
            Arc::new(resolver),
            Arc::new(RecordingSink::new()),
        )
        .unwrap();
        engine.insert_area(bounded(1, 9, 9));
        engine
            .create_cluster(AreaId(1), PlayerId(1), "farm", PlotId::new(0, 0), PlotId::new(2, 2))
            .unwrap();
        engine
            .invite_by_name(AreaId(1), PlayerId(1), "farm", "alice")
            .unwrap();
        assert!(engine
            .cluster_members(AreaId(1), "farm")
            .unwrap()
            .contains(&PlayerId(42)));
        match engine.invite_by_name(AreaId(1), PlayerId(1), "farm", "bob") {
            Err(ClusterError::Resolve(_)) => {}
            other => panic!("expected Resolve, got {other:?}"),
        }
    }
}
