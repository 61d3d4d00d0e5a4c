//! Cluster lifecycle: create, resize, delete, and membership.
//!
//! Every operation validates fully before the first write; the only
//! partial effect a failure can leave behind is in the durable sink,
//! which is surfaced unmodified and never rolled back.

use crate::config::EngineConfig;
use parcel_area::{Area, Cluster, CommitSink, Departure};
use parcel_core::{Capability, ClusterError, PermissionOracle, PlayerId, PlotId};
use parcel_grid::PlotRect;

const MAX_NAME_LEN: usize = 32;

/// The collaborators every lifecycle operation consults.
///
/// Borrowed for the duration of one call; the caller holds the area lock.
pub struct ClusterOps<'a> {
    permissions: &'a dyn PermissionOracle,
    sink: &'a dyn CommitSink,
    config: &'a EngineConfig,
}

impl<'a> ClusterOps<'a> {
    /// Bundle the collaborators for a batch of operations.
    pub fn new(
        permissions: &'a dyn PermissionOracle,
        sink: &'a dyn CommitSink,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            permissions,
            sink,
            config,
        }
    }

    /// Create a cluster over the rectangle spanned by two corners.
    ///
    /// Owners of plots already inside the rectangle are auto-invited so
    /// the overlay never silently strips anyone of access.
    pub fn create(
        &self,
        area: &mut Area,
        actor: PlayerId,
        name: &str,
        corner_a: PlotId,
        corner_b: PlotId,
    ) -> Result<(), ClusterError> {
        validate_name(name)?;
        self.require(actor, Capability::ClusterCreate)?;
        let rect = PlotRect::from_corners(corner_a, corner_b);
        if area.cluster(name).is_some() {
            return Err(ClusterError::NameTaken {
                name: name.to_string(),
            });
        }
        if !area.contains_rect(&rect) {
            return Err(ClusterError::OutOfBounds {
                min: rect.min(),
                max: rect.max(),
            });
        }
        if let Some(existing) = area.first_intersecting_cluster(&rect) {
            return Err(intersection(existing));
        }
        let foreign_owned = area
            .owned_in(&rect)
            .any(|plot| !plot.is_owner(actor));
        if foreign_owned && !self.permissions.has_capability(actor, Capability::ClusterCreateOther)
        {
            return Err(ClusterError::PermissionDenied {
                capability: Capability::ClusterCreateOther,
            });
        }
        let current = area.claimed_cluster_area(actor);
        let allowed = self.allowance(actor);
        if current + rect.area() > allowed {
            return Err(ClusterError::QuotaExceeded {
                current,
                requested: rect.area() as i64,
                allowed,
            });
        }

        let invitees: Vec<PlayerId> = {
            let mut owners: Vec<PlayerId> = area
                .owned_in(&rect)
                .flat_map(|plot| plot.owners().iter().copied())
                .filter(|owner| *owner != actor)
                .collect();
            owners.sort_unstable();
            owners.dedup();
            owners
        };
        area.insert_cluster(Cluster::new(name, rect, actor));
        tracing::info!("created cluster '{}' {} in area {}", name, rect, area.id());
        self.sink.create_cluster(area.id(), name, rect, actor)?;
        for invitee in invitees {
            if area.cluster_add_invited(name, invitee) {
                self.sink.add_invited(area.id(), name, invitee)?;
            }
        }
        Ok(())
    }

    /// Replace the cluster's rectangle. All-or-nothing: every check runs
    /// before any mutation.
    ///
    /// A growing rectangle is charged against the cluster *owner's* quota
    /// allowance, not the acting helper's; the owner holds the claimed area.
    pub fn resize(
        &self,
        area: &mut Area,
        actor: PlayerId,
        name: &str,
        corner_a: PlotId,
        corner_b: PlotId,
    ) -> Result<(), ClusterError> {
        let new = PlotRect::from_corners(corner_a, corner_b);
        let (old, owner) = {
            let cluster = self.managed(area, actor, name, Capability::ClusterResize, Capability::ClusterResizeOther)?;
            (cluster.rect(), cluster.owner())
        };
        if !area.contains_rect(&new) {
            return Err(ClusterError::OutOfBounds {
                min: new.min(),
                max: new.max(),
            });
        }
        // Cells leaving and cells entering are gated independently.
        if !new.contains_rect(&old) {
            self.require(actor, Capability::ClusterResizeShrink)?;
        }
        if !old.contains_rect(&new) {
            self.require(actor, Capability::ClusterResizeExpand)?;
        }
        if let Some(existing) = area
            .clusters()
            .find(|c| c.name() != name && c.rect().intersects(&new))
        {
            return Err(intersection(existing));
        }
        let delta = new.area() as i64 - old.area() as i64;
        if delta > 0 {
            let current = area.claimed_cluster_area(owner);
            let allowed = self.allowance(owner);
            if current as i64 + delta > allowed as i64 {
                return Err(ClusterError::QuotaExceeded {
                    current,
                    requested: delta,
                    allowed,
                });
            }
        }
        area.resize_cluster(name, new);
        tracing::info!("resized cluster '{}' to {} in area {}", name, new, area.id());
        self.sink.resize_cluster(area.id(), name, new)?;
        Ok(())
    }

    /// Remove the cluster record and its membership sets. Plot ownership
    /// inside the rectangle is untouched.
    pub fn delete(&self, area: &mut Area, actor: PlayerId, name: &str) -> Result<(), ClusterError> {
        let cluster = found(area, name)?;
        if cluster.owner() == actor {
            self.require(actor, Capability::ClusterDelete)?;
        } else {
            self.require(actor, Capability::ClusterDeleteOther)?;
        }
        area.remove_cluster(name);
        tracing::info!("deleted cluster '{}' in area {}", name, area.id());
        self.sink.delete_cluster(area.id(), name)?;
        Ok(())
    }

    /// Add `target` to the cluster's invited set.
    pub fn invite(
        &self,
        area: &mut Area,
        actor: PlayerId,
        name: &str,
        target: PlayerId,
    ) -> Result<(), ClusterError> {
        let cluster = self.managed(area, actor, name, Capability::ClusterInvite, Capability::ClusterInviteOther)?;
        if cluster.is_member(target) {
            return Err(ClusterError::Validation {
                reason: format!("{target} is already a member"),
            });
        }
        area.cluster_add_invited(name, target);
        tracing::info!("invited {} to cluster '{}' in area {}", target, name, area.id());
        self.sink.add_invited(area.id(), name, target)?;
        Ok(())
    }

    /// Remove `target` from the cluster and hand off their plots inside
    /// its rectangle.
    pub fn kick(
        &self,
        area: &mut Area,
        actor: PlayerId,
        name: &str,
        target: PlayerId,
    ) -> Result<(), ClusterError> {
        let cluster = self.managed(area, actor, name, Capability::ClusterKick, Capability::ClusterKickOther)?;
        if target == actor {
            return Err(ClusterError::Validation {
                reason: "cannot kick yourself; leave instead".to_string(),
            });
        }
        if target == cluster.owner() {
            return Err(ClusterError::OwnerImmutable);
        }
        if !cluster.is_member(target) {
            return Err(ClusterError::NotMember { player: target });
        }
        self.depart(area, name, target)?;
        tracing::info!("kicked {} from cluster '{}' in area {}", target, name, area.id());
        Ok(())
    }

    /// Voluntary departure; same plot handoff as a kick.
    pub fn leave(&self, area: &mut Area, actor: PlayerId, name: &str) -> Result<(), ClusterError> {
        let cluster = found(area, name)?;
        self.require(actor, Capability::ClusterLeave)?;
        if actor == cluster.owner() {
            return Err(ClusterError::OwnerImmutable);
        }
        if !cluster.is_member(actor) {
            return Err(ClusterError::NotMember { player: actor });
        }
        self.depart(area, name, actor)?;
        tracing::info!("{} left cluster '{}' in area {}", actor, name, area.id());
        Ok(())
    }

    /// Promote an invited member to helper.
    pub fn promote_helper(
        &self,
        area: &mut Area,
        actor: PlayerId,
        name: &str,
        target: PlayerId,
    ) -> Result<(), ClusterError> {
        let cluster = self.helpers_gate(area, actor, name)?;
        if !cluster.is_member(target) {
            return Err(ClusterError::NotMember { player: target });
        }
        if target == cluster.owner() {
            return Err(ClusterError::Validation {
                reason: "the owner already holds every right".to_string(),
            });
        }
        area.cluster_add_helper(name, target);
        tracing::info!("promoted {} to helper in cluster '{}'", target, name);
        self.sink.add_helper(area.id(), name, target)?;
        Ok(())
    }

    /// Demote a helper back to plain membership.
    pub fn demote_helper(
        &self,
        area: &mut Area,
        actor: PlayerId,
        name: &str,
        target: PlayerId,
    ) -> Result<(), ClusterError> {
        let cluster = self.helpers_gate(area, actor, name)?;
        if !cluster.helpers().contains(&target) {
            return Err(ClusterError::Validation {
                reason: format!("{target} is not a helper"),
            });
        }
        area.cluster_remove_helper(name, target);
        tracing::info!("demoted helper {} in cluster '{}'", target, name);
        self.sink.remove_helper(area.id(), name, target)?;
        Ok(())
    }

    // ── Shared gates ───────────────────────────────────────────────

    fn require(&self, actor: PlayerId, capability: Capability) -> Result<(), ClusterError> {
        if self.permissions.has_capability(actor, capability) {
            Ok(())
        } else {
            Err(ClusterError::PermissionDenied { capability })
        }
    }

    fn allowance(&self, actor: PlayerId) -> u64 {
        self.permissions
            .allowance_for(actor, Capability::ClusterQuota, self.config.quota_ceiling)
    }

    /// Look up the cluster and gate on `base` capability plus management
    /// standing: helper rights on the cluster, or the elevated `other`
    /// capability.
    fn managed<'b>(
        &self,
        area: &'b Area,
        actor: PlayerId,
        name: &str,
        base: Capability,
        other: Capability,
    ) -> Result<&'b Cluster, ClusterError> {
        let cluster = found(area, name)?;
        self.require(actor, base)?;
        if !cluster.has_helper_rights(actor) && !self.permissions.has_capability(actor, other) {
            return Err(ClusterError::PermissionDenied { capability: other });
        }
        Ok(cluster)
    }

    fn helpers_gate<'b>(
        &self,
        area: &'b Area,
        actor: PlayerId,
        name: &str,
    ) -> Result<&'b Cluster, ClusterError> {
        let cluster = found(area, name)?;
        self.require(actor, Capability::ClusterHelpers)?;
        if !cluster.has_helper_rights(actor) {
            return Err(ClusterError::PermissionDenied {
                capability: Capability::ClusterHelpers,
            });
        }
        Ok(cluster)
    }

    /// Strip membership and hand off the departing player's plots inside
    /// the cluster rectangle: sole-owned cells revert to unclaimed,
    /// co-owned cells pass to the lowest remaining co-owner.
    fn depart(&self, area: &mut Area, name: &str, player: PlayerId) -> Result<(), ClusterError> {
        let rect = found(area, name)?.rect();
        area.cluster_remove_member(name, player);
        let held: Vec<PlotId> = area
            .owned_in(&rect)
            .filter(|plot| plot.is_owner(player))
            .map(|plot| plot.id())
            .collect();
        self.sink.remove_member(area.id(), name, player)?;
        for id in held {
            match area.remove_owner(id, player) {
                Some(Departure::Unclaimed) => self.sink.clear_plot(area.id(), id)?,
                Some(Departure::TransferredTo(_)) => {
                    let owners = area
                        .plot(id)
                        .map(|plot| plot.owners().to_vec())
                        .unwrap_or_default();
                    self.sink.set_plot_owners(area.id(), id, &owners)?;
                }
                None => {}
            }
        }
        Ok(())
    }
}

fn found<'a>(area: &'a Area, name: &str) -> Result<&'a Cluster, ClusterError> {
    area.cluster(name).ok_or_else(|| ClusterError::NotFound {
        name: name.to_string(),
    })
}

fn intersection(existing: &Cluster) -> ClusterError {
    ClusterError::Intersection {
        existing: existing.name().to_string(),
        min: existing.rect().min(),
        max: existing.rect().max(),
    }
}

fn validate_name(name: &str) -> Result<(), ClusterError> {
    if name.is_empty() {
        return Err(ClusterError::Validation {
            reason: "cluster name is empty".to_string(),
        });
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ClusterError::Validation {
            reason: format!("cluster name exceeds {MAX_NAME_LEN} characters"),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ClusterError::Validation {
            reason: "cluster name may only contain [A-Za-z0-9_-]".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_area::AreaKind;
    use parcel_core::AreaId;
    use parcel_test_utils::{RecordingSink, StaticPermissions};

    fn area() -> Area {
        Area::unbounded(AreaId(0), AreaKind::Normal)
    }

    fn id(x: i32, y: i32) -> PlotId {
        PlotId::new(x, y)
    }

    #[test]
    fn create_then_duplicate_name_fails() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "farm", id(0, 0), id(2, 2))
            .unwrap();
        match ops.create(&mut area, PlayerId(2), "farm", id(10, 10), id(12, 12)) {
            Err(ClusterError::NameTaken { name }) => assert_eq!(name, "farm"),
            other => panic!("expected NameTaken, got {other:?}"),
        }
    }

    #[test]
    fn adjacent_clusters_coexist_overlap_rejected() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        ops.create(&mut area, PlayerId(1), "b", id(3, 3), id(5, 5))
            .unwrap();
        match ops.create(&mut area, PlayerId(1), "c", id(1, 1), id(4, 4)) {
            Err(ClusterError::Intersection { .. }) => {}
            other => panic!("expected Intersection, got {other:?}"),
        }
    }

    #[test]
    fn create_over_foreign_plots_needs_elevated_capability() {
        let mut area = area();
        area.claim(id(1, 1), PlayerId(9));
        let perms = StaticPermissions::allow_all_except(Capability::ClusterCreateOther);
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        match ops.create(&mut area, PlayerId(1), "farm", id(0, 0), id(2, 2)) {
            Err(ClusterError::PermissionDenied { capability }) => {
                assert_eq!(capability, Capability::ClusterCreateOther);
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn create_auto_invites_foreign_owners() {
        let mut area = area();
        area.claim(id(1, 1), PlayerId(9));
        area.claim(id(2, 2), PlayerId(9));
        area.claim(id(0, 0), PlayerId(1));
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "farm", id(0, 0), id(2, 2))
            .unwrap();
        let cluster = area.cluster("farm").unwrap();
        assert!(cluster.invited().contains(&PlayerId(9)));
        assert!(!cluster.invited().contains(&PlayerId(1)));
        assert_eq!(sink.invited_of("farm"), vec![PlayerId(9)]);
    }

    #[test]
    fn quota_rejects_excess_total_area() {
        let mut area = area();
        let perms = StaticPermissions::allow_all().with_allowance(10);
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap(); // 9 cells
        match ops.create(&mut area, PlayerId(1), "b", id(10, 10), id(11, 10)) {
            Err(ClusterError::QuotaExceeded {
                current,
                requested,
                allowed,
            }) => {
                assert_eq!(current, 9);
                assert_eq!(requested, 2);
                assert_eq!(allowed, 10);
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
        // A second player has their own budget.
        ops.create(&mut area, PlayerId(2), "b", id(10, 10), id(11, 10))
            .unwrap();
    }

    #[test]
    fn malformed_names_rejected() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        for bad in ["", "has space", "semi;colon"] {
            match ops.create(&mut area, PlayerId(1), bad, id(0, 0), id(1, 1)) {
                Err(ClusterError::Validation { .. }) => {}
                other => panic!("expected Validation for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn resize_is_all_or_nothing_on_intersection() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        ops.create(&mut area, PlayerId(1), "b", id(5, 5), id(7, 7))
            .unwrap();
        match ops.resize(&mut area, PlayerId(1), "a", id(0, 0), id(6, 6)) {
            Err(ClusterError::Intersection { existing, .. }) => assert_eq!(existing, "b"),
            other => panic!("expected Intersection, got {other:?}"),
        }
        assert_eq!(
            area.cluster("a").unwrap().rect(),
            PlotRect::from_corners(id(0, 0), id(2, 2))
        );
    }

    #[test]
    fn resize_shrink_needs_shrink_capability() {
        let mut area = area();
        let perms = StaticPermissions::allow_all_except(Capability::ClusterResizeShrink);
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(4, 4))
            .unwrap();
        match ops.resize(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2)) {
            Err(ClusterError::PermissionDenied { capability }) => {
                assert_eq!(capability, Capability::ClusterResizeShrink);
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
        // Pure expansion does not need the shrink right.
        ops.resize(&mut area, PlayerId(1), "a", id(0, 0), id(5, 5))
            .unwrap();
    }

    #[test]
    fn resize_to_identical_rectangle_needs_neither_gate() {
        let mut area = area();
        let perms = StaticPermissions::allow_all_except(Capability::ClusterResizeShrink)
            .deny(Capability::ClusterResizeExpand);
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        // No cell enters or leaves, so neither directional right applies.
        ops.resize(&mut area, PlayerId(1), "a", id(2, 2), id(0, 0))
            .unwrap();
        assert_eq!(
            area.cluster("a").unwrap().rect(),
            PlotRect::from_corners(id(0, 0), id(2, 2))
        );
    }

    #[test]
    fn resize_quota_uses_signed_delta() {
        let mut area = area();
        let perms = StaticPermissions::allow_all().with_allowance(9);
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap(); // exactly at the allowance
        match ops.resize(&mut area, PlayerId(1), "a", id(0, 0), id(3, 2)) {
            Err(ClusterError::QuotaExceeded { requested, .. }) => assert_eq!(requested, 3),
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
        // Shrinking is always within quota.
        ops.resize(&mut area, PlayerId(1), "a", id(0, 0), id(1, 1))
            .unwrap();
    }

    #[test]
    fn delete_by_non_owner_needs_elevated_capability() {
        let mut area = area();
        let perms = StaticPermissions::allow_all_except(Capability::ClusterDeleteOther);
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        match ops.delete(&mut area, PlayerId(2), "a") {
            Err(ClusterError::PermissionDenied { capability }) => {
                assert_eq!(capability, Capability::ClusterDeleteOther);
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
        ops.delete(&mut area, PlayerId(1), "a").unwrap();
        assert!(area.cluster("a").is_none());
    }

    #[test]
    fn delete_keeps_plot_ownership() {
        let mut area = area();
        area.claim(id(1, 1), PlayerId(2));
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        ops.delete(&mut area, PlayerId(1), "a").unwrap();
        assert!(area.plot(id(1, 1)).unwrap().is_owner(PlayerId(2)));
    }

    #[test]
    fn owner_cannot_be_kicked_or_leave() {
        let mut area = area();
        let perms = StaticPermissions::allow_all_except(Capability::ClusterKickOther);
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        ops.invite(&mut area, PlayerId(1), "a", PlayerId(2)).unwrap();
        match ops.kick(&mut area, PlayerId(2), "a", PlayerId(1)) {
            // Player 2 is a plain member without helper rights.
            Err(ClusterError::PermissionDenied { .. }) => {}
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
        ops.promote_helper(&mut area, PlayerId(1), "a", PlayerId(2))
            .unwrap();
        match ops.kick(&mut area, PlayerId(2), "a", PlayerId(1)) {
            Err(ClusterError::OwnerImmutable) => {}
            other => panic!("expected OwnerImmutable, got {other:?}"),
        }
        match ops.leave(&mut area, PlayerId(1), "a") {
            Err(ClusterError::OwnerImmutable) => {}
            other => panic!("expected OwnerImmutable, got {other:?}"),
        }
    }

    #[test]
    fn self_kick_rejected() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        match ops.kick(&mut area, PlayerId(1), "a", PlayerId(1)) {
            Err(ClusterError::Validation { .. }) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn departure_hands_off_or_unclaims_plots() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(4, 4))
            .unwrap();
        ops.invite(&mut area, PlayerId(1), "a", PlayerId(2)).unwrap();
        // One sole-owned plot, one co-owned plot, one outside the rect.
        area.claim(id(1, 1), PlayerId(2));
        area.claim(id(2, 2), PlayerId(2));
        area.add_owner(id(2, 2), PlayerId(3));
        area.claim(id(9, 9), PlayerId(2));
        ops.leave(&mut area, PlayerId(2), "a").unwrap();
        assert!(area.plot(id(1, 1)).is_none());
        assert_eq!(area.plot(id(2, 2)).unwrap().owners(), &[PlayerId(3)]);
        assert!(area.plot(id(9, 9)).unwrap().is_owner(PlayerId(2)));
        assert!(!area.cluster("a").unwrap().is_member(PlayerId(2)));
    }

    #[test]
    fn kick_of_non_member_fails() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        match ops.kick(&mut area, PlayerId(1), "a", PlayerId(5)) {
            Err(ClusterError::NotMember { player }) => assert_eq!(player, PlayerId(5)),
            other => panic!("expected NotMember, got {other:?}"),
        }
    }

    #[test]
    fn demote_requires_existing_helper() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::new();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2))
            .unwrap();
        ops.invite(&mut area, PlayerId(1), "a", PlayerId(2)).unwrap();
        match ops.demote_helper(&mut area, PlayerId(1), "a", PlayerId(2)) {
            Err(ClusterError::Validation { .. }) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
        ops.promote_helper(&mut area, PlayerId(1), "a", PlayerId(2))
            .unwrap();
        ops.demote_helper(&mut area, PlayerId(1), "a", PlayerId(2))
            .unwrap();
        assert!(!area.cluster("a").unwrap().has_helper_rights(PlayerId(2)));
    }

    #[test]
    fn commit_fault_surfaces_without_rollback() {
        let mut area = area();
        let perms = StaticPermissions::allow_all();
        let sink = RecordingSink::failing();
        let cfg = EngineConfig::default();
        let ops = ClusterOps::new(&perms, &sink, &cfg);
        match ops.create(&mut area, PlayerId(1), "a", id(0, 0), id(2, 2)) {
            Err(ClusterError::Commit(_)) => {}
            other => panic!("expected Commit, got {other:?}"),
        }
        // In-memory state was applied before the sink refused.
        assert!(area.cluster("a").is_some());
    }
}
