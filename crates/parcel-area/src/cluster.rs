//! A named rectangular grouping of plots with role-based membership.

use indexmap::IndexSet;
use parcel_core::PlayerId;
use parcel_grid::PlotRect;
use std::fmt;

/// A management overlay over a rectangle of plots.
///
/// Exactly one distinguished owner; two further role sets, `helpers`
/// (owner-delegated rights) and `invited` (plain members). The rectangle
/// never intersects another cluster in the same area, and the cluster does
/// not own the plots inside it — plot ownership is independent.
#[derive(Clone, Debug)]
pub struct Cluster {
    name: String,
    rect: PlotRect,
    owner: PlayerId,
    helpers: IndexSet<PlayerId>,
    invited: IndexSet<PlayerId>,
}

impl Cluster {
    /// A fresh cluster with empty role sets.
    pub fn new(name: impl Into<String>, rect: PlotRect, owner: PlayerId) -> Self {
        Self {
            name: name.into(),
            rect,
            owner,
            helpers: IndexSet::new(),
            invited: IndexSet::new(),
        }
    }

    /// Unique name within the area.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The covered rectangle.
    pub fn rect(&self) -> PlotRect {
        self.rect
    }

    /// The distinguished owner. Immutable short of deleting the cluster.
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Helpers, in insertion order.
    pub fn helpers(&self) -> &IndexSet<PlayerId> {
        &self.helpers
    }

    /// Invited members, in insertion order.
    pub fn invited(&self) -> &IndexSet<PlayerId> {
        &self.invited
    }

    /// Owner, helper, or invited.
    pub fn is_member(&self, player: PlayerId) -> bool {
        player == self.owner || self.helpers.contains(&player) || self.invited.contains(&player)
    }

    /// Owner or helper: the roles allowed to run owner-delegated actions.
    pub fn has_helper_rights(&self, player: PlayerId) -> bool {
        player == self.owner || self.helpers.contains(&player)
    }

    /// Number of cells the rectangle covers; the quota unit.
    pub fn claimed_area(&self) -> u64 {
        self.rect.area()
    }

    pub(crate) fn set_rect(&mut self, rect: PlotRect) {
        self.rect = rect;
    }

    pub(crate) fn add_invited(&mut self, player: PlayerId) -> bool {
        self.invited.insert(player)
    }

    pub(crate) fn remove_invited(&mut self, player: PlayerId) -> bool {
        self.invited.shift_remove(&player)
    }

    pub(crate) fn add_helper(&mut self, player: PlayerId) -> bool {
        self.helpers.insert(player)
    }

    pub(crate) fn remove_helper(&mut self, player: PlayerId) -> bool {
        self.helpers.shift_remove(&player)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.name, self.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_core::PlotId;

    fn cluster() -> Cluster {
        Cluster::new(
            "farm",
            PlotRect::from_corners(PlotId::new(0, 0), PlotId::new(2, 2)),
            PlayerId(1),
        )
    }

    #[test]
    fn owner_is_always_a_member_with_helper_rights() {
        let c = cluster();
        assert!(c.is_member(PlayerId(1)));
        assert!(c.has_helper_rights(PlayerId(1)));
        assert!(!c.is_member(PlayerId(2)));
    }

    #[test]
    fn invited_members_lack_helper_rights() {
        let mut c = cluster();
        c.add_invited(PlayerId(2));
        assert!(c.is_member(PlayerId(2)));
        assert!(!c.has_helper_rights(PlayerId(2)));
        c.add_helper(PlayerId(2));
        assert!(c.has_helper_rights(PlayerId(2)));
    }

    #[test]
    fn claimed_area_is_rect_area() {
        assert_eq!(cluster().claimed_area(), 9);
    }
}
