//! The capability model consulted through the permission oracle.

use std::fmt;

/// A discrete right an actor may hold.
///
/// Capabilities are pure query keys: the engine asks the
/// [`PermissionOracle`](crate::PermissionOracle) whether an actor holds one
/// and never caches the answer. The `*Other` variants are the elevated
/// forms that let an actor operate on clusters or plots they do not own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create a cluster.
    ClusterCreate,
    /// Create a cluster over plots owned by other players.
    ClusterCreateOther,
    /// Delete a cluster the actor owns.
    ClusterDelete,
    /// Delete any cluster.
    ClusterDeleteOther,
    /// Resize a cluster the actor helps manage.
    ClusterResize,
    /// Resize any cluster.
    ClusterResizeOther,
    /// Shrink a cluster (cells leaving the rectangle).
    ClusterResizeShrink,
    /// Expand a cluster (cells entering the rectangle).
    ClusterResizeExpand,
    /// Invite a player to a cluster.
    ClusterInvite,
    /// Invite on clusters the actor does not help manage.
    ClusterInviteOther,
    /// Kick a member from a cluster.
    ClusterKick,
    /// Kick on clusters the actor does not help manage.
    ClusterKickOther,
    /// Leave a cluster voluntarily.
    ClusterLeave,
    /// Promote or demote cluster helpers.
    ClusterHelpers,
    /// Quota key: the allowance query for total claimed cluster area.
    ClusterQuota,
}

impl Capability {
    /// The permission-node spelling used by oracles keyed on strings.
    pub fn node(self) -> &'static str {
        match self {
            Self::ClusterCreate => "cluster.create",
            Self::ClusterCreateOther => "cluster.create.other",
            Self::ClusterDelete => "cluster.delete",
            Self::ClusterDeleteOther => "cluster.delete.other",
            Self::ClusterResize => "cluster.resize",
            Self::ClusterResizeOther => "cluster.resize.other",
            Self::ClusterResizeShrink => "cluster.resize.shrink",
            Self::ClusterResizeExpand => "cluster.resize.expand",
            Self::ClusterInvite => "cluster.invite",
            Self::ClusterInviteOther => "cluster.invite.other",
            Self::ClusterKick => "cluster.kick",
            Self::ClusterKickOther => "cluster.kick.other",
            Self::ClusterLeave => "cluster.leave",
            Self::ClusterHelpers => "cluster.helpers",
            Self::ClusterQuota => "cluster.quota",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_spelling_matches_display() {
        assert_eq!(
            Capability::ClusterCreateOther.to_string(),
            "cluster.create.other"
        );
        assert_eq!(Capability::ClusterQuota.node(), "cluster.quota");
    }
}
