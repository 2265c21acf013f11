//! `spaceauth-authz` — role-based authorization for spaces, teams and clusters.
//!
//! Pure and synchronous: callers hand in snapshots they fetched themselves and
//! get back a role or a boolean. Nothing here performs IO or keeps state
//! between calls.

pub mod actions;
pub mod authorize;
pub mod model;
pub mod roles;
pub mod wire;

pub use actions::{K8sClusterAction, SpaceAction, TeamAction, UnknownAction};
pub use authorize::{Decision, Denied, Permissions, Reason};
pub use model::{
    ClusterMetadata, K8sCluster, RevokeInvitationContext, Space, SpaceKind, Team, TeamKind, User,
};
pub use roles::{ADMIN_OR_ABOVE, ANY_MEMBER, OWNER_ONLY, PrivilegeSet, Role, rank, resolve_role};
pub use wire::SnapshotError;
