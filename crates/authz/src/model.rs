//! Normalized snapshot types consumed by the authorization engine.
//!
//! These are plain values owned by the caller. Every collection is
//! non-optional; absent fields are normalized to empty collections by
//! [`crate::wire`] before they reach this layer.

use serde::{Deserialize, Serialize};

use spaceauth_core::{ClusterId, Entity, InvitationId, SpaceId, TeamId, UserId};

/// Label value marking a cluster as a dev cluster.
pub const DEV_CLUSTER_LABEL_VALUE: &str = "true";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
}

impl User {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self { id: id.into() }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Privilege kind attached to a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamKind {
    Owner,
    Admin,
    Normal,
}

/// A named group of users within a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub kind: TeamKind,
    pub users: Vec<User>,
    pub space_id: SpaceId,
}

impl Team {
    /// Membership is by user id; duplicate entries are harmless.
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.users.iter().any(|u| &u.id == user_id)
    }
}

impl Entity for Team {
    type Id = TeamId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceKind {
    Personal,
    Team,
}

/// A tenant workspace and its fully expanded team hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    pub kind: SpaceKind,
    /// Direct owner outside the team system (legacy ownership path).
    pub owner_id: Option<UserId>,
    pub teams: Vec<Team>,
}

impl Space {
    pub fn is_personal(&self) -> bool {
        self.kind == SpaceKind::Personal
    }

    /// Teams of the given kind. A space normally has at most one Owner and
    /// one Admin team but callers must not rely on it.
    pub fn teams_of_kind(&self, kind: TeamKind) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(move |t| t.kind == kind)
    }
}

impl Entity for Space {
    type Id = SpaceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Optional cluster metadata. Only the dev-cluster label is meaningful here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterMetadata {
    pub dev_cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct K8sCluster {
    pub id: ClusterId,
    pub created_by_id: UserId,
    pub kind: String,
    pub metadata: ClusterMetadata,
}

impl K8sCluster {
    /// A dev cluster carries the string label `devCluster: "true"`. Any other
    /// value, including `"True"` or `"1"`, is a regular cluster.
    pub fn is_dev_cluster(&self) -> bool {
        self.metadata.dev_cluster.as_deref() == Some(DEV_CLUSTER_LABEL_VALUE)
    }

    pub fn is_created_by(&self, user_id: &UserId) -> bool {
        &self.created_by_id == user_id
    }
}

impl Entity for K8sCluster {
    type Id = ClusterId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Extra input for `RevokeInvitation`.
///
/// The caller resolves which invitations the acting user created, so the
/// engine never has to fetch invitations itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeInvitationContext {
    pub invitation_id: InvitationId,
    pub invitation_ids_created_by_user_id: Vec<InvitationId>,
}

impl RevokeInvitationContext {
    pub fn new(
        invitation_id: impl Into<InvitationId>,
        invitation_ids_created_by_user_id: impl IntoIterator<Item = InvitationId>,
    ) -> Self {
        Self {
            invitation_id: invitation_id.into(),
            invitation_ids_created_by_user_id: invitation_ids_created_by_user_id
                .into_iter()
                .collect(),
        }
    }

    pub fn created_by_user(&self) -> bool {
        self.invitation_ids_created_by_user_id.contains(&self.invitation_id)
    }
}
