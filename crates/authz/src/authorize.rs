use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

use spaceauth_core::{Entity, UserId};

use crate::actions::{K8sClusterAction, SpaceAction, TeamAction};
use crate::model::{K8sCluster, RevokeInvitationContext, Space, Team, TeamKind};
use crate::roles::{ADMIN_OR_ABOVE, ANY_MEMBER, OWNER_ONLY, PrivilegeSet, Role, resolve_role};

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The role meets the action's requirement.
    RoleGranted,
    /// The role is below the action's requirement.
    InsufficientRole,
    /// Personal spaces cannot be renamed or deleted.
    PersonalSpace,
    /// The Owner team of a personal space is never mutated.
    PersonalOwnerTeam,
    /// Only Owners may change Owner-team membership.
    OwnerTeamProtected,
    /// The user created the invitation being revoked.
    InvitationCreator,
    /// The user created the cluster.
    ClusterCreator,
    /// Dev clusters are private to their creator and admins.
    DevClusterRestricted,
    /// The action name is not part of the vocabulary.
    UnknownAction,
}

impl Reason {
    pub fn message(&self) -> &'static str {
        match self {
            Reason::RoleGranted => "role grants this action",
            Reason::InsufficientRole => "role does not grant this action",
            Reason::PersonalSpace => "personal spaces cannot be renamed or deleted",
            Reason::PersonalOwnerTeam => "the owner team of a personal space cannot be changed",
            Reason::OwnerTeamProtected => "only owners may change owner team membership",
            Reason::InvitationCreator => "user created this invitation",
            Reason::ClusterCreator => "user created this cluster",
            Reason::DevClusterRestricted => {
                "dev clusters are restricted to their creator and admins"
            }
            Reason::UnknownAction => "unknown action",
        }
    }
}

/// Outcome of a single authorization query, with the role it was based on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub action: Cow<'static, str>,
    pub role: Role,
    pub granted: bool,
    pub reason: Reason,
}

/// Returned by [`Decision::ensure_granted`] for callers that want `?`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("forbidden: '{action}' denied for role {role} ({})", .reason.message())]
pub struct Denied {
    pub action: Cow<'static, str>,
    pub role: Role,
    pub reason: Reason,
}

impl Decision {
    pub fn ensure_granted(self) -> Result<Self, Denied> {
        if self.granted {
            Ok(self)
        } else {
            Err(Denied {
                action: self.action,
                role: self.role,
                reason: self.reason,
            })
        }
    }
}

/// Intermediate verdict before it is attached to an action and role.
type Verdict = (bool, Reason);

const fn grant(reason: Reason) -> Verdict {
    (true, reason)
}

const fn deny(reason: Reason) -> Verdict {
    (false, reason)
}

const fn require(set: PrivilegeSet, role: Role) -> Verdict {
    if set.contains(role) {
        grant(Reason::RoleGranted)
    } else {
        deny(Reason::InsufficientRole)
    }
}

fn space_verdict(
    action: SpaceAction,
    space: &Space,
    role: Role,
    extra: Option<&RevokeInvitationContext>,
) -> Verdict {
    use SpaceAction::*;

    match action {
        // The personal-space guard runs before the role is consulted.
        DeleteSpace if space.is_personal() => deny(Reason::PersonalSpace),
        DeleteSpace => require(OWNER_ONLY, role),
        RenameSpace if space.is_personal() => deny(Reason::PersonalSpace),
        RenameSpace => require(ADMIN_OR_ABOVE, role),
        ChangeSpacePlan => require(OWNER_ONLY, role),
        CreateTeam
        | DeleteTeam
        | PatchTeam
        | PatchInvitation
        | CreateInvitation
        | PatchSpace
        | AddInvitationDomain
        | DeleteInvitationDomain
        | GetBillingPageToken => require(ADMIN_OR_ABOVE, role),
        RevokeInvitation => {
            if ADMIN_OR_ABOVE.contains(role) {
                grant(Reason::RoleGranted)
            } else if extra.is_some_and(RevokeInvitationContext::created_by_user) {
                grant(Reason::InvitationCreator)
            } else {
                deny(Reason::InsufficientRole)
            }
        }
    }
}

/// Rules depend on the kind of the team being mutated, not the actor's team.
fn team_verdict(action: TeamAction, space: &Space, team: &Team, actor_role: Role) -> Verdict {
    match action {
        TeamAction::AddUser | TeamAction::RemoveUser => match actor_role {
            Role::Owner if team.kind == TeamKind::Owner && space.is_personal() => {
                deny(Reason::PersonalOwnerTeam)
            }
            Role::Owner => grant(Reason::RoleGranted),
            Role::Admin if team.kind == TeamKind::Owner => deny(Reason::OwnerTeamProtected),
            Role::Admin => grant(Reason::RoleGranted),
            Role::Member | Role::None => deny(Reason::InsufficientRole),
        },
    }
}

fn cluster_verdict(
    action: K8sClusterAction,
    cluster: &K8sCluster,
    user_id: &UserId,
    role: Role,
) -> Verdict {
    let privileged = ADMIN_OR_ABOVE.contains(role);
    let is_creator = cluster.is_created_by(user_id);

    match action {
        K8sClusterAction::AccessK8sCluster if !cluster.is_dev_cluster() => {
            require(ANY_MEMBER, role)
        }
        K8sClusterAction::AccessK8sCluster | K8sClusterAction::DeleteK8sCluster => {
            if privileged {
                grant(Reason::RoleGranted)
            } else if is_creator {
                grant(Reason::ClusterCreator)
            } else if action == K8sClusterAction::AccessK8sCluster {
                deny(Reason::DevClusterRestricted)
            } else {
                deny(Reason::InsufficientRole)
            }
        }
    }
}

fn decide(
    action: impl Into<Cow<'static, str>>,
    role: Role,
    (granted, reason): Verdict,
) -> Decision {
    Decision {
        action: action.into(),
        role,
        granted,
        reason,
    }
}

fn log_decision<E: Entity>(decision: &Decision, space: &Space, target: &E, user_id: &UserId) {
    tracing::debug!(
        action = %decision.action,
        space_id = %space.id,
        target_id = %target.id(),
        user_id = %user_id,
        role = %decision.role,
        granted = decision.granted,
        reason = ?decision.reason,
        "authorization decision"
    );
}

/// Role-based authorization over caller-supplied snapshots.
///
/// - No IO
/// - No panics
/// - No state: every query recomputes the role from the snapshot it is given
///
/// The `space` passed in must have its teams fully expanded; a space loaded
/// without teams resolves every non-direct-owner to [`Role::None`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissions;

impl Permissions {
    pub fn new() -> Self {
        Self
    }

    pub fn get_role(&self, space: &Space, user_id: &UserId) -> Role {
        resolve_role(space, user_id)
    }

    /// `extra` is only consulted for [`SpaceAction::RevokeInvitation`].
    pub fn can_space(
        &self,
        action: SpaceAction,
        space: &Space,
        user_id: &UserId,
        extra: Option<&RevokeInvitationContext>,
    ) -> bool {
        self.explain_space(action, space, user_id, extra).granted
    }

    /// Compatibility alias for [`Permissions::can_space`].
    #[deprecated(note = "use `Permissions::can_space`")]
    pub fn can_i(
        &self,
        action: SpaceAction,
        space: &Space,
        user_id: &UserId,
        extra: Option<&RevokeInvitationContext>,
    ) -> bool {
        self.can_space(action, space, user_id, extra)
    }

    pub fn explain_space(
        &self,
        action: SpaceAction,
        space: &Space,
        user_id: &UserId,
        extra: Option<&RevokeInvitationContext>,
    ) -> Decision {
        let role = resolve_role(space, user_id);
        let decision = decide(
            action.as_str(),
            role,
            space_verdict(action, space, role, extra),
        );
        log_decision(&decision, space, space, user_id);
        decision
    }

    /// Like [`Permissions::can_space`], for callers holding a raw action name.
    /// Unknown names are denied.
    pub fn can_space_named(
        &self,
        action: &str,
        space: &Space,
        user_id: &UserId,
        extra: Option<&RevokeInvitationContext>,
    ) -> bool {
        self.explain_space_named(action, space, user_id, extra).granted
    }

    pub fn explain_space_named(
        &self,
        action: &str,
        space: &Space,
        user_id: &UserId,
        extra: Option<&RevokeInvitationContext>,
    ) -> Decision {
        match action.parse::<SpaceAction>() {
            Ok(action) => self.explain_space(action, space, user_id, extra),
            Err(_) => self.unknown_action(action, space, user_id),
        }
    }

    /// `target_user_id` is accepted for symmetry with the API; the rules do
    /// not depend on who is being added or removed.
    pub fn can_team(
        &self,
        action: TeamAction,
        space: &Space,
        team: &Team,
        acting_user_id: &UserId,
        target_user_id: Option<&UserId>,
    ) -> bool {
        self.explain_team(action, space, team, acting_user_id, target_user_id).granted
    }

    pub fn explain_team(
        &self,
        action: TeamAction,
        space: &Space,
        team: &Team,
        acting_user_id: &UserId,
        target_user_id: Option<&UserId>,
    ) -> Decision {
        if team.space_id != space.id {
            tracing::warn!(
                team_id = %team.id,
                team_space_id = %team.space_id,
                space_id = %space.id,
                "team does not belong to the supplied space"
            );
        }

        let actor_role = resolve_role(space, acting_user_id);
        let decision = decide(
            action.as_str(),
            actor_role,
            team_verdict(action, space, team, actor_role),
        );
        tracing::trace!(
            team_kind = ?team.kind,
            target_user_id = target_user_id.map(UserId::as_str),
            "team membership check"
        );
        log_decision(&decision, space, team, acting_user_id);
        decision
    }

    pub fn can_team_named(
        &self,
        action: &str,
        space: &Space,
        team: &Team,
        acting_user_id: &UserId,
        target_user_id: Option<&UserId>,
    ) -> bool {
        match action.parse::<TeamAction>() {
            Ok(action) => self.can_team(action, space, team, acting_user_id, target_user_id),
            Err(_) => self.unknown_action(action, space, acting_user_id).granted,
        }
    }

    pub fn can_k8s_cluster(
        &self,
        action: K8sClusterAction,
        space: &Space,
        cluster: &K8sCluster,
        user_id: &UserId,
    ) -> bool {
        self.explain_k8s_cluster(action, space, cluster, user_id).granted
    }

    pub fn explain_k8s_cluster(
        &self,
        action: K8sClusterAction,
        space: &Space,
        cluster: &K8sCluster,
        user_id: &UserId,
    ) -> Decision {
        let role = resolve_role(space, user_id);
        let decision = decide(
            action.as_str(),
            role,
            cluster_verdict(action, cluster, user_id, role),
        );
        log_decision(&decision, space, cluster, user_id);
        decision
    }

    pub fn can_k8s_cluster_named(
        &self,
        action: &str,
        space: &Space,
        cluster: &K8sCluster,
        user_id: &UserId,
    ) -> bool {
        match action.parse::<K8sClusterAction>() {
            Ok(action) => self.can_k8s_cluster(action, space, cluster, user_id),
            Err(_) => self.unknown_action(action, space, user_id).granted,
        }
    }

    fn unknown_action(&self, action: &str, space: &Space, user_id: &UserId) -> Decision {
        let role = resolve_role(space, user_id);
        let decision = decide(action.to_string(), role, deny(Reason::UnknownAction));
        log_decision(&decision, space, space, user_id);
        decision
    }
}
