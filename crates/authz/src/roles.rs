//! Role derivation from team membership.

use serde::{Deserialize, Serialize};

use spaceauth_core::UserId;

use crate::model::{Space, TeamKind};

/// A user's effective privilege level within one space.
///
/// Never stored: always recomputed from the current team snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Admin,
    Member,
    None,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Admin => "Admin",
            Role::Member => "Member",
            Role::None => "None",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal ranking of roles; higher is more privileged.
pub const fn rank(role: Role) -> u8 {
    match role {
        Role::Owner => 3,
        Role::Admin => 2,
        Role::Member => 1,
        Role::None => 0,
    }
}

/// The set of roles at or above a minimum rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegeSet {
    min_rank: u8,
}

impl PrivilegeSet {
    pub const fn at_least(role: Role) -> Self {
        Self {
            min_rank: rank(role),
        }
    }

    pub const fn contains(&self, role: Role) -> bool {
        rank(role) >= self.min_rank
    }
}

pub const OWNER_ONLY: PrivilegeSet = PrivilegeSet::at_least(Role::Owner);
pub const ADMIN_OR_ABOVE: PrivilegeSet = PrivilegeSet::at_least(Role::Admin);
pub const ANY_MEMBER: PrivilegeSet = PrivilegeSet::at_least(Role::Member);

/// Derive the role of `user_id` in `space`.
///
/// First match wins:
/// 1. `space.owner_id` equals the user (legacy direct ownership).
/// 2. The user is in any `Owner` team.
/// 3. The user is in any `Admin` team.
/// 4. The user is in any team at all.
/// 5. Otherwise `Role::None`, including for spaces without teams.
pub fn resolve_role(space: &Space, user_id: &UserId) -> Role {
    let in_team_of_kind =
        |kind: TeamKind| space.teams_of_kind(kind).any(|t| t.has_member(user_id));

    let role = if space.owner_id.as_ref() == Some(user_id) || in_team_of_kind(TeamKind::Owner) {
        Role::Owner
    } else if in_team_of_kind(TeamKind::Admin) {
        Role::Admin
    } else if space.teams.iter().any(|t| t.has_member(user_id)) {
        Role::Member
    } else {
        Role::None
    };

    tracing::trace!(space_id = %space.id, user_id = %user_id, role = %role, "resolved role");
    role
}
