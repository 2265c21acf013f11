//! Closed action vocabularies, one per evaluator.
//!
//! Wire names equal the variant names. Parsing an unknown name fails with
//! [`UnknownAction`]; the `*_named` queries on [`crate::Permissions`] turn
//! that into a denial.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {scope} action '{name}'")]
pub struct UnknownAction {
    pub scope: &'static str,
    pub name: String,
}

macro_rules! action_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $scope:literal { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownAction;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err(UnknownAction {
                        scope: $scope,
                        name: s.to_string(),
                    }),
                }
            }
        }
    };
}

action_enum! {
    /// Actions on a space as a whole.
    SpaceAction, "space" {
        DeleteSpace,
        RenameSpace,
        ChangeSpacePlan,
        CreateTeam,
        DeleteTeam,
        PatchTeam,
        PatchInvitation,
        CreateInvitation,
        PatchSpace,
        AddInvitationDomain,
        DeleteInvitationDomain,
        GetBillingPageToken,
        RevokeInvitation,
    }
}

action_enum! {
    /// Team membership mutations.
    TeamAction, "team" {
        AddUser,
        RemoveUser,
    }
}

action_enum! {
    K8sClusterAction, "cluster" {
        AccessK8sCluster,
        DeleteK8sCluster,
    }
}
