//! Wire records as delivered by the platform API, and their normalization.
//!
//! The API omits (or nulls) collections freely: a space fetched without
//! expansion has no `teams`, a team may lack `users`, clusters usually have
//! no `metadata`. These records accept all of that. Converting into
//! [`crate::model`] replaces every absent collection with an empty one, once,
//! so the evaluator never has to guard against absence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use spaceauth_core::{ClusterId, SpaceId, TeamId, UserId};

use crate::model::{ClusterMetadata, K8sCluster, Space, SpaceKind, Team, TeamKind, User};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub id: TeamId,
    #[serde(default)]
    pub name: String,
    pub kind: TeamKind,
    #[serde(default)]
    pub users: Option<Vec<UserRecord>>,
    pub space_id: SpaceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceRecord {
    pub id: SpaceId,
    #[serde(default)]
    pub name: String,
    pub kind: SpaceKind,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub teams: Option<Vec<TeamRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLabelsRecord {
    #[serde(default)]
    pub dev_cluster: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMetadataRecord {
    #[serde(default)]
    pub labels: Option<ClusterLabelsRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    pub id: ClusterId,
    pub created_by_id: UserId,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: Option<ClusterMetadataRecord>,
}

impl From<UserRecord> for User {
    fn from(value: UserRecord) -> Self {
        Self { id: value.id }
    }
}

impl From<TeamRecord> for Team {
    fn from(value: TeamRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            kind: value.kind,
            users: value
                .users
                .unwrap_or_default()
                .into_iter()
                .map(User::from)
                .collect(),
            space_id: value.space_id,
        }
    }
}

impl From<SpaceRecord> for Space {
    fn from(value: SpaceRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            kind: value.kind,
            owner_id: value.owner_id,
            teams: value
                .teams
                .unwrap_or_default()
                .into_iter()
                .map(Team::from)
                .collect(),
        }
    }
}

impl From<ClusterRecord> for K8sCluster {
    fn from(value: ClusterRecord) -> Self {
        let dev_cluster = value
            .metadata
            .and_then(|m| m.labels)
            .and_then(|l| l.dev_cluster);

        Self {
            id: value.id,
            created_by_id: value.created_by_id,
            kind: value.kind,
            metadata: ClusterMetadata { dev_cluster },
        }
    }
}

impl Space {
    /// Decode an API space payload and normalize it.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let record: SpaceRecord = serde_json::from_str(json)?;
        Ok(record.into())
    }
}

impl K8sCluster {
    /// Decode an API cluster payload and normalize it.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let record: ClusterRecord = serde_json::from_str(json)?;
        Ok(record.into())
    }
}
