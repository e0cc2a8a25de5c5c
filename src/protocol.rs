//! Wire shapes for the batch API.

use crate::types::{ProjectGroup, ProjectProfile, null_default};
use serde::{Deserialize, Serialize};

/// Exchange credentials for a session token.
pub const SIGNIN_PATH: &str = "/user/signin";
/// Full-state sync.
pub const SYNC_PATH: &str = "/batch/check/0";
/// Create one task.
pub const TASK_CREATE_PATH: &str = "/task";
/// Batch delete.
pub const TASK_DELETE_PATH: &str = "/batch/task";
/// Batch parent link.
pub const TASK_PARENT_PATH: &str = "/batch/taskParent";
/// Batch project move.
pub const TASK_PROJECT_PATH: &str = "/batch/taskProject";

/// Update endpoint for one task.
pub fn task_update_path(id: &str) -> String {
    format!("/task/{}", id)
}

/// Sign-in request body.
#[derive(Debug, Clone, Serialize)]
pub struct SigninRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Sign-in response. Only the token matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigninResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub token: String,
}

/// Full-state sync response.
///
/// Task records are kept as raw values here so a bad record can be reported
/// by position.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub inbox_id: String,

    #[serde(default, deserialize_with = "null_default")]
    pub project_groups: Vec<ProjectGroup>,

    #[serde(default, deserialize_with = "null_default")]
    pub project_profiles: Vec<ProjectProfile>,

    #[serde(default, deserialize_with = "null_default")]
    pub sync_task_bean: SyncTaskBean,

    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<TagEntry>,
}

/// Task section of the sync response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncTaskBean {
    #[serde(default, deserialize_with = "null_default")]
    pub update: Vec<serde_json::Value>,
}

/// A tag as listed in the sync response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagEntry {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

/// Body of a batch delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteBatch {
    pub delete: Vec<DeleteEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntry {
    pub project_id: String,
    pub task_id: String,
}

/// One element of a batch parent link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentLink {
    pub parent_id: String,
    pub project_id: String,
    pub task_id: String,
}

/// One element of a batch project move.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMove {
    pub from_project_id: String,
    pub task_id: String,
    pub to_project_id: String,
}
