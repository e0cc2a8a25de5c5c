//! Client-side snapshot of server state.

use crate::error::ProtocolError;
use crate::projects::ProjectIndex;
use crate::protocol::SyncResponse;
use crate::types::{ProjectGroup, TaskRecord};

/// Everything one sync returned, ready to be swapped in as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub inbox_id: String,
    pub project_groups: Vec<ProjectGroup>,
    pub projects: ProjectIndex,
    /// Tasks in server order
    pub tasks: Vec<TaskRecord>,
    pub tags: Vec<String>,
}

impl Snapshot {
    /// Build a snapshot from a sync response.
    ///
    /// The project index is built before tasks are decoded so each task's
    /// project name comes from this response, not the previous one. Any task
    /// that fails to decode fails the whole snapshot.
    pub fn from_sync(response: SyncResponse) -> Result<Self, ProtocolError> {
        let projects = ProjectIndex::build(&response.inbox_id, &response.project_profiles);

        let tasks = response
            .sync_task_bean
            .update
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let mut task: TaskRecord =
                    serde_json::from_value(raw).map_err(|source| ProtocolError::MalformedTask { index, source })?;
                task.project_name = projects.resolve_name(&task.project_id).to_string();
                Ok(task)
            })
            .collect::<Result<Vec<_>, ProtocolError>>()?;

        let tags = response.tags.into_iter().map(|t| t.name).collect();

        Ok(Self {
            inbox_id: response.inbox_id,
            project_groups: response.project_groups,
            projects,
            tasks,
            tags,
        })
    }

    /// Find a task by id.
    pub fn task(&self, id: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
