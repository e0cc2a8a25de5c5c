//! Compound workflows: moving a task between projects and linking subtasks.
//!
//! The server answers these batch calls without the resulting task state, so
//! callers either get a locally patched copy (move) or a copy re-read after a
//! forced sync (subtask).

use crate::client::Client;
use crate::error::{ClientError, ConsistencyError, PreconditionError, ProtocolError};
use crate::protocol::{ParentLink, ProjectMove, TASK_PARENT_PATH, TASK_PROJECT_PATH};
use crate::transport::HttpRequest;
use crate::types::TaskRecord;
use log::{debug, info};
use serde::Serialize;

fn batch_body<T: Serialize>(entries: &[T], context: &'static str) -> Result<serde_json::Value, ProtocolError> {
    serde_json::to_value(entries).map_err(|source| ProtocolError::Malformed { context, source })
}

impl Client {
    /// Move a task to another project.
    ///
    /// Moving to the current project is a no-op and sends nothing. The
    /// returned copy carries the new project id but keeps the old project
    /// name until the next sync.
    pub async fn move_task(&self, task: &TaskRecord, to_project_name: &str) -> Result<TaskRecord, ClientError> {
        if to_project_name == task.project_name {
            debug!("move_task: {} already in {}", task.id, to_project_name);
            return Ok(task.clone());
        }

        let to_project_id = self
            .resolve_project(to_project_name)
            .await
            .ok_or_else(|| PreconditionError::ProjectNotFound(to_project_name.to_string()))?;

        let body = batch_body(
            &[ProjectMove {
                from_project_id: task.project_id.clone(),
                task_id: task.id.clone(),
                to_project_id: to_project_id.clone(),
            }],
            "move",
        )?;
        self.send(HttpRequest::post(TASK_PROJECT_PATH, body)).await?;
        info!("Moved {} from {} to {}", task.id, task.project_id, to_project_id);

        Ok(TaskRecord {
            project_id: to_project_id,
            ..task.clone()
        })
    }

    /// Make `child` a subtask of `parent`.
    ///
    /// Moves the child into the parent's project first when they differ,
    /// links them, then syncs and returns both records as the server now has
    /// them.
    pub async fn make_subtask(
        &self,
        parent: &TaskRecord,
        child: &TaskRecord,
    ) -> Result<(TaskRecord, TaskRecord), ClientError> {
        if !parent.is_created() {
            return Err(PreconditionError::ParentNotCreated.into());
        }
        if !child.is_created() {
            return Err(PreconditionError::ChildNotCreated.into());
        }

        let child = if parent.project_id != child.project_id {
            self.move_task(child, &parent.project_name).await?
        } else {
            child.clone()
        };

        let body = batch_body(
            &[ParentLink {
                parent_id: parent.id.clone(),
                project_id: child.project_id.clone(),
                task_id: child.id.clone(),
            }],
            "subtask",
        )?;
        self.send(HttpRequest::post(TASK_PARENT_PATH, body)).await?;
        info!("Linked {} under {}", child.id, parent.id);

        // The link response carries no task state; re-read both sides
        self.sync().await?;
        let snapshot = self.read().await;
        let lookup = |id: &str| {
            snapshot
                .task(id)
                .cloned()
                .ok_or_else(|| ConsistencyError::TaskMissingAfterSync { id: id.to_string() })
        };

        Ok((lookup(&parent.id)?, lookup(&child.id)?))
    }
}
