//! Single-task create/delete/update operations.
//!
//! Each operation is one round trip. None of them touches the cache; call
//! `sync` to observe their effect there.

use crate::builder::TaskBuilder;
use crate::client::{Client, decode};
use crate::error::{ClientError, PreconditionError, ProtocolError};
use crate::projects::INBOX;
use crate::protocol::{DeleteBatch, DeleteEntry, TASK_CREATE_PATH, TASK_DELETE_PATH, task_update_path};
use crate::transport::HttpRequest;
use crate::types::{STATUS_COMPLETED, TaskRecord};
use chrono::{DateTime, Utc};
use log::debug;

fn encode(task: &TaskRecord, context: &'static str) -> Result<serde_json::Value, ProtocolError> {
    serde_json::to_value(task).map_err(|source| ProtocolError::Malformed { context, source })
}

impl Client {
    /// Make an uncreated task in the named project.
    ///
    /// An empty `project_name` leaves the project unset (the server files it
    /// in the inbox).
    pub async fn new_task(
        &self,
        title: &str,
        content: &str,
        start: Option<DateTime<Utc>>,
        project_name: &str,
    ) -> Result<TaskRecord, ClientError> {
        let builder = TaskBuilder::new(self, title).content(content).project(project_name);
        match start {
            Some(start) => builder.start(start).finish().await,
            None => builder.finish().await,
        }
    }

    /// Create a task on the server and return the server's copy.
    pub async fn create(&self, task: &TaskRecord) -> Result<TaskRecord, ClientError> {
        if task.is_created() {
            return Err(PreconditionError::AlreadyCreated(task.id.clone()).into());
        }

        let body = encode(task, "create")?;
        let raw = self.send(HttpRequest::post(TASK_CREATE_PATH, body)).await?;
        let created: TaskRecord = decode(&raw, "create")?;
        debug!("create: server assigned id {}", created.id);

        Ok(self.backfill_project_name(created).await)
    }

    /// Delete a task. Returns the input detached from its id and project.
    pub async fn delete(&self, task: &TaskRecord) -> Result<TaskRecord, ClientError> {
        if !task.is_created() {
            return Err(PreconditionError::NotCreated.into());
        }

        let project_id = if task.project_id == INBOX {
            self.inbox_id().await
        } else {
            task.project_id.clone()
        };
        let body = DeleteBatch {
            delete: vec![DeleteEntry {
                project_id,
                task_id: task.id.clone(),
            }],
        };
        let body = serde_json::to_value(&body).map_err(|source| ProtocolError::Malformed {
            context: "delete",
            source,
        })?;
        self.send(HttpRequest::post(TASK_DELETE_PATH, body)).await?;
        debug!("delete: removed {}", task.id);

        Ok(TaskRecord {
            id: String::new(),
            project_id: String::new(),
            project_name: String::new(),
            ..task.clone()
        })
    }

    /// Send the full record and return the server's updated copy.
    pub async fn update(&self, task: &TaskRecord) -> Result<TaskRecord, ClientError> {
        if !task.is_created() {
            return Err(PreconditionError::EmptyId.into());
        }

        let body = encode(task, "update")?;
        let raw = self.send(HttpRequest::post(task_update_path(&task.id), body)).await?;
        let updated: TaskRecord = decode(&raw, "update")?;

        Ok(self.backfill_project_name(updated).await)
    }

    /// Mark a task completed.
    pub async fn complete(&self, task: &TaskRecord) -> Result<TaskRecord, ClientError> {
        let completed = TaskRecord {
            status: STATUS_COMPLETED,
            ..task.clone()
        };
        self.update(&completed).await
    }
}
