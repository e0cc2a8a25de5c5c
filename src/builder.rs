//! Builder pattern API for creating tasks.

use crate::client::Client;
use crate::error::{ClientError, PreconditionError};
use crate::types::{PRIORITY_NONE, TaskRecord};
use chrono::{DateTime, Utc};

/// Builder for tasks with a fluent API.
///
/// # Example
///
/// ```ignore
/// let task = client.build("Write report")
///     .project("work")
///     .priority(PRIORITY_HIGH)
///     .tag("q3")
///     .start(Utc::now())
///     .create()
///     .await?;
/// ```
pub struct TaskBuilder<'a> {
    client: &'a Client,
    title: String,
    content: String,
    project_name: String,
    start: Option<DateTime<Utc>>,
    due: Option<DateTime<Utc>>,
    all_day: bool,
    priority: i64,
    kind: String,
    tags: Vec<String>,
}

impl<'a> TaskBuilder<'a> {
    /// Create a new builder with the given title.
    pub fn new(client: &'a Client, title: impl Into<String>) -> Self {
        Self {
            client,
            title: title.into(),
            content: String::new(),
            project_name: String::new(),
            start: None,
            due: None,
            all_day: false,
            priority: PRIORITY_NONE,
            kind: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Target project by name; resolved when the task is built.
    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Set the priority (0, 1, 3 or 5).
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Set the task kind (`KIND_TEXT`, `KIND_CHECKLIST` or `KIND_NOTE`).
    /// Left empty, the server picks its default.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Add a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Build the uncreated record without contacting the server.
    pub async fn finish(self) -> Result<TaskRecord, ClientError> {
        let project_id = if self.project_name.is_empty() {
            String::new()
        } else {
            self.client
                .resolve_project(&self.project_name)
                .await
                .ok_or_else(|| PreconditionError::ProjectNotFound(self.project_name.clone()))?
        };

        Ok(TaskRecord {
            project_id,
            project_name: self.project_name,
            title: self.title,
            content: self.content,
            is_all_day: self.all_day,
            start_date: self.start,
            due_date: self.due,
            tags: self.tags,
            priority: self.priority,
            kind: self.kind,
            ..Default::default()
        })
    }

    /// Build the record and create it on the server.
    pub async fn create(self) -> Result<TaskRecord, ClientError> {
        let client = self.client;
        let task = self.finish().await?;
        client.create(&task).await
    }
}

/// Extension trait to add builder method to Client.
pub trait ClientBuilderExt {
    /// Start building a new task with the given title.
    fn build(&self, title: impl Into<String>) -> TaskBuilder<'_>;
}

impl ClientBuilderExt for Client {
    fn build(&self, title: impl Into<String>) -> TaskBuilder<'_> {
        TaskBuilder::new(self, title)
    }
}
