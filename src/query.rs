//! Multi-predicate search over the cached tasks.

use crate::client::Client;
use crate::error::ClientError;
use crate::projects::ProjectIndex;
use crate::types::{PRIORITY_IGNORE, TaskRecord};
use chrono::{DateTime, Utc};
use log::debug;

/// Search predicates. Every field left at its default matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Title substring
    pub title: String,
    /// Project name, resolved through the project index
    pub project: String,
    pub tag: String,
    pub id: String,
    /// Only applied together with `not_after`
    pub not_before: Option<DateTime<Utc>>,
    /// Only applied together with `not_before`
    pub not_after: Option<DateTime<Utc>>,
    pub priority: Option<i64>,
}

impl Filter {
    /// Create a filter that matches every task.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by title substring.
    pub fn title(mut self, substring: impl Into<String>) -> Self {
        self.title = substring.into();
        self
    }

    /// Filter by project name.
    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.project = name.into();
        self
    }

    /// Filter by tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Filter by exact id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Restrict start dates to `[not_before, not_after]`.
    pub fn between(mut self, not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self.not_after = Some(not_after);
        self
    }

    /// Filter by exact priority. `PRIORITY_IGNORE` clears the filter.
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = (priority != PRIORITY_IGNORE).then_some(priority);
        self
    }

    /// Check one task against the filter.
    pub fn matches(&self, task: &TaskRecord, projects: &ProjectIndex) -> bool {
        if !task.title.contains(&self.title) {
            return false;
        }

        // An unknown project name matches nothing
        if !self.project.is_empty() && projects.resolve(&self.project) != Some(task.project_id.as_str()) {
            return false;
        }

        if !self.tag.is_empty() && !task.has_tag(&self.tag) {
            return false;
        }

        if !self.id.is_empty() && task.id != self.id {
            return false;
        }

        // One-sided ranges are ignored; a task without a start date is
        // outside any range.
        if let (Some(not_before), Some(not_after)) = (self.not_before, self.not_after) {
            match task.start_date {
                Some(start) if start >= not_before && start <= not_after => {}
                _ => return false,
            }
        }

        if let Some(priority) = self.priority
            && priority != PRIORITY_IGNORE
            && task.priority != priority
        {
            return false;
        }

        true
    }
}

impl Client {
    /// Sync, then return every cached task matching the filter, in cache order.
    pub async fn search(&self, filter: &Filter) -> Result<Vec<TaskRecord>, ClientError> {
        self.sync().await?;

        let snapshot = self.read().await;
        let results: Vec<TaskRecord> = snapshot
            .tasks
            .iter()
            .filter(|task| filter.matches(task, &snapshot.projects))
            .cloned()
            .collect();
        debug!("search: {} of {} tasks matched", results.len(), snapshot.tasks.len());

        Ok(results)
    }
}
