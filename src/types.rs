//! Core data types shared by the cache, the repository and the query engine.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// No priority set.
pub const PRIORITY_NONE: i64 = 0;
/// Low priority.
pub const PRIORITY_LOW: i64 = 1;
/// Medium priority.
pub const PRIORITY_MEDIUM: i64 = 3;
/// High priority.
pub const PRIORITY_HIGH: i64 = 5;
/// Query-only sentinel: do not filter on priority. Never stored on a task.
pub const PRIORITY_IGNORE: i64 = -1;

/// Status of an open task.
pub const STATUS_OPEN: i64 = 0;
/// Status the service uses for completed tasks.
pub const STATUS_COMPLETED: i64 = 2;

/// Plain text task.
pub const KIND_TEXT: &str = "TEXT";
/// Task whose body is a checklist of `items`.
pub const KIND_CHECKLIST: &str = "CHECKLIST";
/// Note (no completion semantics).
pub const KIND_NOTE: &str = "NOTE";

/// Wire format for timestamps. The server always expects an explicit `+0000`.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f+0000";

/// A task as the server describes it.
///
/// Records handed out by the client are disconnected copies; mutating one has
/// no effect on the cache or the server until it is passed to a repository
/// operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Server-assigned id; empty until created
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,

    /// Owning project id
    #[serde(default, deserialize_with = "null_default")]
    pub project_id: String,

    /// Owning project name, derived from the project index (never sent)
    #[serde(skip)]
    pub project_name: String,

    #[serde(default, deserialize_with = "null_default")]
    pub title: String,

    /// Free-text body
    #[serde(default, deserialize_with = "null_default")]
    pub content: String,

    /// Description shown for checklist tasks
    #[serde(default, deserialize_with = "null_default")]
    pub desc: String,

    #[serde(default, deserialize_with = "null_default")]
    pub is_all_day: bool,

    /// Start time in UTC
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    /// Due time in UTC
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Display time zone; the dates themselves are always UTC
    #[serde(default, deserialize_with = "null_default")]
    pub time_zone: String,

    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "null_default")]
    pub reminders: Vec<Reminder>,

    /// RRULE-style recurrence
    #[serde(default, deserialize_with = "null_default")]
    pub repeat_flag: String,

    /// One of 0, 1, 3, 5
    #[serde(default, deserialize_with = "null_default")]
    pub priority: i64,

    #[serde(default, deserialize_with = "null_default")]
    pub sort_order: i64,

    /// TEXT, CHECKLIST or NOTE
    #[serde(default, deserialize_with = "null_default")]
    pub kind: String,

    /// 0 = open, 2 = completed
    #[serde(default, deserialize_with = "null_default")]
    pub status: i64,

    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<DateTime<Utc>>,

    /// Parent task id when this task is a subtask
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Checklist entries
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<ChecklistItem>,
}

impl TaskRecord {
    /// True once the server has assigned an id.
    pub fn is_created(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    pub fn is_open(&self) -> bool {
        self.status == STATUS_OPEN
    }

    /// True when the body lives in `items` rather than `content`.
    pub fn is_checklist(&self) -> bool {
        self.kind == KIND_CHECKLIST
    }

    pub fn is_note(&self) -> bool {
        self.kind == KIND_NOTE
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A reminder attached to a task.
///
/// Older accounts send bare trigger strings, newer ones send objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Reminder {
    Trigger(String),
    Detailed { id: String, trigger: String },
}

/// One entry of a checklist task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_default")]
    pub status: i64,

    #[serde(default, deserialize_with = "null_default")]
    pub sort_order: i64,
}

/// A project folder. Informational only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectGroup {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

/// A project (list) as reported by the sync endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProfile {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_default")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Format a timestamp the way the server expects it.
pub fn format_wire_time(time: &DateTime<Utc>) -> String {
    time.format(WIRE_TIME_FORMAT).to_string()
}

/// Parse a server timestamp such as `2022-12-12T15:04:05.000+0000`.
///
/// The offset is not applied: the service always reports UTC.
pub fn parse_wire_time(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z").map(|naive| naive.and_utc())
}

/// Serde adapter for optional wire timestamps. Empty strings decode as `None`.
pub(crate) mod wire_time {
    use super::{format_wire_time, parse_wire_time};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&format_wire_time(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_wire_time(s)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", s, e))),
        }
    }
}
