//! ticksync: a synchronized client cache for the TickTick / Dida365 batch API.
//!
//! The service returns full state on sync but little or nothing on individual
//! mutations, and needs several calls for compound operations. `Client` keeps
//! a snapshot of projects, tasks and tags, and sequences those calls.
//!
//! # Example
//!
//! ```no_run
//! use ticksync::{Client, ClientBuilderExt, Filter, HttpTransport, PRIORITY_HIGH};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("https://api.dida365.com/api/v2", Duration::from_secs(30), "ticksync")?;
//! let client = Client::connect(transport, "me@example.com", "secret").await?;
//!
//! let task = client.build("Write report").project("work").priority(PRIORITY_HIGH).create().await?;
//! let done = client.complete(&task).await?;
//!
//! let urgent = client.search(&Filter::new().project("work").priority(PRIORITY_HIGH)).await?;
//! # let _ = (done, urgent);
//! # Ok(())
//! # }
//! ```

mod builder;
mod cache;
mod query;
mod relations;
mod tasks;

pub mod client;
pub mod config;
pub mod error;
pub mod projects;
pub mod protocol;
pub mod transport;
pub mod types;

// Re-export public API
pub use builder::{ClientBuilderExt, TaskBuilder};
pub use cache::Snapshot;
pub use client::Client;
pub use config::{Config, Server};
pub use error::{ClientError, ConsistencyError, PreconditionError, ProtocolError, TransportError};
pub use projects::{INBOX, ProjectIndex};
pub use query::Filter;
pub use transport::{HttpRequest, HttpTransport, Method, Transport};
pub use types::{
    ChecklistItem, KIND_CHECKLIST, KIND_NOTE, KIND_TEXT, PRIORITY_HIGH, PRIORITY_IGNORE, PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_NONE, ProjectGroup,
    ProjectProfile, Reminder, STATUS_COMPLETED, STATUS_OPEN, TaskRecord,
};
