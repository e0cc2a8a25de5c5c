//! CLI argument parsing for ticksync.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tks",
    about = "Command-line client for TickTick / Dida365",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/ticksync/logs/ticksync.log"
)]
pub struct Cli {
    /// Path to config file (default: ./.ticksync.yml, then ~/.config/ticksync/ticksync.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch server state and print a summary
    Sync,

    /// List projects
    Projects,

    /// List tags
    Tags,

    /// Search tasks
    List {
        /// Title substring
        #[arg(short, long, default_value = "")]
        title: String,

        /// Project name
        #[arg(short, long, default_value = "")]
        project: String,

        /// Tag
        #[arg(long, default_value = "")]
        tag: String,

        /// Task ID
        #[arg(long, default_value = "")]
        id: String,

        /// Earliest start date (YYYY-MM-DD); needs --before too
        #[arg(long)]
        after: Option<String>,

        /// Latest start date (YYYY-MM-DD); needs --after too
        #[arg(long)]
        before: Option<String>,

        /// Priority (0, 1, 3, 5; -1 = any)
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        priority: i64,

        /// Only tasks that are not completed
        #[arg(long)]
        open: bool,
    },

    /// Create a task
    Create {
        /// Task title
        title: String,

        /// Body text
        #[arg(short = 'C', long, default_value = "")]
        content: String,

        /// Project name (default: inbox)
        #[arg(short, long, default_value = "")]
        project: String,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// Priority (0, 1, 3, 5)
        #[arg(long, default_value = "0")]
        priority: i64,

        /// Task kind
        #[arg(long, value_parser = ["text", "checklist", "note"])]
        kind: Option<String>,

        /// Tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Change a task's title, content or priority
    Update {
        /// Task ID
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'C', long)]
        content: Option<String>,

        #[arg(long)]
        priority: Option<i64>,
    },

    /// Mark a task completed
    Complete {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// Move a task to another project
    Move {
        /// Task ID
        id: String,

        /// Destination project name
        project: String,
    },

    /// Make one task a subtask of another
    Subtask {
        /// Parent task ID
        parent_id: String,

        /// Child task ID
        child_id: String,
    },
}
