//! ticksync CLI - command-line client for TickTick / Dida365.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::PathBuf;
use ticksync::{Client, ClientBuilderExt, Config, Filter, KIND_CHECKLIST, KIND_NOTE, KIND_TEXT, TaskRecord};

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ticksync")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("ticksync.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").context(format!("Invalid date '{}'", raw))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(naive) => Ok(naive.and_utc()),
        None => bail!("Invalid date '{}'", raw),
    }
}

fn format_priority(priority: i64) -> ColoredString {
    match priority {
        5 => "P5".red(),
        3 => "P3".yellow(),
        1 => "P1".blue(),
        _ => "P0".dimmed(),
    }
}

fn parse_kind(raw: &str) -> Result<&'static str> {
    match raw {
        "text" => Ok(KIND_TEXT),
        "checklist" => Ok(KIND_CHECKLIST),
        "note" => Ok(KIND_NOTE),
        other => bail!("Invalid kind '{}'", other),
    }
}

fn print_task(task: &TaskRecord) {
    let done = if task.is_completed() {
        "✓".green()
    } else if task.is_checklist() {
        "☐".normal()
    } else if task.is_note() {
        "✎".normal()
    } else {
        "·".normal()
    };
    let tags = if task.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", task.tags.join(", "))
    };
    let start = task
        .start_date
        .map(|d| format!(" {}", d.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    println!(
        "{} {} {} {} {}{}{}",
        done,
        task.id.cyan(),
        format_priority(task.priority),
        task.project_name.magenta(),
        task.title,
        start.dimmed(),
        tags.dimmed()
    );
}

async fn cached_task(client: &Client, id: &str) -> Result<TaskRecord> {
    match client.task(id).await {
        Some(task) => Ok(task),
        None => bail!("Task not found: {}", id),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_ref())?;
    config.validate()?;
    let client = Client::from_config(&config).await?;

    match cli.command {
        Command::Sync => {
            let snapshot = client.snapshot().await;
            println!(
                "{} Synced {} projects, {} tasks, {} tags",
                "✓".green(),
                snapshot.projects.len(),
                snapshot.tasks.len(),
                snapshot.tags.len()
            );
        }

        Command::Projects => {
            let index = client.project_index().await;
            for name in index.names() {
                println!("{} {}", index.resolve(name).unwrap_or("").cyan(), name);
            }
            let groups = client.project_groups().await;
            if !groups.is_empty() {
                println!("{}", "Groups:".bold());
                for group in groups {
                    println!("  {} {}", group.id.cyan(), group.name);
                }
            }
        }

        Command::Tags => {
            let tags = client.tags().await;
            if tags.is_empty() {
                println!("{}", "No tags".dimmed());
            } else {
                for tag in tags {
                    println!("{}", tag);
                }
            }
        }

        Command::List {
            title,
            project,
            tag,
            id,
            after,
            before,
            priority,
            open,
        } => {
            let mut filter = Filter::new().title(title).project(project).tag(tag).id(id).priority(priority);
            if let (Some(after), Some(before)) = (after.as_deref(), before.as_deref()) {
                filter = filter.between(parse_date(after)?, parse_date(before)?);
            }

            let mut tasks = client.search(&filter).await.context("Failed to search tasks")?;
            if open {
                tasks.retain(TaskRecord::is_open);
            }
            if tasks.is_empty() {
                println!("{}", "No tasks found".dimmed());
            } else {
                for task in &tasks {
                    print_task(task);
                }
            }
        }

        Command::Create {
            title,
            content,
            project,
            start,
            priority,
            kind,
            tags,
        } => {
            let mut builder = client
                .build(title)
                .content(content)
                .project(project)
                .priority(priority)
                .tags(tags.unwrap_or_default());
            if let Some(start) = start {
                builder = builder.start(parse_date(&start)?);
            }
            if let Some(kind) = kind {
                builder = builder.kind(parse_kind(&kind)?);
            }

            let task = builder.create().await.context("Failed to create task")?;
            println!("{} Created: {} {}", "✓".green(), task.id.cyan(), task.title);
        }

        Command::Update {
            id,
            title,
            content,
            priority,
        } => {
            let mut task = cached_task(&client, &id).await?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(content) = content {
                task.content = content;
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }

            let task = client.update(&task).await.context("Failed to update task")?;
            println!("{} Updated: {} {}", "✓".green(), task.id.cyan(), task.title);
        }

        Command::Complete { id } => {
            let task = cached_task(&client, &id).await?;
            let task = client.complete(&task).await.context("Failed to complete task")?;
            println!("{} Completed: {} {}", "✓".green(), task.id.cyan(), task.title);
        }

        Command::Delete { id } => {
            let task = cached_task(&client, &id).await?;
            client.delete(&task).await.context("Failed to delete task")?;
            println!("{} Deleted: {} {}", "✓".green(), id.cyan(), task.title);
        }

        Command::Move { id, project } => {
            let task = cached_task(&client, &id).await?;
            client
                .move_task(&task, &project)
                .await
                .context("Failed to move task")?;
            println!("{} Moved {} to {}", "✓".green(), id.cyan(), project);
        }

        Command::Subtask { parent_id, child_id } => {
            let parent = cached_task(&client, &parent_id).await?;
            let child = cached_task(&client, &child_id).await?;
            let (parent, child) = client
                .make_subtask(&parent, &child)
                .await
                .context("Failed to link subtask")?;
            println!(
                "{} {} is now a subtask of {}",
                "✓".green(),
                child.id.cyan(),
                parent.id.cyan()
            );
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
    if let Err(e) = rt.block_on(run(cli)) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
