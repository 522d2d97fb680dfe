//! `taskdeck tasks` and `taskdeck calendar`

use clap::Subcommand;

use super::Context;
use crate::error::Result;
use crate::model::{EntityId, Priority, Task, TaskDraft, TaskId, TaskPatch};
use crate::stats;

#[derive(Subcommand)]
pub enum TaskAction {
    /// List all tasks
    List {
        /// Only tasks without a project
        #[arg(long)]
        personal: bool,
    },
    /// Create a task
    Create {
        name: String,
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long)]
        assignee_id: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        project_id: Option<String>,
        #[arg(long)]
        project_name: Option<String>,
        /// Due date, YYYY-MM-DD or full ISO-8601
        #[arg(long)]
        due: Option<String>,
        /// low | medium | high (anything else is ignored)
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,
    },
    /// Update fields of a task
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        project_id: Option<String>,
        /// Empty string makes the task personal
        #[arg(long)]
        project_name: Option<String>,
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a task
    Delete { id: String },
}

fn parse_priority(raw: &str) -> std::result::Result<Priority, String> {
    Priority::parse(raw).ok_or_else(|| format!("'{}' is not one of low, medium, high", raw))
}

pub async fn execute(ctx: &Context, action: TaskAction) -> Result<()> {
    let mut store = ctx.loaded_store().await?;

    match action {
        TaskAction::List { personal } => {
            let tasks = if personal {
                store.personal_tasks()
            } else {
                store.tasks()
            };
            print_tasks(ctx, tasks)
        }
        TaskAction::Create {
            name,
            assigned_to,
            assignee_id,
            description,
            project_id,
            project_name,
            due,
            priority,
            progress,
        } => {
            let draft = TaskDraft {
                name,
                description,
                project_id: project_id.as_deref().map(EntityId::parse),
                project_name,
                assigned_to,
                assignee_id: assignee_id.as_deref().map(EntityId::parse),
                due_date: due,
                priority,
                progress,
            };
            let task = store.create(&ctx.credentials, draft).await?;
            print_task(ctx, &task)
        }
        TaskAction::Update {
            id,
            name,
            description,
            project_id,
            project_name,
            assigned_to,
            due,
            priority,
            progress,
            status,
        } => {
            let patch = TaskPatch {
                name,
                description,
                project_id: project_id.as_deref().map(EntityId::parse),
                project_name,
                assigned_to,
                due_date: due,
                priority,
                progress,
                status,
            };
            if patch.is_empty() {
                eprintln!("Nothing to update.");
                return Ok(());
            }
            let task = store
                .update(&ctx.credentials, &TaskId::parse(&id), patch)
                .await?;
            print_task(ctx, &task)
        }
        TaskAction::Delete { id } => {
            let id = TaskId::parse(&id);
            store.remove(&ctx.credentials, &id).await?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&delete_report(&id, store.len()))?);
            } else {
                println!("Deleted task {} ({} remaining)", id, store.len());
            }
            Ok(())
        }
    }
}

pub async fn calendar(ctx: &Context, date: Option<String>) -> Result<()> {
    let mut store = ctx.loaded_store().await?;
    let day = date.unwrap_or_else(stats::today);
    let tasks = store.select_date(Some(&day));
    if !ctx.json {
        println!("{} task(s) due on {}", tasks.len(), day);
    }
    print_tasks(ctx, tasks)
}

// ============================================================================
// Output
// ============================================================================

pub fn task_line(task: &Task) -> String {
    let project = match task.project_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => stats::PERSONAL_BUCKET,
    };
    format!(
        "{:<8} {:<32} {:<16} {:<10} {:<6} {:>3}%  {}",
        task.id.to_string(),
        truncate(&task.name, 32),
        truncate(project, 16),
        task.due_day().unwrap_or("-"),
        task.priority.as_str(),
        task.progress,
        task.status_label()
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn delete_report(id: &TaskId, remaining: usize) -> serde_json::Value {
    serde_json::json!({ "deleted": id, "remaining": remaining })
}

fn print_tasks(ctx: &Context, tasks: &[Task]) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }
    for task in tasks {
        println!("{}", task_line(task));
    }
    Ok(())
}

fn print_task(ctx: &Context, task: &Task) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", task_line(task));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_line() {
        let task = Task {
            due_date: Some("2024-03-20T10:00:00Z".to_string()),
            progress: 40,
            ..Task::new(7, "Write report")
        };
        let line = task_line(&task);
        assert!(line.starts_with("7 "));
        assert!(line.contains("Personal"));
        assert!(line.contains("2024-03-20"));
        assert!(line.contains(" 40%"));
        assert!(line.ends_with("In progress"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_delete_report() {
        let report = delete_report(&TaskId::Num(7), 3);
        assert_eq!(report, serde_json::json!({ "deleted": 7, "remaining": 3 }));

        let report = delete_report(&TaskId::parse("007"), 0);
        assert_eq!(report["deleted"], "007");
        assert_eq!(report["remaining"], 0);
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("HIGH"), Ok(Priority::High));
        assert!(parse_priority("urgent").is_err());
    }
}
