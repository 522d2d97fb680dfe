//! `taskdeck stats`

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::Context;
use crate::error::{Result, TaskError};
use crate::model::{date_component, Task};
use crate::stats::{self, DayStats, InProgressItem, ProjectGroup};

#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    date: String,
    today: DayStats,
    in_progress: Vec<InProgressItem<'a>>,
    projects: Vec<ProjectGroup>,
    overdue: Vec<&'a Task>,
}

pub async fn execute(ctx: &Context, date: Option<String>) -> Result<()> {
    let day = match date {
        Some(raw) => date_component(&raw)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| TaskError::precondition(format!("'{}' is not a YYYY-MM-DD date", raw)))?,
        None => Local::now().date_naive(),
    };
    let store = ctx.loaded_store().await?;
    let tasks = store.tasks();

    let date = day.format("%Y-%m-%d").to_string();
    let report = StatsReport {
        today: stats::today_stats(tasks, &date),
        in_progress: stats::in_progress_preview(tasks, ctx.config.store.preview_limit),
        projects: stats::project_groups(tasks),
        overdue: stats::overdue(tasks, day),
        date,
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}: {} due, {} done ({}%)",
        report.date, report.today.total, report.today.completed, report.today.percentage
    );
    if !report.overdue.is_empty() {
        println!("{} overdue", report.overdue.len());
    }

    println!();
    println!("In progress:");
    for item in &report.in_progress {
        println!(
            "  [{} {}] {} {}%",
            item.icon, item.color, item.task.name, item.task.progress
        );
    }

    println!();
    println!("Projects:");
    for group in &report.projects {
        println!(
            "  {:<24} {:>3}/{:<3} {:>3}%",
            group.name, group.completed, group.total, group.percentage
        );
    }
    Ok(())
}
