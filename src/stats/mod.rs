//! Dashboard statistics, computed on read from a task list

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::model::Task;

/// Bucket label for tasks without a project
pub const PERSONAL_BUCKET: &str = "Personal";

/// Default length of the in-progress preview
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// (color, icon) pairs assigned round-robin to preview rows
const PALETTE: [(&str, &str); 5] = [
    ("#4F46E5", "briefcase"),
    ("#059669", "code-slash"),
    ("#D97706", "people"),
    ("#DC2626", "flag"),
    ("#7C3AED", "document-text"),
];

// ============================================================================
// Result types
// ============================================================================

/// Tasks due on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub total: usize,
    pub completed: usize,
    /// round(completed / total * 100), 0 when nothing is due
    pub percentage: u32,
}

/// One row of the in-progress preview
#[derive(Debug, Clone, Serialize)]
pub struct InProgressItem<'a> {
    pub task: &'a Task,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Per-project completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectGroup {
    pub name: String,
    pub total: usize,
    pub completed: usize,
    pub percentage: u32,
}

fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

/// Today's date as `YYYY-MM-DD` in local time
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

// ============================================================================
// Statistics
// ============================================================================

/// Count and completion of tasks due on `day`
pub fn today_stats(tasks: &[Task], day: &str) -> DayStats {
    let (total, completed) = tasks
        .iter()
        .filter(|t| t.is_due_on(day))
        .fold((0, 0), |(total, completed), t| {
            (total + 1, completed + usize::from(t.is_completed()))
        });
    DayStats {
        total,
        completed,
        percentage: percentage(completed, total),
    }
}

/// [`today_stats`] for the current local date
pub fn today_stats_now(tasks: &[Task]) -> DayStats {
    today_stats(tasks, &today())
}

/// Tasks strictly between 0 and 100 progress, capped at `limit`, each with a
/// palette entry picked by position.
pub fn in_progress_preview(tasks: &[Task], limit: usize) -> Vec<InProgressItem<'_>> {
    tasks
        .iter()
        .filter(|t| t.is_in_progress())
        .take(limit)
        .enumerate()
        .map(|(i, task)| {
            let (color, icon) = PALETTE[i % PALETTE.len()];
            InProgressItem { task, color, icon }
        })
        .collect()
}

/// Group by project name, largest groups first.
///
/// Equal totals keep the order in which the groups first appeared.
pub fn project_groups(tasks: &[Task]) -> Vec<ProjectGroup> {
    let mut groups: Vec<ProjectGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for task in tasks {
        let name = match task.project_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => PERSONAL_BUCKET,
        };
        let slot = *index.entry(name.to_string()).or_insert_with(|| {
            groups.push(ProjectGroup {
                name: name.to_string(),
                total: 0,
                completed: 0,
                percentage: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total += 1;
        if task.is_completed() {
            group.completed += 1;
        }
    }

    for group in &mut groups {
        group.percentage = percentage(group.completed, group.total);
    }
    // sort_by is stable: ties stay in first-appearance order
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

/// Unfinished tasks due strictly before `today`, in source order
pub fn overdue(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| !t.is_completed())
        .filter(|t| {
            t.due_day()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .is_some_and(|due| due < today)
        })
        .collect()
}
