//! Derived task views, recomputed by full scans

use std::collections::HashSet;

use crate::model::{date_component, Task, TaskId};

/// Tasks without a project, in source order.
pub fn personal_view(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|t| t.is_personal()).cloned().collect()
}

/// Tasks due on `day` (date component only). Empty when no day is selected.
pub fn date_view(tasks: &[Task], day: Option<&str>) -> Vec<Task> {
    match day {
        Some(day) => tasks.iter().filter(|t| t.is_due_on(day)).cloned().collect(),
        None => Vec::new(),
    }
}

/// Drop later entries that repeat an earlier id.
pub fn dedup_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    tasks
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}

/// Normalize a selected date: `None` for blank input, the `YYYY-MM-DD`
/// component when the input has that shape, otherwise the trimmed raw value (which
/// then matches nothing).
pub fn normalize_day(day: Option<&str>) -> Option<String> {
    let day = day.map(str::trim).filter(|d| !d.is_empty())?;
    Some(date_component(day).unwrap_or(day).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, project: Option<&str>, due: Option<&str>) -> Task {
        Task {
            project_name: project.map(String::from),
            due_date: due.map(String::from),
            ..Task::new(id, format!("task-{}", id))
        }
    }

    #[test]
    fn test_personal_view_keeps_order() {
        let tasks = vec![
            task(3, None, None),
            task(2, Some("X"), None),
            task(1, Some(""), None),
        ];
        let ids: Vec<_> = personal_view(&tasks).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId::Num(3), TaskId::Num(1)]);
    }

    #[test]
    fn test_date_view() {
        let tasks = vec![
            task(1, None, Some("2024-03-20")),
            task(2, None, Some("2024-03-20T22:00:00Z")),
            task(3, None, Some("2024-03-21")),
            task(4, None, None),
        ];
        assert_eq!(date_view(&tasks, Some("2024-03-20")).len(), 2);
        assert_eq!(date_view(&tasks, Some("2024-03-21")).len(), 1);
        assert!(date_view(&tasks, None).is_empty());
    }

    #[test]
    fn test_dedup_keeps_first() {
        let mut dup = task(1, Some("later"), None);
        dup.name = "dup".to_string();
        let tasks = vec![task(1, None, None), task(2, None, None), dup];
        let out = dedup_by_id(tasks);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "task-1");
    }

    #[test]
    fn test_dedup_numeric_and_string_forms() {
        let string_form = Task::new("1", "same id as text");
        let out = dedup_by_id(vec![task(1, None, None), string_form]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "task-1");
    }

    #[test]
    fn test_normalize_day() {
        assert_eq!(normalize_day(None), None);
        assert_eq!(normalize_day(Some("  ")), None);
        assert_eq!(
            normalize_day(Some("2024-03-20T10:00:00Z")).as_deref(),
            Some("2024-03-20")
        );
        assert_eq!(normalize_day(Some("tomorrow")).as_deref(), Some("tomorrow"));
    }
}
