use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque entity identifier; the backend may send numbers or strings.
///
/// Equality and hashing go through the text form, so `Num(42)` and
/// `Str("42")` name the same entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Num(i64),
    Str(String),
}

pub type TaskId = EntityId;

impl EntityId {
    /// Parse user input. Only canonical integers (no sign prefix, no leading
    /// zeros) become numeric ids; `"007"` and `"+5"` stay strings.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => Self::Num(n),
            _ => Self::Str(raw.to_string()),
        }
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EntityId::Num(a), EntityId::Num(b)) => a == b,
            (EntityId::Str(a), EntityId::Str(b)) => a == b,
            (EntityId::Num(n), EntityId::Str(s)) | (EntityId::Str(s), EntityId::Num(n)) => {
                *s == n.to_string()
            }
        }
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            EntityId::Num(n) => n.to_string().hash(state),
            EntityId::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Num(n) => write!(f, "{}", n),
            EntityId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Case-insensitive parse; `None` for anything outside low/medium/high.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A task as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_to: String,
    /// ISO-8601 date or date-time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    /// 0..=100
    #[serde(default, deserialize_with = "clamped_progress")]
    pub progress: u8,
    /// Display-only label, never used for counting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Task {
    /// Minimal task, mostly useful for fixtures.
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            project_id: None,
            project_name: None,
            assigned_to: String::new(),
            due_date: None,
            priority: Priority::default(),
            progress: 0,
            status: None,
        }
    }

    /// A task without a project name is personal.
    pub fn is_personal(&self) -> bool {
        self.project_name
            .as_deref()
            .map_or(true, |name| name.is_empty())
    }

    pub fn is_completed(&self) -> bool {
        self.progress == 100
    }

    pub fn is_in_progress(&self) -> bool {
        self.progress > 0 && self.progress < 100
    }

    /// `YYYY-MM-DD` part of the due date
    pub fn due_day(&self) -> Option<&str> {
        self.due_date.as_deref().and_then(date_component)
    }

    pub fn is_due_on(&self, day: &str) -> bool {
        match (self.due_day(), date_component(day)) {
            (Some(due), Some(day)) => due == day,
            _ => false,
        }
    }

    /// Server status when given, else derived from progress.
    pub fn status_label(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => match self.progress {
                0 => "To do",
                100 => "Done",
                _ => "In progress",
            },
        }
    }
}

/// Paged list response: `{content, totalElements, totalPages}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Extract the `YYYY-MM-DD` prefix of an ISO date or date-time.
///
/// Only the shape is checked: time of day and offset are ignored, and a
/// prefix like `2024-02-30` is kept as typed so that matching stays a plain
/// text comparison.
pub fn date_component(value: &str) -> Option<&str> {
    let prefix = value.trim().get(..10)?;
    let shaped = prefix.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    shaped.then_some(prefix)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Priority::parse).unwrap_or_default())
}

fn clamped_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_backend_task() {
        let json = r#"{
            "id": 12,
            "name": "Write report",
            "projectId": "p-1",
            "projectName": "Website",
            "assignedTo": "alice",
            "dueDate": "2024-03-20T09:30:00Z",
            "priority": "HIGH",
            "progress": 40,
            "status": "Review"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::Num(12));
        assert_eq!(task.project_id, Some(EntityId::from("p-1")));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_day(), Some("2024-03-20"));
        assert!(!task.is_personal());
        assert!(task.is_in_progress());
        assert_eq!(task.status_label(), "Review");
    }

    #[test]
    fn test_decode_lenient_fields() {
        let json = r#"{"id":"t-9","name":"Call","assignedTo":null,"priority":"urgent","progress":140}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::from("t-9"));
        assert_eq!(task.assigned_to, "");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.progress, 100);
        assert!(task.is_completed());
        assert_eq!(task.status_label(), "Done");
    }

    #[test]
    fn test_personal_predicate() {
        let mut task = Task::new(1, "A");
        assert!(task.is_personal());

        task.project_name = Some(String::new());
        assert!(task.is_personal());

        task.project_name = Some("Ops".to_string());
        assert!(!task.is_personal());
    }

    #[test]
    fn test_date_component() {
        assert_eq!(date_component("2024-03-20"), Some("2024-03-20"));
        assert_eq!(date_component("2024-03-20T23:59:59+08:00"), Some("2024-03-20"));
        assert_eq!(date_component(" 2024-03-20 "), Some("2024-03-20"));
        assert_eq!(date_component("2024-02-30"), Some("2024-02-30"));
        assert_eq!(date_component("2024-3-20"), None);
        assert_eq!(date_component("2024/03/20"), None);
        assert_eq!(date_component("soon"), None);
        assert_eq!(date_component(""), None);
    }

    #[test]
    fn test_is_due_on_ignores_time() {
        let mut task = Task::new(1, "A");
        assert!(!task.is_due_on("2024-03-20"));

        task.due_date = Some("2024-03-20T18:00:00.000Z".to_string());
        assert!(task.is_due_on("2024-03-20"));
        assert!(task.is_due_on("2024-03-20T00:00:00"));
        assert!(!task.is_due_on("2024-03-21"));
    }

    #[test]
    fn test_is_due_on_impossible_calendar_day() {
        let task = Task {
            due_date: Some("2024-02-30T09:00:00Z".to_string()),
            ..Task::new(1, "A")
        };
        assert_eq!(task.due_day(), Some("2024-02-30"));
        assert!(task.is_due_on("2024-02-30"));
        assert!(!task.is_due_on("2024-03-01"));
    }

    #[test]
    fn test_entity_id_parse_and_display() {
        assert!(matches!(EntityId::parse("42"), EntityId::Num(42)));
        assert_eq!(EntityId::parse("abc-1"), EntityId::from("abc-1"));
        assert_eq!(EntityId::Num(7).to_string(), "7");
        assert_eq!(EntityId::from("x").to_string(), "x");
    }

    #[test]
    fn test_entity_id_parse_keeps_non_canonical_digits() {
        assert_eq!(EntityId::parse("007"), EntityId::Str("007".to_string()));
        assert_eq!(EntityId::parse("007").to_string(), "007");
        assert_eq!(EntityId::parse("+5"), EntityId::Str("+5".to_string()));
        assert!(matches!(EntityId::parse("-3"), EntityId::Num(-3)));
        assert!(matches!(EntityId::parse(" 12 "), EntityId::Num(12)));
        assert_ne!(EntityId::parse("007"), EntityId::Num(7));
    }

    #[test]
    fn test_entity_id_matches_by_text_form() {
        use std::collections::HashSet;

        assert_eq!(EntityId::Num(42), EntityId::from("42"));
        assert_eq!(EntityId::from("42"), EntityId::Num(42));
        assert_ne!(EntityId::Num(42), EntityId::from("042"));

        let ids: HashSet<EntityId> = [EntityId::Num(42), EntityId::from("42")].into_iter().collect();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_page_defaults() {
        let page: Page<Task> = serde_json::from_str(r#"{"content":[{"id":1,"name":"A"}]}"#).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 0);
        assert_eq!(page.total_pages, 0);
    }
}
