// Data models for the task tracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conventional status for new tasks
pub const STATUS_TODO: &str = "todo";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_DONE: &str = "done";

/// A single tracked task
///
/// Field order here is the key order of the persisted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    /// Free-form tag; the `STATUS_*` constants are conventions, not a closed set
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh task with both timestamps set to `now`
    pub fn new(id: u64, description: impl Into<String>, status: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            description: description.into(),
            status: status.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`; `created_at` is never touched
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Helper function to get the current timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_task_sets_both_timestamps() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let task = Task::new(1, "buy milk", STATUS_TODO, ts);

        assert_eq!(task.id, 1);
        assert_eq!(task.description, "buy milk");
        assert_eq!(task.status, "todo");
        assert_eq!(task.created_at, ts);
        assert_eq!(task.updated_at, ts);
    }

    #[test]
    fn test_touch_keeps_created_at() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let mut task = Task::new(1, "buy milk", STATUS_TODO, created);

        task.touch(later);

        assert_eq!(task.created_at, created);
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn test_task_serialization_key_order() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let task = Task::new(7, "write report", STATUS_IN_PROGRESS, ts);

        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":7,"description":"write report","status":"in-progress","created_at":"2024-05-01T09:30:00Z","updated_at":"2024-05-01T09:30:00Z"}"#
        );
    }

    #[test]
    fn test_task_accepts_unknown_status() {
        let json = r#"{"id":3,"description":"x","status":"blocked","created_at":"2024-05-01T09:30:00Z","updated_at":"2024-05-01T09:30:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, "blocked");
    }

    #[test]
    fn test_now() {
        let a = now();
        let b = now();
        assert!(b >= a);
    }
}
