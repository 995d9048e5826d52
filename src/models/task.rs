use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a task. Any state may be set to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// The wire name, identical to the JSON representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "NOT_STARTED",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// The persisted task entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Assigned by the store on first save; `None` until then.
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub user_id: i64,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        user_id: i64,
        status: TaskStatus,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description,
            user_id,
            status,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// External representation of a task, used for request and response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub user_id: i64,
    pub status: TaskStatus,
}

/// Request payload for PATCH /tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusRequest {
    pub id: i64,
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_enumeration_names_on_the_wire() {
        for status in TaskStatus::ALL {
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, json!(status.as_str()));
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(
            "DONE".parse::<TaskStatus>(),
            Err(UnknownStatus("DONE".to_string()))
        );
        assert!(serde_json::from_value::<TaskStatus>(json!("in_progress")).is_err());
    }

    #[test]
    fn dto_uses_camel_case_and_tolerates_missing_id() {
        let dto: TaskDto = serde_json::from_value(json!({
            "title": "Task 1",
            "description": "Description 1",
            "userId": 1,
            "status": "NOT_STARTED"
        }))
        .unwrap();
        assert_eq!(dto.id, None);
        assert_eq!(dto.user_id, 1);

        let bare: TaskDto = serde_json::from_value(json!({
            "title": "Task 2",
            "userId": 2,
            "status": "COMPLETED"
        }))
        .unwrap();
        assert_eq!(bare.description, None);

        let encoded = serde_json::to_value(TaskDto { id: Some(7), ..dto }).unwrap();
        assert_eq!(encoded["id"], json!(7));
        assert_eq!(encoded["userId"], json!(1));
        assert_eq!(encoded["status"], json!("NOT_STARTED"));
    }

    #[test]
    fn new_task_has_no_id() {
        let task = Task::new("t", None, 1, TaskStatus::NotStarted);
        assert!(task.is_new());
    }
}
