// src/mapping.rs
//
// Conversions between the persisted entity and its external representation.

use crate::models::{Task, TaskDto};

pub fn to_dto(task: Task) -> TaskDto {
    TaskDto {
        id: task.id,
        title: task.title,
        description: task.description,
        user_id: task.user_id,
        status: task.status,
    }
}

pub fn to_entity(dto: TaskDto) -> Task {
    Task {
        id: dto.id,
        title: dto.title,
        description: dto.description,
        user_id: dto.user_id,
        status: dto.status,
    }
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        to_dto(task)
    }
}

impl From<TaskDto> for Task {
    fn from(dto: TaskDto) -> Self {
        to_entity(dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    #[test]
    fn mapping_preserves_every_field() {
        let task = Task {
            id: Some(3),
            title: "Write report".to_string(),
            description: Some("quarterly".to_string()),
            user_id: 42,
            status: TaskStatus::InProgress,
        };
        let dto = to_dto(task.clone());
        assert_eq!(dto.id, Some(3));
        assert_eq!(dto.title, "Write report");
        assert_eq!(dto.description.as_deref(), Some("quarterly"));
        assert_eq!(dto.user_id, 42);
        assert_eq!(dto.status, TaskStatus::InProgress);
        assert_eq!(to_entity(dto), task);
    }

    #[test]
    fn absent_values_survive_mapping() {
        let dto = TaskDto {
            id: None,
            title: String::new(),
            description: None,
            user_id: 0,
            status: TaskStatus::NotStarted,
        };
        let task: Task = dto.clone().into();
        assert!(task.is_new());
        assert_eq!(task.description, None);
        assert_eq!(TaskDto::from(task), dto);
    }
}
