// src/service.rs

use std::sync::Arc;

use log::{debug, info};

use crate::mapping::{to_dto, to_entity};
use crate::models::{TaskDto, TaskStatus};
use crate::repository::{Result, TaskRepository};

/// Task lifecycle operations. Absence of a task is reported through
/// `Option`/`bool` results; `Err` is reserved for store failures.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Persists a new task. Any id on the input is ignored.
    pub async fn create(&self, dto: TaskDto) -> Result<TaskDto> {
        let mut task = to_entity(dto);
        task.id = None;
        let created = self.repository.save(task).await?;
        info!("Task created: {:?}", created.id);
        Ok(to_dto(created))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<TaskDto>> {
        Ok(self.repository.find_by_id(id).await?.map(to_dto))
    }

    /// Replaces title, description, user id and status; the id is kept and
    /// any id carried by `dto` is ignored.
    pub async fn update(&self, id: i64, dto: TaskDto) -> Result<Option<TaskDto>> {
        let Some(mut task) = self.repository.find_by_id(id).await? else {
            debug!("Update skipped, task {} not found", id);
            return Ok(None);
        };
        task.title = dto.title;
        task.description = dto.description;
        task.user_id = dto.user_id;
        task.status = dto.status;
        let Some(saved) = self.repository.update(task).await? else {
            debug!("Update skipped, task {} deleted concurrently", id);
            return Ok(None);
        };
        info!("Task updated: {}", id);
        Ok(Some(to_dto(saved)))
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        if !self.repository.exists_by_id(id).await? {
            debug!("Delete skipped, task {} not found", id);
            return Ok(false);
        }
        self.repository.delete_by_id(id).await?;
        info!("Task deleted: {}", id);
        Ok(true)
    }

    pub async fn list(&self) -> Result<Vec<TaskDto>> {
        let tasks = self.repository.find_all().await?;
        Ok(tasks.into_iter().map(to_dto).collect())
    }

    pub async fn update_status(&self, id: i64, status: TaskStatus) -> Result<Option<TaskDto>> {
        let Some(mut task) = self.repository.find_by_id(id).await? else {
            debug!("Status update skipped, task {} not found", id);
            return Ok(None);
        };
        task.status = status;
        let Some(saved) = self.repository.update(task).await? else {
            debug!("Status update skipped, task {} deleted concurrently", id);
            return Ok(None);
        };
        info!("Task {} status set to {}", id, status);
        Ok(Some(to_dto(saved)))
    }
}
