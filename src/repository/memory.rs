use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{RepositoryError, Result, TaskRepository};
use crate::models::Task;

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryTaskRepository {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tasks: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| RepositoryError::Poisoned)
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        Ok(self.lock()?.tasks.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.tasks.contains_key(&id))
    }

    async fn save(&self, mut task: Task) -> Result<Task> {
        let mut inner = self.lock()?;
        let id = match task.id {
            Some(id) => id,
            None => inner.next_id,
        };
        inner.next_id = inner.next_id.max(id.saturating_add(1));
        task.id = Some(id);
        inner.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Option<Task>> {
        let Some(id) = task.id else {
            return Ok(None);
        };
        let mut inner = self.lock()?;
        match inner.tasks.get_mut(&id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.lock()?.tasks.remove(&id);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.lock()?.tasks.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn task(title: &str) -> Task {
        Task::new(title, None, 1, TaskStatus::NotStarted)
    }

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let repo = InMemoryTaskRepository::new();
        let first = repo.save(task("a")).await.unwrap();
        let second = repo.save(task("b")).await.unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn save_with_id_overwrites_in_place() {
        let repo = InMemoryTaskRepository::new();
        let mut saved = repo.save(task("a")).await.unwrap();
        saved.title = "renamed".to_string();
        repo.save(saved.clone()).await.unwrap();

        assert_eq!(repo.find_by_id(1).await.unwrap(), Some(saved));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryTaskRepository::new();
        repo.save(task("a")).await.unwrap();
        repo.delete_by_id(1).await.unwrap();
        assert!(!repo.exists_by_id(1).await.unwrap());

        let next = repo.save(task("b")).await.unwrap();
        assert_eq!(next.id, Some(2));
    }

    #[tokio::test]
    async fn update_does_not_recreate_deleted_task() {
        let repo = InMemoryTaskRepository::new();
        let mut found = repo.save(task("a")).await.unwrap();
        repo.delete_by_id(1).await.unwrap();

        found.title = "after delete".to_string();
        assert_eq!(repo.update(found).await.unwrap(), None);
        assert_eq!(repo.find_by_id(1).await.unwrap(), None);
        assert!(repo.update(task("unsaved")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_at_largest_id_does_not_overflow() {
        let repo = InMemoryTaskRepository::new();
        let mut top = task("top");
        top.id = Some(i64::MAX);
        let saved = repo.save(top).await.unwrap();
        assert_eq!(saved.id, Some(i64::MAX));
        assert!(repo.exists_by_id(i64::MAX).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_missing_id_is_a_no_op() {
        let repo = InMemoryTaskRepository::new();
        repo.delete_by_id(99).await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
