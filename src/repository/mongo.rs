use async_trait::async_trait;
use futures_util::StreamExt;
use log::{error, info};
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use super::{RepositoryError, Result, TaskRepository};
use crate::models::{Task, TaskStatus};

const TASKS: &str = "tasks";
const COUNTERS: &str = "counters";
const TASK_SEQUENCE: &str = "task_id";

/// Stored shape of a task. The integer id doubles as the document `_id`.
#[derive(Debug, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(rename = "_id")]
    id: i64,
    title: String,
    description: Option<String>,
    user_id: i64,
    status: TaskStatus,
}

impl TaskDocument {
    fn from_task(id: i64, task: &Task) -> Self {
        Self {
            id,
            title: task.title.clone(),
            description: task.description.clone(),
            user_id: task.user_id,
            status: task.status,
        }
    }

    fn into_task(self) -> Task {
        Task {
            id: Some(self.id),
            title: self.title,
            description: self.description,
            user_id: self.user_id,
            status: self.status,
        }
    }
}

/// Task store on a MongoDB database. Ids come from a `counters` document so
/// they stay integers like the relational store's.
pub struct MongoTaskRepository {
    tasks: Collection<TaskDocument>,
    counters: Collection<Document>,
}

impl MongoTaskRepository {
    pub async fn init(uri: &str, db_name: &str) -> Result<Self> {
        let client_options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(client_options)?;
        info!("Using MongoDB database {}", db_name);
        Ok(Self::with_database(&client.database(db_name)))
    }

    pub fn with_database(db: &Database) -> Self {
        Self {
            tasks: db.collection::<TaskDocument>(TASKS),
            counters: db.collection::<Document>(COUNTERS),
        }
    }

    async fn next_id(&self) -> Result<i64> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": TASK_SEQUENCE },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;
        counter
            .and_then(|c| c.get_i64("seq").ok())
            .ok_or_else(|| RepositoryError::Corrupt("task id counter missing".to_string()))
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let found = self.tasks.find_one(doc! { "_id": id }).await?;
        Ok(found.map(TaskDocument::into_task))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let count = self.tasks.count_documents(doc! { "_id": id }).await?;
        Ok(count > 0)
    }

    async fn save(&self, mut task: Task) -> Result<Task> {
        let id = match task.id {
            Some(id) => id,
            None => self.next_id().await?,
        };
        let document = TaskDocument::from_task(id, &task);
        self.tasks
            .replace_one(doc! { "_id": id }, &document)
            .upsert(true)
            .await?;
        task.id = Some(id);
        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Option<Task>> {
        let Some(id) = task.id else {
            return Ok(None);
        };
        let document = TaskDocument::from_task(id, &task);
        let res = self.tasks.replace_one(doc! { "_id": id }, &document).await?;
        if res.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(task))
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.tasks.delete_one(doc! { "_id": id }).await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        let mut cursor = self.tasks.find(doc! {}).sort(doc! { "_id": 1 }).await?;

        let mut tasks = vec![];
        while let Some(document) = cursor.next().await {
            match document {
                Ok(document) => tasks.push(document.into_task()),
                Err(e) => {
                    error!("Error reading tasks: {}", e);
                    return Err(e.into());
                }
            }
        }
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Needs a running server: MONGO_URI=mongodb://localhost:27017 cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn round_trip_against_live_server() {
        let uri = std::env::var("MONGO_URI").unwrap();
        let repo = MongoTaskRepository::init(&uri, "task_tracker_test").await.unwrap();

        let saved = repo
            .save(Task::new("Task 1", None, 1, TaskStatus::NotStarted))
            .await
            .unwrap();
        let id = saved.id.unwrap();
        assert_eq!(repo.find_by_id(id).await.unwrap(), Some(saved));

        repo.delete_by_id(id).await.unwrap();
        assert!(!repo.exists_by_id(id).await.unwrap());
    }

    #[test]
    fn document_keeps_every_field() {
        let task = Task::new("t", Some("d".to_string()), 9, TaskStatus::Completed);
        let back = TaskDocument::from_task(4, &task).into_task();
        assert_eq!(back.id, Some(4));
        assert_eq!(Task { id: None, ..back }, task);
    }
}
