//! Id-keyed storage for tasks.
//!
//! The service layer only sees [`TaskRepository`]; the concrete store is
//! chosen at startup (see [`crate::config::StoreKind`]).

mod memory;
mod mongo;
mod sqlite;

pub use memory::InMemoryTaskRepository;
pub use mongo::MongoTaskRepository;
pub use sqlite::SqliteTaskRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreKind;
use crate::models::Task;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("task store lock poisoned")]
    Poisoned,
    #[error("corrupt task record: {0}")]
    Corrupt(String),
    #[error("blocking task store call failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Generic CRUD over the task table.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>>;

    async fn exists_by_id(&self, id: i64) -> Result<bool>;

    /// Inserts a new task (assigning its id) or overwrites the row with the
    /// same id. The returned task always carries an id.
    async fn save(&self, task: Task) -> Result<Task>;

    /// Overwrites the row with `task.id` only if it still exists. Returns
    /// `None` for a task without id or one that has been deleted.
    async fn update(&self, task: Task) -> Result<Option<Task>>;

    /// Removing an absent id is a no-op.
    async fn delete_by_id(&self, id: i64) -> Result<()>;

    async fn find_all(&self) -> Result<Vec<Task>>;
}

/// Opens the store selected in the configuration.
pub async fn connect(store: &StoreKind) -> Result<Arc<dyn TaskRepository>> {
    let repository: Arc<dyn TaskRepository> = match store {
        StoreKind::Sqlite { path } => Arc::new(SqliteTaskRepository::open(path)?),
        StoreKind::Mongo { uri, database_name } => {
            Arc::new(MongoTaskRepository::init(uri, database_name).await?)
        }
        StoreKind::Memory => Arc::new(InMemoryTaskRepository::new()),
    };
    Ok(repository)
}
