use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::{RepositoryError, Result, TaskRepository};
use crate::models::{Task, TaskStatus};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT,
    user_id     INTEGER NOT NULL,
    status      TEXT NOT NULL CHECK(status IN ('NOT_STARTED', 'IN_PROGRESS', 'COMPLETED'))
);
";

const SELECT_TASK: &str = "SELECT id, title, description, user_id, status FROM tasks";

type TaskRow = (i64, String, Option<String>, i64, String);

/// Relational task store backed by a single SQLite table.
pub struct SqliteTaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaskRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        info!("Opened task database at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking pool so a busy
    /// database file never stalls an async worker.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| RepositoryError::Poisoned)?;
            f(&conn)
        })
        .await?
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_task((id, title, description, user_id, status): TaskRow) -> Result<Task> {
    let status: TaskStatus = status
        .parse()
        .map_err(|e| RepositoryError::Corrupt(format!("task {}: {}", id, e)))?;
    Ok(Task {
        id: Some(id),
        title,
        description,
        user_id,
        status,
    })
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        self.with_conn(move |conn| {
            conn.query_row(&format!("{} WHERE id = ?1", SELECT_TASK), [id], read_row)
                .optional()?
                .map(into_task)
                .transpose()
        })
        .await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        self.with_conn(move |conn| {
            let found: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
                [id],
                |row| row.get(0),
            )?;
            Ok(found)
        })
        .await
    }

    async fn save(&self, mut task: Task) -> Result<Task> {
        self.with_conn(move |conn| {
            match task.id {
                None => {
                    conn.execute(
                        "INSERT INTO tasks (title, description, user_id, status) VALUES (?1, ?2, ?3, ?4)",
                        params![task.title, task.description, task.user_id, task.status.as_str()],
                    )?;
                    task.id = Some(conn.last_insert_rowid());
                }
                Some(id) => {
                    conn.execute(
                        "INSERT INTO tasks (id, title, description, user_id, status)
                         VALUES (?1, ?2, ?3, ?4, ?5)
                         ON CONFLICT(id) DO UPDATE SET
                            title = excluded.title,
                            description = excluded.description,
                            user_id = excluded.user_id,
                            status = excluded.status",
                        params![id, task.title, task.description, task.user_id, task.status.as_str()],
                    )?;
                }
            }
            Ok(task)
        })
        .await
    }

    async fn update(&self, task: Task) -> Result<Option<Task>> {
        let Some(id) = task.id else {
            return Ok(None);
        };
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE tasks SET title = ?2, description = ?3, user_id = ?4, status = ?5
                 WHERE id = ?1",
                params![id, task.title, task.description, task.user_id, task.status.as_str()],
            )?;
            Ok((changed > 0).then_some(task))
        })
        .await
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
            Ok(())
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_TASK))?;
            let rows = stmt
                .query_map([], read_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(into_task).collect()
        })
        .await
    }
}
