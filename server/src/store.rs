//! SQLite persistence for todos.
//!
//! # Design
//! One `rusqlite::Connection` behind a `tokio::sync::Mutex`, shared by every
//! handler through `AppState`, so requests waiting for the connection yield
//! instead of parking a worker thread. Each operation is a single SQL
//! statement, so concurrent requests rely on SQLite's per-statement
//! atomicity and no transactions are opened here. Mutations never check
//! whether a row matched; they report the affected row count and let the
//! caller decide.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;
use todo_core::{Title, Todo, TodoChanges};
use tokio::sync::Mutex;

/// Millisecond-precision UTC timestamps keep `created_at` ordering faithful
/// to insertion order for rapid successive inserts.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (length(trim(title)) > 0),
        completed BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    );
";

const COLUMNS: &str = "id, title, completed, created_at";

/// Any failure coming out of the persistence layer.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StorageError(#[from] rusqlite::Error);

#[derive(Debug)]
pub struct TodoStore {
    conn: Mutex<Connection>,
}

impl TodoStore {
    /// Open (or create) the database file at `path` and bootstrap the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::with_connection(Connection::open(path)?)
    }

    /// A private, throwaway database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create the `todos` table if it does not exist yet. Idempotent.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        self.conn.lock().await.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// All todos, newest first. Rows sharing a timestamp fall back to id order.
    pub async fn list_all(&self) -> Result<Vec<Todo>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM todos ORDER BY created_at DESC, id DESC"
        ))?;
        let todos = stmt
            .query_map([], todo_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, StorageError> {
        let todo = self
            .conn
            .lock()
            .await
            .query_row(
                &format!("SELECT {COLUMNS} FROM todos WHERE id = ?1"),
                params![id],
                todo_from_row,
            )
            .optional()?;
        Ok(todo)
    }

    /// Insert a pending todo and return the stored row, including the
    /// store-assigned `id` and `created_at`.
    pub async fn insert(&self, title: &Title) -> Result<Todo, StorageError> {
        let todo = self.conn.lock().await.query_row(
            &format!("INSERT INTO todos (title) VALUES (?1) RETURNING {COLUMNS}"),
            params![title.as_str()],
            todo_from_row,
        )?;
        Ok(todo)
    }

    /// Overwrite `title` and `completed`. `created_at` is never touched.
    pub async fn update_by_id(
        &self,
        id: i64,
        changes: &TodoChanges,
    ) -> Result<usize, StorageError> {
        let affected = self.conn.lock().await.execute(
            "UPDATE todos SET title = ?1, completed = ?2 WHERE id = ?3",
            params![changes.title.as_str(), changes.completed, id],
        )?;
        Ok(affected)
    }

    /// Flip `completed` in a single statement.
    pub async fn toggle_by_id(&self, id: i64) -> Result<usize, StorageError> {
        let affected = self.conn.lock().await.execute(
            "UPDATE todos SET completed = NOT completed WHERE id = ?1",
            params![id],
        )?;
        Ok(affected)
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<usize, StorageError> {
        let affected = self
            .conn
            .lock()
            .await
            .execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        Ok(affected)
    }

    pub async fn delete_all_completed(&self) -> Result<usize, StorageError> {
        let affected = self
            .conn
            .lock()
            .await
            .execute("DELETE FROM todos WHERE completed = 1", [])?;
        Ok(affected)
    }
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StartupError;

    fn store() -> TodoStore {
        TodoStore::open_in_memory().unwrap()
    }

    fn title(s: &str) -> Title {
        Title::parse(s.to_string()).unwrap()
    }

    fn changes(s: &str, completed: bool) -> TodoChanges {
        TodoChanges {
            title: title(s),
            completed,
        }
    }

    #[test]
    fn open_in_missing_directory_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sub").join("todos.db");

        let err = TodoStore::open(&path).unwrap_err();
        assert!(matches!(err.0, rusqlite::Error::SqliteFailure(..)));
        assert!(err.to_string().contains("unable to open database file"));

        let startup = StartupError::from(err);
        assert!(matches!(startup, StartupError::Storage(_)));
        assert!(startup.to_string().starts_with("database: "));
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let store = store();
        store.insert(&title("Keep me")).await.unwrap();
        store.initialize().await.unwrap();
        store.initialize().await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_all_empty() {
        assert!(store().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_id_and_defaults() {
        let store = store();
        let first = store.insert(&title("Buy milk")).await.unwrap();
        let second = store.insert(&title("Walk dog")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.title, "Buy milk");
        assert!(!first.completed);
        assert!(second.created_at >= first.created_at);
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let store = store();
        for name in ["a", "b", "c", "d"] {
            store.insert(&title(name)).await.unwrap();
        }
        let titles: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["d", "c", "b", "a"]);
    }

    #[tokio::test]
    async fn find_by_id_missing_is_none() {
        assert!(store().find_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_created_at() {
        let store = store();
        let created = store.insert(&title("Draft")).await.unwrap();
        let affected = store
            .update_by_id(created.id, &changes("Final", true))
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let stored = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Final");
        assert!(stored.completed);
        assert_eq!(stored.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_twice_matches_update_once() {
        let store = store();
        let created = store.insert(&title("Draft")).await.unwrap();
        store
            .update_by_id(created.id, &changes("Same", true))
            .await
            .unwrap();
        let once = store.list_all().await.unwrap();
        store
            .update_by_id(created.id, &changes("Same", true))
            .await
            .unwrap();
        assert_eq!(store.list_all().await.unwrap(), once);
    }

    #[tokio::test]
    async fn update_unknown_id_succeeds_without_effect() {
        let store = store();
        store.insert(&title("Untouched")).await.unwrap();
        let affected = store.update_by_id(42, &changes("Ghost", true)).await.unwrap();
        assert_eq!(affected, 0);
        let todos = store.list_all().await.unwrap();
        assert_eq!(todos[0].title, "Untouched");
        assert!(!todos[0].completed);
    }

    #[tokio::test]
    async fn toggle_is_an_involution() {
        let store = store();
        let created = store.insert(&title("Flip")).await.unwrap();

        store.toggle_by_id(created.id).await.unwrap();
        assert!(store.find_by_id(created.id).await.unwrap().unwrap().completed);

        store.toggle_by_id(created.id).await.unwrap();
        assert!(!store.find_by_id(created.id).await.unwrap().unwrap().completed);
    }

    #[tokio::test]
    async fn toggle_unknown_id_is_not_an_error() {
        assert_eq!(store().toggle_by_id(7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_is_a_noop_when_repeated() {
        let store = store();
        let doomed = store.insert(&title("Doomed")).await.unwrap();
        let survivor = store.insert(&title("Survivor")).await.unwrap();

        assert_eq!(store.delete_by_id(doomed.id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(doomed.id).await.unwrap(), 0);

        let todos = store.list_all().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, survivor.id);
    }

    #[tokio::test]
    async fn delete_all_completed_removes_only_completed() {
        let store = store();
        let done_a = store.insert(&title("done a")).await.unwrap();
        let pending = store.insert(&title("pending")).await.unwrap();
        let done_b = store.insert(&title("done b")).await.unwrap();
        store.toggle_by_id(done_a.id).await.unwrap();
        store.toggle_by_id(done_b.id).await.unwrap();

        assert_eq!(store.delete_all_completed().await.unwrap(), 2);
        assert_eq!(store.delete_all_completed().await.unwrap(), 0);

        let todos = store.list_all().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, pending.id);
        assert!(!todos[0].completed);
    }

    #[tokio::test]
    async fn missing_table_surfaces_as_storage_error() {
        let store = store();
        store
            .conn
            .lock()
            .await
            .execute_batch("DROP TABLE todos")
            .unwrap();
        let err = store.list_all().await.unwrap_err();
        assert!(err.to_string().contains("no such table"));
    }
}
