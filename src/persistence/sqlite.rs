use super::{PersistenceResult, TaskStore};
use crate::Task;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqliteTaskStore {
    connection: Mutex<Connection>,
}

impl SqliteTaskStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        // `task_snapshot` holds one row once anything has been saved, which
        // tells an empty saved list apart from "never saved".
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS task_snapshot (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                task_count INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                position INTEGER PRIMARY KEY,
                id TEXT NOT NULL UNIQUE,
                task_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TaskStore for SqliteTaskStore {
    fn save_tasks(&self, tasks: &[Task]) -> PersistenceResult<()> {
        super::validate_tasks(tasks)?;
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO tasks (position, id, task_json) VALUES (?1, ?2, ?3)")?;
            for (position, task) in tasks.iter().enumerate() {
                let json = serde_json::to_string(task)?;
                stmt.execute(params![position as i64, task.id, json])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO task_snapshot (id, task_count) VALUES (1, ?1)",
            params![tasks.len() as i64],
        )?;
        tx.commit()?;
        tracing::debug!(count = tasks.len(), "tasks saved to sqlite");
        Ok(())
    }

    fn load_tasks(&self) -> PersistenceResult<Option<Vec<Task>>> {
        let conn = self.lock();

        let saved: Option<i64> = conn
            .query_row("SELECT task_count FROM task_snapshot WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        if saved.is_none() {
            return Ok(None);
        }

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tasks = Vec::new();
        for json in rows {
            let task: Task = serde_json::from_str(&json?)?;
            tasks.push(task);
        }

        super::validate_loaded_tasks(&tasks)?;
        Ok(Some(tasks))
    }
}
