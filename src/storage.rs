//! Storage layer for groceries
//!
//! All list entries live in one SQLite table. The schema is created on open
//! if it is missing; there are no migrations.
//!
//! ```text
//! tasks
//!   id           INTEGER PRIMARY KEY
//!   item         TEXT NOT NULL
//!   description  TEXT
//!   status       TEXT NOT NULL      -- planned | purchased, checked by the app
//!   created_at   DATETIME NOT NULL
//!   created_by   TEXT
//!   category     TEXT
//! ```
//!
//! Every statement runs in autocommit, so a write is visible to the next read.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::task::{format_timestamp, parse_timestamp, NewTask, Task, TaskFilter, TaskStatus};

/// Default database file name, relative to the working directory
pub const DEFAULT_DB_FILE: &str = "groceryshoppingapp.sqlite";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY,
    item TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL,
    created_at DATETIME NOT NULL,
    created_by TEXT,
    category TEXT
)
"#;

const TASK_COLUMNS: &str = "id, item, description, status, created_at, created_by, category";

/// Owned handle to the grocery database
#[derive(Debug)]
pub struct Storage {
    /// `None` for in-memory databases
    path: Option<PathBuf>,
    conn: Connection,
    case_sensitive_search: bool,
}

impl Storage {
    /// Open (creating if needed) the database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&path)?;
        debug!(path = %path.display(), "opened grocery database");
        let storage = Self {
            path: Some(path),
            conn,
            case_sensitive_search: false,
        };
        storage.initialize()?;
        Ok(storage)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            path: None,
            conn,
            case_sensitive_search: false,
        };
        storage.initialize()?;
        Ok(storage)
    }

    /// Switch item search between case-insensitive `LIKE` (default) and exact `instr`.
    pub fn with_case_sensitive_search(mut self, enabled: bool) -> Self {
        self.case_sensitive_search = enabled;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn case_sensitive_search(&self) -> bool {
        self.case_sensitive_search
    }

    /// Create the table if it does not exist. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        debug!("tasks table ready");
        Ok(())
    }

    /// Insert a row and return its assigned id.
    pub fn insert(&self, task: &NewTask) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO tasks (item, description, status, created_at, created_by, category) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    task.item,
                    task.description,
                    task.status.as_str(),
                    format_timestamp(task.created_at),
                    task.created_by,
                    task.category,
                ],
            )
            .map_err(map_write_error)?;
        let id = self.conn.last_insert_rowid();
        debug!(id, item = %task.item, "inserted task");
        Ok(id)
    }

    /// Rows whose item contains the search text, optionally limited to one category.
    ///
    /// The search text is matched literally; `%` and `_` are not wildcards.
    pub fn query(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE ");
        let mut values: Vec<String> = Vec::with_capacity(2);
        if self.case_sensitive_search {
            sql.push_str("instr(item, ?1) > 0");
            values.push(filter.search.clone());
        } else {
            sql.push_str("item LIKE ?1 ESCAPE '\\'");
            values.push(format!("%{}%", escape_like(&filter.search)));
        }
        if let Some(category) = filter.category.category() {
            sql.push_str(" AND category = ?2");
            values.push(category.to_string());
        }
        sql.push_str(" ORDER BY id");

        debug!(search = %filter.search, category = %filter.category.label(), "querying tasks");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(map_read_error)?);
        }
        Ok(tasks)
    }

    pub fn get(&self, id: i64) -> Result<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_task)
            .optional()
            .map_err(map_read_error)
    }

    /// Distinct non-empty categories, sorted. Does not include the `All` sentinel.
    pub fn distinct_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT category FROM tasks \
             WHERE category IS NOT NULL AND category <> '' \
             ORDER BY category",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    /// Set the status of one row. Returns false when the id does not exist.
    pub fn update_status(&self, id: i64, status: TaskStatus) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id],
            )
            .map_err(map_write_error)?;
        debug!(id, status = %status, changed, "updated task status");
        Ok(changed > 0)
    }

    /// Remove one row. Returns false when the id does not exist.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(map_write_error)?;
        debug!(id, changed, "deleted task");
        Ok(changed > 0)
    }

    /// Close the connection, surfacing any error SQLite reports on shutdown.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| Error::Sqlite(err))?;
        debug!("closed grocery database");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status_raw: String = row.get(3)?;
    let status = TaskStatus::from_stored(&status_raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(err)))?;
    let created_at_raw: String = row.get(4)?;
    let created_at = parse_timestamp(&created_at_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("unrecognized created_at '{created_at_raw}'").into(),
        )
    })?;

    Ok(Task {
        id: row.get(0)?,
        item: row.get(1)?,
        description: row.get(2)?,
        status,
        created_at,
        created_by: row.get(5)?,
        category: row.get(6)?,
    })
}

fn map_read_error(err: rusqlite::Error) -> Error {
    match err {
        rusqlite::Error::FromSqlConversionFailure(column, kind, inner) => {
            match inner.downcast::<Error>() {
                Ok(inner) => *inner,
                Err(inner) => {
                    Error::Sqlite(rusqlite::Error::FromSqlConversionFailure(column, kind, inner))
                }
            }
        }
        other => Error::Sqlite(other),
    }
}

fn map_write_error(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(code, message)
            if code.code == ErrorCode::ConstraintViolation =>
        {
            Error::Constraint(message.clone().unwrap_or_else(|| code.to_string()))
        }
        _ => Error::Sqlite(err),
    }
}

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
