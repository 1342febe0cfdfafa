//! TursoStore - NodeStore Implementation for Turso/libsql Backend
//!
//! Stores records in a local libsql (SQLite-compatible) file.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE numbers (
//!     seq INTEGER PRIMARY KEY AUTOINCREMENT,  -- creation order
//!     id TEXT NOT NULL UNIQUE,
//!     value TEXT NOT NULL,
//!     parent_id TEXT,                         -- no foreign key: orphans are legal
//!     owner TEXT NOT NULL,
//!     created_at TEXT NOT NULL                -- RFC 3339
//! )
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use numtree_core::db::{NodeStore, TursoStore};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn NodeStore> =
//!         Arc::new(TursoStore::new(PathBuf::from("./data/numtree.db")).await?);
//!     let records = store.list_all().await?;
//!     println!("{} records", records.len());
//!     Ok(())
//! }
//! ```

use crate::db::events::DOMAIN_EVENT_CHANNEL_CAPACITY;
use crate::db::{DatabaseError, DomainEvent, NodeStore};
use crate::models::{NewNodeRecord, NodeRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;

const SELECT_COLUMNS: &str = "SELECT id, value, parent_id, owner, created_at FROM numbers";

/// TursoStore implements NodeStore for a local libsql database file
pub struct TursoStore {
    db: Arc<Database>,
    db_path: PathBuf,
    event_tx: broadcast::Sender<DomainEvent>,
}

impl TursoStore {
    /// Open (or create) the database at `db_path` and initialize the schema.
    ///
    /// Missing parent directories are created.
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let (event_tx, _) = broadcast::channel(DOMAIN_EVENT_CHANNEL_CAPACITY);
        let store = Self {
            db: Arc::new(db),
            db_path,
            event_tx,
        };
        store.initialize_schema().await?;

        tracing::info!(path = %store.db_path.display(), "Opened libsql node store");
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Connection with a busy timeout, so concurrent writers wait instead of
    /// failing on a locked database.
    async fn connect_with_timeout(&self) -> Result<Connection, DatabaseError> {
        let conn = self.db.connect().map_err(DatabaseError::LibsqlError)?;
        Self::execute_pragma(&conn, "PRAGMA busy_timeout = 5000").await?;
        Ok(conn)
    }

    /// PRAGMA statements return rows, so they go through query().
    async fn execute_pragma(conn: &Connection, pragma: &str) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        Self::execute_pragma(&conn, "PRAGMA journal_mode = WAL").await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS numbers (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                value TEXT NOT NULL,
                parent_id TEXT,
                owner TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create numbers table: {}", e))
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_numbers_parent ON numbers(parent_id)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create parent index: {}", e))
        })?;

        Ok(())
    }

    /// Convert a `SELECT_COLUMNS` row into a record
    fn row_to_record(row: &Row) -> Result<NodeRecord, DatabaseError> {
        let id: String = row
            .get(0)
            .map_err(|e| DatabaseError::row_decoding(format!("id: {}", e)))?;
        let value: String = row
            .get(1)
            .map_err(|e| DatabaseError::row_decoding(format!("value: {}", e)))?;
        let parent_id: Option<String> = row
            .get(2)
            .map_err(|e| DatabaseError::row_decoding(format!("parent_id: {}", e)))?;
        let owner: String = row
            .get(3)
            .map_err(|e| DatabaseError::row_decoding(format!("owner: {}", e)))?;
        let created_at: String = row
            .get(4)
            .map_err(|e| DatabaseError::row_decoding(format!("created_at: {}", e)))?;

        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| {
                DatabaseError::row_decoding(format!(
                    "created_at '{}' for node {}: {}",
                    created_at, id, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(NodeRecord {
            id,
            value,
            parent_id,
            owner,
            created_at,
        })
    }

    fn emit_event(&self, event: DomainEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[async_trait]
impl NodeStore for TursoStore {
    async fn list_all(&self) -> Result<Vec<NodeRecord>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY seq", SELECT_COLUMNS))
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to prepare list: {}", e)))?;
        let mut rows = stmt
            .query(())
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to list nodes: {}", e)))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            records.push(Self::row_to_record(&row)?);
        }

        Ok(records)
    }

    async fn insert(&self, record: NewNodeRecord) -> Result<NodeRecord, DatabaseError> {
        let record = record.into_record();
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO numbers (id, value, parent_id, owner, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                record.id.as_str(),
                record.value.as_str(),
                record.parent_id.as_deref(),
                record.owner.as_str(),
                record.created_at.to_rfc3339(),
            ),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to insert node {}: {}", record.id, e))
        })?;

        tracing::debug!(id = %record.id, "Inserted node");
        self.emit_event(DomainEvent::NodeCreated(record.clone()));
        Ok(record)
    }

    async fn delete_all(&self) -> Result<usize, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        let count = conn
            .execute("DELETE FROM numbers", ())
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete nodes: {}", e)))?
            as usize;

        tracing::debug!(count, "Deleted all nodes");
        self.emit_event(DomainEvent::NodesCleared { count });
        Ok(count)
    }

    async fn get(&self, id: &str) -> Result<Option<NodeRecord>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        let mut stmt = conn
            .prepare(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to prepare get: {}", e)))?;
        let mut rows = stmt.query([id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to get node {}: {}", id, e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.event_tx.subscribe()
    }
}
