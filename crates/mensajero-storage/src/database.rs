// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use mensajero_config::model::StorageConfig;
use mensajero_core::MensajeroError;
use tracing::debug;

/// Options applied when a connection is opened.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    pub wal_mode: bool,
    pub busy_timeout_ms: u64,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            wal_mode: true,
            busy_timeout_ms: 5000,
        }
    }
}

impl From<&StorageConfig> for OpenOptions {
    fn from(config: &StorageConfig) -> Self {
        Self {
            wal_mode: config.wal_mode,
            busy_timeout_ms: config.busy_timeout_ms,
        }
    }
}

/// Handle to the Mensajero SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` with default options.
    pub async fn open(path: &str) -> Result<Self, MensajeroError> {
        Self::open_with(path, OpenOptions::default()).await
    }

    /// Open the database at `path`, apply PRAGMAs and run pending migrations.
    pub async fn open_with(path: &str, options: OpenOptions) -> Result<Self, MensajeroError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| MensajeroError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| MensajeroError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| {
            conn.busy_timeout(std::time::Duration::from_millis(options.busy_timeout_ms))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            if options.wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
            }
            Ok(crate::migrations::run_migrations(conn))
        })
        .await
        .map_err(map_tr_err)??;

        debug!(path, wal = options.wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), MensajeroError> {
        self.conn
            .call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(|e| MensajeroError::Storage {
            source: e.to_string().into(),
        })
    }
}

/// Map a tokio-rusqlite error into the domain error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> MensajeroError {
    MensajeroError::Storage {
        source: Box::new(e),
    }
}
