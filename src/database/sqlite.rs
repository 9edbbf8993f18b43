// ABOUTME: SQLite-backed record store with table bootstrap and additive schema growth
// ABOUTME: Decodes rows dynamically so each domain's columns follow its recorded field keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{validate_field_key, validate_identifier, RecordStore};
use crate::config::DatabaseUrl;
use crate::constants::columns;
use crate::errors::{AppError, AppResult};
use crate::models::{Answers, FieldValue, FlowRecord, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, SqliteConnection, SqlitePool, TypeInfo, ValueRef};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, info};

/// Pool size for file-backed databases
const FILE_POOL_SIZE: u32 = 4;

/// Record store over a `SQLite` pool
///
/// In-memory databases get a single connection that is never recycled, since
/// every connection to `sqlite::memory:` would otherwise see its own empty
/// database.
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database at `url`, creating the file and its directory if needed
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the directory cannot be created or the
    /// connection fails
    pub async fn connect(url: &DatabaseUrl) -> AppResult<Self> {
        let pool = match url {
            DatabaseUrl::Memory => {
                let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
                    AppError::storage_unavailable(format!("Invalid in-memory options: {e}"))
                })?;
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
            }
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::storage_unavailable(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                        .with_source(e)
                    })?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                SqlitePoolOptions::new()
                    .max_connections(FILE_POOL_SIZE)
                    .connect_with(options)
                    .await
            }
        }
        .map_err(|e| {
            AppError::storage_unavailable(format!("Failed to open {url}: {e}")).with_source(e)
        })?;

        info!(memory = url.is_memory(), "Record store connected");
        Ok(Self { pool })
    }

    /// Open a fresh private in-memory database
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the connection fails
    pub async fn in_memory() -> AppResult<Self> {
        Self::connect(&DatabaseUrl::Memory).await
    }

    /// Close every connection; later operations fail with a storage error
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Column names of `table`, empty when the table does not exist
    async fn table_columns(conn: &mut SqliteConnection, table: &str) -> AppResult<Vec<String>> {
        let sql = format!("PRAGMA table_info(\"{table}\")");
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to inspect table {table}: {e}")))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("name").map_err(|e| {
                    AppError::storage_unavailable(format!("Unreadable schema of {table}: {e}"))
                })
            })
            .collect()
    }

    async fn acquire(&self) -> AppResult<sqlx::pool::PoolConnection<sqlx::Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| {
                AppError::storage_unavailable(format!("No database connection: {e}")).with_source(e)
            })
    }
}

const fn column_type(value: &FieldValue) -> &'static str {
    match value {
        FieldValue::Number(_) => "INTEGER",
        FieldValue::Text(_) => "TEXT",
    }
}

fn corrupt(table: &str, detail: impl std::fmt::Display) -> AppError {
    AppError::storage_unavailable(format!("Corrupt row in {table}: {detail}"))
}

fn decode_field(row: &SqliteRow, index: usize, table: &str) -> AppResult<Option<FieldValue>> {
    let raw = row.try_get_raw(index).map_err(|e| corrupt(table, e))?;
    if raw.is_null() {
        return Ok(None);
    }
    let type_info = raw.type_info();
    let value = match type_info.name() {
        "INTEGER" => FieldValue::Number(row.try_get(index).map_err(|e| corrupt(table, e))?),
        "TEXT" => FieldValue::Text(row.try_get(index).map_err(|e| corrupt(table, e))?),
        other => return Err(corrupt(table, format!("unsupported {other} value"))),
    };
    Ok(Some(value))
}

fn decode_record(row: &SqliteRow, table: &str) -> AppResult<FlowRecord> {
    let mut user_id = None;
    let mut committed_at = None;
    let mut fields = Answers::new();

    for (index, column) in row.columns().iter().enumerate() {
        match column.name() {
            columns::ROW_ID => {}
            columns::USER_ID => {
                let id: i64 = row.try_get(index).map_err(|e| corrupt(table, e))?;
                user_id = Some(UserId(id));
            }
            columns::COMMITTED_AT => {
                let text: String = row.try_get(index).map_err(|e| corrupt(table, e))?;
                let parsed = DateTime::parse_from_rfc3339(&text)
                    .map_err(|e| corrupt(table, format!("committed_at '{text}': {e}")))?;
                committed_at = Some(parsed.with_timezone(&Utc));
            }
            key => {
                if let Some(value) = decode_field(row, index, table)? {
                    fields.insert(key, value);
                }
            }
        }
    }

    match (user_id, committed_at) {
        (Some(user_id), Some(committed_at)) => Ok(FlowRecord {
            user_id,
            fields,
            committed_at,
        }),
        _ => Err(corrupt(table, "missing user_id or committed_at")),
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn exists(&self, domain: &str, user: UserId) -> AppResult<bool> {
        let table = validate_identifier(domain)?;
        let mut conn = self.acquire().await?;
        if Self::table_columns(&mut conn, table).await?.is_empty() {
            return Ok(false);
        }

        let sql = format!(
            "SELECT 1 FROM \"{table}\" WHERE {} = ? LIMIT 1",
            columns::USER_ID
        );
        let found = sqlx::query(&sql)
            .bind(user.as_i64())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to query {table}: {e}")))?;
        Ok(found.is_some())
    }

    async fn append(&self, domain: &str, record: &FlowRecord) -> AppResult<i64> {
        let table = validate_identifier(domain)?;
        for (key, _) in record.fields.iter() {
            validate_field_key(key)?;
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::storage_unavailable(format!("Failed to begin write: {e}")))?;

        let existing = Self::table_columns(&mut tx, table).await?;
        if existing.is_empty() {
            let field_columns: String = record
                .fields
                .iter()
                .map(|(key, value)| format!(", \"{key}\" {}", column_type(value)))
                .collect();
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS \"{table}\" (\
                 {} INTEGER PRIMARY KEY AUTOINCREMENT, \
                 {} INTEGER NOT NULL{field_columns}, \
                 {} TEXT NOT NULL)",
                columns::ROW_ID,
                columns::USER_ID,
                columns::COMMITTED_AT,
            );
            sqlx::query(&sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to create table {table}: {e}")))?;
            info!(domain = table, "Created record table");
        } else {
            let known: HashSet<&str> = existing.iter().map(String::as_str).collect();
            for (key, value) in record.fields.iter() {
                if known.contains(key) {
                    continue;
                }
                let sql = format!(
                    "ALTER TABLE \"{table}\" ADD COLUMN \"{key}\" {}",
                    column_type(value)
                );
                sqlx::query(&sql).execute(&mut *tx).await.map_err(|e| {
                    AppError::database(format!("Failed to add column {key} to {table}: {e}"))
                })?;
                info!(domain = table, column = key, "Added record column");
            }
        }

        let mut column_list = vec![format!("\"{}\"", columns::USER_ID)];
        column_list.extend(record.fields.keys().map(|key| format!("\"{key}\"")));
        column_list.push(format!("\"{}\"", columns::COMMITTED_AT));
        let placeholders = vec!["?"; column_list.len()].join(", ");
        let sql = format!(
            "INSERT INTO \"{table}\" ({}) VALUES ({placeholders})",
            column_list.join(", ")
        );

        let mut query = sqlx::query(&sql).bind(record.user_id.as_i64());
        for (_, value) in record.fields.iter() {
            query = match value {
                FieldValue::Number(n) => query.bind(*n),
                FieldValue::Text(s) => query.bind(s.clone()),
            };
        }
        let result = query
            .bind(record.committed_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to append to {table}: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit append to {table}: {e}")))?;

        let row_id = result.last_insert_rowid();
        debug!(domain = table, user_id = %record.user_id, row_id, "Appended record");
        Ok(row_id)
    }

    async fn read_all(&self, domain: &str) -> AppResult<Vec<FlowRecord>> {
        let table = validate_identifier(domain)?;
        let mut conn = self.acquire().await?;
        if Self::table_columns(&mut conn, table).await?.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT * FROM \"{table}\" ORDER BY {}", columns::ROW_ID);
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to read {table}: {e}")))?;

        rows.iter().map(|row| decode_record(row, table)).collect()
    }

    async fn latest_for_user(&self, domain: &str, user: UserId) -> AppResult<Option<FlowRecord>> {
        let table = validate_identifier(domain)?;
        let mut conn = self.acquire().await?;
        if Self::table_columns(&mut conn, table).await?.is_empty() {
            return Ok(None);
        }

        let sql = format!(
            "SELECT * FROM \"{table}\" WHERE {} = ? ORDER BY {} DESC LIMIT 1",
            columns::USER_ID,
            columns::ROW_ID
        );
        let row = sqlx::query(&sql)
            .bind(user.as_i64())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to read {table}: {e}")))?;

        row.map(|row| decode_record(&row, table)).transpose()
    }
}
