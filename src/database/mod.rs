// ABOUTME: Persistence adapter contract for committed flow records
// ABOUTME: One append-only table per domain with existence checks and full scans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Record Persistence
//!
//! Committed flows land in a per-domain table as one row per record. Rows are
//! only ever appended; nothing here updates or deduplicates. "At most one
//! registration per user" is the registration gate's job, not the table's.

/// `SQLite` implementation
pub mod sqlite;

pub use sqlite::SqliteRecordStore;

use crate::constants::columns;
use crate::errors::{AppError, AppResult};
use crate::models::{FlowRecord, UserId};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").ok());

/// Durable per-domain record storage
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether `user` has at least one record in `domain`
    ///
    /// A domain whose table does not exist yet has no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read
    async fn exists(&self, domain: &str, user: UserId) -> AppResult<bool>;

    /// Append one record, creating the table or missing columns first
    ///
    /// Returns the new row's identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain or a field key is not a valid
    /// identifier, or the write fails
    async fn append(&self, domain: &str, record: &FlowRecord) -> AppResult<i64>;

    /// Every record of `domain` in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or a row is corrupt
    async fn read_all(&self, domain: &str) -> AppResult<Vec<FlowRecord>>;

    /// Most recently appended record of `user` in `domain`
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or the row is corrupt
    async fn latest_for_user(&self, domain: &str, user: UserId) -> AppResult<Option<FlowRecord>>;

    /// Records of `user` in `domain`, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read
    async fn read_for_user(&self, domain: &str, user: UserId) -> AppResult<Vec<FlowRecord>> {
        let records = self.read_all(domain).await?;
        Ok(records
            .into_iter()
            .filter(|record| record.user_id == user)
            .collect())
    }
}

/// Check that `name` can be spliced into SQL as a table or column name
///
/// # Errors
///
/// Returns `InvalidInput` unless `name` matches `[a-z_][a-z0-9_]*`
pub fn validate_identifier(name: &str) -> AppResult<&str> {
    let valid = IDENTIFIER_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name));
    if valid {
        Ok(name)
    } else {
        Err(AppError::invalid_input(format!(
            "'{name}' is not a valid table or column name"
        )))
    }
}

/// Check that a record field key is a valid, non-reserved column name
///
/// # Errors
///
/// Returns `InvalidInput` for malformed keys and for the reserved
/// `row_id`, `user_id` and `committed_at` columns
pub fn validate_field_key(key: &str) -> AppResult<&str> {
    validate_identifier(key)?;
    if [columns::ROW_ID, columns::USER_ID, columns::COMMITTED_AT].contains(&key) {
        return Err(AppError::invalid_input(format!(
            "'{key}' is a reserved column name"
        )));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(validate_identifier("workout_logs").is_ok());
        assert!(validate_identifier("_x1").is_ok());
        assert!(validate_identifier("1abc").is_err());
        assert!(validate_identifier("Users").is_err());
        assert!(validate_identifier("a; DROP TABLE x").is_err());
        assert!(validate_identifier("").is_err());
    }

    #[test]
    fn test_reserved_field_keys() {
        assert!(validate_field_key("distance").is_ok());
        assert!(validate_field_key("user_id").is_err());
        assert!(validate_field_key("row_id").is_err());
        assert!(validate_field_key("committed_at").is_err());
    }
}
