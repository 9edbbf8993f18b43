// ABOUTME: Integration tests for the SQLite record store
// ABOUTME: Table bootstrap, append-only semantics, schema growth, file persistence and failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use anyhow::Result;
use common::init_test_logging;
use stride_coach::config::DatabaseUrl;
use stride_coach::database::{RecordStore, SqliteRecordStore};
use stride_coach::errors::ErrorCode;
use stride_coach::models::{Answers, FieldValue, FlowRecord, UserId};
use tempfile::TempDir;

fn workout(user: i64, distance: i64) -> FlowRecord {
    let mut fields = Answers::new();
    fields.insert("distance", FieldValue::Number(distance));
    fields.insert("time", FieldValue::Number(distance * 6));
    FlowRecord::new(UserId(user), fields)
}

async fn store() -> Result<SqliteRecordStore> {
    init_test_logging();
    Ok(SqliteRecordStore::in_memory().await?)
}

#[tokio::test]
async fn test_missing_table_reads_as_empty() -> Result<()> {
    let store = store().await?;
    assert!(!store.exists("workout_logs", UserId(1)).await?);
    assert!(store.read_all("workout_logs").await?.is_empty());
    assert!(store.latest_for_user("workout_logs", UserId(1)).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_first_append_creates_table() -> Result<()> {
    let store = store().await?;
    let record = workout(1, 10);
    let row_id = store.append("workout_logs", &record).await?;
    assert_eq!(row_id, 1);

    let rows = store.read_all("workout_logs").await?;
    assert_eq!(rows, vec![record]);
    assert!(store.exists("workout_logs", UserId(1)).await?);
    assert!(!store.exists("workout_logs", UserId(2)).await?);
    Ok(())
}

#[tokio::test]
async fn test_append_never_deduplicates() -> Result<()> {
    let store = store().await?;
    let record = workout(1, 10);
    store.append("workout_logs", &record).await?;
    store.append("workout_logs", &record).await?;

    assert_eq!(store.read_all("workout_logs").await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_read_all_keeps_insertion_order() -> Result<()> {
    let store = store().await?;
    for (user, distance) in [(1, 5), (2, 7), (1, 12)] {
        store.append("workout_logs", &workout(user, distance)).await?;
    }

    let distances: Vec<i64> = store
        .read_all("workout_logs")
        .await?
        .iter()
        .filter_map(|r| r.fields.number("distance"))
        .collect();
    assert_eq!(distances, vec![5, 7, 12]);

    let mine = store.read_for_user("workout_logs", UserId(1)).await?;
    assert_eq!(mine.len(), 2);

    let latest = store.latest_for_user("workout_logs", UserId(1)).await?.unwrap();
    assert_eq!(latest.fields.number("distance"), Some(12));
    Ok(())
}

#[tokio::test]
async fn test_new_field_adds_column() -> Result<()> {
    let store = store().await?;
    store.append("workout_logs", &workout(1, 5)).await?;

    let mut richer = workout(1, 8);
    richer.fields.insert("note", FieldValue::Text("windy".into()));
    store.append("workout_logs", &richer).await?;

    let rows = store.read_all("workout_logs").await?;
    assert!(!rows[0].fields.contains_key("note"));
    assert_eq!(
        rows[1].fields.get("note"),
        Some(&FieldValue::Text("windy".into()))
    );
    Ok(())
}

#[tokio::test]
async fn test_domains_are_separate_tables() -> Result<()> {
    let store = store().await?;
    store.append("registrations", &workout(1, 5)).await?;
    assert!(store.exists("registrations", UserId(1)).await?);
    assert!(!store.exists("workout_logs", UserId(1)).await?);
    Ok(())
}

#[tokio::test]
async fn test_rejects_unsafe_identifiers() -> Result<()> {
    let store = store().await?;
    let err = store
        .append("logs; DROP TABLE x", &workout(1, 5))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let mut record = workout(1, 5);
    record.fields.insert("user_id", FieldValue::Number(9));
    let err = store.append("workout_logs", &record).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(store.read_all("workout_logs").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_file_database_survives_reconnect() -> Result<()> {
    init_test_logging();
    let dir = TempDir::new()?;
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("nested").join("stride.db"),
    };

    let store = SqliteRecordStore::connect(&url).await?;
    store.append("registrations", &workout(42, 3)).await?;
    store.close().await;

    let reopened = SqliteRecordStore::connect(&url).await?;
    assert!(reopened.exists("registrations", UserId(42)).await?);
    assert_eq!(reopened.read_all("registrations").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_closed_store_reports_storage_failure() -> Result<()> {
    let store = store().await?;
    store.append("workout_logs", &workout(1, 5)).await?;
    store.close().await;

    let err = store.read_all("workout_logs").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageUnavailable);
    let err = store.append("workout_logs", &workout(1, 6)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageUnavailable);
    Ok(())
}
