// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory stores, a wired dispatcher and canned flow answers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `stride_coach`

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use stride_coach::advice::{AdviceGateway, AdviceProvider};
use stride_coach::conversation::{ConversationStore, InMemoryConversationStore};
use stride_coach::database::{RecordStore, SqliteRecordStore};
use stride_coach::dispatch::Dispatcher;
use stride_coach::engine::DialogueEngine;
use stride_coach::errors::{AppError, AppResult};
use stride_coach::flows::FlowKind;
use stride_coach::models::{FlowRecord, UserId};
use stride_coach::progress::ProgressReporter;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Valid registration answers in flow order
pub const REGISTRATION_ANSWERS: [&str; 7] = ["Ann", "30", "62", "170", "12", "21", "3"];

/// Valid workout answers in flow order
pub const WORKOUT_ANSWERS: [&str; 5] = ["10", "55", "11", "150", "700"];

/// Canned answers for `flow`
pub const fn answers_for(flow: FlowKind) -> &'static [&'static str] {
    match flow {
        FlowKind::Registration => &REGISTRATION_ANSWERS,
        FlowKind::WorkoutLog => &WORKOUT_ANSWERS,
    }
}

/// Record store that can be told to fail its writes
pub struct FlakyRecordStore {
    inner: SqliteRecordStore,
    fail_appends: AtomicBool,
}

impl FlakyRecordStore {
    pub async fn new() -> Result<Self> {
        Ok(Self {
            inner: SqliteRecordStore::in_memory().await?,
            fail_appends: AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_appends.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for FlakyRecordStore {
    async fn exists(&self, domain: &str, user: UserId) -> AppResult<bool> {
        self.inner.exists(domain, user).await
    }

    async fn append(&self, domain: &str, record: &FlowRecord) -> AppResult<i64> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(AppError::storage_unavailable(format!(
                "{domain} is not writable"
            )));
        }
        self.inner.append(domain, record).await
    }

    async fn read_all(&self, domain: &str) -> AppResult<Vec<FlowRecord>> {
        self.inner.read_all(domain).await
    }

    async fn latest_for_user(&self, domain: &str, user: UserId) -> AppResult<Option<FlowRecord>> {
        self.inner.latest_for_user(domain, user).await
    }
}

/// Engine and its stores, all in memory
pub struct TestEngine {
    pub engine: DialogueEngine,
    pub conversations: Arc<InMemoryConversationStore>,
    pub records: Arc<dyn RecordStore>,
}

/// Engine over the given record store
pub fn engine_with(records: Arc<dyn RecordStore>) -> TestEngine {
    init_test_logging();
    let conversations = Arc::new(InMemoryConversationStore::new());
    let store: Arc<dyn ConversationStore> = conversations.clone();
    let engine = DialogueEngine::new(store, Arc::clone(&records));
    TestEngine {
        engine,
        conversations,
        records,
    }
}

/// Engine over a fresh in-memory `SQLite` store
pub async fn create_test_engine() -> Result<TestEngine> {
    let records: Arc<dyn RecordStore> = Arc::new(SqliteRecordStore::in_memory().await?);
    Ok(engine_with(records))
}

/// Dispatcher over fresh in-memory stores with the given advice provider
pub async fn create_test_dispatcher(
    provider: Option<Arc<dyn AdviceProvider>>,
) -> Result<(Dispatcher, TestEngine)> {
    let test = create_test_engine().await?;
    let dispatcher = Dispatcher::new(
        test.engine.clone(),
        AdviceGateway::new(Arc::clone(&test.records), provider),
        ProgressReporter::new(Arc::clone(&test.records)),
    );
    Ok((dispatcher, test))
}

/// Drive `flow` from begin to the confirmation summary with canned answers
pub async fn fill_flow(engine: &DialogueEngine, user: UserId, flow: FlowKind) -> Result<()> {
    engine.begin(user, flow).await?;
    for answer in answers_for(flow) {
        engine.handle_text(user, answer).await?;
    }
    Ok(())
}

/// Register `user` end to end
pub async fn register(engine: &DialogueEngine, user: UserId) -> Result<()> {
    fill_flow(engine, user, FlowKind::Registration).await?;
    engine.accept(user, FlowKind::Registration).await?;
    Ok(())
}
