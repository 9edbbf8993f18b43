// ABOUTME: Main library entry point for the Stride conversational fitness tracker
// ABOUTME: Registration and workout-logging dialogues with validation, confirmation and persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Stride Coach
//!
//! A chat bot core for runners. Users register through a multi-step dialogue,
//! log workouts the same way, ask for progress reports and request advice.
//!
//! ## Architecture
//!
//! - **Validation**: pure checks turning chat text into field values
//! - **Flows**: the static registration and workout step definitions
//! - **Conversation**: per-user state store for the flow in progress
//! - **Engine**: the state machine driving flows step by step
//! - **Confirmation**: summary, accept-and-commit, reject-and-restart
//! - **Database**: append-only `SQLite` tables, one per flow domain
//! - **Dispatch**: routes commands, buttons and text to the above
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stride_coach::conversation::InMemoryConversationStore;
//! use stride_coach::database::SqliteRecordStore;
//! use stride_coach::engine::DialogueEngine;
//! use stride_coach::flows::FlowKind;
//! use stride_coach::models::UserId;
//!
//! # async fn example() -> stride_coach::errors::AppResult<()> {
//! let records = Arc::new(SqliteRecordStore::in_memory().await?);
//! let engine = DialogueEngine::new(Arc::new(InMemoryConversationStore::new()), records);
//!
//! let reply = engine.begin(UserId(42), FlowKind::Registration).await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the binary (src/bin/) and integration tests (tests/).

pub use stride_core::{constants, errors, models};

/// Advice gateway and provider trait
pub mod advice;
/// Runtime configuration from the environment
pub mod config;
/// Confirmation gate: summary, commit and restart
pub mod confirmation;
/// Per-user conversation state store
pub mod conversation;
/// Durable record persistence
pub mod database;
/// Inbound event routing
pub mod dispatch;
/// Dialogue flow state machine
pub mod engine;
/// Static flow definitions
pub mod flows;
/// Logging configuration
pub mod logging;
/// Progress series from logged workouts
pub mod progress;
/// Transport boundary types
pub mod transport;
/// Field validation
pub mod validation;
