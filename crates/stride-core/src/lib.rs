// ABOUTME: Core types and constants for the Stride conversational fitness tracker
// ABOUTME: Foundation crate with error handling, identity and record models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Stride Core
//!
//! Foundation crate providing shared types and constants for the Stride
//! coaching bot. It changes infrequently so the main crate can rebuild
//! incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Domain table names, service names and user-facing messages
//! - **models**: User identity, field values, answer sets and persisted records

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (`UserId`, `FieldValue`, `Answers`, `FlowRecord`)
pub mod models;
