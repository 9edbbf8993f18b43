// ABOUTME: Unified error type and error codes shared by every Stride module
// ABOUTME: Maps internal failures to generic user-facing apologies without leaking detail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Validation rejections are not errors: they are ordinary replies produced by
//! the field validator and never reach this type. Everything that does reach
//! `AppError` is shown to the chat user only through [`AppError::user_message`],
//! which never includes the internal message.

use crate::constants::messages;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Input (3000-3999)
    /// Input did not match what the operation expects
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // Resource Management (4000-4999)
    /// A record the flow may only have once already exists
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists = 4001,
    /// A prerequisite flow has not been completed
    #[serde(rename = "MISSING_PRECONDITION")]
    MissingPrecondition = 4002,

    // External Services (5000-5999)
    /// External collaborator (advice provider, transport) is unavailable
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,

    // Configuration (6000-6999)
    /// Configuration could not be loaded or is invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Database query failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// Durable table is unreadable or corrupt
    #[serde(rename = "STORAGE_UNAVAILABLE")]
    StorageUnavailable = 9002,
}

impl ErrorCode {
    /// Get a short internal description of this error code
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::MissingPrecondition => "A required prior step has not been completed",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageUnavailable => "Durable storage is unavailable",
        }
    }

    /// Whether the failure is worth retrying without changing the input
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable | Self::DatabaseError | Self::ExternalServiceUnavailable
        )
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Internal error message (never shown to chat users)
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Record already exists
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// Missing prerequisite flow
    #[must_use]
    pub fn missing_precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingPrecondition, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Durable table unreadable or corrupt
    #[must_use]
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageUnavailable, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External collaborator unavailable
    #[must_use]
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Text safe to send to the chat user
    ///
    /// Every code maps to a generic apology so internal detail never leaks.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self.code {
            ErrorCode::StorageUnavailable | ErrorCode::DatabaseError => {
                messages::STORAGE_FAILURE
            }
            ErrorCode::ExternalServiceUnavailable => messages::SERVICE_UNAVAILABLE,
            ErrorCode::InvalidInput
            | ErrorCode::ResourceAlreadyExists
            | ErrorCode::MissingPrecondition
            | ErrorCode::ConfigError
            | ErrorCode::InternalError => messages::GENERIC_FAILURE,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
