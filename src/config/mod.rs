// ABOUTME: Runtime configuration for the bot loaded from the process environment
// ABOUTME: Database location, deployment environment and advice toggle with a loggable summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! The conversational core is configured only by its compiled-in flow
//! definitions. What is read here is the ambient runtime around it.

/// Database location parsing
pub mod database;
/// Shared configuration enums
pub mod types;

pub use database::DatabaseUrl;
pub use types::Environment;

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, info};

/// Bot runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Durable record store location
    pub database: DatabaseUrl,
    /// Deployment environment
    pub environment: Environment,
    /// Whether the advice gateway is wired to a provider
    pub advice_enabled: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            database: DatabaseUrl::default(),
            environment: Environment::default(),
            advice_enabled: true,
        }
    }
}

impl BotConfig {
    /// Load configuration from environment variables, reading `.env` first
    ///
    /// # Errors
    ///
    /// Returns a config error if `DATABASE_URL` or `ADVICE_ENABLED` is malformed
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        Self::from_vars()
    }

    /// Build configuration from the current process environment only
    ///
    /// # Errors
    ///
    /// Returns a config error if `DATABASE_URL` or `ADVICE_ENABLED` is malformed
    pub fn from_vars() -> AppResult<Self> {
        let database = DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", defaults::DATABASE_URL))?;
        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));
        let advice_enabled = parse_bool("ADVICE_ENABLED", &env_var_or("ADVICE_ENABLED", "true"))?;

        Ok(Self {
            database,
            environment,
            advice_enabled,
        })
    }

    /// Replace the database location, e.g. from a CLI flag
    ///
    /// # Errors
    ///
    /// Returns a config error if `url` cannot be parsed
    pub fn with_database_url(mut self, url: &str) -> AppResult<Self> {
        self.database = DatabaseUrl::parse_url(url)?;
        Ok(self)
    }

    /// Human-readable description for the startup log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Stride Coach Configuration:\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Advice: {}",
            self.environment,
            if self.database.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite (file)"
            },
            if self.advice_enabled {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_bool(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::config(format!("Invalid {key} value: '{other}'"))),
    }
}
