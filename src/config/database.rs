// ABOUTME: Database location configuration for the SQLite record store
// ABOUTME: Parses DATABASE_URL into a file-backed or in-memory target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing and throwaway sessions)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// `sqlite::memory:` selects the in-memory store; any other `sqlite:`
    /// URL or a bare path selects a file.
    ///
    /// # Errors
    ///
    /// Returns a config error for empty input or a non-`SQLite` scheme
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::config("DATABASE_URL is empty"));
        }
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" {
                return Ok(Self::Memory);
            }
            if path_str.is_empty() {
                return Err(AppError::config("DATABASE_URL has no SQLite file path"));
            }
            return Ok(Self::SQLite {
                path: PathBuf::from(path_str),
            });
        }
        if s.contains("://") {
            return Err(AppError::config(format!(
                "unsupported database scheme in '{s}', only sqlite is available"
            )));
        }
        // Fallback: treat as SQLite file path
        Ok(Self::SQLite {
            path: PathBuf::from(s),
        })
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL).unwrap_or(Self::Memory)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_and_file_urls() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/stride.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/stride.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:///tmp/x.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("/tmp/x.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("stride.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("stride.db")
            }
        );
    }

    #[test]
    fn test_rejects_other_schemes_and_blank() {
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
        assert!(DatabaseUrl::parse_url("  ").is_err());
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
    }

    #[test]
    fn test_connection_string_round_trip() {
        let url = DatabaseUrl::parse_url("sqlite:./data/stride.db").unwrap();
        assert_eq!(url.to_connection_string(), "sqlite:./data/stride.db");
        assert_eq!(DatabaseUrl::Memory.to_string(), "sqlite::memory:");
        assert!(DatabaseUrl::default().to_string().ends_with("stride.db"));
    }
}
