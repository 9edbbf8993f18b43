// ABOUTME: Answer set and persisted record types for completed conversational flows
// ABOUTME: Keeps field order stable so summaries and table schemas follow flow order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated answer to one flow step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer extracted from the user's text
    Number(i64),
    /// Free text (e.g. the athlete's name)
    Text(String),
}

impl FieldValue {
    /// Numeric value, if this is a number
    #[must_use]
    pub const fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Text value, if this is text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Insertion-ordered mapping from step key to validated value
///
/// Flow answer sets are tiny (under ten fields), so a vector with linear key
/// lookup keeps flow order without pulling in an ordered map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    entries: Vec<(String, FieldValue)>,
}

impl Answers {
    /// Create an empty answer set
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace the value for `key`, keeping its original position
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Value recorded for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Numeric value recorded for `key`
    #[must_use]
    pub fn number(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(FieldValue::as_number)
    }

    /// Whether a value has been recorded for `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of recorded answers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no answers are recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every answer
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<(String, FieldValue)> for Answers {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut answers = Self::new();
        for (key, value) in iter {
            answers.insert(key, value);
        }
        answers
    }
}

/// One committed outcome of a completed flow
///
/// A row in a domain table is this record: the user identity unioned with
/// every step answer confirmed at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    /// Owner of the record
    pub user_id: UserId,
    /// Confirmed answers in flow order
    pub fields: Answers,
    /// When the record was committed
    pub committed_at: DateTime<Utc>,
}

impl FlowRecord {
    /// Build a record stamped with the current time
    #[must_use]
    pub fn new(user_id: UserId, fields: Answers) -> Self {
        Self {
            user_id,
            fields,
            committed_at: Utc::now(),
        }
    }
}
