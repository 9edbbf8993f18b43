// ABOUTME: Field validation for conversational flow steps (numbers, ranges, free text)
// ABOUTME: Pure functions mapping raw chat text to a normalized value or a field-named rejection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Field Validator
//!
//! Every numeric step extracts the *first* integer-looking token from the
//! user's text ("I am 25 years old" yields `25`), then applies the step's
//! domain. Bounds are inclusive. Validation has no side effects and never
//! touches conversation state: a rejection is just a reply.

use crate::models::FieldValue;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// First run of decimal digits (any script) bounded by word boundaries
static NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\b").ok());

static DIGIT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d$").ok());

/// Domain a step's answer must fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDomain {
    /// Any non-empty text (after trimming)
    NonEmptyText,
    /// Any integer, no bounds
    AnyNumber,
    /// Integer of at least one, no upper bound
    Positive,
    /// Integer within `[min, max]`, both inclusive
    Range {
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: i64,
    },
}

impl FieldDomain {
    /// Declared numeric bounds, if the domain has both ends
    #[must_use]
    pub const fn bounds(&self) -> Option<(i64, i64)> {
        match self {
            Self::Range { min, max } => Some((*min, *max)),
            Self::NonEmptyText | Self::AnyNumber | Self::Positive => None,
        }
    }

    const fn accepts(&self, value: i64) -> bool {
        match self {
            Self::NonEmptyText | Self::AnyNumber => true,
            Self::Positive => value >= 1,
            Self::Range { min, max } => *min <= value && value <= *max,
        }
    }
}

/// Why an answer was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Text was blank
    Empty,
    /// No integer token found (or it does not fit in 64 bits)
    NotANumber,
    /// Integer found but outside the domain
    OutOfRange {
        /// Extracted value
        value: i64,
    },
}

/// A recoverable validation failure with the text to send back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// What went wrong
    pub reason: RejectionReason,
    /// Field-specific reply text
    pub message: &'static str,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// Validation rule for one step: the domain plus the reply used on rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Accepted domain
    pub domain: FieldDomain,
    /// Reply text when the answer is rejected; names the range for ranged fields
    pub rejection: &'static str,
}

impl FieldRule {
    /// Validate raw text against this rule
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] carrying the field-specific message when the text
    /// is blank, has no integer token, or the integer is outside the domain.
    pub fn check(&self, text: &str) -> Result<FieldValue, Rejection> {
        validate(text, self.domain).map_err(|reason| Rejection {
            reason,
            message: self.rejection,
        })
    }
}

/// Extract the first integer-looking token from free text
///
/// Digits of any script count, so full-width "２５" reads as 25. Returns
/// `None` when the text has no standalone digit run, or when the run does
/// not fit in an `i64`.
#[must_use]
pub fn extract_number(text: &str) -> Option<i64> {
    let pattern = NUMBER_PATTERN.as_ref()?;
    let captures = pattern.captures(text)?;
    captures
        .get(1)?
        .as_str()
        .chars()
        .try_fold(0_i64, |acc, c| {
            acc.checked_mul(10)?
                .checked_add(i64::from(digit_value(c)?))
        })
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0_u8; 4];
    DIGIT_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(c.encode_utf8(&mut buf)))
}

/// Numeric value of a decimal digit in any script
///
/// Decimal digit sets are ten consecutive code points starting at zero.
fn digit_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let code = u32::from(c);
    let mut start = code;
    while let Some(previous) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(previous) {
            break;
        }
        start -= 1;
    }
    Some((code - start) % 10)
}

/// Validate raw text against a domain
///
/// # Errors
///
/// Returns the [`RejectionReason`] when the text does not satisfy the domain.
pub fn validate(text: &str, domain: FieldDomain) -> Result<FieldValue, RejectionReason> {
    if domain == FieldDomain::NonEmptyText {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RejectionReason::Empty);
        }
        return Ok(FieldValue::Text(trimmed.to_owned()));
    }

    let value = extract_number(text).ok_or(RejectionReason::NotANumber)?;
    if domain.accepts(value) {
        Ok(FieldValue::Number(value))
    } else {
        Err(RejectionReason::OutOfRange { value })
    }
}
