// ABOUTME: Progress series extracted from a user's logged workouts
// ABOUTME: Distance and pulse per workout plus pace against pulse, returned as data and a text digest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Progress Series
//!
//! Chart rendering is left to whoever consumes [`ProgressSeries`]. The
//! reporter here answers with a compact text digest of the same points.

use crate::constants::{domains, messages};
use crate::database::RecordStore;
use crate::errors::AppResult;
use crate::models::{FlowRecord, UserId};
use crate::transport::{Action, ProgressReport, Reply};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Points of one progress report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSeries {
    /// Report the series belongs to
    pub report: ProgressReport,
    /// X axis caption
    pub x_label: &'static str,
    /// Y axis caption
    pub y_label: &'static str,
    /// `(x, y)` points in workout order
    pub points: Vec<(i64, i64)>,
}

impl ProgressSeries {
    /// Whether there is nothing to plot
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest y value
    #[must_use]
    pub fn y_range(&self) -> Option<(i64, i64)> {
        let min = self.points.iter().map(|&(_, y)| y).min()?;
        let max = self.points.iter().map(|&(_, y)| y).max()?;
        Some((min, max))
    }

    /// Text digest: one line per point and the y range
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!("{} / {}", self.y_label, self.x_label);
        for &(x, y) in &self.points {
            match self.report {
                ProgressReport::Distance | ProgressReport::Pulse => {
                    let _ = write!(text, "\n#{x}: {y}");
                }
                ProgressReport::PacePulse => {
                    let _ = write!(text, "\n{x} km/h: {y} bpm");
                }
            }
        }
        if let Some((min, max)) = self.y_range() {
            let _ = write!(text, "\nRange: {min}-{max}");
        }
        text
    }
}

const fn axes(report: ProgressReport) -> (&'static str, &'static str) {
    match report {
        ProgressReport::Distance => ("Workout", "Distance (km)"),
        ProgressReport::Pulse => ("Workout", "Average pulse (bpm)"),
        ProgressReport::PacePulse => ("Average pace (km/h)", "Average pulse (bpm)"),
    }
}

/// Build the series for `report` from workout records, oldest first
///
/// Workouts are numbered from 1 in the order given. Records lacking a
/// needed field are skipped but still consume their number.
#[must_use]
pub fn series(records: &[FlowRecord], report: ProgressReport) -> ProgressSeries {
    let numbered = (1_i64..).zip(records);
    let points = match report {
        ProgressReport::Distance => numbered
            .filter_map(|(n, record)| record.fields.number("distance").map(|d| (n, d)))
            .collect(),
        ProgressReport::Pulse => numbered
            .filter_map(|(n, record)| record.fields.number("pulse").map(|p| (n, p)))
            .collect(),
        ProgressReport::PacePulse => records
            .iter()
            .filter_map(|record| {
                Some((record.fields.number("pace")?, record.fields.number("pulse")?))
            })
            .collect(),
    };
    let (x_label, y_label) = axes(report);
    ProgressSeries {
        report,
        x_label,
        y_label,
        points,
    }
}

/// Answers progress requests from the workout log table
#[derive(Clone)]
pub struct ProgressReporter {
    records: Arc<dyn RecordStore>,
}

impl ProgressReporter {
    /// Reporter over `records`
    #[must_use]
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Report chooser
    #[must_use]
    pub fn menu() -> Reply {
        Reply::with_buttons(
            messages::CHOOSE_PROGRESS,
            vec![
                Action::Progress(ProgressReport::Distance),
                Action::Progress(ProgressReport::Pulse),
                Action::Progress(ProgressReport::PacePulse),
            ],
        )
    }

    /// Series of `user`'s workouts for `report`
    ///
    /// # Errors
    ///
    /// Returns an error if the workout table cannot be read
    pub async fn series_for(&self, user: UserId, report: ProgressReport) -> AppResult<ProgressSeries> {
        let records = self
            .records
            .read_for_user(domains::WORKOUT_LOGS, user)
            .await?;
        Ok(series(&records, report))
    }

    /// Text reply for `report`, or "not enough data"
    ///
    /// # Errors
    ///
    /// Returns an error if the workout table cannot be read
    pub async fn report(&self, user: UserId, report: ProgressReport) -> AppResult<Reply> {
        let series = self.series_for(user, report).await?;
        debug!(user_id = %user, report = ?report, points = series.points.len(), "Progress series built");
        if series.is_empty() {
            return Ok(Reply::text(messages::NOT_ENOUGH_DATA));
        }
        Ok(Reply::text(series.describe()))
    }
}
