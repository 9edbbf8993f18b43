// ABOUTME: Boundary types between the chat transport and the conversational core
// ABOUTME: Normalized inbound events, closed command and button-token enums, outbound replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Transport Boundary
//!
//! The core never sees transport envelopes. A transport hands over
//! `(user, payload)` pairs as [`InboundEvent`]s and renders [`Reply`] values
//! however it likes; buttons are carried as stable string tokens.

use crate::flows::FlowKind;
use crate::models::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of workout the advice gateway can be asked to plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingKind {
    /// Interval session
    Interval,
    /// Long easy run
    Long,
    /// Tempo / speed session
    Tempo,
    /// Recovery run
    Recovery,
}

impl TrainingKind {
    /// Human-readable name used in advice requests and button labels
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::Long => "long",
            Self::Tempo => "tempo",
            Self::Recovery => "recovery",
        }
    }
}

/// Progress report the user can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressReport {
    /// Distance of each logged workout
    Distance,
    /// Average pulse of each logged workout
    Pulse,
    /// Average pace against average pulse
    PacePulse,
}

/// Every action a button can trigger
///
/// Tokens are the wire contract with the transport; unknown tokens are not
/// silently ignored but reported through [`Action::from_token`] returning `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start the registration flow
    BeginRegistration,
    /// Show the about text
    About,
    /// Accept the pending confirmation summary of a flow
    Accept(FlowKind),
    /// Reject the pending confirmation summary of a flow
    Reject(FlowKind),
    /// Ask for a personal workout of this kind
    Training(TrainingKind),
    /// Show a progress report
    Progress(ProgressReport),
}

impl Action {
    /// Parse a button token
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let action = match token.trim() {
            "start_registration" => Self::BeginRegistration,
            "about" => Self::About,
            "yes" => Self::Accept(FlowKind::Registration),
            "no" => Self::Reject(FlowKind::Registration),
            "yes_track" => Self::Accept(FlowKind::WorkoutLog),
            "no_track" => Self::Reject(FlowKind::WorkoutLog),
            "interval_training" => Self::Training(TrainingKind::Interval),
            "long_training" => Self::Training(TrainingKind::Long),
            "speed_training" => Self::Training(TrainingKind::Tempo),
            "refresh_training" => Self::Training(TrainingKind::Recovery),
            "progress_distance" => Self::Progress(ProgressReport::Distance),
            "progress_pulse" => Self::Progress(ProgressReport::Pulse),
            "progress_pace_pulse" => Self::Progress(ProgressReport::PacePulse),
            _ => return None,
        };
        Some(action)
    }

    /// Wire token for this action
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::BeginRegistration => "start_registration",
            Self::About => "about",
            Self::Accept(FlowKind::Registration) => "yes",
            Self::Reject(FlowKind::Registration) => "no",
            Self::Accept(FlowKind::WorkoutLog) => "yes_track",
            Self::Reject(FlowKind::WorkoutLog) => "no_track",
            Self::Training(TrainingKind::Interval) => "interval_training",
            Self::Training(TrainingKind::Long) => "long_training",
            Self::Training(TrainingKind::Tempo) => "speed_training",
            Self::Training(TrainingKind::Recovery) => "refresh_training",
            Self::Progress(ProgressReport::Distance) => "progress_distance",
            Self::Progress(ProgressReport::Pulse) => "progress_pulse",
            Self::Progress(ProgressReport::PacePulse) => "progress_pace_pulse",
        }
    }

    /// Button caption
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BeginRegistration => "Register",
            Self::About => "About the bot",
            Self::Accept(_) => "Yes",
            Self::Reject(_) => "No",
            Self::Training(TrainingKind::Interval) => "Interval",
            Self::Training(TrainingKind::Long) => "Long",
            Self::Training(TrainingKind::Tempo) => "Tempo",
            Self::Training(TrainingKind::Recovery) => "Recovery",
            Self::Progress(ProgressReport::Distance) => "Chart: distance/workouts",
            Self::Progress(ProgressReport::Pulse) => "Chart: pulse/workouts",
            Self::Progress(ProgressReport::PacePulse) => "Chart: pace/pulse",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Slash commands understood by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `/start`: welcome message with the registration button
    Start,
    /// `/about`
    About,
    /// `/register`: start registration directly
    Register,
    /// `/tracking`: start workout logging
    Tracking,
    /// `/cancel`: drop the active flow
    Cancel,
    /// `/progress`: progress report chooser
    Progress,
    /// `/training`: personal workout chooser
    Training,
    /// `/equipment`: equipment advice
    Equipment,
    /// `/nutrition`: nutrition advice
    Nutrition,
    /// `/help`
    Help,
}

impl Command {
    /// Parse the leading `/command` of a message; arguments after it are ignored
    ///
    /// Returns `None` when the text is not a command at all. A `@botname`
    /// suffix (as group chats send it) is stripped.
    #[must_use]
    pub fn parse(text: &str) -> Option<Result<Self, String>> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        let command = match name.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "about" => Self::About,
            "register" => Self::Register,
            "tracking" => Self::Tracking,
            "cancel" => Self::Cancel,
            "progress" | "report_achievements" => Self::Progress,
            "training" | "get_personal_training" => Self::Training,
            "equipment" | "get_equipment" => Self::Equipment,
            "nutrition" | "get_nutrition" => Self::Nutrition,
            "help" => Self::Help,
            _ => return Some(Err(name.to_owned())),
        };
        Some(Ok(command))
    }
}

/// What the user sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Free text (commands are text starting with `/`)
    Text(String),
    /// Button press carrying its token
    Button(String),
}

/// Normalized inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Sender identity
    pub user: UserId,
    /// Payload
    pub kind: EventKind,
}

impl InboundEvent {
    /// Text message from `user`
    #[must_use]
    pub fn text(user: UserId, text: impl Into<String>) -> Self {
        Self {
            user,
            kind: EventKind::Text(text.into()),
        }
    }

    /// Button press from `user`
    #[must_use]
    pub fn button(user: UserId, token: impl Into<String>) -> Self {
        Self {
            user,
            kind: EventKind::Button(token.into()),
        }
    }
}

/// Outbound message: plain text plus optional buttons
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    /// Message text
    pub text: String,
    /// Buttons rendered under the text, in order
    pub buttons: Vec<Action>,
}

impl Reply {
    /// Plain text reply
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// Reply with buttons
    #[must_use]
    pub fn with_buttons(text: impl Into<String>, buttons: Vec<Action>) -> Self {
        Self {
            text: text.into(),
            buttons,
        }
    }

    /// Whether the reply offers `action` as a button
    #[must_use]
    pub fn offers(&self, action: Action) -> bool {
        self.buttons.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 13] = [
        Action::BeginRegistration,
        Action::About,
        Action::Accept(FlowKind::Registration),
        Action::Reject(FlowKind::Registration),
        Action::Accept(FlowKind::WorkoutLog),
        Action::Reject(FlowKind::WorkoutLog),
        Action::Training(TrainingKind::Interval),
        Action::Training(TrainingKind::Long),
        Action::Training(TrainingKind::Tempo),
        Action::Training(TrainingKind::Recovery),
        Action::Progress(ProgressReport::Distance),
        Action::Progress(ProgressReport::Pulse),
        Action::Progress(ProgressReport::PacePulse),
    ];

    #[test]
    fn test_every_action_token_parses_back() {
        for action in ALL_ACTIONS {
            assert_eq!(Action::from_token(action.token()), Some(action));
        }
    }

    #[test]
    fn test_unknown_token_is_reported() {
        assert_eq!(Action::from_token("launch_rocket"), None);
        assert_eq!(Action::from_token(""), None);
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/start"), Some(Ok(Command::Start)));
        assert_eq!(
            Command::parse("/tracking@stride_bot now"),
            Some(Ok(Command::Tracking))
        );
        assert_eq!(
            Command::parse("/get_nutrition"),
            Some(Ok(Command::Nutrition))
        );
        assert_eq!(Command::parse("/dance"), Some(Err("dance".to_owned())));
        assert_eq!(Command::parse("25"), None);
        assert_eq!(Command::parse("   "), None);
    }
}
