// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Table names, service identity and user-facing message texts for the bot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in one flat list.

/// Durable table names, one per flow domain
pub mod domains {
    /// Completed registrations (at most one row per user)
    pub const REGISTRATIONS: &str = "registrations";
    /// Completed workout logs (history, many rows per user)
    pub const WORKOUT_LOGS: &str = "workout_logs";
}

/// Reserved column names in every durable table
pub mod columns {
    /// Auto-increment row identifier, gives insertion order
    pub const ROW_ID: &str = "row_id";
    /// User identity column
    pub const USER_ID: &str = "user_id";
    /// Commit timestamp (RFC 3339)
    pub const COMMITTED_AT: &str = "committed_at";
}

/// Service identification for logging
pub mod service_names {
    /// Main bot service name
    pub const STRIDE_BOT: &str = "stride-bot";
}

/// Defaults used when the environment is silent
pub mod defaults {
    /// Default durable store location
    pub const DATABASE_URL: &str = "sqlite:./data/stride.db";
    /// Default log level
    pub const LOG_LEVEL: &str = "info";
}

/// User-facing reply texts that are not tied to a single flow step
pub mod messages {
    /// Welcome text shown with the registration and about buttons
    pub const WELCOME: &str = "Hi! Press the button below to register:";
    /// About text
    pub const ABOUT: &str = "This bot is built for your cardio (running) workouts. \
                             It helps you keep track of your progress!";
    /// Registration gate: identity already has a registration record
    pub const ALREADY_REGISTERED: &str = "You are already registered!";
    /// Workout gate: identity has no registration record yet
    pub const REGISTER_FIRST: &str = "Please register first! Press the button to start registration:";
    /// Commit succeeded
    pub const SAVED: &str = "Your data has been saved!";
    /// Registration restarted after a reject
    pub const REGISTRATION_RESTARTED: &str = "Registration restarted.";
    /// Workout logging restarted after a reject
    pub const WORKOUT_RESTARTED: &str = "Let's try again.";
    /// Accept/reject button pressed with nothing pending
    pub const NOTHING_TO_CONFIRM: &str = "There is nothing to confirm right now.";
    /// Text arrived while the confirmation buttons are pending
    pub const USE_CONFIRMATION_BUTTONS: &str = "Please answer with the Yes or No button.";
    /// Active flow cancelled on request
    pub const CANCELLED: &str = "Okay, the current dialogue has been cancelled.";
    /// Cancel requested with nothing active
    pub const NOTHING_TO_CANCEL: &str = "There is nothing to cancel.";
    /// Button token that no action recognizes
    pub const UNRECOGNIZED_ACTION: &str = "Sorry, I don't recognize that button.";
    /// Command or free text nobody handles
    pub const HELP: &str = "Available commands:\n\
                            /start - register\n\
                            /tracking - log a workout\n\
                            /progress - view your progress\n\
                            /training - get a personal workout\n\
                            /equipment - running equipment advice\n\
                            /nutrition - nutrition advice\n\
                            /cancel - cancel the current dialogue";
    /// Progress report chooser
    pub const CHOOSE_PROGRESS: &str = "Which report would you like?";
    /// Training kind chooser
    pub const CHOOSE_TRAINING: &str = "Which workout would you like: interval, tempo, long or recovery?";
    /// Not enough workout history to build a series
    pub const NOT_ENOUGH_DATA: &str = "Not enough data to build a report yet.";
    /// Advice subsystem not configured
    pub const ADVICE_DISABLED: &str = "Advice is not available right now.";
    /// Generic failure for storage problems
    pub const STORAGE_FAILURE: &str = "Sorry, I could not save or read your data. Please try again.";
    /// Generic failure for unavailable collaborators
    pub const SERVICE_UNAVAILABLE: &str = "Sorry, this service is temporarily unavailable.";
    /// Generic failure for everything else
    pub const GENERIC_FAILURE: &str = "Sorry, something went wrong.";
}
