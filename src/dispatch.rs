// ABOUTME: Event dispatcher routing normalized chat events to the engine and peer features
// ABOUTME: Handles commands, button tokens and free text, and turns failures into safe replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Event Dispatcher
//!
//! Free text goes to the user's active flow first. Idle users' text falls
//! through to the advice chat when advice is enabled, and to help otherwise.

use crate::advice::{AdviceGateway, AdviceTopic};
use crate::constants::messages;
use crate::engine::DialogueEngine;
use crate::errors::AppResult;
use crate::flows::FlowKind;
use crate::models::UserId;
use crate::progress::ProgressReporter;
use crate::transport::{Action, Command, EventKind, InboundEvent, Reply};
use tracing::{error, warn};

/// Routes one inbound event at a time
#[derive(Clone)]
pub struct Dispatcher {
    engine: DialogueEngine,
    advice: AdviceGateway,
    progress: ProgressReporter,
}

impl Dispatcher {
    /// Create a dispatcher over the engine and its peers
    #[must_use]
    pub const fn new(
        engine: DialogueEngine,
        advice: AdviceGateway,
        progress: ProgressReporter,
    ) -> Self {
        Self {
            engine,
            advice,
            progress,
        }
    }

    /// Dialogue engine behind this dispatcher
    #[must_use]
    pub const fn engine(&self) -> &DialogueEngine {
        &self.engine
    }

    /// Handle `event` and produce the reply to send
    ///
    /// Never fails: internal errors are logged and answered with the
    /// error's generic user message.
    pub async fn dispatch(&self, event: &InboundEvent) -> Reply {
        let result = match &event.kind {
            EventKind::Text(text) => self.on_text(event.user, text).await,
            EventKind::Button(token) => self.on_button(event.user, token).await,
        };
        result.unwrap_or_else(|e| {
            error!(
                user_id = %event.user,
                code = ?e.code,
                retryable = e.code.is_retryable(),
                error = %e,
                "Event handling failed"
            );
            Reply::text(e.user_message())
        })
    }

    async fn on_text(&self, user: UserId, text: &str) -> AppResult<Reply> {
        match Command::parse(text) {
            Some(Ok(command)) => return self.on_command(user, command).await,
            Some(Err(name)) => {
                warn!(user_id = %user, command = %name, "Unknown command");
                return Ok(Reply::text(messages::HELP));
            }
            None => {}
        }

        if let Some(reply) = self.engine.handle_text(user, text).await? {
            return Ok(reply);
        }
        if self.advice.is_enabled() {
            return self
                .advice
                .advise(user, AdviceTopic::Chat(text.trim().to_owned()))
                .await;
        }
        Ok(Reply::text(messages::HELP))
    }

    async fn on_command(&self, user: UserId, command: Command) -> AppResult<Reply> {
        match command {
            Command::Start => Ok(Reply::with_buttons(
                messages::WELCOME,
                vec![Action::BeginRegistration, Action::About],
            )),
            Command::About => Ok(Reply::text(messages::ABOUT)),
            Command::Register => self.engine.begin(user, FlowKind::Registration).await,
            Command::Tracking => self.engine.begin(user, FlowKind::WorkoutLog).await,
            Command::Cancel => self.engine.cancel(user).await,
            Command::Progress => Ok(ProgressReporter::menu()),
            Command::Training => Ok(AdviceGateway::training_menu()),
            Command::Equipment => self.advice.advise(user, AdviceTopic::Equipment).await,
            Command::Nutrition => self.advice.advise(user, AdviceTopic::Nutrition).await,
            Command::Help => Ok(Reply::text(messages::HELP)),
        }
    }

    async fn on_button(&self, user: UserId, token: &str) -> AppResult<Reply> {
        let Some(action) = Action::from_token(token) else {
            warn!(user_id = %user, token, "Unrecognized button token");
            return Ok(Reply::text(messages::UNRECOGNIZED_ACTION));
        };

        match action {
            Action::BeginRegistration => self.engine.begin(user, FlowKind::Registration).await,
            Action::About => Ok(Reply::text(messages::ABOUT)),
            Action::Accept(flow) => self.engine.accept(user, flow).await,
            Action::Reject(flow) => self.engine.reject(user, flow).await,
            Action::Training(kind) => self.advice.advise(user, AdviceTopic::Training(kind)).await,
            Action::Progress(report) => self.progress.report(user, report).await,
        }
    }
}
