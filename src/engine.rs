// ABOUTME: Dialogue flow engine driving registration and workout logging per user
// ABOUTME: Entry gates, step validation with in-place retry, and hand-off to the confirmation gate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Dialogue Flow Engine
//!
//! ```text
//! Idle --begin--> AwaitingStep(flow, 0)
//! AwaitingStep(flow, i) --valid--> AwaitingStep(flow, i + 1) | AwaitingConfirmation(flow)
//! AwaitingStep(flow, i) --invalid--> AwaitingStep(flow, i)
//! AwaitingConfirmation(flow) --accept--> Idle
//! AwaitingConfirmation(flow) --reject--> AwaitingStep(flow, 0)
//! ```
//!
//! Retries are unbounded and nothing expires. Every operation returns the
//! reply to send; errors are storage or store failures only.

use crate::confirmation::{confirmation_reply, ConfirmationGate};
use crate::constants::messages;
use crate::conversation::{ConversationStore, Phase};
use crate::database::RecordStore;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::flows::FlowKind;
use crate::models::UserId;
use crate::transport::Reply;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-user state machine over the static flow definitions
#[derive(Clone)]
pub struct DialogueEngine {
    conversations: Arc<dyn ConversationStore>,
    records: Arc<dyn RecordStore>,
    gate: ConfirmationGate,
}

impl DialogueEngine {
    /// Create an engine over the given stores
    #[must_use]
    pub fn new(conversations: Arc<dyn ConversationStore>, records: Arc<dyn RecordStore>) -> Self {
        let gate = ConfirmationGate::new(Arc::clone(&conversations), Arc::clone(&records));
        Self {
            conversations,
            records,
            gate,
        }
    }

    /// Check whether `user` may start `flow`
    ///
    /// # Errors
    ///
    /// `ResourceAlreadyExists` when a non-repeatable flow already has a record,
    /// `MissingPrecondition` when the prerequisite flow has none, or the
    /// record store error
    pub async fn check_entry(&self, user: UserId, flow: FlowKind) -> AppResult<()> {
        if !flow.allows_repeat() && self.records.exists(flow.domain(), user).await? {
            return Err(AppError::already_exists(format!(
                "{flow} already committed for user {user}"
            )));
        }

        if let Some(prerequisite) = flow.prerequisite() {
            if !self.records.exists(prerequisite.domain(), user).await? {
                return Err(AppError::missing_precondition(format!(
                    "{flow} requires a {prerequisite} record"
                )));
            }
        }
        Ok(())
    }

    /// Start `flow` for `user` and return the first prompt
    ///
    /// Runs the entry gates first: a non-repeatable flow the user already
    /// committed answers "already registered", and a flow whose prerequisite
    /// has no record redirects to the prerequisite's entry button. In both
    /// cases no conversation state is created.
    ///
    /// # Errors
    ///
    /// Returns an error if either store fails
    pub async fn begin(&self, user: UserId, flow: FlowKind) -> AppResult<Reply> {
        match self.check_entry(user, flow).await {
            Ok(()) => {}
            Err(e) if e.code == ErrorCode::ResourceAlreadyExists => {
                info!(user_id = %user, flow = %flow, "Flow already completed, not starting");
                return Ok(Reply::text(messages::ALREADY_REGISTERED));
            }
            Err(e) if e.code == ErrorCode::MissingPrecondition => {
                info!(
                    user_id = %user,
                    flow = %flow,
                    reason = %e.message,
                    "Prerequisite missing, redirecting"
                );
                let buttons = flow
                    .prerequisite()
                    .and_then(FlowKind::begin_action)
                    .into_iter()
                    .collect();
                return Ok(Reply::with_buttons(messages::REGISTER_FIRST, buttons));
            }
            Err(e) => return Err(e),
        }

        let state = self.conversations.begin(user, flow).await?;
        info!(user_id = %user, flow = %flow, "Flow started");
        Ok(Reply::text(
            state.current_step().map_or("", |step| step.prompt),
        ))
    }

    /// Feed free text to the user's active flow
    ///
    /// Returns `None` when the user is idle so the caller can route the text
    /// elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversation store fails or the stored step
    /// index is outside the flow
    pub async fn handle_text(&self, user: UserId, text: &str) -> AppResult<Option<Reply>> {
        let Some(state) = self.conversations.get(user).await? else {
            return Ok(None);
        };

        let Phase::AwaitingStep { flow, index } = state.phase() else {
            let mut reply = confirmation_reply(state.flow, &state.answers);
            reply.text = format!("{}\n\n{}", messages::USE_CONFIRMATION_BUTTONS, reply.text);
            return Ok(Some(reply));
        };
        let Some(step) = flow.step(index) else {
            return Err(AppError::internal(format!("{flow} has no step {index}")));
        };

        let value = match step.rule.check(text) {
            Ok(value) => value,
            Err(rejection) => {
                debug!(
                    user_id = %user,
                    flow = %flow,
                    step = step.key,
                    reason = ?rejection.reason,
                    "Answer rejected"
                );
                return Ok(Some(Reply::text(rejection.message)));
            }
        };

        let state = self
            .conversations
            .record_answer(user, step.key, value)
            .await?;
        debug!(user_id = %user, flow = %flow, step = step.key, "Answer recorded");

        let reply = match state.current_step() {
            Some(next) => Reply::text(next.prompt),
            None => confirmation_reply(state.flow, &state.answers),
        };
        Ok(Some(reply))
    }

    /// Accept the pending summary of `flow`
    ///
    /// # Errors
    ///
    /// Returns the storage error when the commit fails; state is kept so the
    /// user can press accept again
    pub async fn accept(&self, user: UserId, flow: FlowKind) -> AppResult<Reply> {
        self.gate.accept(user, flow).await
    }

    /// Reject the pending summary of `flow` and restart it at step 0
    ///
    /// # Errors
    ///
    /// Returns an error if the conversation store fails
    pub async fn reject(&self, user: UserId, flow: FlowKind) -> AppResult<Reply> {
        self.gate.reject(user, flow).await
    }

    /// Drop the user's active flow, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the conversation store fails
    pub async fn cancel(&self, user: UserId) -> AppResult<Reply> {
        match self.conversations.clear(user).await? {
            Some(state) => {
                info!(user_id = %user, flow = %state.flow, step = state.step_index, "Flow cancelled");
                Ok(Reply::text(messages::CANCELLED))
            }
            None => Ok(Reply::text(messages::NOTHING_TO_CANCEL)),
        }
    }
}
