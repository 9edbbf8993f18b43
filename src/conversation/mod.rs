// ABOUTME: Per-user conversation state and the pluggable store that holds it between messages
// ABOUTME: Tracks the active flow, the current step index and the answers collected so far
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Conversation State Store
//!
//! State is ephemeral and keyed by user. A user without an entry is idle.
//! The answer set always holds exactly the keys of the steps before
//! `step_index`, in flow order; [`ConversationState::record`] is the only way
//! an answer gets in, and it refuses any key other than the current step's.

/// In-memory store implementation
pub mod memory;

pub use memory::InMemoryConversationStore;

use crate::errors::{AppError, AppResult};
use crate::flows::{FlowKind, Step};
use crate::models::{Answers, FieldValue, UserId};
use async_trait::async_trait;

/// Where a live conversation currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the answer to the step at `index`
    AwaitingStep {
        /// Flow in progress
        flow: FlowKind,
        /// Index of the step whose answer is expected
        index: usize,
    },
    /// Every step answered; waiting for accept or reject
    AwaitingConfirmation {
        /// Flow in progress
        flow: FlowKind,
    },
}

/// Live state of one user's in-progress flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    /// Identity the eventual record is committed under
    pub user: UserId,
    /// Flow in progress
    pub flow: FlowKind,
    /// Position within the flow's steps; equals the step count once complete
    pub step_index: usize,
    /// Validated answers, one per completed step
    pub answers: Answers,
}

impl ConversationState {
    /// Fresh state at step 0 of `flow`
    #[must_use]
    pub const fn new(user: UserId, flow: FlowKind) -> Self {
        Self {
            user,
            flow,
            step_index: 0,
            answers: Answers::new(),
        }
    }

    /// Current phase derived from the step index
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.step_index >= self.flow.len() {
            Phase::AwaitingConfirmation { flow: self.flow }
        } else {
            Phase::AwaitingStep {
                flow: self.flow,
                index: self.step_index,
            }
        }
    }

    /// Step whose answer is expected, `None` while awaiting confirmation
    #[must_use]
    pub fn current_step(&self) -> Option<&'static Step> {
        self.flow.step(self.step_index)
    }

    /// Whether every step has been answered
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.step_index >= self.flow.len()
    }

    /// Record the answer for the current step and advance
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `key` is not the current step's key or the
    /// flow is already complete; the state is left unchanged.
    pub fn record(&mut self, key: &str, value: FieldValue) -> AppResult<()> {
        let Some(step) = self.current_step() else {
            return Err(AppError::invalid_input(format!(
                "{} flow is complete, no step expects '{key}'",
                self.flow
            )));
        };
        if step.key != key {
            return Err(AppError::invalid_input(format!(
                "{} flow expects '{}' at step {}, got '{key}'",
                self.flow, step.key, self.step_index
            )));
        }
        self.answers.insert(key, value);
        self.step_index += 1;
        Ok(())
    }

    /// Drop the answers and go back to step 0, keeping flow and identity
    pub fn rewind(&mut self) {
        self.answers.clear();
        self.step_index = 0;
    }
}

/// Storage for per-user conversation state
///
/// Implementations keep no per-user lock; two concurrent handlers for the
/// same user race and the last write wins.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Start `flow` for `user`, discarding any previous state
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable
    async fn begin(&self, user: UserId, flow: FlowKind) -> AppResult<ConversationState>;

    /// Record `value` for the step `key` and advance
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the user has no active flow or `key` is not
    /// the current step's key
    async fn record_answer(
        &self,
        user: UserId,
        key: &str,
        value: FieldValue,
    ) -> AppResult<ConversationState>;

    /// Live state, or `None` when the user is idle
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable
    async fn get(&self, user: UserId) -> AppResult<Option<ConversationState>>;

    /// Reset the user to idle, returning the state that was dropped
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable
    async fn clear(&self, user: UserId) -> AppResult<Option<ConversationState>>;

    /// Clear the answers and return to step 0 of the active flow
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the user has no active flow
    async fn restart(&self, user: UserId) -> AppResult<ConversationState>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_advances_in_flow_order() {
        let mut state = ConversationState::new(UserId(7), FlowKind::Registration);
        state
            .record("name", FieldValue::Text("Ann".into()))
            .unwrap();
        state.record("age", FieldValue::Number(25)).unwrap();

        assert_eq!(state.step_index, 2);
        assert_eq!(state.current_step().map(|s| s.key), Some("weight"));
        assert_eq!(state.answers.keys().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[test]
    fn test_record_rejects_out_of_order_key() {
        let mut state = ConversationState::new(UserId(7), FlowKind::Registration);
        let err = state.record("age", FieldValue::Number(25)).unwrap_err();

        assert_eq!(err.code, crate::errors::ErrorCode::InvalidInput);
        assert_eq!(state.step_index, 0);
        assert!(state.answers.is_empty());
    }

    #[test]
    fn test_phase_reaches_confirmation_after_last_step() {
        let mut state = ConversationState::new(UserId(1), FlowKind::WorkoutLog);
        for (i, step) in FlowKind::WorkoutLog.steps().iter().enumerate() {
            assert_eq!(
                state.phase(),
                Phase::AwaitingStep {
                    flow: FlowKind::WorkoutLog,
                    index: i
                }
            );
            state.record(step.key, FieldValue::Number(10)).unwrap();
        }

        assert!(state.is_complete());
        assert_eq!(
            state.phase(),
            Phase::AwaitingConfirmation {
                flow: FlowKind::WorkoutLog
            }
        );
        assert!(state.record("distance", FieldValue::Number(5)).is_err());
    }

    #[test]
    fn test_rewind_keeps_identity_and_flow() {
        let mut state = ConversationState::new(UserId(42), FlowKind::Registration);
        state
            .record("name", FieldValue::Text("Bo".into()))
            .unwrap();
        state.rewind();

        assert_eq!(state.user, UserId(42));
        assert_eq!(state.flow, FlowKind::Registration);
        assert_eq!(state.step_index, 0);
        assert!(state.answers.is_empty());
    }
}
