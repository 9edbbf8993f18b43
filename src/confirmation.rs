// ABOUTME: Confirmation gate between a completed flow and its durable record
// ABOUTME: Renders the answer summary and commits on accept or rewinds to step 0 on reject
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Confirmation Gate
//!
//! Nothing reaches the record store without an explicit accept. A failed
//! commit leaves the conversation exactly where it was, so pressing accept
//! again retries the write.

use crate::constants::messages;
use crate::conversation::ConversationStore;
use crate::database::RecordStore;
use crate::errors::AppResult;
use crate::flows::FlowKind;
use crate::models::{Answers, FlowRecord, UserId};
use crate::transport::Reply;
use std::sync::Arc;
use tracing::{debug, info};

/// One summary line per answered step, in flow order
///
/// Keys that do not belong to the flow are not rendered.
#[must_use]
pub fn summarize(flow: FlowKind, answers: &Answers) -> String {
    let mut lines = Vec::with_capacity(flow.len() + 2);
    if let Some(intro) = flow.summary_intro() {
        lines.push(intro.to_owned());
    }
    for step in flow.steps() {
        let Some(value) = answers.get(step.key) else {
            continue;
        };
        match step.unit {
            Some(unit) => lines.push(format!("- {}: {value} {unit}", step.label)),
            None => lines.push(format!("- {}: {value}", step.label)),
        }
    }
    if let Some(outro) = flow.summary_outro() {
        lines.push(outro.to_owned());
    }
    lines.join("\n")
}

/// Summary with the flow's accept and reject buttons
#[must_use]
pub fn confirmation_reply(flow: FlowKind, answers: &Answers) -> Reply {
    Reply::with_buttons(
        summarize(flow, answers),
        vec![flow.accept_action(), flow.reject_action()],
    )
}

/// Commits or rewinds a flow awaiting confirmation
#[derive(Clone)]
pub struct ConfirmationGate {
    conversations: Arc<dyn ConversationStore>,
    records: Arc<dyn RecordStore>,
}

impl ConfirmationGate {
    /// Create a gate over the given stores
    #[must_use]
    pub fn new(conversations: Arc<dyn ConversationStore>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            conversations,
            records,
        }
    }

    /// Append the pending record of `flow` and reset the user to idle
    ///
    /// A press with nothing pending for `flow` gets a "nothing to confirm"
    /// reply and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the storage error when the append fails; the conversation
    /// state is left untouched in that case
    pub async fn accept(&self, user: UserId, flow: FlowKind) -> AppResult<Reply> {
        let Some(state) = self.conversations.get(user).await? else {
            return Ok(Reply::text(messages::NOTHING_TO_CONFIRM));
        };
        if state.flow != flow || !state.is_complete() {
            debug!(user_id = %user, flow = %flow, active = %state.flow, "Stale accept ignored");
            return Ok(Reply::text(messages::NOTHING_TO_CONFIRM));
        }

        let record = FlowRecord::new(state.user, state.answers);
        let row_id = self.records.append(flow.domain(), &record).await?;
        self.conversations.clear(user).await?;

        info!(user_id = %user, flow = %flow, row_id, "Flow committed");
        Ok(Reply::text(messages::SAVED))
    }

    /// Discard the pending answers and prompt step 0 again, keeping identity
    ///
    /// # Errors
    ///
    /// Returns an error if the conversation store fails
    pub async fn reject(&self, user: UserId, flow: FlowKind) -> AppResult<Reply> {
        let pending = self
            .conversations
            .get(user)
            .await?
            .is_some_and(|state| state.flow == flow && state.is_complete());
        if !pending {
            debug!(user_id = %user, flow = %flow, "Stale reject ignored");
            return Ok(Reply::text(messages::NOTHING_TO_CONFIRM));
        }

        let state = self.conversations.restart(user).await?;
        info!(user_id = %user, flow = %flow, "Flow restarted after reject");

        let prompt = state.current_step().map_or("", |step| step.prompt);
        Ok(Reply::text(format!("{}\n{prompt}", flow.restart_message())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;

    #[test]
    fn test_registration_summary_follows_flow_order() {
        let mut answers = Answers::new();
        answers.insert("age", FieldValue::Number(30));
        answers.insert("name", FieldValue::Text("Ann".into()));
        answers.insert("weight", FieldValue::Number(62));

        let summary = summarize(FlowKind::Registration, &answers);
        assert_eq!(
            summary,
            "- Your name: Ann\n- Your age: 30\n- Your weight: 62 kg"
        );
    }

    #[test]
    fn test_workout_summary_is_framed() {
        let mut answers = Answers::new();
        answers.insert("distance", FieldValue::Number(10));
        answers.insert("pulse", FieldValue::Number(150));

        let summary = summarize(FlowKind::WorkoutLog, &answers);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.first(), Some(&"Great job! Here are your results:"));
        assert_eq!(lines.get(1), Some(&"- Distance: 10 km"));
        assert_eq!(lines.get(2), Some(&"- Average pulse: 150 bpm"));
        assert_eq!(lines.last(), Some(&"Is everything correct?"));
    }

    #[test]
    fn test_confirmation_reply_offers_flow_buttons() {
        let reply = confirmation_reply(FlowKind::WorkoutLog, &Answers::new());
        assert!(reply.offers(FlowKind::WorkoutLog.accept_action()));
        assert!(reply.offers(FlowKind::WorkoutLog.reject_action()));
        assert!(!reply.offers(FlowKind::Registration.accept_action()));
    }
}
