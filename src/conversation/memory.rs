// ABOUTME: In-memory conversation store backed by a sharded concurrent map
// ABOUTME: State is lost on restart; users simply begin their flow again
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{ConversationState, ConversationStore};
use crate::errors::{AppError, AppResult};
use crate::flows::FlowKind;
use crate::models::{FieldValue, UserId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Conversation store keeping per-user state in a `DashMap`
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    states: Arc<DashMap<UserId, ConversationState>>,
}

impl InMemoryConversationStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with an active flow
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.states.len()
    }
}

fn no_active_flow(user: UserId) -> AppError {
    AppError::invalid_input(format!("user {user} has no active flow"))
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn begin(&self, user: UserId, flow: FlowKind) -> AppResult<ConversationState> {
        let state = ConversationState::new(user, flow);
        if self.states.insert(user, state.clone()).is_some() {
            debug!(user_id = %user, flow = %flow, "replaced previous conversation state");
        }
        Ok(state)
    }

    async fn record_answer(
        &self,
        user: UserId,
        key: &str,
        value: FieldValue,
    ) -> AppResult<ConversationState> {
        let mut entry = self
            .states
            .get_mut(&user)
            .ok_or_else(|| no_active_flow(user))?;
        entry.record(key, value)?;
        Ok(entry.value().clone())
    }

    async fn get(&self, user: UserId) -> AppResult<Option<ConversationState>> {
        Ok(self.states.get(&user).map(|entry| entry.value().clone()))
    }

    async fn clear(&self, user: UserId) -> AppResult<Option<ConversationState>> {
        Ok(self.states.remove(&user).map(|(_, state)| state))
    }

    async fn restart(&self, user: UserId) -> AppResult<ConversationState> {
        let mut entry = self
            .states
            .get_mut(&user)
            .ok_or_else(|| no_active_flow(user))?;
        entry.rewind();
        Ok(entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_begin_discards_previous_state() {
        let store = InMemoryConversationStore::new();
        let user = UserId(5);
        store.begin(user, FlowKind::Registration).await.unwrap();
        store
            .record_answer(user, "name", FieldValue::Text("Ann".into()))
            .await
            .unwrap();

        let state = store.begin(user, FlowKind::WorkoutLog).await.unwrap();
        assert_eq!(state.flow, FlowKind::WorkoutLog);
        assert!(state.answers.is_empty());
        assert_eq!(store.active_count(), 1);
    }

    #[tokio::test]
    async fn test_record_answer_requires_active_flow() {
        let store = InMemoryConversationStore::new();
        let result = store
            .record_answer(UserId(9), "name", FieldValue::Text("x".into()))
            .await;
        assert!(result.is_err());
        assert!(store.get(UserId(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mismatched_key_leaves_state_unchanged() {
        let store = InMemoryConversationStore::new();
        let user = UserId(3);
        store.begin(user, FlowKind::Registration).await.unwrap();

        assert!(store
            .record_answer(user, "weight", FieldValue::Number(70))
            .await
            .is_err());
        let state = store.get(user).await.unwrap().unwrap();
        assert_eq!(state.step_index, 0);
        assert!(state.answers.is_empty());
    }

    #[tokio::test]
    async fn test_clear_and_restart() {
        let store = InMemoryConversationStore::new();
        let user = UserId(11);
        store.begin(user, FlowKind::WorkoutLog).await.unwrap();
        store
            .record_answer(user, "distance", FieldValue::Number(10))
            .await
            .unwrap();

        let restarted = store.restart(user).await.unwrap();
        assert_eq!(restarted.step_index, 0);
        assert!(restarted.answers.is_empty());

        assert!(store.clear(user).await.unwrap().is_some());
        assert!(store.get(user).await.unwrap().is_none());
        assert!(store.restart(user).await.is_err());
    }
}
