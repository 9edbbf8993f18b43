// ABOUTME: Advice gateway turning the athlete's registration into requests for an advice provider
// ABOUTME: Pluggable provider trait plus an offline provider that renders the request as a plan outline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Advice Gateway
//!
//! Advice is a peer of the dialogue engine: it only reads committed
//! registrations and never touches conversation state. The language model
//! behind [`AdviceProvider`] is outside this crate.

use crate::constants::{domains, messages};
use crate::database::RecordStore;
use crate::errors::AppResult;
use crate::flows::FlowKind;
use crate::models::{FlowRecord, UserId};
use crate::transport::{Action, Reply, TrainingKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info};

/// What the user wants advice about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "topic", content = "detail")]
pub enum AdviceTopic {
    /// A personal workout of the given kind
    Training(TrainingKind),
    /// Running equipment
    Equipment,
    /// Nutrition
    Nutrition,
    /// Free-form question
    Chat(String),
}

impl AdviceTopic {
    /// Whether the topic needs a registration to be answered
    #[must_use]
    pub const fn needs_profile(&self) -> bool {
        !matches!(self, Self::Chat(_))
    }

    /// Profile facts relevant to this topic
    #[must_use]
    pub const fn relevant_facts(&self) -> &'static [&'static str] {
        match self {
            Self::Training(_) => &[
                "age",
                "weight",
                "height",
                "experience_running",
                "target_distance",
                "training_frequency",
            ],
            Self::Equipment => &["age", "weight", "height"],
            Self::Nutrition => &["age", "weight", "height", "training_frequency"],
            Self::Chat(_) => &[],
        }
    }
}

/// Athlete facts taken from the latest registration record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Name as given at registration
    pub name: Option<String>,
    /// Numeric facts keyed by registration step key, in flow order
    pub facts: Vec<(String, i64)>,
}

impl AthleteProfile {
    /// Extract the profile from a registration record
    #[must_use]
    pub fn from_record(record: &FlowRecord) -> Self {
        let name = record
            .fields
            .get("name")
            .and_then(|value| value.as_text())
            .map(ToOwned::to_owned);
        let facts = FlowKind::Registration
            .steps()
            .iter()
            .filter_map(|step| {
                record
                    .fields
                    .number(step.key)
                    .map(|value| (step.key.to_owned(), value))
            })
            .collect();
        Self { name, facts }
    }

    /// Numeric fact by registration key
    #[must_use]
    pub fn fact(&self, key: &str) -> Option<i64> {
        self.facts
            .iter()
            .find_map(|(k, v)| (k == key).then_some(*v))
    }
}

/// Everything a provider needs to answer one advice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    /// Who is asking
    pub user: UserId,
    /// What they ask about
    pub topic: AdviceTopic,
    /// Registration facts, absent for free chat from unregistered users
    pub profile: Option<AthleteProfile>,
}

impl AdviceRequest {
    /// Profile facts relevant to the topic, labelled for display
    #[must_use]
    pub fn facts(&self) -> Vec<(&'static str, i64)> {
        let Some(profile) = &self.profile else {
            return Vec::new();
        };
        FlowKind::Registration
            .steps()
            .iter()
            .filter(|step| self.topic.relevant_facts().contains(&step.key))
            .filter_map(|step| {
                profile.fact(step.key).map(|value| (step.label, value))
            })
            .collect()
    }
}

/// Source of advice text
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &'static str;

    /// Produce advice text for `request`
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceUnavailable` when the backing service fails
    async fn advise(&self, request: &AdviceRequest) -> AppResult<String>;
}

/// Provider that answers without any remote service
///
/// It lists the athlete facts a remote model would have been given, which
/// keeps the console transport useful offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdviceProvider;

#[async_trait]
impl AdviceProvider for OfflineAdviceProvider {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn advise(&self, request: &AdviceRequest) -> AppResult<String> {
        let mut text = match &request.topic {
            AdviceTopic::Training(kind) => format!("Plan request: {} workout", kind.label()),
            AdviceTopic::Equipment => "Equipment advice request".to_owned(),
            AdviceTopic::Nutrition => "Nutrition advice request".to_owned(),
            AdviceTopic::Chat(question) => format!("Question received: {question}"),
        };
        for (label, value) in request.facts() {
            let _ = write!(text, "\n- {label}: {value}");
        }
        Ok(text)
    }
}

/// Routes advice topics to the configured provider
#[derive(Clone)]
pub struct AdviceGateway {
    records: Arc<dyn RecordStore>,
    provider: Option<Arc<dyn AdviceProvider>>,
}

impl AdviceGateway {
    /// Gateway backed by `provider`; `None` disables advice
    #[must_use]
    pub fn new(records: Arc<dyn RecordStore>, provider: Option<Arc<dyn AdviceProvider>>) -> Self {
        Self { records, provider }
    }

    /// Whether a provider is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Training kind chooser
    #[must_use]
    pub fn training_menu() -> Reply {
        Reply::with_buttons(
            messages::CHOOSE_TRAINING,
            [
                TrainingKind::Interval,
                TrainingKind::Tempo,
                TrainingKind::Long,
                TrainingKind::Recovery,
            ]
            .into_iter()
            .map(Action::Training)
            .collect(),
        )
    }

    /// Answer `topic` for `user`
    ///
    /// Profile-based topics without a registration redirect to registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration cannot be read or the provider fails
    pub async fn advise(&self, user: UserId, topic: AdviceTopic) -> AppResult<Reply> {
        let Some(provider) = &self.provider else {
            return Ok(Reply::text(messages::ADVICE_DISABLED));
        };

        let profile = self
            .records
            .latest_for_user(domains::REGISTRATIONS, user)
            .await?
            .map(|record| AthleteProfile::from_record(&record));

        if profile.is_none() && topic.needs_profile() {
            debug!(user_id = %user, "Advice requested before registration");
            return Ok(Reply::with_buttons(
                messages::REGISTER_FIRST,
                vec![Action::BeginRegistration],
            ));
        }

        let request = AdviceRequest {
            user,
            topic,
            profile,
        };
        let text = provider.advise(&request).await?;
        info!(user_id = %user, provider = provider.name(), "Advice delivered");
        Ok(Reply::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answers, FieldValue};

    fn registration() -> FlowRecord {
        let mut fields = Answers::new();
        fields.insert("name", FieldValue::Text("Ann".into()));
        fields.insert("age", FieldValue::Number(30));
        fields.insert("weight", FieldValue::Number(60));
        fields.insert("height", FieldValue::Number(170));
        fields.insert("experience_running", FieldValue::Number(12));
        fields.insert("target_distance", FieldValue::Number(21));
        fields.insert("training_frequency", FieldValue::Number(3));
        FlowRecord::new(UserId(1), fields)
    }

    #[test]
    fn test_profile_from_record() {
        let profile = AthleteProfile::from_record(&registration());
        assert_eq!(profile.name.as_deref(), Some("Ann"));
        assert_eq!(profile.fact("age"), Some(30));
        assert_eq!(profile.fact("name"), None);
        assert_eq!(profile.facts.len(), 6);
    }

    #[test]
    fn test_facts_follow_topic() {
        let profile = Some(AthleteProfile::from_record(&registration()));
        let equipment = AdviceRequest {
            user: UserId(1),
            topic: AdviceTopic::Equipment,
            profile: profile.clone(),
        };
        let labels: Vec<&str> = equipment.facts().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["Your age", "Your weight", "Your height"]);

        let nutrition = AdviceRequest {
            topic: AdviceTopic::Nutrition,
            ..equipment
        };
        assert_eq!(nutrition.facts().len(), 4);
    }

    #[tokio::test]
    async fn test_offline_provider_lists_facts() {
        let request = AdviceRequest {
            user: UserId(1),
            topic: AdviceTopic::Training(TrainingKind::Interval),
            profile: Some(AthleteProfile::from_record(&registration())),
        };
        let text = OfflineAdviceProvider.advise(&request).await.unwrap();
        assert!(text.starts_with("Plan request: interval workout"));
        assert!(text.contains("- Desired workouts per week: 3"));
    }

    #[test]
    fn test_training_menu_offers_every_kind() {
        let menu = AdviceGateway::training_menu();
        assert_eq!(menu.buttons.len(), 4);
        assert!(menu.offers(Action::Training(TrainingKind::Recovery)));
    }
}
