// ABOUTME: Static flow definitions for the registration and workout-logging dialogues
// ABOUTME: Each flow is an ordered list of steps with prompt, storage key and validation rule
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Flow Definitions
//!
//! Flows are compiled in and never change at runtime. The step order is the
//! order in which prompts are sent, answers are summarized, and columns are
//! created in the flow's durable table.

mod registration;
mod workout;

use crate::constants::{domains, messages};
use crate::transport::Action;
use crate::validation::FieldRule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of a flow: a prompt, a validation rule and a storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Storage key, unique within the flow; also the table column name
    pub key: &'static str,
    /// Question sent to the user
    pub prompt: &'static str,
    /// Label used in the confirmation summary
    pub label: &'static str,
    /// Unit appended to the value in the confirmation summary
    pub unit: Option<&'static str>,
    /// Validation rule for the answer
    pub rule: FieldRule,
}

/// The conversational flows the bot knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Athlete profile collection, at most once per user
    Registration,
    /// One workout session, repeatable
    WorkoutLog,
}

impl FlowKind {
    /// Ordered steps of this flow
    #[must_use]
    pub const fn steps(self) -> &'static [Step] {
        match self {
            Self::Registration => registration::STEPS,
            Self::WorkoutLog => workout::STEPS,
        }
    }

    /// Step at `index`, or `None` once every step has been answered
    #[must_use]
    pub fn step(self, index: usize) -> Option<&'static Step> {
        self.steps().get(index)
    }

    /// Number of steps before the confirmation gate
    #[must_use]
    pub const fn len(self) -> usize {
        self.steps().len()
    }

    /// Durable table receiving committed records of this flow
    #[must_use]
    pub const fn domain(self) -> &'static str {
        match self {
            Self::Registration => domains::REGISTRATIONS,
            Self::WorkoutLog => domains::WORKOUT_LOGS,
        }
    }

    /// Flow that must have a committed record before this one may start
    #[must_use]
    pub const fn prerequisite(self) -> Option<Self> {
        match self {
            Self::Registration => None,
            Self::WorkoutLog => Some(Self::Registration),
        }
    }

    /// Whether a user may commit this flow more than once
    #[must_use]
    pub const fn allows_repeat(self) -> bool {
        match self {
            Self::Registration => false,
            Self::WorkoutLog => true,
        }
    }

    /// Button that starts this flow
    #[must_use]
    pub const fn begin_action(self) -> Option<Action> {
        match self {
            Self::Registration => Some(Action::BeginRegistration),
            Self::WorkoutLog => None,
        }
    }

    /// Accept button shown under this flow's confirmation summary
    #[must_use]
    pub const fn accept_action(self) -> Action {
        Action::Accept(self)
    }

    /// Reject button shown under this flow's confirmation summary
    #[must_use]
    pub const fn reject_action(self) -> Action {
        Action::Reject(self)
    }

    /// Line sent before the first prompt again after a reject
    #[must_use]
    pub const fn restart_message(self) -> &'static str {
        match self {
            Self::Registration => messages::REGISTRATION_RESTARTED,
            Self::WorkoutLog => messages::WORKOUT_RESTARTED,
        }
    }

    /// Heading of the confirmation summary
    #[must_use]
    pub const fn summary_intro(self) -> Option<&'static str> {
        match self {
            Self::Registration => None,
            Self::WorkoutLog => Some(workout::SUMMARY_INTRO),
        }
    }

    /// Closing question of the confirmation summary
    #[must_use]
    pub const fn summary_outro(self) -> Option<&'static str> {
        match self {
            Self::Registration => None,
            Self::WorkoutLog => Some(workout::SUMMARY_OUTRO),
        }
    }

    /// Stable name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::WorkoutLog => "workout_log",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [FlowKind; 2] = [FlowKind::Registration, FlowKind::WorkoutLog];

    #[test]
    fn test_step_keys_are_unique_per_flow() {
        for flow in ALL {
            let keys: HashSet<&str> = flow.steps().iter().map(|s| s.key).collect();
            assert_eq!(keys.len(), flow.len(), "duplicate key in {flow}");
        }
    }

    #[test]
    fn test_step_keys_are_valid_column_names() {
        for flow in ALL {
            for step in flow.steps() {
                assert!(
                    step.key
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c == '_'),
                    "{} is not a plain column name",
                    step.key
                );
            }
        }
    }

    #[test]
    fn test_ranged_rejections_name_their_range() {
        for flow in ALL {
            for step in flow.steps() {
                if let Some((min, max)) = step.rule.domain.bounds() {
                    assert!(
                        step.rule.rejection.contains(&min.to_string())
                            && step.rule.rejection.contains(&max.to_string()),
                        "{} rejection does not name {min}-{max}",
                        step.key
                    );
                }
            }
        }
    }

    #[test]
    fn test_step_past_end_is_none() {
        assert!(FlowKind::Registration.step(0).is_some());
        assert!(FlowKind::Registration
            .step(FlowKind::Registration.len())
            .is_none());
    }

    #[test]
    fn test_workout_requires_registration() {
        assert_eq!(
            FlowKind::WorkoutLog.prerequisite(),
            Some(FlowKind::Registration)
        );
        assert_eq!(FlowKind::Registration.prerequisite(), None);
        assert!(!FlowKind::Registration.allows_repeat());
    }
}
