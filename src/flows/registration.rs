// ABOUTME: Registration flow steps: name, body metrics, running experience and goals
// ABOUTME: Ranges follow the athlete profile limits accepted by the coaching features
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Step;
use crate::validation::{FieldDomain, FieldRule};

pub(super) const STEPS: &[Step] = &[
    Step {
        key: "name",
        prompt: "Hi. What is your name?",
        label: "Your name",
        unit: None,
        rule: FieldRule {
            domain: FieldDomain::NonEmptyText,
            rejection: "Please tell me your name.",
        },
    },
    Step {
        key: "age",
        prompt: "Great! Now tell me how old you are (full years):",
        label: "Your age",
        unit: None,
        rule: FieldRule {
            domain: FieldDomain::Range { min: 1, max: 100 },
            rejection: "Please enter a valid age (a number from 1 to 100).",
        },
    },
    Step {
        key: "weight",
        prompt: "What is your weight in kg?",
        label: "Your weight",
        unit: Some("kg"),
        rule: FieldRule {
            domain: FieldDomain::Range { min: 40, max: 240 },
            rejection: "Please enter a valid weight in the range from 40 to 240.",
        },
    },
    Step {
        key: "height",
        prompt: "What is your height in cm?",
        label: "Your height",
        unit: Some("cm"),
        rule: FieldRule {
            domain: FieldDomain::Range { min: 40, max: 300 },
            rejection: "Please enter a valid height in the range from 40 to 300.",
        },
    },
    Step {
        key: "experience_running",
        prompt: "How many months have you been running?",
        label: "Your running experience",
        unit: Some("months"),
        rule: FieldRule {
            // 0 months is a valid answer for someone who has not started yet
            domain: FieldDomain::AnyNumber,
            rejection: "Invalid answer, please enter your running experience in months.",
        },
    },
    Step {
        key: "target_distance",
        prompt: "What distance do you want to be able to run (km)?",
        label: "Your target distance",
        unit: Some("km"),
        rule: FieldRule {
            domain: FieldDomain::Positive,
            rejection: "Invalid answer, please enter your target distance in km.",
        },
    },
    Step {
        key: "training_frequency",
        prompt: "How many workouts a week would you like?",
        label: "Desired workouts per week",
        unit: None,
        rule: FieldRule {
            domain: FieldDomain::Range { min: 1, max: 7 },
            rejection: "Invalid answer, please enter how many workouts a week you want (1 to 7).",
        },
    },
];
