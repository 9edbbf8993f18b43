// ABOUTME: Workout-logging flow steps: distance, duration, pace, pulse and calories
// ABOUTME: Summary framing text for the workout confirmation gate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Step;
use crate::validation::{FieldDomain, FieldRule};

pub(super) const SUMMARY_INTRO: &str = "Great job! Here are your results:";
pub(super) const SUMMARY_OUTRO: &str = "Is everything correct?";

pub(super) const STEPS: &[Step] = &[
    Step {
        key: "distance",
        prompt: "What distance did you run (km)?",
        label: "Distance",
        unit: Some("km"),
        rule: FieldRule {
            domain: FieldDomain::Range { min: 1, max: 60 },
            rejection: "Please enter a valid distance (1-60 km).",
        },
    },
    Step {
        key: "time",
        prompt: "How long did it take you to cover this distance (minutes)?",
        label: "Time",
        unit: Some("min"),
        rule: FieldRule {
            domain: FieldDomain::Positive,
            rejection: "Please enter a valid time in minutes.",
        },
    },
    Step {
        key: "pace",
        prompt: "What was your average running speed (km/h)?",
        label: "Average pace",
        unit: Some("km/h"),
        rule: FieldRule {
            domain: FieldDomain::Range { min: 1, max: 44 },
            rejection: "Please enter a valid average pace (1-44 km/h).",
        },
    },
    Step {
        key: "pulse",
        prompt: "What was your average heart rate (beats per minute)?",
        label: "Average pulse",
        unit: Some("bpm"),
        rule: FieldRule {
            domain: FieldDomain::Range { min: 91, max: 240 },
            rejection: "Please enter a valid average pulse (91-240).",
        },
    },
    Step {
        key: "calories",
        prompt: "How many calories did you burn?",
        label: "Burned calories",
        unit: Some("kcal"),
        rule: FieldRule {
            domain: FieldDomain::Range { min: 1, max: 5999 },
            rejection: "Please enter a valid number of burned calories (1-5999).",
        },
    },
];
