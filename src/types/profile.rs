//! User learning profile captured during onboarding
//!
//! A `Profile` is immutable once onboarding completes: plan generation reads
//! it, nothing mutates it. Revising a plan derives a fresh `Profile` rather
//! than editing one in place.

use crate::errors::{CompanionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily time budget the user committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeCommitment {
    #[serde(rename = "15min")]
    Minutes15,

    #[default]
    #[serde(rename = "30min")]
    Minutes30,

    #[serde(rename = "1hr")]
    Hour1,

    #[serde(rename = "2hr+")]
    Hours2Plus,
}

impl TimeCommitment {
    /// Label as shown to the user and to the plan service
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeCommitment::Minutes15 => "15min",
            TimeCommitment::Minutes30 => "30min",
            TimeCommitment::Hour1 => "1hr",
            TimeCommitment::Hours2Plus => "2hr+",
        }
    }

    /// All options, in the order the wizard offers them
    pub fn all() -> [TimeCommitment; 4] {
        [
            TimeCommitment::Minutes15,
            TimeCommitment::Minutes30,
            TimeCommitment::Hour1,
            TimeCommitment::Hours2Plus,
        ]
    }
}

impl fmt::Display for TimeCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-assessed prior level in the chosen topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    /// All options, in the order the wizard offers them
    pub fn all() -> [SkillLevel; 3] {
        [
            SkillLevel::Beginner,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
        ]
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable user intent produced by the onboarding wizard
///
/// Fields are private so a constructed profile cannot drift after plan
/// generation has read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    topic: String,
    time_commitment: TimeCommitment,
    level: SkillLevel,
    motivation: Option<String>,
}

impl Profile {
    /// Create a profile, rejecting an empty or whitespace-only topic
    pub fn new(
        topic: impl Into<String>,
        time_commitment: TimeCommitment,
        level: SkillLevel,
        motivation: Option<String>,
    ) -> Result<Self> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(CompanionError::Validation(
                "topic must not be empty".to_string(),
            ));
        }

        // Blank motivation collapses to None
        let motivation = motivation.filter(|m| !m.trim().is_empty());

        Ok(Self {
            topic,
            time_commitment,
            level,
            motivation,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn time_commitment(&self) -> TimeCommitment {
        self.time_commitment
    }

    pub fn level(&self) -> SkillLevel {
        self.level
    }

    pub fn motivation(&self) -> Option<&str> {
        self.motivation.as_deref()
    }

    /// Derive a profile for the revise-plan flow: same intent, new topic
    /// framing appended from user feedback
    pub fn with_feedback(&self, feedback: &str) -> Profile {
        let mut derived = self.clone();
        let feedback = feedback.trim();
        if !feedback.is_empty() {
            derived.motivation = Some(match &self.motivation {
                Some(m) => format!("{} (revision request: {})", m, feedback),
                None => format!("revision request: {}", feedback),
            });
        }
        derived
    }
}
