//! Onboarding wizard producing the user profile
//!
//! A 4-step linear sequence (topic -> time commitment -> level -> motivation)
//! with forward-only navigation. Step 1 blocks until a non-empty topic is
//! entered; steps 2-4 carry defaults and are always satisfiable. The wizard
//! exists to define the `Profile` contract the controller consumes - how the
//! steps are rendered is the presentation layer's business.

use crate::types::{Profile, SkillLevel, TimeCommitment};

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Topic,
    TimeCommitment,
    Level,
    Motivation,
}

impl WizardStep {
    /// Next step, or None on the final step
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Topic => Some(WizardStep::TimeCommitment),
            WizardStep::TimeCommitment => Some(WizardStep::Level),
            WizardStep::Level => Some(WizardStep::Motivation),
            WizardStep::Motivation => None,
        }
    }

    /// 1-based position, as in "Step {n} of 4"
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Topic => 1,
            WizardStep::TimeCommitment => 2,
            WizardStep::Level => 3,
            WizardStep::Motivation => 4,
        }
    }
}

/// Total number of wizard steps
pub const STEP_COUNT: u8 = 4;

/// Forward-only onboarding wizard state
#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    step: WizardStep,
    topic: String,
    time_commitment: TimeCommitment,
    level: SkillLevel,
    motivation: String,
    completed: bool,
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Topic,
            topic: String::new(),
            time_commitment: TimeCommitment::default(),
            level: SkillLevel::default(),
            motivation: String::new(),
            completed: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn set_topic(&mut self, topic: &str) {
        self.topic = topic.to_string();
    }

    pub fn set_time_commitment(&mut self, time_commitment: TimeCommitment) {
        self.time_commitment = time_commitment;
    }

    pub fn set_level(&mut self, level: SkillLevel) {
        self.level = level;
    }

    pub fn set_motivation(&mut self, motivation: &str) {
        self.motivation = motivation.to_string();
    }

    /// Whether the current step's requirement is satisfied
    ///
    /// Only the topic step can block; the remaining steps have defaults.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Topic => !self.topic.trim().is_empty(),
            _ => true,
        }
    }

    /// Advance to the next step, completing the wizard on the final one
    ///
    /// Returns false (and stays put) when the current step is unsatisfied
    /// or the wizard already completed. There is no way back.
    pub fn advance(&mut self) -> bool {
        if self.completed || !self.can_advance() {
            return false;
        }

        match self.step.next() {
            Some(next) => self.step = next,
            None => self.completed = true,
        }
        true
    }

    /// Produce the immutable profile once all steps are done
    pub fn finish(&self) -> Option<Profile> {
        if !self.completed {
            return None;
        }

        let motivation = if self.motivation.trim().is_empty() {
            None
        } else {
            Some(self.motivation.clone())
        };

        // Topic non-emptiness was enforced at the blocking step
        Profile::new(
            self.topic.trim(),
            self.time_commitment,
            self.level,
            motivation,
        )
        .ok()
    }
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new()
    }
}
