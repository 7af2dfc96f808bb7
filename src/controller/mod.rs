//! Plan generation controller and view-state machine
//!
//! One controller owns the single `ViewState`; the presentation layer only
//! reads it. The flow is onboarding -> generating -> dashboard, with failures
//! landing in a generation-failed state that renders as onboarding plus a
//! notice and preserves the entered profile for resubmission.
//!
//! At most one generation request is in flight: `begin_generation` hands out
//! a ticket and rejects further requests until that ticket resolves or the
//! generating screen is abandoned. Resolutions carrying a superseded ticket
//! are ignored, so a late response can never overwrite newer state.

use crate::errors::CompanionError;
use crate::types::{Plan, Profile};

/// Current phase of the onboarding -> generation -> dashboard flow
///
/// Exactly one variant is active at any time. `Dashboard` carries the
/// profile/plan pair atomically: observers never see a dashboard with a
/// missing or mismatched plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Collecting the user profile
    Onboarding,

    /// One generation request in flight for this profile
    Generating { profile: Profile },

    /// Plan ready; terminal for automatic transitions
    Dashboard { profile: Profile, plan: Plan },

    /// Generation failed; renders as onboarding with a retryable notice
    GenerationFailed { profile: Profile, reason: String },
}

impl ViewState {
    /// Short name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Onboarding => "Onboarding",
            ViewState::Generating { .. } => "Generating",
            ViewState::Dashboard { .. } => "Dashboard",
            ViewState::GenerationFailed { .. } => "GenerationFailed",
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, ViewState::Generating { .. })
    }

    pub fn is_dashboard(&self) -> bool {
        matches!(self, ViewState::Dashboard { .. })
    }
}

/// Handle identifying one generation request
///
/// Resolutions must present the ticket they were issued; a stale ticket is
/// dropped without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    id: u64,
}

/// Owner of the view state and the single-flight generation request
#[derive(Debug)]
pub struct PlanController {
    view: ViewState,
    next_request: u64,
    current_request: Option<u64>,
    verbose: bool,
}

impl PlanController {
    pub fn new() -> Self {
        Self {
            view: ViewState::Onboarding,
            next_request: 0,
            current_request: None,
            verbose: false,
        }
    }

    pub fn with_verbose(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::new()
        }
    }

    /// Read-only view for the presentation layer
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Whether a fresh generation request would be accepted
    pub fn can_generate(&self) -> bool {
        matches!(
            self.view,
            ViewState::Onboarding | ViewState::GenerationFailed { .. }
        )
    }

    /// Profile preserved from a failed generation, for resubmission
    pub fn failed_profile(&self) -> Option<Profile> {
        match &self.view {
            ViewState::GenerationFailed { profile, .. } => Some(profile.clone()),
            _ => None,
        }
    }

    /// Failure notice to surface, if the last generation failed
    pub fn last_failure(&self) -> Option<&str> {
        match &self.view {
            ViewState::GenerationFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Enter `Generating` for this profile and claim the in-flight slot
    ///
    /// Returns None (no state change) while a request is already in flight
    /// or a dashboard is showing - resubmission during generation is
    /// rejected, not queued.
    pub fn begin_generation(&mut self, profile: Profile) -> Option<GenerationTicket> {
        if !self.can_generate() {
            if self.verbose {
                eprintln!(
                    "[STATE] generation request rejected in {}",
                    self.view.name()
                );
            }
            return None;
        }

        let ticket = self.issue_ticket();
        self.transition_to(ViewState::Generating { profile });
        Some(ticket)
    }

    /// Re-enter `Generating` from the dashboard with a derived profile
    pub fn begin_revision(&mut self, profile: Profile) -> Option<GenerationTicket> {
        if !self.view.is_dashboard() {
            return None;
        }

        let ticket = self.issue_ticket();
        self.transition_to(ViewState::Generating { profile });
        Some(ticket)
    }

    /// Apply the outcome of the request identified by `ticket`
    ///
    /// Success stores the plan and the originating profile as one pair and
    /// enters `Dashboard`; failure enters `GenerationFailed` keeping the
    /// profile. Returns false when the ticket is stale (the request was
    /// abandoned or superseded) - state is left untouched.
    pub fn resolve_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<Plan, CompanionError>,
    ) -> bool {
        if self.current_request != Some(ticket.id) {
            if self.verbose {
                eprintln!("[STATE] dropped stale generation response #{}", ticket.id);
            }
            return false;
        }

        let profile = match &self.view {
            ViewState::Generating { profile } => profile.clone(),
            // current_request is only set while Generating
            _ => return false,
        };

        self.current_request = None;
        match result {
            Ok(plan) => self.transition_to(ViewState::Dashboard { profile, plan }),
            Err(err) => self.transition_to(ViewState::GenerationFailed {
                profile,
                reason: err.to_string(),
            }),
        }
        true
    }

    /// Leave the generating screen without waiting for the result
    ///
    /// The in-flight request keeps running at the network layer, but its
    /// ticket is invalidated so a late resolution is suppressed.
    pub fn abandon_generation(&mut self) {
        if self.view.is_generating() {
            self.current_request = None;
            self.transition_to(ViewState::Onboarding);
        }
    }

    fn issue_ticket(&mut self) -> GenerationTicket {
        let id = self.next_request;
        self.next_request += 1;
        self.current_request = Some(id);
        GenerationTicket { id }
    }

    fn transition_to(&mut self, next: ViewState) {
        if self.verbose {
            eprintln!("[STATE] {} -> {}", self.view.name(), next.name());
        }
        self.view = next;
    }
}

impl Default for PlanController {
    fn default() -> Self {
        Self::new()
    }
}
