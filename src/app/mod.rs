//! Companion orchestrator - wires controller, session, and service
//!
//! The single mutation surface the presentation layer talks to. It accepts
//! exactly the commands `complete_onboarding`, `post_user_message`,
//! `retry_generation`, and `revise_plan`, and exposes the view state and
//! transcript read-only. The conversation session is created when the
//! dashboard is entered and dropped when it is exited.
//!
//! Scheduling is single-logical-session cooperative: the only suspension
//! points are the two boundary calls, and the controller/session gates keep
//! a second generation or turn from starting while one is outstanding.

use crate::controller::{PlanController, ViewState};
use crate::service::PlanService;
use crate::session::{ConversationSession, SessionConfig};
use crate::types::Profile;
use std::sync::Arc;

/// Companion configuration
#[derive(Debug, Clone, Default)]
pub struct CompanionConfig {
    /// Emit [STATE]/[TURN] diagnostics to stderr
    pub verbose: bool,

    /// Conversation session tuning
    pub session: SessionConfig,
}

/// Top-level companion state
pub struct Companion {
    controller: PlanController,
    session: Option<ConversationSession>,
    service: Arc<dyn PlanService>,
    config: CompanionConfig,
}

impl Companion {
    pub fn new(service: Arc<dyn PlanService>, config: CompanionConfig) -> Self {
        Self {
            controller: PlanController::with_verbose(config.verbose),
            session: None,
            service,
            config,
        }
    }

    /// Current view state, read-only
    pub fn view(&self) -> &ViewState {
        self.controller.view()
    }

    /// Conversation session while the dashboard is showing
    pub fn session(&self) -> Option<&ConversationSession> {
        self.session.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.controller.view().is_generating()
    }

    /// True while a chat turn is in flight
    pub fn awaiting_reply(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.awaiting_reply())
    }

    /// Failure notice from the last generation attempt, if any
    pub fn last_failure(&self) -> Option<&str> {
        self.controller.last_failure()
    }

    /// Onboarding finished: run one plan generation request
    ///
    /// A no-op while a request is already in flight or a dashboard is
    /// showing. On success the dashboard is entered and a fresh
    /// conversation session created; on failure the profile is preserved
    /// for `retry_generation`.
    pub async fn complete_onboarding(&mut self, profile: Profile) {
        let Some(ticket) = self.controller.begin_generation(profile.clone()) else {
            return;
        };

        let result = self.service.generate_plan(&profile).await;
        if self.controller.resolve_generation(ticket, result) {
            self.sync_session();
        }
    }

    /// Resubmit the profile preserved from a failed generation
    pub async fn retry_generation(&mut self) {
        if let Some(profile) = self.controller.failed_profile() {
            self.complete_onboarding(profile).await;
        }
    }

    /// Regenerate the plan from the dashboard with a derived profile
    ///
    /// Leaving the dashboard destroys the current conversation session;
    /// a new one starts if the revision succeeds.
    pub async fn revise_plan(&mut self, profile: Profile) {
        let Some(ticket) = self.controller.begin_revision(profile.clone()) else {
            return;
        };
        self.session = None;

        let result = self.service.generate_plan(&profile).await;
        if self.controller.resolve_generation(ticket, result) {
            self.sync_session();
        }
    }

    /// Submit a chat message and run its turn against the boundary
    ///
    /// A rejected no-op outside the dashboard, while a reply is
    /// outstanding, or for blank text. A failed turn settles the assistant
    /// placeholder with the fallback notice and touches nothing else.
    pub async fn post_user_message(&mut self, text: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(request) = session.post_user_message(text) else {
            if self.config.verbose {
                eprintln!("[TURN] message rejected (gate armed or blank text)");
            }
            return;
        };

        let result = self.service.send_turn(&request.history, &request.text).await;

        if self.config.verbose {
            match &result {
                Ok(_) => eprintln!("[TURN] reply received"),
                Err(e) => eprintln!("[TURN] failed: {}", e),
            }
        }

        if let Some(session) = self.session.as_mut() {
            session.resolve_turn(request.ticket, result);
        }
    }

    /// Align session lifetime with the dashboard
    fn sync_session(&mut self) {
        if self.controller.view().is_dashboard() {
            if self.session.is_none() {
                self.session = Some(ConversationSession::with_config(
                    self.config.session.clone(),
                ));
            }
        } else {
            self.session = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CompanionError;
    use crate::service::PlanService;
    use crate::types::{ChatMessage, MessageStatus, Plan, Role, SkillLevel, TimeCommitment};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Programmable boundary double
    struct StubService {
        plan_ok: Mutex<bool>,
        turn_ok: Mutex<bool>,
        plan_calls: AtomicUsize,
        turn_calls: AtomicUsize,
    }

    impl StubService {
        fn new() -> Self {
            Self {
                plan_ok: Mutex::new(true),
                turn_ok: Mutex::new(true),
                plan_calls: AtomicUsize::new(0),
                turn_calls: AtomicUsize::new(0),
            }
        }

        fn set_plan_ok(&self, ok: bool) {
            *self.plan_ok.lock().unwrap() = ok;
        }

        fn set_turn_ok(&self, ok: bool) {
            *self.turn_ok.lock().unwrap() = ok;
        }
    }

    #[async_trait]
    impl PlanService for StubService {
        async fn generate_plan(&self, _profile: &Profile) -> crate::Result<Plan> {
            self.plan_calls.fetch_add(1, Ordering::SeqCst);
            if *self.plan_ok.lock().unwrap() {
                Ok(Plan::from_value(json!({"days": 7})))
            } else {
                Err(CompanionError::Service("unreachable".to_string()))
            }
        }

        async fn send_turn(&self, _history: &[ChatMessage], new_text: &str) -> crate::Result<String> {
            self.turn_calls.fetch_add(1, Ordering::SeqCst);
            if *self.turn_ok.lock().unwrap() {
                Ok(format!("reply to: {}", new_text))
            } else {
                Err(CompanionError::Service("unreachable".to_string()))
            }
        }
    }

    fn profile() -> Profile {
        Profile::new(
            "Rust",
            TimeCommitment::Minutes30,
            SkillLevel::Beginner,
            None,
        )
        .unwrap()
    }

    fn companion(service: Arc<StubService>) -> Companion {
        Companion::new(service, CompanionConfig::default())
    }

    #[tokio::test]
    async fn test_onboarding_to_dashboard_creates_session() {
        let service = Arc::new(StubService::new());
        let mut companion = companion(service.clone());

        companion.complete_onboarding(profile()).await;

        assert!(companion.view().is_dashboard());
        let session = companion.session().expect("session created on dashboard");
        assert_eq!(session.len(), 1); // greeting
        assert_eq!(service.plan_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_no_session() {
        let service = Arc::new(StubService::new());
        service.set_plan_ok(false);
        let mut companion = companion(service.clone());

        companion.complete_onboarding(profile()).await;

        assert!(companion.last_failure().is_some());
        assert!(companion.session().is_none());

        // Retry uses the preserved profile, no wizard round-trip
        service.set_plan_ok(true);
        companion.retry_generation().await;
        assert!(companion.view().is_dashboard());
        assert_eq!(service.plan_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_onboarding_is_noop_on_dashboard() {
        let service = Arc::new(StubService::new());
        let mut companion = companion(service.clone());

        companion.complete_onboarding(profile()).await;
        companion.complete_onboarding(profile()).await;

        assert_eq!(service.plan_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chat_turn_success() {
        let service = Arc::new(StubService::new());
        let mut companion = companion(service.clone());
        companion.complete_onboarding(profile()).await;

        companion.post_user_message("What is ownership?").await;

        let messages = companion.session().unwrap().messages();
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "reply to: What is ownership?");
        assert_eq!(last.status, MessageStatus::Sent);
        assert!(!companion.awaiting_reply());
    }

    #[tokio::test]
    async fn test_chat_turn_failure_is_localized() {
        let service = Arc::new(StubService::new());
        let mut companion = companion(service.clone());
        companion.complete_onboarding(profile()).await;
        service.set_turn_ok(false);

        companion.post_user_message("explain traits").await;

        // View state untouched, only this exchange failed
        assert!(companion.view().is_dashboard());
        let messages = companion.session().unwrap().messages();
        assert_eq!(messages.last().unwrap().status, MessageStatus::Failed);
        assert!(!companion.awaiting_reply());
    }

    #[tokio::test]
    async fn test_blank_message_never_reaches_boundary() {
        let service = Arc::new(StubService::new());
        let mut companion = companion(service.clone());
        companion.complete_onboarding(profile()).await;

        companion.post_user_message("   ").await;

        assert_eq!(service.turn_calls.load(Ordering::SeqCst), 0);
        assert_eq!(companion.session().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_message_outside_dashboard_is_noop() {
        let service = Arc::new(StubService::new());
        let mut companion = companion(service.clone());

        companion.post_user_message("hello?").await;
        assert_eq!(service.turn_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_revision_replaces_session() {
        let service = Arc::new(StubService::new());
        let mut companion = companion(service.clone());
        companion.complete_onboarding(profile()).await;

        companion.post_user_message("hi").await;
        let old_id = companion.session().unwrap().id();
        assert_eq!(companion.session().unwrap().len(), 3);

        companion.revise_plan(profile().with_feedback("slower pace")).await;

        // New dashboard visit, fresh session
        assert!(companion.view().is_dashboard());
        let session = companion.session().unwrap();
        assert_ne!(session.id(), old_id);
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_revision_leaves_failure_state() {
        let service = Arc::new(StubService::new());
        let mut companion = companion(service.clone());
        companion.complete_onboarding(profile()).await;
        service.set_plan_ok(false);

        companion.revise_plan(profile()).await;

        assert!(companion.last_failure().is_some());
        assert!(companion.session().is_none());
    }
}
