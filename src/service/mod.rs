//! External plan service boundary
//!
//! The abstract capability the core consumes: generate a plan from a
//! profile, and answer one chat turn given the prior transcript. Both calls
//! are asynchronous and single-shot; timeout policy lives in the adapter,
//! which must eventually resolve so the callers' single-flight gates are
//! never held forever.

use crate::errors::Result;
use crate::types::{ChatMessage, Plan, Profile};
use async_trait::async_trait;

pub mod ollama;
pub use ollama::OllamaService;

/// Remote plan/chat generation capability
#[async_trait]
pub trait PlanService: Send + Sync {
    /// Produce a full learning plan for this profile
    ///
    /// Fails with a service error on network failure, malformed response,
    /// or the remote declining to produce a plan.
    async fn generate_plan(&self, profile: &Profile) -> Result<Plan>;

    /// Answer one chat turn
    ///
    /// `history` is the settled prior transcript, role-tagged and oldest
    /// first; `new_text` is the user's latest message, not yet part of
    /// `history`.
    async fn send_turn(&self, history: &[ChatMessage], new_text: &str) -> Result<String>;
}
