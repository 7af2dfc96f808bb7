//! StudyBuddy - Personalized Learning-Plan Companion
//!
//! Session orchestration core for a learning companion backed by a local
//! Ollama model:
//!
//! - **Controller**: view-state machine sequencing onboarding -> plan
//!   generation -> dashboard, with single-flight generation requests
//! - **Session**: ordered chat history with single-flight turn-taking and
//!   optimistic placeholder reconciliation
//! - **Service**: the external plan/chat boundary contract plus an
//!   Ollama-backed adapter

pub mod errors;
pub mod types;
pub mod onboarding;
pub mod controller;
pub mod session;
pub mod service;
pub mod app;
pub mod config;
pub mod cli;
pub mod repl;

// Re-export commonly used types
pub use errors::{CompanionError, Result};
pub use types::{ChatMessage, MessageStatus, Plan, Profile, Role};
