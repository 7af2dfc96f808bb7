//! Core value types shared across the companion

pub mod messages;
pub mod plan;
pub mod profile;

pub use messages::{ChatMessage, MessageStatus, Role};
pub use plan::Plan;
pub use profile::{Profile, SkillLevel, TimeCommitment};
