//! Opaque learning plan artifact
//!
//! The plan service returns structured JSON; the core never interprets it,
//! only hands it through to the presentation layer. The invariant that
//! matters: a `Plan` is always fully populated - the controller exposes
//! either no plan or this complete value, never a partial one.

use serde::{Deserialize, Serialize};

/// Structured plan content, opaque to the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan(serde_json::Value);

impl Plan {
    pub fn from_value(value: serde_json::Value) -> Self {
        Plan(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Pretty-printed form for terminal display
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<serde_json::Value> for Plan {
    fn from(value: serde_json::Value) -> Self {
        Plan(value)
    }
}
