use std::fmt;

use serde_json::Value;

use super::ResourceLocator;

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    /// The source answered, but with a null or empty body.
    EmptyBody,
    /// Transport error, non-success status, or unparsable payload.
    Error(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => f.write_str("empty body"),
            Self::Error(message) => f.write_str(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedAttempt {
    pub locator: ResourceLocator,
    pub failure: AttemptFailure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Found {
        payload: Value,
        source: ResourceLocator,
    },
    /// Every locator was tried; one entry per attempt, in order.
    NotFound { tried: Vec<FailedAttempt> },
}

impl ResolutionOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Found { payload, .. } => Some(payload),
            Self::NotFound { .. } => None,
        }
    }
}
