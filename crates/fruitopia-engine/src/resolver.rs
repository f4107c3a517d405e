use std::sync::Arc;

use fruitopia_contracts::resolve::{
    AttemptFailure, FailedAttempt, ResolutionOutcome, ResourceLocator,
};
use serde_json::Value;

use crate::transport::{FetchError, Transport};

/// Tries locators strictly in order, one outstanding request at a time,
/// and stops at the first usable payload. Nothing is retried.
#[derive(Clone)]
pub struct CandidateResolver {
    transport: Arc<dyn Transport>,
    origin: String,
}

impl CandidateResolver {
    pub fn new(transport: Arc<dyn Transport>, origin: impl Into<String>) -> Self {
        Self {
            transport,
            origin: origin.into(),
        }
    }

    pub fn resolve(&self, locators: &[ResourceLocator]) -> ResolutionOutcome {
        let mut tried = Vec::with_capacity(locators.len());
        for locator in locators {
            match self.attempt(locator) {
                Ok(payload) => {
                    log::debug!("resolved from {locator} after {} misses", tried.len());
                    return ResolutionOutcome::Found {
                        payload,
                        source: locator.clone(),
                    };
                }
                Err(failure) => {
                    log::debug!("{locator} unusable: {failure}");
                    tried.push(FailedAttempt {
                        locator: locator.clone(),
                        failure,
                    });
                }
            }
        }
        log::info!("no source had the record ({} tried)", tried.len());
        ResolutionOutcome::NotFound { tried }
    }

    fn attempt(&self, locator: &ResourceLocator) -> Result<Value, AttemptFailure> {
        let url = locator.url(&self.origin);
        let payload = self
            .transport
            .get(&url)
            .and_then(|body| body.json())
            .map_err(|err| match err {
                FetchError::EmptyBody => AttemptFailure::EmptyBody,
                other => AttemptFailure::Error(other.to_string()),
            })?;
        if is_empty_payload(&payload) {
            return Err(AttemptFailure::EmptyBody);
        }
        Ok(payload)
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}
