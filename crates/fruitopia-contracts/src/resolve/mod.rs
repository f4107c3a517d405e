mod locator;
mod outcome;

pub use locator::{detail_key, detail_locators, ResourceLocator};
pub use outcome::{AttemptFailure, FailedAttempt, ResolutionOutcome};
