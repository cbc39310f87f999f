#![doc(test(attr(deny(warnings))))]

//! Fleet Wizard provides the multi-step form controller behind the fleet
//! dashboard's creation flows (truck onboarding, work orders, maintenance
//! schedules) together with the in-memory API boundary they submit to.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fleet;
pub mod utils;
pub mod wizard;

use std::sync::Once;

pub use errors::{SubmitError, WizardError};
pub use wizard::{FieldErrors, FieldMap, FieldValue, WizardController};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Fleet wizard tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
