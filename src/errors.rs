use thiserror::Error;

use crate::wizard::FieldErrors;

/// Failures raised while building or selecting a wizard.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Wizard `{0}` has no steps")]
    NoSteps(String),
    #[error("Unknown wizard: {0}")]
    UnknownWizard(String),
}

/// Outcome of a rejected [`submit`](crate::wizard::WizardController::submit).
///
/// `E` is whatever the injected submit function fails with; it is handed back
/// untouched in [`SubmitError::Rejected`].
#[derive(Debug, Error)]
pub enum SubmitError<E> {
    #[error("A submission is already in flight")]
    AlreadySubmitting,
    #[error("Validation failed for {} field(s)", .0.len())]
    ValidationFailed(FieldErrors),
    #[error("Submission rejected: {0}")]
    Rejected(E),
}

impl<E> SubmitError<E> {
    /// Field messages when the failure came from local validation.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn into_rejection(self) -> Option<E> {
        match self {
            SubmitError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}
