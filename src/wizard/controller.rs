use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::schema::WizardSchema;
use super::state::WizardState;
use super::value::{FieldErrors, FieldMap, FieldValue};
use crate::errors::{SubmitError, WizardError};

/// Which steps are re-validated right before handing the record off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    /// Every step, since `jump_to` or later edits may have invalidated one.
    #[default]
    Strict,
    /// Only the last step.
    FinalStep,
}

/// Result of [`WizardController::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub moved: bool,
    pub errors: FieldErrors,
}

/// Snapshot used by views to render a "Step N of M" header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    pub current: usize,
    pub total: usize,
    pub title: &'static str,
}

/// Drives validated, linear traversal of a [`WizardSchema`] over one shared
/// field record and hands the finished record to a caller-supplied submit
/// function.
///
/// All operations take `&self`, so a controller can sit behind an `Arc` and be
/// read by the view while a submission is pending. The state lock is never
/// held across an `.await`.
pub struct WizardController {
    schema: WizardSchema,
    policy: SubmitPolicy,
    state: Mutex<WizardState>,
    submitting: AtomicBool,
}

impl WizardController {
    /// Creates a controller at step 1. Pass an empty map for "create" flows or
    /// a fetched record for "edit" flows.
    pub fn new(schema: WizardSchema, initial: FieldMap) -> Result<Self, WizardError> {
        let total = schema.total_steps();
        if total == 0 {
            return Err(WizardError::NoSteps(schema.name.to_string()));
        }
        debug!(wizard = schema.name, total_steps = total, "wizard created");
        Ok(Self {
            schema,
            policy: SubmitPolicy::default(),
            state: Mutex::new(WizardState::new(total, initial)),
            submitting: AtomicBool::new(false),
        })
    }

    pub fn with_policy(mut self, policy: SubmitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &WizardSchema {
        &self.schema
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    /// Copy of the whole state at this instant.
    pub fn snapshot(&self) -> WizardState {
        self.state.lock().clone()
    }

    pub fn current_step(&self) -> usize {
        self.state.lock().current_step()
    }

    pub fn total_steps(&self) -> usize {
        self.schema.total_steps()
    }

    pub fn is_first_step(&self) -> bool {
        self.state.lock().is_first_step()
    }

    pub fn is_last_step(&self) -> bool {
        self.state.lock().is_last_step()
    }

    pub fn fields(&self) -> FieldMap {
        self.state.lock().fields().clone()
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.state.lock().fields().get(name).cloned()
    }

    pub fn errors(&self) -> FieldErrors {
        self.state.lock().errors().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Title of a 1-based step, `None` when out of range.
    pub fn step_title(&self, step: usize) -> Option<&'static str> {
        self.schema.step(step).map(|step| step.title)
    }

    pub fn progress(&self) -> StepProgress {
        let current = self.current_step();
        StepProgress {
            current,
            total: self.total_steps(),
            title: self.step_title(current).unwrap_or(""),
        }
    }

    /// Overwrites a field and clears its error. Names the schema does not
    /// know are stored as-is.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        if self.schema.field(&name).is_none() {
            debug!(wizard = self.schema.name, field = %name, "storing field outside schema");
        }
        self.state.lock().set_field(name, value.into());
    }

    /// Runs the validators of `step` against the current record, replacing
    /// that step's messages in `errors`. Never moves `current_step`.
    ///
    /// # Panics
    ///
    /// Panics when `step` is outside `1..=total_steps`; step numbers are
    /// caller-controlled constants.
    pub fn validate_step(&self, step: usize) -> bool {
        let mut state = self.state.lock();
        self.validate_locked(&mut state, step).is_empty()
    }

    /// Validates the current step and moves forward one step if it passes.
    /// `moved` reports whether validation passed; on the last step a valid
    /// advance leaves `current_step` clamped at `total_steps`.
    pub fn advance(&self) -> Advance {
        let mut state = self.state.lock();
        let step = state.current_step();
        let errors = self.validate_locked(&mut state, step);
        if !errors.is_empty() {
            warn!(
                wizard = self.schema.name,
                step,
                invalid = errors.len(),
                "advance blocked by validation"
            );
            return Advance {
                moved: false,
                errors,
            };
        }
        state.step_forward();
        debug!(wizard = self.schema.name, from = step, to = state.current_step(), "advance");
        Advance {
            moved: true,
            errors: FieldErrors::new(),
        }
    }

    /// Moves back one step without validating, stopping at step 1.
    pub fn retreat(&self) {
        let mut state = self.state.lock();
        let from = state.current_step();
        if state.step_back() {
            debug!(wizard = self.schema.name, from, to = state.current_step(), "retreat");
        }
    }

    /// Jumps straight to `step`. Earlier steps are always reachable; later
    /// ones only when every step from the current one up to (not including)
    /// the target validates. A refused jump leaves the state untouched.
    pub fn jump_to(&self, step: usize) -> bool {
        if step == 0 || step > self.total_steps() {
            return false;
        }
        let mut state = self.state.lock();
        let current = state.current_step();
        if step > current {
            let blocked = (current..step).find(|n| !self.errors_for(*n, state.fields()).is_empty());
            if let Some(blocked_at) = blocked {
                debug!(wizard = self.schema.name, target = step, blocked_at, "jump refused");
                return false;
            }
        }
        state.set_step(step);
        debug!(wizard = self.schema.name, from = current, to = step, "jump");
        true
    }

    /// Validates according to the [`SubmitPolicy`] and, if everything passes,
    /// awaits `on_submit` with a copy of the record.
    ///
    /// The outcome of `on_submit` is returned unchanged (`Ok`, or wrapped in
    /// [`SubmitError::Rejected`]). A call made while another submission is
    /// pending returns [`SubmitError::AlreadySubmitting`] without invoking
    /// `on_submit`. The submitting flag is released however the call ends,
    /// including when the returned future is dropped early.
    pub async fn submit<F, Fut, T, E>(&self, on_submit: F) -> Result<T, SubmitError<E>>
    where
        F: FnOnce(FieldMap) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(wizard = self.schema.name, "submit ignored: already submitting");
            return Err(SubmitError::AlreadySubmitting);
        }
        let _release = SubmittingGuard(&self.submitting);

        let record = {
            let mut state = self.state.lock();
            let first = match self.policy {
                SubmitPolicy::Strict => 1,
                SubmitPolicy::FinalStep => self.total_steps(),
            };
            let mut failed = FieldErrors::new();
            for step in first..=self.total_steps() {
                for (key, message) in self.validate_locked(&mut state, step) {
                    failed.entry(key).or_insert(message);
                }
            }
            if !failed.is_empty() {
                warn!(
                    wizard = self.schema.name,
                    invalid = failed.len(),
                    "submit blocked by validation"
                );
                return Err(SubmitError::ValidationFailed(failed));
            }
            state.fields().clone()
        };

        info!(wizard = self.schema.name, fields = record.len(), "submitting");
        match on_submit(record).await {
            Ok(output) => {
                info!(wizard = self.schema.name, "submit succeeded");
                Ok(output)
            }
            Err(err) => {
                warn!(wizard = self.schema.name, "submit rejected");
                Err(SubmitError::Rejected(err))
            }
        }
    }

    fn validate_locked(&self, state: &mut WizardState, step: usize) -> FieldErrors {
        let total = self.total_steps();
        assert!(
            (1..=total).contains(&step),
            "step {} is outside 1..={} for wizard `{}`",
            step,
            total,
            self.schema.name
        );
        let found = self.errors_for(step, state.fields());
        state.record_step_errors(step, &found);
        found
    }

    fn errors_for(&self, step: usize, fields: &FieldMap) -> FieldErrors {
        self.schema
            .step(step)
            .map(|schema| schema.evaluate(fields))
            .unwrap_or_default()
    }
}

struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
