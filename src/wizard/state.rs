use std::collections::{BTreeMap, BTreeSet};

use super::value::{FieldErrors, FieldMap, FieldValue};

/// Ephemeral record behind one wizard instance.
///
/// `current_step` is 1-based and always within `1..=total_steps`; navigation
/// clamps at the boundaries instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    current_step: usize,
    total_steps: usize,
    fields: FieldMap,
    errors: FieldErrors,
    // Keys each step reported on its last validation, so a re-run can clear
    // messages raised by cross-field checks as well.
    reported: BTreeMap<usize, BTreeSet<String>>,
}

impl WizardState {
    pub(crate) fn new(total_steps: usize, fields: FieldMap) -> Self {
        debug_assert!(total_steps >= 1);
        Self {
            current_step: 1,
            total_steps,
            fields,
            errors: FieldErrors::new(),
            reported: BTreeMap::new(),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// Stores the value and optimistically clears the field's error.
    pub(crate) fn set_field(&mut self, name: String, value: FieldValue) {
        self.errors.remove(&name);
        for keys in self.reported.values_mut() {
            keys.remove(&name);
        }
        self.fields.insert(name, value);
    }

    /// Replaces the messages `step` reported last time with `found`. A key
    /// another step still reports keeps its message.
    pub(crate) fn record_step_errors(&mut self, step: usize, found: &FieldErrors) {
        for key in self.reported.remove(&step).unwrap_or_default() {
            if !self.reported.values().any(|keys| keys.contains(&key)) {
                self.errors.remove(&key);
            }
        }
        if !found.is_empty() {
            for (key, message) in found {
                self.errors.insert(key.clone(), message.clone());
            }
            self.reported.insert(step, found.keys().cloned().collect());
        }
    }

    /// Moves forward one step; returns whether the step changed.
    pub(crate) fn step_forward(&mut self) -> bool {
        if self.current_step < self.total_steps {
            self.current_step += 1;
            true
        } else {
            false
        }
    }

    /// Moves back one step; returns whether the step changed.
    pub(crate) fn step_back(&mut self) -> bool {
        if self.current_step > 1 {
            self.current_step -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_step(&mut self, step: usize) {
        self.current_step = step.clamp(1, self.total_steps);
    }
}
