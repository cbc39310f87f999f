//! Multi-step wizard framework shared by the dashboard's creation flows.
//!
//! A [`WizardSchema`] describes the steps and the fields each one validates;
//! a [`WizardController`] owns the record while the user walks through it;
//! a [`WizardFlow`] ties a schema to the typed draft it produces.

pub mod controller;
pub mod flow;
pub mod schema;
pub mod state;
pub mod value;

pub use controller::{Advance, StepProgress, SubmitPolicy, WizardController};
pub use flow::{WizardFlow, WizardMode};
pub use schema::{FieldKind, FieldSchema, StepSchema, Validator, WizardSchema};
pub use state::WizardState;
pub use value::{FieldErrors, FieldMap, FieldValue};
