use uuid::Uuid;

use super::controller::{SubmitPolicy, WizardController};
use super::schema::WizardSchema;
use super::value::FieldMap;
use crate::errors::WizardError;

/// Whether a wizard creates a new entity or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit { id: Uuid },
}

impl WizardMode {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            WizardMode::Create => None,
            WizardMode::Edit { id } => Some(*id),
        }
    }
}

/// High-level contract for entity-specific wizards.
///
/// Implementations describe their steps, supply defaults (when editing an
/// existing entity), and turn the finished record into a typed draft.
pub trait WizardFlow {
    type Output;
    type Error;

    fn schema(&self) -> &WizardSchema;

    /// Values used to pre-populate the record.
    fn defaults(&self) -> FieldMap {
        FieldMap::new()
    }

    fn mode(&self) -> WizardMode {
        WizardMode::Create
    }

    /// Builds the typed output from a record that passed validation.
    fn commit(&self, fields: &FieldMap) -> Result<Self::Output, Self::Error>;

    /// Controller over this flow's schema, seeded with [`defaults`](Self::defaults).
    fn controller(&self, policy: SubmitPolicy) -> Result<WizardController, WizardError> {
        Ok(WizardController::new(self.schema().clone(), self.defaults())?.with_policy(policy))
    }
}
