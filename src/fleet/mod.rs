//! Fleet-dashboard wizards and the in-memory API boundary they submit to.

pub mod api;
pub mod costs;
pub mod maintenance;
pub mod trucks;
pub mod work_orders;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::errors::{SubmitError, WizardError};
use crate::wizard::{FieldMap, FieldValue, WizardController, WizardFlow, WizardSchema};

pub use api::{ApiError, Collection, Entity, FleetApi, Record};
pub use costs::CostEstimate;
pub use maintenance::{MaintenanceScheduleDraft, MaintenanceScheduleWizard, ServiceType};
pub use trucks::{FuelType, TruckDraft, TruckOnboardingWizard};
pub use work_orders::{Priority, WorkOrderDraft, WorkOrderWizard};

/// Raised when a record cannot be turned into a typed draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Field `{0}` is missing or invalid")]
    InvalidField(String),
}

/// Anything the fleet submit path can fail with.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The wizards exposed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetWizardKind {
    Truck,
    WorkOrder,
    Maintenance,
}

impl FleetWizardKind {
    pub const ALL: [FleetWizardKind; 3] = [
        FleetWizardKind::Truck,
        FleetWizardKind::WorkOrder,
        FleetWizardKind::Maintenance,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            FleetWizardKind::Truck => "truck",
            FleetWizardKind::WorkOrder => "work-order",
            FleetWizardKind::Maintenance => "maintenance",
        }
    }

    /// Schema of the create variant of this wizard.
    pub fn schema(self) -> WizardSchema {
        match self {
            FleetWizardKind::Truck => TruckOnboardingWizard::new_create(HashSet::new()).schema().clone(),
            FleetWizardKind::WorkOrder => WorkOrderWizard::new_create().schema().clone(),
            FleetWizardKind::Maintenance => MaintenanceScheduleWizard::new_create().schema().clone(),
        }
    }
}

impl fmt::Display for FleetWizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FleetWizardKind {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "truck" | "trucks" => Ok(FleetWizardKind::Truck),
            "work-order" | "workorder" => Ok(FleetWizardKind::WorkOrder),
            "maintenance" | "schedule" => Ok(FleetWizardKind::Maintenance),
            _ => Err(WizardError::UnknownWizard(s.to_string())),
        }
    }
}

/// Submits the controller's record through `flow` into `collection`:
/// creates a record in create mode, updates the edited one otherwise.
pub async fn submit_flow<F>(
    controller: &WizardController,
    flow: &F,
    collection: &Collection<F::Output>,
) -> Result<Record<F::Output>, SubmitError<FleetError>>
where
    F: WizardFlow<Error = DraftError>,
    F::Output: Entity,
{
    let target = flow.mode().id();
    controller
        .submit(|fields| async move {
            let draft = flow.commit(&fields)?;
            let record = match target {
                Some(id) => collection.update(id, draft).await?,
                None => collection.create(draft).await?,
            };
            Ok::<_, FleetError>(record)
        })
        .await
}

fn required_text(fields: &FieldMap, key: &str) -> Result<String, DraftError> {
    optional_text(fields, key).ok_or_else(|| DraftError::InvalidField(key.to_string()))
}

fn optional_text(fields: &FieldMap, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(FieldValue::as_text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn required_number(fields: &FieldMap, key: &str) -> Result<f64, DraftError> {
    fields
        .get(key)
        .and_then(FieldValue::as_number)
        .ok_or_else(|| DraftError::InvalidField(key.to_string()))
}

fn optional_number(fields: &FieldMap, key: &str) -> Option<f64> {
    fields.get(key).and_then(FieldValue::as_number)
}

fn flag(fields: &FieldMap, key: &str, default: bool) -> bool {
    fields
        .get(key)
        .and_then(FieldValue::as_bool)
        .unwrap_or(default)
}

fn choice<T>(fields: &FieldMap, key: &str, parse: fn(&str) -> Option<T>) -> Result<T, DraftError> {
    fields
        .get(key)
        .and_then(FieldValue::as_text)
        .and_then(parse)
        .ok_or_else(|| DraftError::InvalidField(key.to_string()))
}
