use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::api::Entity;
use super::costs::CostEstimate;
use super::{choice, optional_text, required_number, required_text, DraftError};
use crate::wizard::{
    FieldKind, FieldMap, FieldSchema, StepSchema, Validator, WizardFlow, WizardMode, WizardSchema,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|priority| priority.label().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderDraft {
    pub truck: String,
    pub title: String,
    pub priority: Priority,
    pub part_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub labor_hours: f64,
    pub labor_rate: f64,
    pub notes: Option<String>,
    pub cost: CostEstimate,
}

impl WorkOrderDraft {
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("truck".into(), self.truck.as_str().into());
        fields.insert("title".into(), self.title.as_str().into());
        fields.insert("priority".into(), self.priority.label().into());
        fields.insert("part_name".into(), self.part_name.as_str().into());
        fields.insert("quantity".into(), self.quantity.into());
        fields.insert("unit_price".into(), self.unit_price.into());
        fields.insert("labor_hours".into(), self.labor_hours.into());
        fields.insert("labor_rate".into(), self.labor_rate.into());
        if let Some(notes) = &self.notes {
            fields.insert("notes".into(), notes.as_str().into());
        }
        fields
    }
}

impl Entity for WorkOrderDraft {
    const KIND: &'static str = "work order";
}

/// Three-step work order form: details, parts, labor.
pub struct WorkOrderWizard {
    schema: WizardSchema,
    defaults: FieldMap,
    mode: WizardMode,
}

impl WorkOrderWizard {
    pub fn new_create() -> Self {
        let mut defaults = FieldMap::new();
        defaults.insert("priority".into(), Priority::Medium.label().into());
        Self::build(defaults, WizardMode::Create)
    }

    pub fn new_edit(id: Uuid, current: &WorkOrderDraft) -> Self {
        Self::build(current.to_fields(), WizardMode::Edit { id })
    }

    fn build(defaults: FieldMap, mode: WizardMode) -> Self {
        let details = StepSchema::new(
            "Details",
            vec![
                FieldSchema::new("truck", "Truck registration", FieldKind::Text),
                FieldSchema::new("title", "Title", FieldKind::Text),
                FieldSchema::new(
                    "priority",
                    "Priority",
                    FieldKind::Choice(Priority::ALL.iter().map(|p| p.label().to_string()).collect()),
                ),
            ],
        );
        let parts = StepSchema::new(
            "Parts",
            vec![
                FieldSchema::new("part_name", "Part", FieldKind::Text),
                FieldSchema::new("quantity", "Quantity", FieldKind::Number)
                    .with_validator(Validator::PositiveNumber),
                FieldSchema::new("unit_price", "Unit price", FieldKind::Number)
                    .with_validator(Validator::NonNegativeNumber),
            ],
        );
        let labor = StepSchema::new(
            "Labor",
            vec![
                FieldSchema::new("labor_hours", "Labor hours", FieldKind::Number)
                    .with_validator(Validator::NonNegativeNumber),
                FieldSchema::new("labor_rate", "Hourly rate", FieldKind::Number)
                    .with_validator(Validator::NonNegativeNumber),
                FieldSchema::new("notes", "Notes", FieldKind::Text)
                    .with_optional()
                    .with_validator(make_notes_validator(512)),
            ],
        );

        Self {
            schema: WizardSchema::new("work-order", vec![details, parts, labor]),
            defaults,
            mode,
        }
    }
}

impl WizardFlow for WorkOrderWizard {
    type Output = WorkOrderDraft;
    type Error = DraftError;

    fn schema(&self) -> &WizardSchema {
        &self.schema
    }

    fn defaults(&self) -> FieldMap {
        self.defaults.clone()
    }

    fn mode(&self) -> WizardMode {
        self.mode
    }

    fn commit(&self, fields: &FieldMap) -> Result<Self::Output, Self::Error> {
        let quantity = required_number(fields, "quantity")?;
        let unit_price = required_number(fields, "unit_price")?;
        let labor_hours = required_number(fields, "labor_hours")?;
        let labor_rate = required_number(fields, "labor_rate")?;
        Ok(WorkOrderDraft {
            truck: required_text(fields, "truck")?.to_ascii_uppercase(),
            title: required_text(fields, "title")?,
            priority: choice(fields, "priority", Priority::parse)?,
            part_name: required_text(fields, "part_name")?,
            quantity,
            unit_price,
            labor_hours,
            labor_rate,
            notes: optional_text(fields, "notes"),
            cost: CostEstimate::new(quantity, unit_price, labor_hours, labor_rate),
        })
    }
}

fn make_notes_validator(max_len: usize) -> Validator {
    Validator::custom(move |value| {
        let len = value
            .as_text()
            .map(|text| text.trim().chars().count())
            .unwrap_or(0);
        if len > max_len {
            Err(format!(
                "notes cannot exceed {} characters (got {})",
                max_len, len
            ))
        } else {
            Ok(())
        }
    })
}
