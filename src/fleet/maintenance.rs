use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::api::Entity;
use super::{choice, flag, optional_number, required_text, DraftError};
use crate::wizard::schema::parse_date;
use crate::wizard::{
    FieldErrors, FieldKind, FieldMap, FieldSchema, FieldValue, StepSchema, Validator, WizardFlow,
    WizardMode, WizardSchema,
};

const MAX_INTERVAL_KM: f64 = 1_000_000.0;
const MAX_INTERVAL_DAYS: f64 = 3_650.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    OilChange,
    TyreRotation,
    Inspection,
    BrakeService,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::OilChange,
        ServiceType::TyreRotation,
        ServiceType::Inspection,
        ServiceType::BrakeService,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ServiceType::OilChange => "Oil change",
            ServiceType::TyreRotation => "Tyre rotation",
            ServiceType::Inspection => "Inspection",
            ServiceType::BrakeService => "Brake service",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|service| service.label().eq_ignore_ascii_case(raw))
    }
}

/// Recurring service plan for one truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceScheduleDraft {
    pub truck: String,
    pub service_type: ServiceType,
    pub interval_km: Option<u32>,
    pub interval_days: Option<u32>,
    pub start_date: NaiveDate,
    pub tasks: Vec<String>,
    pub notify: bool,
}

impl MaintenanceScheduleDraft {
    /// First due date after the start.
    /// `None` without a day interval or when the date would overflow.
    pub fn next_due(&self) -> Option<NaiveDate> {
        let days = self.interval_days?;
        self.start_date
            .checked_add_signed(Duration::days(i64::from(days)))
    }

    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("truck".into(), self.truck.as_str().into());
        fields.insert("service_type".into(), self.service_type.label().into());
        if let Some(km) = self.interval_km {
            fields.insert("interval_km".into(), FieldValue::from(i64::from(km)));
        }
        if let Some(days) = self.interval_days {
            fields.insert("interval_days".into(), FieldValue::from(i64::from(days)));
        }
        fields.insert("start_date".into(), self.start_date.to_string().into());
        fields.insert("tasks".into(), self.tasks.clone().into());
        fields.insert("notify".into(), self.notify.into());
        fields
    }
}

impl Entity for MaintenanceScheduleDraft {
    const KIND: &'static str = "maintenance schedule";
}

pub struct MaintenanceScheduleWizard {
    schema: WizardSchema,
    defaults: FieldMap,
    mode: WizardMode,
}

impl MaintenanceScheduleWizard {
    pub fn new_create() -> Self {
        let mut defaults = FieldMap::new();
        defaults.insert("notify".into(), true.into());
        Self::build(defaults, WizardMode::Create)
    }

    pub fn new_edit(id: Uuid, current: &MaintenanceScheduleDraft) -> Self {
        Self::build(current.to_fields(), WizardMode::Edit { id })
    }

    fn build(defaults: FieldMap, mode: WizardMode) -> Self {
        let service = StepSchema::new(
            "Service",
            vec![
                FieldSchema::new("truck", "Truck registration", FieldKind::Text),
                FieldSchema::new(
                    "service_type",
                    "Service type",
                    FieldKind::Choice(
                        ServiceType::ALL
                            .iter()
                            .map(|s| s.label().to_string())
                            .collect(),
                    ),
                ),
            ],
        );

        let interval = StepSchema::new(
            "Interval",
            vec![
                FieldSchema::new("interval_km", "Every (km)", FieldKind::Number)
                    .with_optional()
                    .with_validator(Validator::Range {
                        min: 0.0,
                        max: MAX_INTERVAL_KM,
                    }),
                FieldSchema::new("interval_days", "Every (days)", FieldKind::Number)
                    .with_optional()
                    .with_validator(Validator::Range {
                        min: 0.0,
                        max: MAX_INTERVAL_DAYS,
                    }),
                FieldSchema::new("start_date", "Start date", FieldKind::Date),
            ],
        )
        .with_check(check_interval_present);

        let tasks = StepSchema::new(
            "Tasks",
            vec![
                FieldSchema::new("tasks", "Checklist", FieldKind::List)
                    .with_help("One entry per task the mechanic signs off."),
                FieldSchema::new("notify", "Notify depot", FieldKind::Boolean).with_optional(),
            ],
        );

        Self {
            schema: WizardSchema::new("maintenance", vec![service, interval, tasks]),
            defaults,
            mode,
        }
    }
}

fn check_interval_present(fields: &FieldMap) -> Result<(), FieldErrors> {
    let positive = |key: &str| {
        fields
            .get(key)
            .and_then(FieldValue::as_number)
            .map(|value| value > 0.0)
            .unwrap_or(false)
    };
    if positive("interval_km") || positive("interval_days") {
        Ok(())
    } else {
        Err(FieldErrors::from([(
            "interval_km".to_string(),
            "set a distance or a day interval".to_string(),
        )]))
    }
}

impl WizardFlow for MaintenanceScheduleWizard {
    type Output = MaintenanceScheduleDraft;
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
        let whole = |key: &str| {
            optional_number(fields, key)
                .filter(|value| *value > 0.0)
                .map(|value| value.round() as u32)
        };
        let start_date = fields
            .get("start_date")
            .and_then(FieldValue::as_text)
            .and_then(parse_date)
            .ok_or_else(|| DraftError::InvalidField("start_date".into()))?;
        let tasks: Vec<String> = fields
            .get("tasks")
            .and_then(FieldValue::as_list)
            .map(|items| {
                items
                    .iter()
                    .map(|item| item.trim())
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if tasks.is_empty() {
            return Err(DraftError::InvalidField("tasks".into()));
        }

        Ok(MaintenanceScheduleDraft {
            truck: required_text(fields, "truck")?.to_ascii_uppercase(),
            service_type: choice(fields, "service_type", ServiceType::parse)?,
            interval_km: whole("interval_km"),
            interval_days: whole("interval_days"),
            start_date,
            tasks,
            notify: flag(fields, "notify", true),
        })
    }
}
