//! Truck onboarding wizard.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::api::Entity;
use super::{choice, flag, optional_text, required_number, required_text, DraftError};
use crate::wizard::{
    FieldKind, FieldMap, FieldSchema, FieldValue, StepSchema, Validator, WizardFlow, WizardMode,
    WizardSchema,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Diesel,
    Petrol,
    Electric,
    Cng,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Diesel,
        FuelType::Petrol,
        FuelType::Electric,
        FuelType::Cng,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FuelType::Diesel => "Diesel",
            FuelType::Petrol => "Petrol",
            FuelType::Electric => "Electric",
            FuelType::Cng => "CNG",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|fuel| fuel.label().eq_ignore_ascii_case(raw))
    }
}

/// Truck as collected by the onboarding wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckDraft {
    pub registration: String,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub fuel_type: FuelType,
    pub capacity_tonnes: f64,
    pub axle_count: u8,
    pub depot: String,
    pub driver: Option<String>,
    pub active: bool,
}

impl TruckDraft {
    /// Field record used to pre-populate an edit wizard.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("registration".into(), self.registration.as_str().into());
        fields.insert("make".into(), self.make.as_str().into());
        fields.insert("model".into(), self.model.as_str().into());
        fields.insert("year".into(), FieldValue::from(i64::from(self.year)));
        fields.insert("fuel_type".into(), self.fuel_type.label().into());
        fields.insert("capacity_tonnes".into(), self.capacity_tonnes.into());
        fields.insert("axle_count".into(), FieldValue::from(i64::from(self.axle_count)));
        fields.insert("depot".into(), self.depot.as_str().into());
        if let Some(driver) = &self.driver {
            fields.insert("driver".into(), driver.as_str().into());
        }
        fields.insert("active".into(), self.active.into());
        fields
    }
}

impl Entity for TruckDraft {
    const KIND: &'static str = "truck";

    fn unique_key(&self) -> Option<String> {
        Some(normalize_registration(&self.registration))
    }
}

pub struct TruckOnboardingWizard {
    schema: WizardSchema,
    defaults: FieldMap,
    mode: WizardMode,
}

impl TruckOnboardingWizard {
    /// `existing` holds registrations already in the fleet; they are rejected
    /// case-insensitively.
    pub fn new_create(existing: HashSet<String>) -> Self {
        let mut defaults = FieldMap::new();
        defaults.insert("fuel_type".into(), FuelType::Diesel.label().into());
        defaults.insert("active".into(), true.into());
        Self::build(existing, defaults, WizardMode::Create, None)
    }

    pub fn new_edit(existing: HashSet<String>, id: Uuid, current: &TruckDraft) -> Self {
        Self::build(
            existing,
            current.to_fields(),
            WizardMode::Edit { id },
            Some(&current.registration),
        )
    }

    fn build(
        existing: HashSet<String>,
        defaults: FieldMap,
        mode: WizardMode,
        own_registration: Option<&str>,
    ) -> Self {
        let mut taken: HashSet<String> =
            existing.iter().map(|value| normalize_registration(value)).collect();
        if let Some(own) = own_registration {
            taken.remove(&normalize_registration(own));
        }

        let identity = StepSchema::new(
            "Identity",
            vec![
                FieldSchema::new("registration", "Registration", FieldKind::Text)
                    .with_validator(make_registration_validator(taken))
                    .with_help("Plate number as printed on the vehicle."),
                FieldSchema::new("make", "Make", FieldKind::Text),
                FieldSchema::new("model", "Model", FieldKind::Text),
                FieldSchema::new("year", "Model year", FieldKind::Number).with_validator(
                    Validator::Range {
                        min: 1980.0,
                        max: 2100.0,
                    },
                ),
            ],
        );

        let specifications = StepSchema::new(
            "Specifications",
            vec![
                FieldSchema::new(
                    "fuel_type",
                    "Fuel type",
                    FieldKind::Choice(FuelType::ALL.iter().map(|f| f.label().to_string()).collect()),
                ),
                FieldSchema::new("capacity_tonnes", "Capacity (t)", FieldKind::Number)
                    .with_validator(Validator::PositiveNumber),
                FieldSchema::new("axle_count", "Axles", FieldKind::Number)
                    .with_validator(Validator::Range { min: 2.0, max: 10.0 }),
            ],
        );

        let assignment = StepSchema::new(
            "Assignment",
            vec![
                FieldSchema::new("depot", "Home depot", FieldKind::Text),
                FieldSchema::new("driver", "Assigned driver", FieldKind::Text).with_optional(),
                FieldSchema::new("active", "Active", FieldKind::Boolean).with_optional(),
            ],
        );

        Self {
            schema: WizardSchema::new("truck", vec![identity, specifications, assignment]),
            defaults,
            mode,
        }
    }
}

impl WizardFlow for TruckOnboardingWizard {
    type Output = TruckDraft;
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
        Ok(TruckDraft {
            registration: required_text(fields, "registration")?.to_ascii_uppercase(),
            make: required_text(fields, "make")?,
            model: required_text(fields, "model")?,
            year: required_number(fields, "year")?.round() as u16,
            fuel_type: choice(fields, "fuel_type", FuelType::parse)?,
            capacity_tonnes: required_number(fields, "capacity_tonnes")?,
            axle_count: required_number(fields, "axle_count")?.round() as u8,
            depot: required_text(fields, "depot")?,
            driver: optional_text(fields, "driver"),
            active: flag(fields, "active", true),
        })
    }
}

fn normalize_registration(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .collect::<String>()
        .to_ascii_uppercase()
}

fn make_registration_validator(taken: HashSet<String>) -> Validator {
    Validator::custom(move |value| {
        let raw = value.as_text().unwrap_or_default();
        let normalized = normalize_registration(raw);
        if normalized.len() < 2 {
            Err("registration is too short".into())
        } else if taken.contains(&normalized) {
            Err(format!("registration already exists: `{}`", raw.trim()))
        } else {
            Ok(())
        }
    })
}
