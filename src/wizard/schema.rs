//! Data-driven description of a wizard: ordered steps, the fields each step
//! owns, and the validators that decide whether a step is satisfied.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use super::value::{FieldErrors, FieldMap, FieldValue};

/// Supported data kinds for wizard fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Accepts any value; only presence is checked.
    Any,
    Text,
    Number,
    Boolean,
    List,
    Date,
    Choice(Vec<String>),
}

type ValueCheck = dyn Fn(&FieldValue) -> Result<(), String> + Send + Sync;
type StepCheck = dyn Fn(&FieldMap) -> Result<(), FieldErrors> + Send + Sync;

/// Built-in validation helpers, applied after the kind check passes.
#[derive(Clone)]
pub enum Validator {
    None,
    NonEmpty,
    PositiveNumber,
    NonNegativeNumber,
    Range { min: f64, max: f64 },
    Date,
    OneOf(Vec<String>),
    Custom(Arc<ValueCheck>),
}

impl Validator {
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<(), String> + Send + Sync + 'static,
    {
        Validator::Custom(Arc::new(check))
    }

    fn validate(&self, key: &str, value: &FieldValue) -> Result<(), String> {
        match self {
            Validator::None => Ok(()),
            Validator::NonEmpty => {
                if value.is_blank() {
                    Err(format!("{} cannot be empty", key))
                } else {
                    Ok(())
                }
            }
            Validator::PositiveNumber => match value.as_number() {
                Some(v) if v > 0.0 => Ok(()),
                Some(_) => Err(format!("{} must be greater than zero", key)),
                None => Err(format!("{} must be a number", key)),
            },
            Validator::NonNegativeNumber => match value.as_number() {
                Some(v) if v >= 0.0 => Ok(()),
                Some(_) => Err(format!("{} must be zero or positive", key)),
                None => Err(format!("{} must be a number", key)),
            },
            Validator::Range { min, max } => match value.as_number() {
                Some(v) if v >= *min && v <= *max => Ok(()),
                Some(_) => Err(format!("{} must be between {} and {}", key, min, max)),
                None => Err(format!("{} must be a number", key)),
            },
            Validator::Date => match value.as_text().and_then(parse_date) {
                Some(_) => Ok(()),
                None => Err(format!("{} must be a date (YYYY-MM-DD)", key)),
            },
            Validator::OneOf(options) => check_choice(key, value, options),
            Validator::Custom(check) => check(value),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::None => f.write_str("None"),
            Validator::NonEmpty => f.write_str("NonEmpty"),
            Validator::PositiveNumber => f.write_str("PositiveNumber"),
            Validator::NonNegativeNumber => f.write_str("NonNegativeNumber"),
            Validator::Range { min, max } => write!(f, "Range({}..={})", min, max),
            Validator::Date => f.write_str("Date"),
            Validator::OneOf(options) => write!(f, "OneOf({:?})", options),
            Validator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Declarative description of a single wizard field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub validator: Validator,
}

impl FieldSchema {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            validator: Validator::None,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Checks a single field against the record. `Ok` covers both "valid" and
    /// "optional and left empty".
    pub fn check(&self, fields: &FieldMap) -> Result<(), String> {
        let value = match fields.get(self.key) {
            Some(value) if !value.is_blank() => value,
            _ if self.required => return Err(format!("{} is required", self.key)),
            _ => return Ok(()),
        };
        self.check_kind(value)?;
        self.validator.validate(self.key, value)
    }

    fn check_kind(&self, value: &FieldValue) -> Result<(), String> {
        let key = self.key;
        match &self.kind {
            FieldKind::Any => Ok(()),
            FieldKind::Text => match value {
                FieldValue::Text(_) => Ok(()),
                _ => Err(format!("{} must be text", key)),
            },
            FieldKind::Number => value
                .as_number()
                .map(|_| ())
                .ok_or_else(|| format!("{} must be a number", key)),
            FieldKind::Boolean => value
                .as_bool()
                .map(|_| ())
                .ok_or_else(|| format!("{} must be true or false", key)),
            FieldKind::List => value
                .as_list()
                .map(|_| ())
                .ok_or_else(|| format!("{} must be a list", key)),
            FieldKind::Date => value
                .as_text()
                .and_then(parse_date)
                .map(|_| ())
                .ok_or_else(|| format!("{} must be a date (YYYY-MM-DD)", key)),
            FieldKind::Choice(options) => check_choice(key, value, options),
        }
    }
}

/// One page of the wizard: the fields it collects plus cross-field checks.
#[derive(Clone)]
pub struct StepSchema {
    pub title: &'static str,
    pub fields: Vec<FieldSchema>,
    checks: Vec<Arc<StepCheck>>,
}

impl StepSchema {
    pub fn new(title: &'static str, fields: Vec<FieldSchema>) -> Self {
        Self {
            title,
            fields,
            checks: Vec::new(),
        }
    }

    /// Step whose validator is just a list of required field names.
    pub fn required(title: &'static str, keys: &[&'static str]) -> Self {
        let fields = keys
            .iter()
            .map(|key| FieldSchema::new(*key, *key, FieldKind::Any))
            .collect();
        Self::new(title, fields)
    }

    /// Adds a cross-field check that reports its own per-field messages.
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&FieldMap) -> Result<(), FieldErrors> + Send + Sync + 'static,
    {
        self.checks.push(Arc::new(check));
        self
    }

    /// Adds a plain boolean predicate; a failure is reported against `key`.
    pub fn with_predicate<F>(self, key: &'static str, message: &'static str, predicate: F) -> Self
    where
        F: Fn(&FieldMap) -> bool + Send + Sync + 'static,
    {
        self.with_check(move |fields| {
            if predicate(fields) {
                Ok(())
            } else {
                Err(FieldErrors::from([(key.to_string(), message.to_string())]))
            }
        })
    }

    /// Runs every field and step check, returning all messages. The first
    /// message recorded for a field wins.
    pub fn evaluate(&self, fields: &FieldMap) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            if let Err(message) = field.check(fields) {
                errors.insert(field.key.to_string(), message);
            }
        }
        for check in &self.checks {
            if let Err(found) = check(fields) {
                for (key, message) in found {
                    errors.entry(key).or_insert(message);
                }
            }
        }
        errors
    }
}

impl fmt::Debug for StepSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSchema")
            .field("title", &self.title)
            .field("fields", &self.fields)
            .field("checks", &self.checks.len())
            .finish()
    }
}

/// Metadata describing a full wizard, including step order.
#[derive(Debug, Clone)]
pub struct WizardSchema {
    pub name: &'static str,
    pub steps: Vec<StepSchema>,
}

impl WizardSchema {
    pub fn new(name: &'static str, steps: Vec<StepSchema>) -> Self {
        Self { name, steps }
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Step by 1-based number.
    pub fn step(&self, number: usize) -> Option<&StepSchema> {
        number.checked_sub(1).and_then(|index| self.steps.get(index))
    }

    pub fn field(&self, key: &str) -> Option<&FieldSchema> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|field| field.key == key)
    }
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn check_choice(key: &str, value: &FieldValue, options: &[String]) -> Result<(), String> {
    let matches = value
        .as_text()
        .map(|text| {
            let normalized = text.trim().to_lowercase();
            options
                .iter()
                .any(|candidate| candidate.to_lowercase() == normalized)
        })
        .unwrap_or(false);
    if matches {
        Ok(())
    } else {
        Err(format!("{} must be one of: {}", key, options.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, FieldValue)]) -> FieldMap {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn required_field_reports_missing() {
        let field = FieldSchema::new("name", "Name", FieldKind::Text);
        assert_eq!(
            field.check(&FieldMap::new()),
            Err("name is required".to_string())
        );
        assert_eq!(
            field.check(&record(&[("name", "  ".into())])),
            Err("name is required".to_string())
        );
        assert!(field.check(&record(&[("name", "Acme".into())])).is_ok());
    }

    #[test]
    fn optional_field_may_be_left_empty() {
        let field = FieldSchema::new("notes", "Notes", FieldKind::Text).with_optional();
        assert!(field.check(&FieldMap::new()).is_ok());
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let field = FieldSchema::new("year", "Year", FieldKind::Number);
        assert_eq!(
            field.check(&record(&[("year", "soon".into())])),
            Err("year must be a number".to_string())
        );
        assert!(field.check(&record(&[("year", "2021".into())])).is_ok());

        let date = FieldSchema::new("start", "Start", FieldKind::Date);
        assert!(date.check(&record(&[("start", "2025-13-01".into())])).is_err());
        assert!(date.check(&record(&[("start", "2025-02-01".into())])).is_ok());
    }

    #[test]
    fn validators_run_after_kind_check() {
        let field = FieldSchema::new("qty", "Quantity", FieldKind::Number)
            .with_validator(Validator::PositiveNumber);
        assert_eq!(
            field.check(&record(&[("qty", 0.0.into())])),
            Err("qty must be greater than zero".to_string())
        );

        let ranged = FieldSchema::new("axles", "Axles", FieldKind::Number)
            .with_validator(Validator::Range { min: 2.0, max: 10.0 });
        assert!(ranged.check(&record(&[("axles", 12.0.into())])).is_err());
        assert!(ranged.check(&record(&[("axles", 3.0.into())])).is_ok());
    }

    #[test]
    fn choice_is_case_insensitive() {
        let field = FieldSchema::new(
            "fuel",
            "Fuel",
            FieldKind::Choice(vec!["Diesel".into(), "Electric".into()]),
        );
        assert!(field.check(&record(&[("fuel", "diesel".into())])).is_ok());
        assert_eq!(
            field.check(&record(&[("fuel", "steam".into())])),
            Err("fuel must be one of: Diesel, Electric".to_string())
        );
    }

    #[test]
    fn predicate_failure_is_attributed_to_named_field() {
        let step = StepSchema::new("Interval", Vec::new()).with_predicate(
            "interval_km",
            "set a distance or a day interval",
            |fields| fields.contains_key("interval_km") || fields.contains_key("interval_days"),
        );
        let errors = step.evaluate(&FieldMap::new());
        assert_eq!(
            errors.get("interval_km").map(String::as_str),
            Some("set a distance or a day interval")
        );
        assert!(step
            .evaluate(&record(&[("interval_days", 30.0.into())]))
            .is_empty());
    }

    #[test]
    fn field_error_wins_over_step_check() {
        let step = StepSchema::required("Basics", &["name"])
            .with_predicate("name", "name is taken", |_| false);
        let errors = step.evaluate(&FieldMap::new());
        assert_eq!(errors["name"], "name is required");
    }

    #[test]
    fn schema_looks_up_steps_by_number() {
        let schema = WizardSchema::new(
            "demo",
            vec![
                StepSchema::required("One", &["a"]),
                StepSchema::required("Two", &["b"]),
            ],
        );
        assert_eq!(schema.total_steps(), 2);
        assert_eq!(schema.step(1).map(|s| s.title), Some("One"));
        assert!(schema.step(0).is_none());
        assert!(schema.step(3).is_none());
        assert_eq!(schema.field("b").map(|f| f.key), Some("b"));
    }
}
