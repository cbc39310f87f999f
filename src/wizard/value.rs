use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Current value of a single wizard field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// Every field collected so far, keyed by field name.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Field name to human-readable message. Presence means invalid.
pub type FieldErrors = BTreeMap<String, String>;

impl FieldValue {
    /// Whitespace-only text and empty lists count as "not filled in".
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Numbers, or text that parses as one (input widgets hand over strings).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) if value.is_finite() => Some(*value),
            FieldValue::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            FieldValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Some(true),
                "n" | "no" | "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::List(_) => "list",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{}", if *value { "yes" } else { "no" }),
            FieldValue::Number(value) if value.fract() == 0.0 => write!(f, "{:.0}", value),
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(FieldValue::List(Vec::new()).is_blank());
        assert!(FieldValue::from(vec!["", " "]).is_blank());
        assert!(!FieldValue::from(0.0).is_blank());
        assert!(!FieldValue::from(false).is_blank());
        assert!(!FieldValue::from("Acme").is_blank());
    }

    #[test]
    fn numeric_text_is_accepted_as_number() {
        assert_eq!(FieldValue::from(" 42.5 ").as_number(), Some(42.5));
        assert_eq!(FieldValue::from("forty").as_number(), None);
        assert_eq!(FieldValue::from(f64::NAN).as_number(), None);
    }

    #[test]
    fn deserializes_untagged_json() {
        let map: FieldMap = serde_json::from_str(
            r#"{"name":"Acme","year":2020,"active":true,"tasks":["oil","filters"]}"#,
        )
        .unwrap();
        assert_eq!(map["name"], FieldValue::from("Acme"));
        assert_eq!(map["year"], FieldValue::from(2020.0));
        assert_eq!(map["active"], FieldValue::from(true));
        assert_eq!(map["tasks"], FieldValue::from(vec!["oil", "filters"]));
    }

    #[test]
    fn kind_names_follow_the_variant() {
        assert_eq!(FieldValue::from("Acme").kind_name(), "text");
        assert_eq!(FieldValue::from(12.0).kind_name(), "number");
        assert_eq!(FieldValue::from(false).kind_name(), "boolean");
        assert_eq!(FieldValue::from(vec!["oil"]).kind_name(), "list");
    }

    #[test]
    fn display_formats_whole_numbers_without_fraction() {
        assert_eq!(FieldValue::from(3.0).to_string(), "3");
        assert_eq!(FieldValue::from(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::from(true).to_string(), "yes");
    }
}
