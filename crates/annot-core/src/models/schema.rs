//! Field descriptors and the ordered schema they form.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AnnotError;

lazy_static! {
    // Inline field descriptor: `name`, `name:type`, or `name:type=default`.
    static ref FIELD_SPEC: Regex =
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(?::([A-Za-z]+))?(?:=(.*))?$").unwrap();
}

/// Declared value type of a field.
///
/// The engine never interprets this; every record value stays a string and
/// typed conversion is the consumer's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free-form text.
    #[default]
    Text,
    /// Numeric value.
    Number,
    /// Boolean flag.
    Flag,
}

impl std::str::FromStr for FieldType {
    type Err = AnnotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldType::Text),
            "number" => Ok(FieldType::Number),
            "flag" => Ok(FieldType::Flag),
            other => Err(AnnotError::Config(format!("unknown field type: {other}"))),
        }
    }
}

/// One target field of an annotation type.
///
/// Schema order is significant: field patterns align positionally with the
/// fields they fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within a schema.
    pub name: String,

    /// Declared value type (uninterpreted by the engine).
    #[serde(default)]
    pub field_type: FieldType,

    /// Value used when the field's pattern is empty or produced no aligned
    /// match for a record row.
    #[serde(default)]
    pub default: String,
}

impl Field {
    /// Create a text field with an empty default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::default(),
            default: String::new(),
        }
    }

    /// Set the declared value type.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Parse an inline descriptor: `name`, `name:type`, or `name:type=default`.
    pub fn parse(spec: &str) -> Result<Self, AnnotError> {
        let caps = FIELD_SPEC
            .captures(spec.trim())
            .ok_or_else(|| AnnotError::Config(format!("invalid field descriptor: {spec}")))?;

        let mut field = Field::new(&caps[1]);
        if let Some(ty) = caps.get(2) {
            field.field_type = ty.as_str().parse()?;
        }
        if let Some(default) = caps.get(3) {
            field.default = default.as_str().to_string();
        }
        Ok(field)
    }
}
