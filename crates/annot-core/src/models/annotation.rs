//! Annotation type definitions: a named schema plus its pattern set.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

use super::schema::Field;

/// A user-defined annotation type.
///
/// `patterns[0]` is the master pattern that carves candidates out of the
/// source text; `patterns[1..]` align positionally with `fields`. Extra
/// patterns beyond the field count are ignored; fields beyond the pattern
/// count always take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationType {
    /// Display name of the type.
    pub name: String,

    /// Ordered target fields.
    pub fields: Vec<Field>,

    /// Master pattern followed by one pattern per field.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl AnnotationType {
    /// Create a type with no fields or patterns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// The master pattern, or `""` when no patterns are set.
    pub fn master_pattern(&self) -> &str {
        self.patterns.first().map(String::as_str).unwrap_or("")
    }

    /// The field patterns (everything after the master).
    pub fn field_patterns(&self) -> &[String] {
        self.patterns.get(1..).unwrap_or(&[])
    }

    /// Set the pattern at `index` (0 = master, field `j` at `j + 1`),
    /// growing the pattern list with empty slots as needed.
    pub fn set_pattern(&mut self, index: usize, pattern: impl Into<String>) {
        if self.patterns.len() <= index {
            self.patterns.resize(index + 1, String::new());
        }
        self.patterns[index] = pattern.into();
    }

    /// Validate without extracting: the schema must define at least one
    /// field, and every pattern extraction would use must compile. Patterns
    /// beyond the field count are ignored here exactly as they are during
    /// extraction.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.fields.is_empty() {
            return Err(ExtractError::EmptySchema);
        }

        let used = self.patterns.len().min(self.fields.len() + 1);
        for (index, pattern) in self.patterns[..used].iter().enumerate() {
            if pattern.is_empty() {
                continue;
            }
            Regex::new(pattern).map_err(|e| ExtractError::PatternSyntax {
                index,
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Load a definition from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save the definition to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_field_type() -> AnnotationType {
        let mut annotation = AnnotationType::new("pair");
        annotation.fields.push(Field::new("cat"));
        annotation.fields.push(Field::new("tag"));
        annotation
    }

    #[test]
    fn test_master_and_field_patterns_split() {
        let mut annotation = two_field_type();
        annotation.patterns = vec!["M".to_string(), "a".to_string(), "b".to_string()];

        assert_eq!(annotation.master_pattern(), "M");
        assert_eq!(annotation.field_patterns(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_master_pattern_defaults_to_empty() {
        let annotation = two_field_type();
        assert_eq!(annotation.master_pattern(), "");
        assert!(annotation.field_patterns().is_empty());
    }

    #[test]
    fn test_set_pattern_grows_list() {
        let mut annotation = two_field_type();
        annotation.set_pattern(2, "[a-z]+");

        assert_eq!(annotation.patterns, vec!["", "", "[a-z]+"]);
        assert_eq!(annotation.master_pattern(), "");
    }

    #[test]
    fn test_validate_empty_schema() {
        let annotation = AnnotationType::new("empty");
        assert_eq!(annotation.validate(), Err(ExtractError::EmptySchema));
    }

    #[test]
    fn test_validate_reports_pattern_index() {
        let mut annotation = two_field_type();
        annotation.patterns = vec!["ok".to_string(), "[".to_string()];

        match annotation.validate() {
            Err(ExtractError::PatternSyntax { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected pattern syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_ignores_unused_patterns() {
        // Patterns beyond the field count never run, so a broken one there
        // must not fail validation.
        let mut annotation = two_field_type();
        annotation.patterns = vec![
            "M".to_string(),
            "a".to_string(),
            "b".to_string(),
            "[".to_string(),
        ];
        assert!(annotation.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let mut annotation = two_field_type();
        annotation.patterns = vec!["[A-Z]+".to_string(), "\\d+".to_string()];

        let json = serde_json::to_string(&annotation).unwrap();
        let parsed: AnnotationType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, annotation);
    }
}
