//! Validation System - Per-Field Rules
//!
//! Each rule inspects one raw value and yields at most one error.
//! The validator runs the rules in a fixed order and stops at the first
//! failure, so a field reports a single error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::templates::{Annotation, ValidationRules};
use crate::value::{is_blank, is_truthy, number_to_string, parse_float, stringify};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field_id: String,
    pub error: String,
    pub data_path: String,
}

impl ValidationError {
    fn new(annotation: &Annotation, error: String) -> Self {
        Self {
            field_id: annotation.field_id.clone(),
            error,
            data_path: annotation.data_path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self { valid: true, errors: vec![] }
    }

    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self { valid: false, errors }
    }

    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            Self::success()
        } else {
            Self::failure(errors)
        }
    }
}

/// Field rule trait - produces an error message when the value is rejected
pub trait FieldRule {
    fn name(&self) -> &'static str;
    fn check(&self, value: Option<&Value>, annotation: &Annotation, rules: &ValidationRules) -> Option<String>;
}

// --- Concrete Rules ---

pub struct RequiredRule;

impl FieldRule for RequiredRule {
    fn name(&self) -> &'static str { "required" }

    fn check(&self, value: Option<&Value>, _annotation: &Annotation, rules: &ValidationRules) -> Option<String> {
        if rules.required && is_blank(value) {
            Some("Required field is missing".to_string())
        } else {
            None
        }
    }
}

pub struct PatternRule;

impl FieldRule for PatternRule {
    fn name(&self) -> &'static str { "pattern" }

    fn check(&self, value: Option<&Value>, annotation: &Annotation, rules: &ValidationRules) -> Option<String> {
        let pattern = rules.pattern.as_deref()?;
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                tracing::warn!(
                    field_id = %annotation.field_id,
                    %pattern,
                    error = %e,
                    "invalid validation pattern, rule skipped"
                );
                return None;
            }
        };
        let text = value.map(stringify).unwrap_or_default();
        if regex.is_match(&text) {
            None
        } else {
            Some(format!("Value does not match required pattern: {}", pattern))
        }
    }
}

pub struct LengthRule;

impl FieldRule for LengthRule {
    fn name(&self) -> &'static str { "length" }

    fn check(&self, value: Option<&Value>, _annotation: &Annotation, rules: &ValidationRules) -> Option<String> {
        let len = value.map(stringify).unwrap_or_default().chars().count();
        match (rules.min_length, rules.max_length) {
            (Some(min), _) if min > 0 && len < min => {
                Some(format!("Value must be at least {} characters", min))
            }
            (_, Some(max)) if max > 0 && len > max => {
                Some(format!("Value cannot exceed {} characters", max))
            }
            _ => None,
        }
    }
}

/// Numeric bounds; only applies to number and currency fields whose value
/// reads as a number.
pub struct RangeRule;

impl FieldRule for RangeRule {
    fn name(&self) -> &'static str { "range" }

    fn check(&self, value: Option<&Value>, annotation: &Annotation, rules: &ValidationRules) -> Option<String> {
        if !annotation.field_type.is_numeric() {
            return None;
        }
        let n = parse_float(value?)?;
        match (rules.min, rules.max) {
            (Some(min), _) if n < min => {
                Some(format!("Value must be at least {}", number_to_string(min)))
            }
            (_, Some(max)) if n > max => {
                Some(format!("Value cannot exceed {}", number_to_string(max)))
            }
            _ => None,
        }
    }
}

/// Validator runs the field rules in order and reports the first failure.
/// The required check always runs first, then the optional-empty cut-off.
pub struct FieldValidator {
    rules: Vec<Box<dyn FieldRule + Send + Sync>>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(PatternRule),
                Box::new(LengthRule),
                Box::new(RangeRule),
            ],
        }
    }

    pub fn validate(&self, value: Option<&Value>, annotation: &Annotation) -> Option<ValidationError> {
        let rules = annotation.validation_rules.as_ref()?;
        if let Some(message) = RequiredRule.check(value, annotation, rules) {
            return Some(ValidationError::new(annotation, message));
        }
        // Empty optional values skip every other rule.
        if !rules.required && !value.map_or(false, is_truthy) {
            return None;
        }

        self.rules.iter().find_map(|rule| {
            rule.check(value, annotation, rules).map(|message| {
                tracing::debug!(field_id = %annotation.field_id, rule = rule.name(), "field rejected");
                ValidationError::new(annotation, message)
            })
        })
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate one raw value against an annotation's rules.
pub fn validate_field(value: Option<&Value>, annotation: &Annotation) -> Option<ValidationError> {
    FieldValidator::new().validate(value, annotation)
}
