//! Template Processing - Data to Filled Fields
//!
//! Validation and mapping are separate passes over the annotations. Mapping
//! runs whatever the validation outcome so draft forms still render, and it
//! always yields one filled field per annotation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::formatting::format_value;
use crate::paths::{self, DataPath, PathError};
use crate::templates::{Annotation, Position, Template};
use crate::validation::{FieldValidator, ValidationResult};
use crate::value::stringify_opt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledField {
    pub field_id: String,
    pub position: Position,
    /// Absent when the data path resolved to nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<Value>,
    pub display_value: String,
    pub formatted: bool,
}

impl FilledField {
    /// Stand-in for an annotation that could not be mapped.
    pub fn placeholder(annotation: &Annotation) -> Self {
        Self {
            field_id: annotation.field_id.clone(),
            position: annotation.position,
            raw_value: Some(Value::Null),
            display_value: String::new(),
            formatted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedForm {
    pub filled_fields: Vec<FilledField>,
    pub validation: ValidationResult,
}

/// Resolve, format and package a single annotation.
pub fn map_field(data: &Value, annotation: &Annotation) -> Result<FilledField, PathError> {
    // An empty path is an unbound field, not a fault.
    let raw = match DataPath::parse(&annotation.data_path) {
        Ok(path) => path.resolve(data),
        Err(PathError::Empty) => None,
        Err(e) => return Err(e),
    };
    let display_value = format_value(raw, annotation).into_display();
    let formatted = display_value != stringify_opt(raw);

    Ok(FilledField {
        field_id: annotation.field_id.clone(),
        position: annotation.position,
        raw_value: raw.cloned(),
        display_value,
        formatted,
    })
}

/// Map every annotation, substituting a placeholder for any that fail.
pub fn map_fields(data: &Value, template: &Template) -> Vec<FilledField> {
    template
        .annotations
        .iter()
        .map(|annotation| {
            map_field(data, annotation).unwrap_or_else(|e| {
                tracing::error!(
                    field_id = %annotation.field_id,
                    data_path = %annotation.data_path,
                    error = %e,
                    "failed to map field"
                );
                FilledField::placeholder(annotation)
            })
        })
        .collect()
}

/// Validate every annotation, collecting errors in template order.
pub fn validate_data(data: &Value, template: &Template) -> ValidationResult {
    let validator = FieldValidator::new();
    let errors = template
        .annotations
        .iter()
        .filter_map(|annotation| {
            let value = paths::resolve(data, &annotation.data_path);
            validator.validate(value, annotation)
        })
        .collect();
    ValidationResult::from_errors(errors)
}

/// Validate and map `data` against `template`.
pub fn map_and_validate(data: &Value, template: &Template) -> ProcessedForm {
    let validation = validate_data(data, template);
    let filled_fields = map_fields(data, template);
    tracing::debug!(
        template_id = %template.template_id,
        fields = filled_fields.len(),
        errors = validation.errors.len(),
        "processed form data"
    );
    ProcessedForm { filled_fields, validation }
}
