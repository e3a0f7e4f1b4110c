//! Fill Pipeline - Template Id In, Filled Form Record Out
//!
//! Looks templates up by id and wraps the engine's output in a record the
//! caller can store. Validation never blocks filling: invalid data yields a
//! draft record carrying its errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::analyzer::{FormStructure, FormStructureAnalyzer};
use crate::catalog::FieldCatalog;
use crate::mapping::{map_and_validate, FilledField};
use crate::templates::{Template, TemplateRegistry};
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Form template not found: {0}")]
    TemplateNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Draft,
    Completed,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Invalid,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilledForm {
    pub filled_form_id: String,
    pub template_id: String,
    pub taxpayer_data: Value,
    pub filled_data: Vec<FilledField>,
    pub status: FormStatus,
    pub validation_status: ValidationStatus,
    pub validation_errors: Vec<ValidationError>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// The fill pipeline - template lookup plus the mapping and analysis engines
pub struct FormPipeline {
    registry: TemplateRegistry,
    analyzer: FormStructureAnalyzer,
}

impl FormPipeline {
    pub fn new(registry: TemplateRegistry, catalog: FieldCatalog) -> Self {
        Self {
            registry,
            analyzer: FormStructureAnalyzer::new(catalog),
        }
    }

    /// List all available templates
    pub fn list_templates(&self) -> Vec<&Template> {
        self.registry.list()
    }

    pub fn templates_by_type(&self, form_type: &str) -> Vec<&Template> {
        self.registry.by_form_type(form_type)
    }

    /// Get a specific template
    pub fn get_template(&self, id: &str) -> Result<&Template, PipelineError> {
        self.registry
            .get(id)
            .ok_or_else(|| PipelineError::TemplateNotFound(id.to_string()))
    }

    /// Map and validate `data` against a template, producing a new record.
    pub fn fill_form(&self, template_id: &str, data: Value) -> Result<FilledForm, PipelineError> {
        let template = self.get_template(template_id)?;
        let processed = map_and_validate(&data, template);
        let valid = processed.validation.valid;
        let created_at = Utc::now();

        tracing::info!(
            template_id,
            valid,
            errors = processed.validation.errors.len(),
            "filled form"
        );

        Ok(FilledForm {
            filled_form_id: Uuid::new_v4().to_string(),
            template_id: template.template_id.clone(),
            taxpayer_data: data,
            filled_data: processed.filled_fields,
            status: if valid { FormStatus::Completed } else { FormStatus::Draft },
            validation_status: if valid {
                ValidationStatus::Valid
            } else {
                ValidationStatus::Invalid
            },
            validation_errors: processed.validation.errors,
            created_at,
            completed_at: valid.then_some(created_at),
        })
    }

    /// Parse a JSON payload and fill the template with it.
    pub fn fill_form_json(&self, template_id: &str, payload: &str) -> Result<FilledForm, PipelineError> {
        let data: Value = serde_json::from_str(payload)?;
        self.fill_form(template_id, data)
    }

    /// Derive the input schema and data skeleton for a template.
    pub fn analyze(&self, template_id: &str) -> Result<FormStructure, PipelineError> {
        let template = self.get_template(template_id)?;
        Ok(self.analyzer.analyze(template))
    }
}

impl Default for FormPipeline {
    fn default() -> Self {
        Self::new(TemplateRegistry::default(), FieldCatalog::us_individual())
    }
}
