//! Field Catalog - Static Labels, Sections and Samples
//!
//! Describes a form family to the analyzer: a human label, input type and
//! section for each known data path, the order sections are presented in,
//! and sample values used to seed input skeletons.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

const US_INDIVIDUAL: &str = include_str!("../catalogs/us_individual.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Number,
    Email,
    Ssn,
    State,
    Zip,
    Checkbox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub label: String,
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldCatalog {
    #[serde(default)]
    pub fields: HashMap<String, FieldMetadata>,
    #[serde(default)]
    pub section_order: Vec<String>,
    #[serde(default)]
    pub sample_data: HashMap<String, Value>,
}

impl FieldCatalog {
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Bundled catalog for US individual income tax forms (1040, W-2).
    pub fn us_individual() -> Self {
        match Self::from_json(US_INDIVIDUAL) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "bundled catalog is invalid");
                Self::default()
            }
        }
    }

    pub fn field(&self, path: &str) -> Option<&FieldMetadata> {
        self.fields.get(path)
    }

    pub fn sample(&self, path: &str) -> Option<&Value> {
        self.sample_data.get(path)
    }
}
