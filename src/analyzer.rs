//! Form Structure Analysis - Input Schema from a Template
//!
//! Works from a template's annotations alone. Each distinct data path becomes
//! one labelled input, grouped into ordered sections, and a nested data
//! skeleton is built for callers to fill in before mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use crate::catalog::{FieldCatalog, InputType};
use crate::paths::DataPath;
use crate::templates::{Annotation, FieldType, Template};

/// Section for paths the catalog does not describe.
pub const OTHER_SECTION: &str = "Other Information";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRequirement {
    pub path: String,
    pub label: String,
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub title: String,
    pub fields: Vec<FieldRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStructure {
    pub sections: Vec<FormSection>,
    pub data_skeleton: Value,
}

pub struct FormStructureAnalyzer {
    catalog: FieldCatalog,
}

impl FormStructureAnalyzer {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn analyze(&self, template: &Template) -> FormStructure {
        let requirements = self.requirements(template);
        let data_skeleton = self.skeleton(&requirements);
        let sections = self.group(requirements);
        tracing::debug!(
            template_id = %template.template_id,
            sections = sections.len(),
            "analyzed template"
        );
        FormStructure { sections, data_skeleton }
    }

    /// One requirement per distinct data path, first annotation wins.
    fn requirements(&self, template: &Template) -> Vec<FieldRequirement> {
        let mut seen = HashSet::new();
        let mut requirements = Vec::new();
        for annotation in &template.annotations {
            if annotation.data_path.is_empty() || !seen.insert(annotation.data_path.as_str()) {
                continue;
            }
            requirements.push(self.requirement(annotation));
        }
        requirements
    }

    fn requirement(&self, annotation: &Annotation) -> FieldRequirement {
        let validation = annotation.validation_rules.as_ref();
        let max_length = validation.and_then(|v| v.max_length);
        let required = validation.map_or(false, |v| v.required);
        let pattern = validation.and_then(|v| v.pattern.clone());

        match self.catalog.field(&annotation.data_path) {
            Some(meta) => FieldRequirement {
                path: annotation.data_path.clone(),
                label: meta.label.clone(),
                input_type: meta.input_type,
                required,
                max_length: max_length
                    .or_else(|| annotation.format_rules.as_ref().and_then(|f| f.max_length)),
                pattern,
                placeholder: meta.placeholder.clone(),
                section: meta.section.clone(),
            },
            None => FieldRequirement {
                path: annotation.data_path.clone(),
                label: fallback_label(&annotation.data_path),
                input_type: if annotation.field_type == FieldType::Currency {
                    InputType::Number
                } else {
                    InputType::Text
                },
                required,
                max_length,
                pattern,
                placeholder: None,
                section: OTHER_SECTION.to_string(),
            },
        }
    }

    /// Group by section in catalog order. Sections missing from the order
    /// list are dropped.
    fn group(&self, requirements: Vec<FieldRequirement>) -> Vec<FormSection> {
        let mut by_section: HashMap<String, Vec<FieldRequirement>> = HashMap::new();
        for req in requirements {
            by_section.entry(req.section.clone()).or_default().push(req);
        }

        self.catalog
            .section_order
            .iter()
            .filter_map(|title| {
                let mut fields = by_section.remove(title)?;
                fields.sort_by(|a, b| {
                    a.label
                        .to_lowercase()
                        .cmp(&b.label.to_lowercase())
                        .then_with(|| a.label.cmp(&b.label))
                });
                Some(FormSection { title: title.clone(), fields })
            })
            .collect()
    }

    fn skeleton(&self, requirements: &[FieldRequirement]) -> Value {
        requirements
            .iter()
            .fold(Value::Object(Map::new()), |data, req| {
                let Ok(path) = DataPath::parse(&req.path) else {
                    tracing::warn!(data_path = %req.path, "skipping unparseable path in skeleton");
                    return data;
                };
                let value = self.catalog.sample(&req.path).cloned().unwrap_or_else(|| {
                    if req.input_type == InputType::Number {
                        Value::from(0)
                    } else {
                        Value::String(String::new())
                    }
                });
                path.set(&data, value)
            })
    }
}

/// Last path segment with its first character upper-cased.
fn fallback_label(data_path: &str) -> String {
    let leaf = data_path.rsplit('.').next().unwrap_or(data_path);
    let mut chars = leaf.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Analyze `template` with the given catalog.
pub fn analyze_template(template: &Template, catalog: &FieldCatalog) -> FormStructure {
    FormStructureAnalyzer::new(catalog.clone()).analyze(template)
}
