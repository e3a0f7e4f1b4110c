//! FormFill Core - Template-Driven Form Filling Engine
//!
//! # Guarantees
//! 1. One filled field per annotation, in template order
//! 2. Missing data is never an error
//! 3. Formatting degrades to the raw value, never fails
//! 4. Validation reports at most one error per field
//! 5. Lookup tables are configuration, not globals

pub mod value;
pub mod paths;
pub mod formatting;
pub mod validation;
pub mod templates;
pub mod mapping;
pub mod catalog;
pub mod analyzer;
pub mod pipeline;

pub use templates::{Annotation, FieldType, Position, Template, TemplateId, TemplateRegistry};
pub use paths::{resolve, set_value, DataPath, PathError};
pub use formatting::{format_value, Formatted};
pub use validation::{validate_field, FieldValidator, ValidationError, ValidationResult};
pub use mapping::{map_and_validate, FilledField, ProcessedForm};
pub use catalog::{CatalogError, FieldCatalog, FieldMetadata, InputType};
pub use analyzer::{analyze_template, FieldRequirement, FormSection, FormStructure, FormStructureAnalyzer};
pub use pipeline::{FilledForm, FormPipeline, PipelineError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
