//! FormFill CLI - JSON bridge to the fill engine
//!
//! Commands: templates, fill, analyze
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when a filled form is invalid

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use formfill_core::{FieldCatalog, FormPipeline, TemplateRegistry};

#[derive(Parser)]
#[command(name = "formfill-cli")]
#[command(about = "FormFill CLI - Template-driven form filling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to templates directory
    #[arg(short, long, default_value = "templates", env = "FORMFILL_TEMPLATES_DIR")]
    templates_dir: PathBuf,

    /// Field catalog JSON (bundled US individual catalog when unset)
    #[arg(short, long, env = "FORMFILL_CATALOG")]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    Templates {
        /// Only templates of this form type
        #[arg(short, long)]
        form_type: Option<String>,
    },

    /// Fill a template with taxpayer data
    Fill {
        /// Template ID
        #[arg(short, long)]
        template: String,

        /// JSON payload (taxpayer data)
        #[arg(short, long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
        payload: Option<String>,

        /// File containing the JSON payload
        #[arg(long)]
        payload_file: Option<PathBuf>,
    },

    /// Derive the input schema and data skeleton for a template
    Analyze {
        /// Template ID
        #[arg(short, long)]
        template: String,
    },
}

fn print_json<T: Serialize>(value: &T, code: ExitCode) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            code
        }
        Err(e) => fail(format!("Failed to serialize output: {}", e)),
    }
}

fn fail(message: String) -> ExitCode {
    println!("{}", serde_json::json!({ "success": false, "error": message }));
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let registry = match TemplateRegistry::load_from_dir(&cli.templates_dir) {
        Ok(r) => r,
        Err(e) => return fail(format!("Failed to load templates: {}", e)),
    };

    let catalog = match &cli.catalog {
        Some(path) => match FieldCatalog::load(path) {
            Ok(c) => c,
            Err(e) => return fail(e.to_string()),
        },
        None => FieldCatalog::us_individual(),
    };

    let pipeline = FormPipeline::new(registry, catalog);

    match cli.command {
        Commands::Templates { form_type } => {
            let templates = match &form_type {
                Some(t) => pipeline.templates_by_type(t),
                None => pipeline.list_templates(),
            };
            let summary: Vec<_> = templates
                .iter()
                .map(|t| serde_json::json!({
                    "template_id": t.template_id,
                    "form_type": t.form_type,
                    "form_name": t.form_name,
                    "tax_year": t.tax_year,
                    "version": t.version,
                    "fields": t.annotations.len(),
                }))
                .collect();
            print_json(&summary, ExitCode::SUCCESS)
        }

        Commands::Fill { template, payload, payload_file } => {
            let payload = match (payload, payload_file) {
                (Some(p), _) => p,
                (None, Some(path)) => match fs::read_to_string(&path) {
                    Ok(text) => text,
                    Err(e) => return fail(format!("Failed to read {}: {}", path.display(), e)),
                },
                (None, None) => return fail("No payload given".to_string()),
            };

            match pipeline.fill_form_json(&template, &payload) {
                Ok(form) => {
                    let code = if form.validation_errors.is_empty() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2) // Filled, but invalid
                    };
                    print_json(&serde_json::json!({ "success": true, "data": form }), code)
                }
                Err(e) => fail(e.to_string()),
            }
        }

        Commands::Analyze { template } => match pipeline.analyze(&template) {
            Ok(structure) => print_json(
                &serde_json::json!({ "success": true, "data": structure }),
                ExitCode::SUCCESS,
            ),
            Err(e) => fail(e.to_string()),
        },
    }
}
