//! Roadmap Validator CLI
//!
//! Validates roadmap documents against the canonical schema and reports
//! structural errors, integrity errors, and advisory warnings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use roadmap_schemas::config::OutputFormat;
use roadmap_schemas::{
    load_document, render, roadmap_schema, roadmap_schema_source, validate_roadmap_with,
    RoadmapConfig, RoadmapReport, SchemaNode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roadmap-validator")]
#[command(about = "Validate roadmap documents against the canonical schema")]
struct Cli {
    /// Path to a config file (roadmap.toml)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single roadmap document
    File {
        /// Path to a roadmap JSON document
        path: PathBuf,
        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },

    /// Validate every .json document under a directory
    Dir {
        /// Directory to walk for roadmap documents
        path: PathBuf,
        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },

    /// Generate a JSON validation report for a document
    Report {
        /// Path to a roadmap JSON document
        path: PathBuf,
        /// Output file (JSON); prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print metadata about the embedded canonical schema
    Schema,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config =
        RoadmapConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::File { path, strict } => {
            let report = validate_file(&path, &config)?;
            println!("{}", render(&report));

            let strict = strict || config.report.fail_on_warnings;
            if !report.valid || (strict && report.has_warnings()) {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Dir { path, strict } => {
            let strict = strict || config.report.fail_on_warnings;
            let mut all_valid = true;
            let mut checked = 0usize;

            for entry in walkdir::WalkDir::new(&path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| {
                    e.path().extension().map(|x| x == "json").unwrap_or(false)
                })
            {
                let document_path = entry.path();
                checked += 1;

                // A file that cannot be loaded or parsed is an input error,
                // not a validation finding; report it and keep walking
                match validate_file(document_path, &config) {
                    Ok(report) if report.valid && !(strict && report.has_warnings()) => {
                        println!(
                            "  ✅ {} - valid ({} warnings)",
                            document_path.display(),
                            report.warnings.len()
                        );
                    }
                    Ok(report) => {
                        all_valid = false;
                        println!(
                            "  ❌ {} - {} error(s), {} warning(s)",
                            document_path.display(),
                            report.errors.len(),
                            report.warnings.len()
                        );
                    }
                    Err(e) => {
                        all_valid = false;
                        println!("  ❌ {} - {e:#}", document_path.display());
                    }
                }
            }

            println!();
            if checked == 0 {
                println!("No .json documents found under {}", path.display());
            }
            if !all_valid {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Report { path, output } => {
            let report = validate_file(&path, &config)?;

            let report_json = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "document": path.display().to_string(),
                "valid": report.valid,
                "error_count": report.errors.len(),
                "warning_count": report.warnings.len(),
                "errors": report.errors,
                "warnings": report.warnings,
            });

            let rendered = match config.report.output_format {
                OutputFormat::Pretty => serde_json::to_string_pretty(&report_json)?,
                OutputFormat::Compact => serde_json::to_string(&report_json)?,
            };

            if let Some(out_path) = output {
                std::fs::write(&out_path, &rendered)
                    .with_context(|| format!("writing report to {}", out_path.display()))?;
                println!("✅ Report written to {}", out_path.display());
            } else {
                println!("{rendered}");
            }
            Ok(())
        }

        Commands::Schema => {
            let source: serde_json::Value = serde_json::from_str(roadmap_schema_source())
                .context("parsing embedded schema")?;

            if let Some(title) = source.get("title").and_then(|v| v.as_str()) {
                println!("{title}");
            }
            if let Some(dialect) = source.get("$schema").and_then(|v| v.as_str()) {
                println!("  dialect:     {dialect}");
            }
            let definitions = source
                .get("definitions")
                .and_then(|v| v.as_object())
                .map(|defs| defs.keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            println!("  definitions: {}", definitions.join(", "));

            if let SchemaNode::Object { required, .. } = roadmap_schema() {
                println!("  required:    {}", required.join(", "));
            }
            Ok(())
        }
    }
}

fn validate_file(path: &Path, config: &RoadmapConfig) -> anyhow::Result<RoadmapReport> {
    let document = load_document(path)
        .with_context(|| format!("loading document {}", path.display()))?;
    Ok(validate_roadmap_with(
        &document,
        roadmap_schema(),
        &config.integrity,
    ))
}
