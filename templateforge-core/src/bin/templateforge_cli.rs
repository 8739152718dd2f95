//! TemplateForge CLI - JSON bridge to the generation engine
//!
//! Commands: generate, validate, presets
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on invalid input or failed generation

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use templateforge_core::{
    design::{color_palette, design_rules, typography},
    templates::template_dimensions,
    CancellationToken, ColorScheme, DesignTone, EngineConfig, GenerationInputs, InputValidator,
    TemplateEngine, TemplateType,
};

#[derive(Parser)]
#[command(name = "templateforge-cli")]
#[command(about = "TemplateForge CLI - Template Rendering & Variation Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a template with variations and downloads
    Generate {
        /// JSON payload (GenerationInputs)
        #[arg(short, long)]
        payload: String,

        /// Write decoded artifacts into this directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Engine config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip the simulated latency
        #[arg(long)]
        no_delay: bool,
    },

    /// Validate a payload without generating
    Validate {
        /// JSON payload (GenerationInputs)
        #[arg(short, long)]
        payload: String,
    },

    /// List dimensions, design rules, palettes and typography
    Presets,
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => println!(r#"{{"success": false, "error": "{}"}}"#, e),
    }
}

fn failure(error: impl std::fmt::Display) -> ExitCode {
    print_json(&serde_json::json!({
        "success": false,
        "error": error.to_string(),
    }));
    ExitCode::from(2)
}

fn parse_inputs(payload: &str) -> Result<GenerationInputs, String> {
    serde_json::from_str(payload).map_err(|e| format!("Invalid payload: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "templateforge_core=info,templateforge_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { payload, out_dir, config, no_delay } => {
            let inputs = match parse_inputs(&payload) {
                Ok(i) => i,
                Err(e) => return failure(e),
            };

            let validation = InputValidator::new().validate(&inputs);
            if !validation.valid {
                print_json(&serde_json::json!({
                    "success": false,
                    "validation": validation,
                }));
                return ExitCode::from(2);
            }

            let mut config = match config {
                Some(path) => match EngineConfig::load_from_file(&path) {
                    Ok(c) => c,
                    Err(e) => return failure(e),
                },
                None => EngineConfig::default(),
            };
            if no_delay {
                config.simulated_latency = templateforge_core::LatencyConfig::NONE;
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted, cancelling generation");
                    on_interrupt.cancel();
                }
            });

            let engine = TemplateEngine::new(config);
            let template = match engine.generate_template(&inputs, &cancel).await {
                Ok(t) => t,
                Err(e) => return failure(e),
            };
            tracing::info!(id = %template.id, name = %template.metadata.name, "Generated template");

            let files = match out_dir {
                Some(dir) => match template.save_artifacts(&dir) {
                    Ok(paths) => paths,
                    Err(e) => return failure(format!("Failed to write artifacts: {}", e)),
                },
                None => vec![],
            };

            print_json(&serde_json::json!({
                "success": true,
                "id": template.id,
                "metadata": template.metadata,
                "variations": template.variations.iter().map(|v| serde_json::json!({
                    "id": v.id,
                    "name": v.name,
                    "colorScheme": v.color_scheme,
                })).collect::<Vec<_>>(),
                "warnings": validation.violations,
                "files": files,
            }));
            ExitCode::SUCCESS
        }

        Commands::Validate { payload } => {
            let inputs = match parse_inputs(&payload) {
                Ok(i) => i,
                Err(e) => {
                    print_json(&serde_json::json!({ "valid": false, "error": e }));
                    return ExitCode::FAILURE;
                }
            };

            let result = InputValidator::new().validate(&inputs);
            print_json(&serde_json::json!(result));
            if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Presets => {
            let types: Vec<_> = TemplateType::ALL
                .iter()
                .map(|t| serde_json::json!({
                    "type": t.as_tag(),
                    "dimensions": template_dimensions(t.as_tag()),
                }))
                .collect();
            let tones: Vec<_> = DesignTone::ALL
                .iter()
                .map(|t| serde_json::json!({
                    "tone": t.as_tag(),
                    "rules": design_rules(t.as_tag()),
                    "typography": typography(t.as_tag()),
                }))
                .collect();
            let schemes: Vec<_> = ColorScheme::ALL
                .iter()
                .filter(|s| **s != ColorScheme::Brand)
                .map(|s| serde_json::json!({
                    "scheme": s.as_tag(),
                    "palette": color_palette(s.as_tag(), &[]),
                }))
                .collect();

            print_json(&serde_json::json!({
                "templateTypes": types,
                "designTones": tones,
                "colorSchemes": schemes,
            }));
            ExitCode::SUCCESS
        }
    }
}
