use clap::{Parser, Subcommand};
use wireflow::catalog::builtin::builtin_definitions;
use wireflow::catalog::loader::load_definitions_from_json;
use wireflow::catalog::Catalog;
use wireflow::config::AppConfig;
use wireflow::graph::loader::load_snapshot;
use wireflow::graph::{GraphError, GraphModel};
use wireflow::palette::palette;
use wireflow::pipeline::{HttpSpecService, Pipeline, SpecDocument};
use std::path::PathBuf;
use std::sync::Arc;
use std::fs;
use anyhow::{Result, Context as AnyhowContext};
use tracing::info;
use tracing_subscriber;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the app config file (created on first save)
    #[arg(long, default_value = "wireflow.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a provider spec through the external parse/generate service
    Ingest {
        /// Path to the spec document (.json / .yaml / .yml)
        #[arg(long, short)]
        file: PathBuf,

        /// Provider name ([a-z0-9_]+)
        #[arg(long, short)]
        provider: String,

        /// Override the external service base URL from the config
        #[arg(long)]
        service_url: Option<String>,
    },

    /// Publish static definitions and print the grouped palette
    Palette {
        /// Path to a JSON array of node definitions
        #[arg(long, short)]
        definitions: Option<PathBuf>,
    },

    /// Validate a workflow snapshot against a catalog
    Validate {
        /// Path to the workflow snapshot (.yaml / .yml / .json)
        #[arg(long, short)]
        workflow: PathBuf,

        /// Path to a JSON array of node definitions
        #[arg(long, short)]
        definitions: Option<PathBuf>,
    },
}

fn build_catalog(definitions: Option<&PathBuf>) -> Result<Arc<Catalog>> {
    let catalog = Arc::new(Catalog::new());
    catalog.publish(builtin_definitions())?;
    if let Some(path) = definitions {
        let defs = load_definitions_from_json(path)?;
        catalog.publish(defs)?;
    }
    Ok(catalog)
}

fn print_palette(catalog: &Catalog) {
    for group in palette(catalog) {
        let header = group.provider.as_deref().unwrap_or("built-in");
        println!("[{}]", header);
        for entry in group.entries {
            println!(
                "  {} — {} ({:?})",
                entry.node_type, entry.display_name, entry.category
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Ingest {
            file,
            provider,
            service_url,
        } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read spec from {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let base_url = service_url.unwrap_or_else(|| config.service_url.clone());
            let service = Arc::new(HttpSpecService::new(base_url, config.api_key.clone()));
            let catalog = build_catalog(None)?;
            let pipeline = Pipeline::new(service, catalog.clone(), config.pipeline_options());

            let job_id = pipeline
                .ingest(&provider, SpecDocument::new(file_name, content))
                .await?;

            let job = pipeline.job(job_id).expect("job just created");
            println!("Job {}: {}", job_id, job.stage.describe());
            if let Some(summary) = job.summary {
                println!("Discovered operations: {}", summary.operation_count);
            }
            if job.generated > 0 {
                println!("Published definitions: {}", job.generated);
                print_palette(&catalog);
            }
        }

        Commands::Palette { definitions } => {
            let catalog = build_catalog(definitions.as_ref())?;
            print_palette(&catalog);
        }

        Commands::Validate {
            workflow,
            definitions,
        } => {
            let catalog = build_catalog(definitions.as_ref())?;
            let snapshot = load_snapshot(&workflow)?;

            let mut model = GraphModel::new(catalog);
            match model.apply_bulk_replace(&snapshot) {
                Ok(()) => {
                    info!(file = %workflow.display(), "Workflow validated");
                    println!(
                        "OK: {} node(s), {} edge(s)",
                        model.node_count(),
                        model.edge_count()
                    );
                }
                Err(GraphError::BulkReplaceRejected(violations)) => {
                    eprintln!("Workflow rejected with {} violation(s):", violations.len());
                    for violation in violations {
                        eprintln!("  - {}", violation);
                    }
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
