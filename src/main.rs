use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use surql_translate::query_builder::Query;
use surql_translate::schema_catalog::SchemaConfig;
use surql_translate::{translate_with_config, TranslatorConfig};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Query text, then the parameters as JSON
    Text,
    /// One JSON document with `query` and `parameters`
    Json,
}

/// SurQL Translate - translate builder queries into SurrealQL
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML schema describing the tables and their fields
    #[arg(long)]
    schema: PathBuf,

    /// JSON file holding the serialized query
    #[arg(long)]
    query: PathBuf,

    /// YAML translator configuration, overrides the environment
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = TranslatorConfig::from_env().context("Invalid translator environment")?;
    if let Some(path) = &cli.config {
        let file_config = TranslatorConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load translator config {}", path.display()))?;
        config.merge(file_config);
    }

    let catalog = SchemaConfig::from_yaml_file(&cli.schema)
        .and_then(|schema| schema.to_catalog())
        .with_context(|| format!("Failed to load schema {}", cli.schema.display()))?;

    let contents = std::fs::read_to_string(&cli.query)
        .with_context(|| format!("Failed to read query {}", cli.query.display()))?;
    let query: Query = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse query {}", cli.query.display()))?;

    let translation = translate_with_config(&query, &catalog, &config)
        .with_context(|| format!("Failed to translate query over `{}`", query.root.table))?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", translation.query);
            println!("{}", serde_json::to_string_pretty(&translation.parameters.to_json())?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&translation.to_json())?);
        }
    }

    Ok(())
}
