use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use checklist::{
    config::{Backend, StoreConfig},
    logging::{self, LogFormat},
    seed::{self, SeedSummary},
    storage,
};
use checklist_core::checklist::{FindingFilter, IntegrityViolation, SeedData};
use checklist_core::storage::ChecklistStore;
use clap::Parser;
use serde::Serialize;

/// Checklist - Load security review findings and verify their references
#[derive(Parser, Debug)]
#[command(name = "checklist")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Store settings in `.properties` format (otherwise read from CHECKLIST_* variables)
    #[arg(long, short, env = "CHECKLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Storage backend, overriding the configuration
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// SQLite database path, overriding the configuration
    #[arg(long)]
    db_path: Option<String>,

    /// JSON seed file to load before checking integrity
    #[arg(long, env = "CHECKLIST_SEED", conflicts_with = "builtin_seed")]
    seed: Option<PathBuf>,

    /// Load the built-in security pillar rows when the store has no questions yet
    #[arg(long)]
    builtin_seed: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "CHECKLIST_LOG_FORMAT")]
    log_format: LogFormat,
}

/// What the run found, printed to stdout as JSON.
#[derive(Debug, Serialize)]
struct Report {
    backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<SeedSummary>,
    questions: usize,
    best_practices: usize,
    findings: usize,
    open_findings: usize,
    violations: Vec<IntegrityViolation>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let config = load_config(&cli)?;
    let store = storage::open(&config)
        .await
        .with_context(|| format!("Failed to open {} store", config.backend))?;

    let seed = match (&cli.seed, cli.builtin_seed) {
        (Some(path), _) => {
            let data = seed::read_seed_file(path).await?;
            Some(seed::load_seed(store.as_ref(), &data).await?)
        }
        (None, true) if store.list_questions().await?.is_empty() => {
            Some(seed::load_seed(store.as_ref(), &SeedData::well_architected()).await?)
        }
        (None, true) => {
            tracing::info!("Store already holds questions, skipping built-in seed");
            None
        }
        (None, false) => None,
    };

    let report = build_report(store.as_ref(), config.backend, seed).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.violations.is_empty() {
        tracing::info!(findings = report.findings, "Integrity check passed");
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(
            violations = report.violations.len(),
            "Integrity check failed"
        );
        Ok(ExitCode::FAILURE)
    }
}

/// Resolves the store configuration: file or environment first, then flags.
fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::from_properties_file(path)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?,
        None => StoreConfig::from_env().context("Invalid CHECKLIST_* environment")?,
    };

    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(db_path) = &cli.db_path {
        config.db_path = db_path.clone();
    }

    tracing::debug!(?config, "Store configuration resolved");
    Ok(config)
}

async fn build_report(
    store: &dyn ChecklistStore,
    backend: Backend,
    seed: Option<SeedSummary>,
) -> Result<Report> {
    let findings = store.list_findings(FindingFilter::new()).await?;

    Ok(Report {
        backend: backend.to_string(),
        seed,
        questions: store.list_questions().await?.len(),
        best_practices: store.list_best_practices(None).await?.len(),
        findings: findings.len(),
        open_findings: findings.iter().filter(|f| !f.is_remediated()).count(),
        violations: store.check_integrity().await?,
    })
}
