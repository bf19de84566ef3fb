use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use txn_enrichment::{
    categorization::KeywordCategorizer,
    config::{Config, ObservabilityConfig},
    enrichment::EnrichmentOrchestrator,
    error::AppError,
    geolocation::ReferenceSetResolver,
    metrics::gather_metrics,
    models::Transaction,
    state::InMemoryStore,
};
use uuid::Uuid;
use validator::Validate;

#[derive(Parser)]
#[command(name = "txn-enrich")]
#[command(about = "Batch payment transaction enrichment", long_about = None)]
struct Cli {
    /// Input file with one JSON transaction per line, or "-" for stdin
    #[arg(value_name = "FILE", default_value = "-")]
    input: String,

    /// Write enriched results to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print each enriched result
    #[arg(short, long)]
    pretty: bool,

    /// Dump Prometheus metrics to stderr after the batch
    #[arg(long)]
    print_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration before tracing so the log level applies
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    init_tracing(&config.observability);

    info!(
        "Starting {} v{}",
        config.observability.service_name,
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = txn_enrichment::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        } else {
            info!("Prometheus metrics initialized");
        }
    }

    let orchestrator = EnrichmentOrchestrator::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(KeywordCategorizer::new()),
        Arc::new(ReferenceSetResolver::new(config.geolocation.clone())),
        config.enrichment.clone(),
    );

    let raw = if cli.input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&cli.input)
            .with_context(|| format!("Failed to read {}", cli.input))?
    };

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut processed = 0usize;
    let mut enriched_count = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        processed += 1;

        let outcome = async {
            let transaction = parse_line(line)?;
            orchestrator.enrich(transaction).await
        }
        .await;

        match outcome {
            Ok(enriched) => {
                let rendered = if cli.pretty {
                    serde_json::to_string_pretty(&enriched)?
                } else {
                    serde_json::to_string(&enriched)?
                };
                writeln!(out, "{}", rendered)?;
                enriched_count += 1;
            }
            Err(err) if err.is_enrichment_failure() => {
                // Already logged by the orchestrator with the transaction id
                failed += 1;
            }
            Err(err) => {
                error!(
                    line = line_no + 1,
                    error = %err,
                    "Skipping invalid transaction"
                );
                skipped += 1;
            }
        }
    }

    out.flush().context("Failed to flush output")?;
    info!(
        processed,
        enriched = enriched_count,
        failed,
        skipped,
        "Batch complete"
    );

    if cli.print_metrics {
        eprint!("{}", gather_metrics());
    }

    Ok(())
}

/// Parse one input line into a validated transaction. Records without a
/// transaction id get a generated one; records without a timestamp get
/// the ingress time via the model's deserialization default. All parse
/// problems surface as validation errors.
fn parse_line(line: &str) -> Result<Transaction, AppError> {
    let mut value: serde_json::Value = serde_json::from_str(line)
        .map_err(|err| AppError::Validation(format!("malformed JSON: {}", err)))?;

    let object = value
        .as_object_mut()
        .ok_or_else(|| AppError::Validation("input line is not a JSON object".to_string()))?;
    if object
        .get("transaction_id")
        .map_or(true, serde_json::Value::is_null)
    {
        object.insert(
            "transaction_id".to_string(),
            serde_json::Value::String(format!("txn-{}", Uuid::new_v4())),
        );
    }

    let transaction: Transaction = serde_json::from_value(value)
        .map_err(|err| AppError::Validation(format!("malformed transaction: {}", err)))?;
    transaction.validate()?;
    Ok(transaction)
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("txn_enrichment={}", config.log_level).into());

    // Logs go to stderr so stdout stays valid JSONL
    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
