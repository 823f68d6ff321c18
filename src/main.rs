use anyhow::Context;
use clap::{Parser, Subcommand};
use compval::{EngineConfig, InMemoryMarket, ValuationEngine, ValuationTarget};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Comparable-sales valuation engine
#[derive(Parser, Debug)]
#[command(name = "compval")]
#[command(about = "Estimate item prices from comparable market listings", long_about = None)]
struct Args {
    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Market listings file (JSON array)
    #[arg(long, global = true, default_value = "./market.json")]
    candidates: PathBuf,

    /// Pricing strategy: competitive, premium or fair_value
    #[arg(short, long, global = true)]
    strategy: Option<String>,

    /// Minimum similarity for an anchor, in [0, 1]
    #[arg(short, long, global = true)]
    threshold: Option<f64>,

    /// Maximum number of anchors used for pricing
    #[arg(long, global = true)]
    max_anchors: Option<usize>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Value a single target
    Value {
        /// Target item file (JSON object)
        #[arg(long)]
        target: PathBuf,
    },
    /// Value every target of a JSON array
    Batch {
        /// Target items file (JSON array)
        #[arg(long)]
        targets: PathBuf,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.defaults.threshold = threshold;
    }
    if let Some(max_anchors) = args.max_anchors {
        config.defaults.max_anchors = max_anchors;
    }
    let strategy = args
        .strategy
        .clone()
        .unwrap_or_else(|| config.defaults.strategy.to_string());

    let (market, skipped) = InMemoryMarket::from_json_file(&args.candidates)
        .with_context(|| format!("loading candidates {}", args.candidates.display()))?;
    info!("Loaded {} market listings ({} skipped)", market.len(), skipped);

    let engine = ValuationEngine::from_config(&config, market)?;
    info!("Rule registry ready: plugins {:?}", engine.registry().plugin_names());

    let output = match &args.command {
        Command::Value { target } => {
            let target: ValuationTarget = read_json(target)?;
            serde_json::to_string_pretty(&engine.value(&target, &strategy))?
        }
        Command::Batch { targets } => {
            let targets: Vec<ValuationTarget> = read_json(targets)?;
            info!("Valuing {} targets", targets.len());
            serde_json::to_string_pretty(&engine.batch_valuation(&targets, &strategy))?
        }
    };
    println!("{}", output);

    Ok(())
}
