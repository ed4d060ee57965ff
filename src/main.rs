//! logclump CLI
//!
//! Reads log lines (plain text or JSONL) from a file or stdin, clusters them,
//! and prints the anomalies and the largest clusters. Optionally writes a
//! `text,label` CSV and an HTML anomaly report.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

use logclump::report::DEFAULT_CLUSTER_SAMPLE;
use logclump::{
    build_anomaly_html, decode_bytes, parse_lines, Detector, DetectorConfig, HashingEmbedder,
    Metric,
};

/// Anomalies printed to the terminal.
const MAX_PRINTED_ANOMALIES: usize = 50;

/// Cluster log lines and surface the ones that fit nowhere.
#[derive(Parser)]
#[command(name = "logclump")]
#[command(version)]
#[command(about = "Density clustering of log lines with anomaly extraction")]
struct Cli {
    /// Log file (.txt, .log, .jsonl). Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// TOML config file; flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Neighborhood radius.
    #[arg(long)]
    eps: Option<f64>,

    /// Minimum neighborhood size (self included) for a dense point.
    #[arg(long)]
    min_samples: Option<usize>,

    /// Texts per embedding batch.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Distance measure: cosine or euclidean.
    #[arg(long)]
    metric: Option<Metric>,

    /// Messages shown per cluster.
    #[arg(long, default_value_t = DEFAULT_CLUSTER_SAMPLE)]
    samples: usize,

    /// Write `text,label` rows to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write an HTML anomaly report to this file.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    debug!(?config, "effective configuration");

    let raw = read_input(cli.input.as_ref())?;
    let messages = parse_lines(&raw);
    if messages.is_empty() {
        warn!("no log lines in input");
        println!("No logs provided.");
        return Ok(());
    }

    let embedder = HashingEmbedder::new(config.embedding_dim)?;
    let detector = Detector::new(config)?;
    let report = detector.detect(messages, &embedder)?;

    println!("{}", report.headline());

    let anomalies = report.anomaly_messages();
    if !anomalies.is_empty() {
        println!("\nAnomalies (-1):");
        for msg in anomalies.iter().take(MAX_PRINTED_ANOMALIES) {
            println!("  {msg}");
        }
        if anomalies.len() > MAX_PRINTED_ANOMALIES {
            println!("  ... and {} more", anomalies.len() - MAX_PRINTED_ANOMALIES);
        }
    }

    println!("\nClusters:");
    for summary in report.cluster_summaries(cli.samples) {
        println!("  Cluster {} • {} logs", summary.id, summary.size);
        for s in summary.samples {
            println!("    • {s}");
        }
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        report.write_csv(BufWriter::new(file))?;
        println!("\nLabels written to {}", path.display());
    }

    if let Some(path) = &cli.html {
        let owned: Vec<String> = anomalies.iter().map(|s| s.to_string()).collect();
        let html = build_anomaly_html("Detected anomalies", &owned);
        fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Anomaly report written to {}", path.display());
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<DetectorConfig> {
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::from_file(path)?,
        None => DetectorConfig::default(),
    }
    .with_env_overrides();

    if let Some(eps) = cli.eps {
        config.eps = eps;
    }
    if let Some(n) = cli.min_samples {
        config.min_samples = n;
    }
    if let Some(n) = cli.batch_size {
        config.batch_size = n;
    }
    if let Some(m) = cli.metric {
        config.metric = m;
    }

    config.validate()?;
    Ok(config)
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    let bytes = match path {
        Some(p) if p.as_os_str() != "-" => {
            fs::read(p).with_context(|| format!("failed to read {}", p.display()))?
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(decode_bytes(&bytes))
}
