//! Result analysis tool for load-test result files.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::Parser;
use loadlens::{
    analyze,
    chart::{self, json::JsonRenderer},
    config::{self, Config, HistogramMode},
    summary::Summary,
};
use tokio::fs;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// path on disk to a YAML configuration file
    #[clap(long)]
    config_path: Option<PathBuf>,

    /// status code bar layout, 'unified' or 'partitioned'
    #[clap(long)]
    histogram: Option<HistogramMode>,

    /// directory charts are written into
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// print the summary only, write no charts
    #[clap(long)]
    no_charts: bool,

    /// Path to line-delimited result file
    results_path: PathBuf,
}

/// Errors that can occur while running loadlens.
#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("Invalid arguments specified")]
    InvalidArgs,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] loadlens_capture::Error),
    #[error(transparent)]
    Analyze(#[from] analyze::Error),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::Error),
    #[error("Failed to render charts: {0}")]
    Chart(#[from] chart::Error),
}

fn resolve_config(args: &Args) -> Result<Config, Error> {
    let mut config = match &args.config_path {
        Some(path) => config::load_config_from_path(path)?,
        None => Config::default(),
    };
    if let Some(mode) = args.histogram {
        config.bar_chart.histogram = mode;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir.clone_from(dir);
    }
    Ok(config)
}

async fn run(args: Args) -> Result<analyze::Report, Error> {
    let config = resolve_config(&args)?;

    let results_path = args.results_path.as_path();
    if !results_path.exists() {
        error!("Result file {} does not exist", results_path.display());
        return Err(Error::InvalidArgs);
    }

    let contents = fs::read(results_path).await?;
    let records = loadlens_capture::parse(contents.as_slice()).inspect_err(|e| {
        error!("Rejecting {}: {e}", results_path.display());
    })?;
    info!(
        "Read {count} records from {path}",
        count = records.len(),
        path = results_path.display()
    );

    let report = analyze::summarize(&records).inspect_err(|e| {
        error!("{e}: {} holds no records", results_path.display());
    })?;

    if args.no_charts {
        info!("Skipping chart output");
    } else {
        let mut renderer = JsonRenderer::from_config(&config);
        chart::render(&mut renderer, &report, &config)?;
    }

    Ok(report)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish()
        .init();

    let args = Args::parse();
    let report = run(args).await?;
    println!("{}", Summary(&report));
    Ok(())
}
