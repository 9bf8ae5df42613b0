use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cihuo_core::analyzer::Analyzer;
use cihuo_core::config::{Config, DEFAULT_CONFIG_FILE};

/// Counts word n-grams across a folder of documents.
#[derive(Parser, Debug)]
#[command(name = "cihuo")]
#[command(version)]
#[command(about = "Word n-gram frequency table over a folder of documents", long_about = None)]
struct Cli {
	/// Configuration file (properties, or TOML when ending in .toml)
	#[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_FILE)]
	config: PathBuf,

	/// Increase log verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

/// Initialize tracing on stderr; stdout is kept for console results.
///
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(verbose >= 2)
		.with_writer(std::io::stderr)
		.init();
}

fn main() -> Result<()> {
	let start = Instant::now();
	let cli = Cli::parse();
	init_tracing(cli.verbose);
	debug!(config = %cli.config.display(), "loading configuration");

	let config = Config::load(&cli.config)
		.with_context(|| format!("cannot load configuration from {}", cli.config.display()))?;

	let analyzer = Analyzer::new(config);
	let report = analyzer.run()?;
	info!(
		documents = report.documents,
		skipped = report.skipped,
		distinct = report.distinct,
		rendered = report.rendered,
		"batch complete"
	);

	println!("Time cost: {} seconds", start.elapsed().as_secs());
	Ok(())
}
