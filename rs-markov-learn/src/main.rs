use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{LevelFilter, error, info};
use reqwest::blocking::Client;

use rs_markov_core::io::{build_output_path, read_stdin, read_text};
use rs_markov_core::{GeneratorConfig, TextGenerator};

const OUTPUT_EXTENSION: &str = "chain";

/// Learns a word-level Markov chain from text and stores it.
///
/// Without FILE or --url, the whole of stdin is learned as one text.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Order of the chain (number of preceding words)
	#[arg(short, long, value_name = "K")]
	prefix_size: usize,

	/// Output chain file (defaults to the first FILE with a .chain extension)
	#[arg(short, long, value_name = "PATH")]
	output: Option<PathBuf>,

	/// Extend an existing output chain instead of replacing it
	#[arg(long)]
	append: bool,

	/// Download and learn a text over HTTP (repeat flag)
	#[arg(long = "url", value_name = "URL")]
	urls: Vec<String>,

	/// Text files to learn, each as a separate text
	files: Vec<PathBuf>,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, action = ArgAction::Count)]
	quiet: u8,
}

/// Fetches texts over HTTP. Non-2xx responses are errors.
struct Downloader {
	client: Client,
}

impl Downloader {
	fn new() -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_secs(60))
			.build()
			.context("unable to build HTTP client")?;
		Ok(Self { client })
	}

	fn download(&self, url: &str) -> Result<String> {
		let response = self.client
			.get(url)
			.send()
			.with_context(|| format!("failed to download '{url}'"))?
			.error_for_status()
			.with_context(|| format!("server refused '{url}'"))?;

		response.text().with_context(|| format!("failed to read body of '{url}'"))
	}
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	if let Err(err) = run(cli) {
		error!("{err:#}");
		std::process::exit(1);
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	let mut builder = logger_builder(verbose, quiet, Env::default().default_filter_or("info"));
	let _ = builder.try_init();
}

/// Level forced by `-v`/`-q`; `None` leaves `RUST_LOG` in charge.
fn level_override(verbose: u8, quiet: u8) -> Option<LevelFilter> {
	match (quiet, verbose) {
		(0, 0) => None,
		(0, 1) => Some(LevelFilter::Debug),
		(0, _) => Some(LevelFilter::Trace),
		(1, _) => Some(LevelFilter::Warn),
		_ => Some(LevelFilter::Error),
	}
}

fn logger_builder(verbose: u8, quiet: u8, env: Env<'_>) -> env_logger::Builder {
	let mut builder = env_logger::Builder::from_env(env);
	builder.format_timestamp_millis();
	if let Some(level) = level_override(verbose, quiet) {
		builder.filter_level(level);
	}
	builder
}

fn output_path(cli: &Cli) -> Result<PathBuf> {
	if let Some(output) = &cli.output {
		return Ok(output.clone());
	}
	match cli.files.first() {
		Some(first) => build_output_path(first, OUTPUT_EXTENSION)
			.with_context(|| format!("cannot derive output path from '{}'", first.display())),
		None => Err(anyhow!("missing argument '--output'")),
	}
}

fn run(cli: Cli) -> Result<()> {
	let output = output_path(&cli)?;

	let config = GeneratorConfig::new(cli.prefix_size).map_err(|e| anyhow!(e))?;
	let mut generator = TextGenerator::from_config(&config)?;

	if cli.append && output.exists() {
		let mut existing = TextGenerator::from_config(&config)?;
		existing
			.load(&output)
			.with_context(|| format!("Fail to load file '{}'", output.display()))?;
		generator
			.merge(existing.chain())
			.with_context(|| format!("cannot extend '{}'", output.display()))?;
		info!("Extending chain of size {} from '{}'", generator.chain_size(), output.display());
	}

	if cli.files.is_empty() && cli.urls.is_empty() {
		let content = read_stdin().context("failed to read stdin")?;
		generator.learn(&content);
	}

	for file in &cli.files {
		let content = read_text(file).with_context(|| format!("failed to read '{}'", file.display()))?;
		info!("Learning '{}'", file.display());
		generator.learn(&content);
	}

	if !cli.urls.is_empty() {
		let downloader = Downloader::new()?;
		for url in &cli.urls {
			info!("Learning '{url}'");
			let content = downloader.download(url)?;
			generator.learn(&content);
		}
	}

	generator
		.store(&output)
		.with_context(|| format!("Fail to save file '{}'", output.display()))?;
	info!("Saved chain of size {} (prefix size {})", generator.chain_size(), generator.prefix_size());

	Ok(())
}
