use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{LevelFilter, error, info, warn};

use rs_markov_core::{GeneratorConfig, TextGenerator};

/// Generates text from a stored word-level Markov chain.
///
/// Reads requests from stdin, one per line: `<word count> [seed text...]`.
/// Prints one generated text per request.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Chain file produced by rs-markov-learn
	#[arg(short, long, value_name = "PATH")]
	input: PathBuf,

	/// Seed of the random source (defaults to the current time)
	#[arg(short, long, value_name = "N")]
	seed: Option<u64>,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, action = ArgAction::Count)]
	quiet: u8,
}

/// One line of input: how many words to add to which seed.
#[derive(Debug, PartialEq)]
struct Request<'a> {
	word_count: usize,
	seed: &'a str,
}

impl<'a> Request<'a> {
	/// Parses `<word count> [seed text...]`.
	///
	/// Returns `Ok(None)` for blank lines.
	fn parse(line: &'a str) -> Result<Option<Self>, String> {
		let line = line.trim_start();
		if line.is_empty() {
			return Ok(None);
		}

		let (count, seed) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
		let word_count = count
			.parse::<usize>()
			.map_err(|e| format!("invalid word count '{count}': {e}"))?;

		Ok(Some(Self { word_count, seed }))
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

/// Seed derived from the clock, used when none is given.
fn time_seed() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_nanos() as u64)
		.unwrap_or_default()
}

fn run(cli: Cli) -> Result<()> {
	let mut config = GeneratorConfig::default();
	config.rng_seed = Some(cli.seed.unwrap_or_else(time_seed));

	let mut generator = TextGenerator::from_config(&config)?;
	generator
		.load(&cli.input)
		.with_context(|| format!("Fail to load file '{}'", cli.input.display()))?;
	info!(
		"Loaded chain of size {} (prefix size {})",
		generator.chain_size(),
		generator.prefix_size()
	);

	let stdin = io::stdin();
	let stdout = io::stdout();
	let mut out = stdout.lock();

	for line in stdin.lock().lines() {
		let line = line.context("failed to read stdin")?;
		match Request::parse(&line) {
			Ok(Some(request)) => {
				writeln!(out, "{}", generator.generate(request.seed, request.word_count))?;
				out.flush()?;
			}
			Ok(None) => continue,
			Err(e) => warn!("Skipping line: {e}"),
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_count_and_seed() {
		let request = Request::parse("5 hello big world").unwrap().unwrap();
		assert_eq!(request, Request { word_count: 5, seed: "hello big world" });
	}

	#[test]
	fn seed_is_optional() {
		let request = Request::parse("  12").unwrap().unwrap();
		assert_eq!(request, Request { word_count: 12, seed: "" });
	}

	#[test]
	fn blank_lines_are_skipped() {
		assert_eq!(Request::parse("").unwrap(), None);
		assert_eq!(Request::parse("   ").unwrap(), None);
	}

	#[test]
	fn rejects_bad_count() {
		assert!(Request::parse("many words").is_err());
		assert!(Request::parse("-3 words").is_err());
	}

	#[test]
	fn requires_input() {
		assert!(Cli::try_parse_from(["rs-markov-generate"]).is_err());
		let cli = Cli::try_parse_from(["rs-markov-generate", "-i", "a.chain", "-s", "9"]).unwrap();
		assert_eq!(cli.seed, Some(9));
	}

	/// Behaves like `RUST_LOG=debug` without touching the process environment.
	fn debug_env() -> Env<'static> {
		Env::new().filter("RS_MARKOV_UNSET_FILTER").default_filter_or("debug")
	}

	#[test]
	fn env_filter_is_kept_without_flags() {
		assert_eq!(level_override(0, 0), None);
		assert_eq!(logger_builder(0, 0, debug_env()).build().filter(), LevelFilter::Debug);
	}

	#[test]
	fn flags_override_env_filter() {
		assert_eq!(logger_builder(2, 0, debug_env()).build().filter(), LevelFilter::Trace);
		assert_eq!(logger_builder(0, 1, debug_env()).build().filter(), LevelFilter::Warn);
		assert_eq!(level_override(0, 3), Some(LevelFilter::Error));
	}
}
