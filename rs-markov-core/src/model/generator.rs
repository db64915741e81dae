use std::fs::File;
use std::io::{Read, Write};
use std::mem;
use std::path::Path;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::chain::Chain;
use crate::config::GeneratorConfig;
use crate::error::{ChainError, Result};
use crate::tokenizer::{Tokenizer, WordTokenizer};

/// State owned by a generator. Never handed out as a whole.
struct Inner {
	chain: Chain,
	tokenizer: Box<dyn Tokenizer>,
	rng: StdRng,
	/// Message of the last failed `store`/`load`, empty after a success
	error: String,
}

/// High-level text generator over a word-level Markov chain.
///
/// # Responsibilities
/// - Tokenize training text and seeds consistently
/// - Learn from any number of texts
/// - Generate text with a random walk from a seed
/// - Store / load the chain, keeping the last error message
///
/// A `TextGenerator` exclusively owns its chain and is not `Clone`: moving it
/// transfers the chain, duplicating a chain is always an explicit
/// [`Chain::clone`] through [`TextGenerator::chain`].
pub struct TextGenerator {
	inner: Inner,
}

impl TextGenerator {
	/// Creates a generator with an empty chain of order `prefix_size`,
	/// seeded from the thread RNG.
	///
	/// # Errors
	/// Returns an error if `prefix_size == 0`.
	pub fn new(prefix_size: usize) -> Result<Self> {
		let config = GeneratorConfig::new(prefix_size).map_err(|_| ChainError::InvalidOrder(prefix_size))?;
		Self::from_config(&config)
	}

	/// Creates a generator from a configuration.
	///
	/// A fixed `rng_seed` makes generation reproducible.
	pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
		let rng = match config.rng_seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_rng(&mut rand::rng()),
		};

		Ok(Self {
			inner: Inner {
				chain: Chain::new(config.prefix_size())?,
				tokenizer: Box::new(WordTokenizer),
				rng,
				error: String::new(),
			},
		})
	}

	/// Replaces the tokenizer used for both learning and seeds.
	pub fn with_tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
		self.inner.tokenizer = Box::new(tokenizer);
		self
	}

	/// Replaces the random source.
	pub fn with_rng(mut self, rng: StdRng) -> Self {
		self.inner.rng = rng;
		self
	}

	/// Learns the transitions of `text`.
	///
	/// Additive: previously learned statistics are kept.
	pub fn learn(&mut self, text: &str) {
		let tokens = self.inner.tokenizer.tokenize(text);
		self.inner.chain.learn_tokens(&tokens);
	}

	/// Generates text starting with `seed`, up to `word_count` new words.
	///
	/// The result may be shorter than requested when the chain runs out of
	/// known prefixes. With `word_count == 0` the upper-cased seed words are
	/// returned, each followed by a space.
	pub fn generate(&mut self, seed: &str, word_count: usize) -> String {
		let Inner { chain, tokenizer, rng, .. } = &mut self.inner;
		let seed = tokenizer.tokenize(seed);
		chain.generate(seed.as_slice(), word_count, rng)
	}

	/// Stores the chain into `filename`, replacing its contents.
	///
	/// On failure the message is also available through [`Self::error_string`].
	pub fn store<P: AsRef<Path>>(&mut self, filename: P) -> Result<()> {
		let path = filename.as_ref();
		info!("Save data to '{}'", path.display());

		let result = File::create(path)
			.map_err(|source| ChainError::Open { path: path.to_owned(), source })
			.and_then(|file| write_chain(&self.inner.chain, file));
		self.record(result)
	}

	/// Stores the chain into any writer.
	pub fn store_to<W: Write>(&mut self, writer: W) -> Result<()> {
		let result = write_chain(&self.inner.chain, writer);
		self.record(result)
	}

	/// Loads a chain from `filename`, replacing the current one.
	///
	/// The prefix size becomes the stored one. On failure the current chain
	/// is left untouched.
	pub fn load<P: AsRef<Path>>(&mut self, filename: P) -> Result<()> {
		let path = filename.as_ref();
		info!("Load data from '{}'", path.display());

		let result = File::open(path)
			.map_err(|source| ChainError::Open { path: path.to_owned(), source })
			.and_then(read_chain)
			.map(|chain| self.replace_chain(chain));
		self.record(result)
	}

	/// Loads a chain from any reader. Same semantics as [`Self::load`].
	pub fn load_from<R: Read>(&mut self, reader: R) -> Result<()> {
		let result = read_chain(reader).map(|chain| self.replace_chain(chain));
		self.record(result)
	}

	/// Merges another chain of the same order into this one.
	pub fn merge(&mut self, other: &Chain) -> Result<()> {
		self.inner.chain.merge(other)
	}

	/// Message of the last failed `store`/`load`; empty after a success.
	pub fn error_string(&self) -> &str {
		&self.inner.error
	}

	/// Order of the chain.
	pub fn prefix_size(&self) -> usize {
		self.inner.chain.order()
	}

	/// Number of distinct prefixes in the chain.
	pub fn chain_size(&self) -> usize {
		self.inner.chain.len()
	}

	/// Read-only view of the chain.
	pub fn chain(&self) -> &Chain {
		&self.inner.chain
	}

	fn replace_chain(&mut self, chain: Chain) {
		let previous = mem::replace(&mut self.inner.chain, chain);
		debug!(
			"Replaced chain of size {} (prefix size {}) by chain of size {} (prefix size {})",
			previous.len(),
			previous.order(),
			self.inner.chain.len(),
			self.inner.chain.order()
		);
	}

	fn record(&mut self, result: Result<()>) -> Result<()> {
		match &result {
			Ok(()) => self.inner.error.clear(),
			Err(err) => self.inner.error = err.to_string(),
		}
		result
	}
}

fn write_chain<W: Write>(chain: &Chain, mut writer: W) -> Result<()> {
	let bytes = chain.to_bytes()?;
	writer.write_all(&bytes)?;
	writer.flush()?;
	debug!("Wrote {} bytes for {} prefixes", bytes.len(), chain.len());
	Ok(())
}

fn read_chain<R: Read>(mut reader: R) -> Result<Chain> {
	let mut bytes = Vec::new();
	reader.read_to_end(&mut bytes)?;
	let chain = Chain::from_bytes(&bytes)?;
	debug!("Read {} bytes for {} prefixes", bytes.len(), chain.len());
	Ok(chain)
}
