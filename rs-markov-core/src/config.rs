/// Prefix size used when none is given.
pub const DEFAULT_PREFIX_SIZE: usize = 3;

/// Parameters used to build a [`TextGenerator`](crate::model::generator::TextGenerator).
///
/// # Invariants
/// - `prefix_size >= 1`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
	/// Order of the chain for learning. Ignored once a stored chain is
	/// loaded: the stored order wins.
	prefix_size: usize,

	/// Seed of the random source. `None` seeds from the thread RNG.
	pub rng_seed: Option<u64>,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self { prefix_size: DEFAULT_PREFIX_SIZE, rng_seed: None }
	}
}

impl GeneratorConfig {
	/// Creates a configuration with the given prefix size.
	///
	/// # Errors
	/// Returns an error if `prefix_size == 0`.
	pub fn new(prefix_size: usize) -> Result<Self, String> {
		let mut config = Self::default();
		config.set_prefix_size(prefix_size)?;
		Ok(config)
	}

	pub fn prefix_size(&self) -> usize {
		self.prefix_size
	}

	/// Sets the prefix size (must be > 0).
	pub fn set_prefix_size(&mut self, prefix_size: usize) -> Result<(), String> {
		if prefix_size == 0 {
			return Err("Prefix size must be > 0".to_owned());
		}
		self.prefix_size = prefix_size;
		Ok(())
	}

	/// Builder-style variant of setting `rng_seed`.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.rng_seed = Some(seed);
		self
	}
}
