use std::collections::VecDeque;
use std::fmt;

use super::fingerprint::Fingerprint;

/// Separator appended after every word, both when hashing and when displaying.
pub const SEPARATOR: char = ' ';

/// Sliding window over the last `capacity` words seen (or generated).
///
/// A `Prefix` is the state of the Markov chain walk: its fingerprint is the
/// key under which successors are recorded during learning and looked up
/// during generation.
///
/// # Invariants
/// - `words.len() <= capacity`
/// - Words are kept oldest first
#[derive(Clone, Debug)]
pub struct Prefix {
	capacity: usize,
	words: VecDeque<String>,
}

impl Prefix {
	/// Creates an empty window holding at most `capacity` words.
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			words: VecDeque::with_capacity(capacity),
		}
	}

	/// Pushes a word, evicting the oldest one once the window is full.
	pub fn add(&mut self, word: impl Into<String>) {
		if self.words.len() >= self.capacity {
			self.words.pop_front();
		}
		// A zero-capacity window stays empty
		if self.capacity > 0 {
			self.words.push_back(word.into());
		}
	}

	/// Fingerprint of the current contents.
	///
	/// The hashed byte sequence is `word0 ' ' word1 ' ' ... wordN-1 ' '`, so
	/// word boundaries are part of the key (`"AB" + "C"` differs from
	/// `"A" + "BC"`). The empty window hashes to a valid key as well.
	pub fn fingerprint(&self) -> u64 {
		let mut buf = [0u8; 4];
		let separator = SEPARATOR.encode_utf8(&mut buf).as_bytes();

		let mut digest = Fingerprint::new();
		for word in &self.words {
			digest.update(word.as_bytes());
			digest.update(separator);
		}
		digest.finish()
	}

	/// Words joined by the separator, with a trailing separator.
	pub fn to_display_string(&self) -> String {
		self.to_string()
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}
}

impl fmt::Display for Prefix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for word in &self.words {
			write!(f, "{word}{SEPARATOR}")?;
		}
		Ok(())
	}
}
