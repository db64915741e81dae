use std::collections::HashMap;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::prefix::{Prefix, SEPARATOR};
use super::successors::Successors;
use crate::error::{ChainError, Result};

/// Word-level Markov chain of a fixed order.
///
/// The chain maps the fingerprint of the last `order` words (or fewer, at the
/// start of a text) to the multiset of words observed right after them.
///
/// # Responsibilities
/// - Learn transitions from token sequences, additively across calls
/// - Walk the chain randomly from a seed prefix
/// - Merge with another chain of the same order
/// - Encode to / decode from the binary chain format
///
/// # Invariants
/// - `order >= 1`
/// - Every stored `Successors` is non-empty
///
/// # Notes
/// Keys are 64-bit fingerprints, not the words themselves. Two different
/// prefixes hashing to the same fingerprint share their successors; this is
/// accepted rather than corrected.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Chain {
	/// Number of preceding words a prediction depends on
	order: usize,

	/// Prefix fingerprint => successor multiset
	links: HashMap<u64, Successors>,
}

impl Chain {
	/// Creates an empty chain of the given order.
	///
	/// # Errors
	/// Returns an error if `order == 0`.
	pub fn new(order: usize) -> Result<Self> {
		if order == 0 {
			return Err(ChainError::InvalidOrder(order));
		}
		Ok(Self { order, links: HashMap::new() })
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct prefixes observed.
	pub fn len(&self) -> usize {
		self.links.len()
	}

	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}

	/// Successors recorded for a prefix fingerprint.
	pub fn successors(&self, fingerprint: u64) -> Option<&Successors> {
		self.links.get(&fingerprint)
	}

	/// Iterates over every `(fingerprint, successors)` entry, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (u64, &Successors)> {
		self.links.iter().map(|(key, successors)| (*key, successors))
	}

	/// Learns the transitions of one token sequence.
	///
	/// The window starts empty, so the first word is recorded under the
	/// empty-prefix key, the second under the one-word prefix, and so on
	/// until the window reaches `order` words and starts sliding.
	///
	/// Calling this several times accumulates statistics; nothing is reset.
	pub fn learn_tokens<I, S>(&mut self, tokens: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut prefix = Prefix::new(self.order);
		let mut learned = 0usize;

		for token in tokens {
			let token = token.as_ref();
			self.links.entry(prefix.fingerprint()).or_default().add(token);
			prefix.add(token);
			learned += 1;
		}

		debug!("Learned {} tokens, chain size is now {}", learned, self.links.len());
	}

	/// Walks the chain starting from `seed`.
	///
	/// # Behavior
	/// - Every seed word is echoed to the output, followed by a space.
	/// - With `word_count == 0` the echo is returned untouched (trailing
	///   space included) and the chain is not consulted.
	/// - Otherwise up to `word_count` words are drawn; the walk stops early
	///   when the current prefix has never been seen. One trailing space is
	///   trimmed from a non-empty result.
	pub fn generate<R, S>(&self, seed: &[S], word_count: usize, rng: &mut R) -> String
	where
		R: Rng + ?Sized,
		S: AsRef<str>,
	{
		let mut prefix = Prefix::new(self.order);
		let mut result = String::new();

		for word in seed {
			let word = word.as_ref();
			result.push_str(word);
			result.push(SEPARATOR);
			prefix.add(word);
		}

		if word_count == 0 {
			return result;
		}

		let mut count = 0;
		while count < word_count {
			let Some(word) = self.successors(prefix.fingerprint()).and_then(|successors| successors.pick(&mut *rng)) else {
				break;
			};
			result.push_str(word);
			result.push(SEPARATOR);
			prefix.add(word);
			count += 1;
		}
		trace!("Generated {} of {} requested words", count, word_count);

		if !result.is_empty() {
			result.pop();
		}
		result
	}

	/// Merges another chain into this one.
	///
	/// # Notes
	/// - Both chains must have the same order.
	/// - Multiplicities for matching prefixes are summed.
	///
	/// # Errors
	/// Returns an error if the orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(ChainError::OrderMismatch { expected: self.order, found: other.order });
		}

		for (key, successors) in &other.links {
			if let Some(existing) = self.links.get_mut(key) {
				existing.merge(successors);
			} else {
				self.links.insert(*key, successors.clone());
			}
		}

		Ok(())
	}

	/// Encodes the chain into its binary form.
	///
	/// Layout: `[order][entry count]` then, per entry,
	/// `[fingerprint][successor count][successor]*`, where every integer is a
	/// varint and every successor a length-prefixed UTF-8 string. Successors
	/// are written in sorted order, duplicates repeated.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		postcard::to_stdvec(self).map_err(ChainError::Encode)
	}

	/// Decodes a chain previously produced by [`Chain::to_bytes`].
	///
	/// # Errors
	/// - Truncated or undecodable input
	/// - Order `0`, an entry without successors, or bytes left after the chain
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let (chain, rest): (Self, &[u8]) = postcard::take_from_bytes(bytes).map_err(ChainError::Decode)?;

		if !rest.is_empty() {
			return Err(ChainError::Malformed(format!("{} trailing bytes after chain", rest.len())));
		}
		if chain.order == 0 {
			return Err(ChainError::Malformed("prefix size is 0".to_owned()));
		}
		if let Some((key, _)) = chain.links.iter().find(|(_, successors)| successors.is_empty()) {
			return Err(ChainError::Malformed(format!("entry {key:#018x} has no successors")));
		}

		Ok(chain)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn tokens(text: &str) -> Vec<&str> {
		text.split_whitespace().collect()
	}

	#[test]
	fn rejects_zero_order() {
		assert!(matches!(Chain::new(0), Err(ChainError::InvalidOrder(0))));
	}

	#[test]
	fn keys_partial_windows() {
		let mut chain = Chain::new(2).unwrap();
		assert!(chain.is_empty());
		chain.learn_tokens(tokens("HELLO WORLD TEST1 TEST2"));
		assert!(!chain.is_empty());
		assert_eq!(chain.len(), 4);

		// Every prefix was followed by exactly one word
		assert_eq!(chain.iter().count(), 4);
		assert!(chain.iter().all(|(_, successors)| successors.len() == 1));

		let start = chain.successors(Prefix::new(2).fingerprint()).unwrap();
		assert_eq!(start.iter().collect::<Vec<_>>(), ["HELLO"]);
	}

	#[test]
	fn learning_is_additive() {
		let mut chain = Chain::new(3).unwrap();
		chain.learn_tokens(tokens("TEST TEST1 TEST2"));
		chain.learn_tokens(tokens("TEST TEST3 TEST4"));
		assert_eq!(chain.len(), 4);

		let start = chain.successors(0).unwrap();
		assert_eq!(start.count("TEST"), 2);
	}

	#[test]
	fn zero_word_count_echoes_seed() {
		let chain = Chain::new(2).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(chain.generate(&["A", "B"], 0, &mut rng), "A B ");
		assert_eq!(chain.generate::<_, &str>(&[], 0, &mut rng), "");
	}

	#[test]
	fn unknown_prefix_stops_the_walk() {
		let mut chain = Chain::new(1).unwrap();
		chain.learn_tokens(tokens("A B"));
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(chain.generate::<_, &str>(&[], 10, &mut rng), "A B");
		assert_eq!(chain.generate(&["Z"], 10, &mut rng), "Z");
	}

	#[test]
	fn merge_requires_same_order() {
		let mut left = Chain::new(2).unwrap();
		let right = Chain::new(3).unwrap();
		assert!(matches!(
			left.merge(&right),
			Err(ChainError::OrderMismatch { expected: 2, found: 3 })
		));
	}

	#[test]
	fn merge_matches_learning_both_texts() {
		let mut learned = Chain::new(2).unwrap();
		learned.learn_tokens(tokens("A B C"));
		learned.learn_tokens(tokens("A C B"));

		let mut left = Chain::new(2).unwrap();
		left.learn_tokens(tokens("A B C"));
		let mut right = Chain::new(2).unwrap();
		right.learn_tokens(tokens("A C B"));
		left.merge(&right).unwrap();

		assert_eq!(left, learned);
	}

	#[test]
	fn encodes_exact_layout() {
		let mut chain = Chain::new(2).unwrap();
		chain.learn_tokens(["HI"]);
		// order, entries, fingerprint of the empty prefix, one successor "HI"
		assert_eq!(chain.to_bytes().unwrap(), [2, 1, 0, 1, 2, b'H', b'I']);
	}

	#[test]
	fn decode_rejects_invalid_streams() {
		let mut chain = Chain::new(2).unwrap();
		chain.learn_tokens(tokens("A B C"));
		let bytes = chain.to_bytes().unwrap();

		assert!(matches!(Chain::from_bytes(&bytes[..bytes.len() - 1]), Err(ChainError::Decode(_))));
		assert!(Chain::from_bytes(&[]).is_err());

		let mut trailing = bytes.clone();
		trailing.push(0);
		assert!(matches!(Chain::from_bytes(&trailing), Err(ChainError::Malformed(_))));

		assert!(matches!(Chain::from_bytes(&[0, 0]), Err(ChainError::Malformed(_))));
		assert!(matches!(Chain::from_bytes(&[1, 1, 5, 0]), Err(ChainError::Malformed(_))));
	}
}
