use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Multiset of words observed after one prefix.
///
/// Conceptually this is the set of outgoing edges of a node in the Markov
/// chain, where every observation of a word counts as one more copy of it.
/// Words are kept in sorted order with their multiplicity, which is the
/// order they are drawn from and written to disk in.
///
/// ## Responsibilities:
/// - Accumulate word occurrences during learning
/// - Draw a word with probability proportional to its multiplicity
/// - Merge with the successors of the same prefix from another chain
///
/// ## Invariants
/// - Every stored multiplicity is strictly positive
/// - `total` is the sum of all multiplicities
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Successors {
	/// Word => number of times it was observed.
	/// Example: { "TEST1" => 2, "TEST3" => 1 }
	counts: BTreeMap<String, usize>,
	total: usize,
}

impl Successors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one more occurrence of `word`.
	pub fn add(&mut self, word: &str) {
		match self.counts.get_mut(word) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(word.to_owned(), 1);
			}
		}
		self.total += 1;
	}

	/// Number of elements in the multiset, duplicates included.
	pub fn len(&self) -> usize {
		self.total
	}

	pub fn is_empty(&self) -> bool {
		self.total == 0
	}

	/// Multiplicity of `word` (0 when never observed).
	pub fn count(&self, word: &str) -> usize {
		self.counts.get(word).copied().unwrap_or(0)
	}

	/// Iterates over the multiset in sorted order, repeating duplicates.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.counts
			.iter()
			.flat_map(|(word, &count)| std::iter::repeat_n(word.as_str(), count))
	}

	/// Returns the element at `index` in sorted iteration order.
	///
	/// This is an O(distinct words) scan over the multiplicities rather than
	/// a walk over every duplicate.
	pub fn nth(&self, index: usize) -> Option<&str> {
		let mut remaining = index;
		for (word, &count) in &self.counts {
			if remaining < count {
				return Some(word);
			}
			remaining -= count;
		}
		None
	}

	/// Draws a word uniformly over the multiset.
	///
	/// Every duplicate is an equally likely draw, so a word seen twice is
	/// twice as likely as a word seen once.
	///
	/// Returns `None` if the multiset is empty.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		if self.total == 0 {
			return None;
		}
		self.nth(rng.random_range(0..self.total))
	}

	/// Adds every occurrence from `other` into this multiset.
	pub fn merge(&mut self, other: &Self) {
		for (word, &count) in &other.counts {
			*self.counts.entry(word.clone()).or_insert(0) += count;
		}
		self.total += other.total;
	}
}

// On the wire a multiset is a plain sequence of words, duplicates repeated.
impl Serialize for Successors {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut seq = serializer.serialize_seq(Some(self.total))?;
		for word in self.iter() {
			seq.serialize_element(word)?;
		}
		seq.end()
	}
}

struct SuccessorsVisitor;

impl<'de> Visitor<'de> for SuccessorsVisitor {
	type Value = Successors;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a sequence of successor words")
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
		let mut successors = Successors::new();
		while let Some(word) = seq.next_element::<String>()? {
			successors.add(&word);
		}
		Ok(successors)
	}
}

impl<'de> Deserialize<'de> for Successors {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_seq(SuccessorsVisitor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn sample() -> Successors {
		let mut successors = Successors::new();
		for word in ["B", "A", "C", "A"] {
			successors.add(word);
		}
		successors
	}

	#[test]
	fn keeps_duplicates() {
		let successors = sample();
		assert_eq!(successors.len(), 4);
		assert_eq!(successors.count("A"), 2);
		assert_eq!(successors.count("Z"), 0);
	}

	#[test]
	fn iterates_sorted_with_repeats() {
		let successors = sample();
		let words: Vec<&str> = successors.iter().collect();
		assert_eq!(words, ["A", "A", "B", "C"]);
	}

	#[test]
	fn nth_follows_sorted_order() {
		let successors = sample();
		assert_eq!(successors.nth(0), Some("A"));
		assert_eq!(successors.nth(1), Some("A"));
		assert_eq!(successors.nth(2), Some("B"));
		assert_eq!(successors.nth(3), Some("C"));
		assert_eq!(successors.nth(4), None);
	}

	#[test]
	fn pick_on_empty_is_none() {
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(Successors::new().pick(&mut rng), None);
	}

	#[test]
	fn pick_on_singleton_is_deterministic() {
		let mut successors = Successors::new();
		successors.add("ONLY");
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..10 {
			assert_eq!(successors.pick(&mut rng), Some("ONLY"));
		}
	}

	#[test]
	fn merge_sums_multiplicities() {
		let mut left = sample();
		let mut right = Successors::new();
		right.add("A");
		right.add("D");

		left.merge(&right);
		assert_eq!(left.len(), 6);
		assert_eq!(left.count("A"), 3);
		assert_eq!(left.count("D"), 1);
	}

	#[test]
	fn wire_format_repeats_duplicates() {
		let bytes = postcard::to_stdvec(&sample()).unwrap();
		assert_eq!(bytes, [4, 1, b'A', 1, b'A', 1, b'B', 1, b'C']);

		let decoded: Successors = postcard::from_bytes(&bytes).unwrap();
		assert_eq!(decoded, sample());
	}
}
