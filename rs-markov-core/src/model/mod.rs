//! Top-level module for the word-level Markov chain.
//!
//! This module provides:
//! - Prefix fingerprinting (`Fingerprint`)
//! - The sliding prefix window (`Prefix`)
//! - Weighted successor multisets (`Successors`)
//! - The chain itself, with learning, generation and persistence (`Chain`)
//! - A high-level generation interface (`TextGenerator`)

/// High-level interface owning a chain, a tokenizer and a random source.
///
/// Exposes learning from raw text, generation from a seed, and
/// store/load with a retrievable error message.
pub mod generator;

/// Word-level Markov chain of fixed order.
///
/// Handles transition learning, random walks, merging and the binary
/// chain format.
pub mod chain;

/// CRC-64 digest used as the chain key.
pub mod fingerprint;

/// Fixed-capacity window over the last words.
pub mod prefix;

/// Multiset of successor words with weighted sampling.
pub mod successors;
