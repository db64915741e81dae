//! Word-level Markov chain text generation library.
//!
//! This crate provides:
//! - Order-N word chains keyed by CRC-64 prefix fingerprints
//! - Additive learning from any number of texts
//! - Random-walk generation from a seed, with an injectable random source
//! - A compact binary format to store and reload learned chains
//!
//! Most users only need [`TextGenerator`].

/// Chain model, fingerprinting and generation logic.
pub mod model;

/// Text to word tokens.
pub mod tokenizer;

/// Generator configuration.
pub mod config;

/// Error type of fallible operations.
pub mod error;

/// I/O utilities (text loading, path helpers).
pub mod io;

pub use config::GeneratorConfig;
pub use error::ChainError;
pub use model::chain::Chain;
pub use model::generator::TextGenerator;
pub use tokenizer::{Tokenizer, WordTokenizer};
