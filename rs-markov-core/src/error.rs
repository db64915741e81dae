//! Error type shared by the chain, persistence and generator layers.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ChainError {
	/// The persistence target could not be opened.
	Open { path: PathBuf, source: io::Error },
	/// Reading or writing an already opened stream failed.
	Io(io::Error),
	Encode(postcard::Error),
	Decode(postcard::Error),
	/// The stream decoded but does not describe a valid chain.
	Malformed(String),
	/// Chains must look back at least one word.
	InvalidOrder(usize),
	OrderMismatch { expected: usize, found: usize },
}

impl fmt::Display for ChainError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Open { path, source } => {
				write!(f, "Can't open file '{}': {source}", path.display())
			}
			Self::Io(err) => write!(f, "I/O error: {err}"),
			Self::Encode(err) => write!(f, "Failed to encode chain: {err}"),
			Self::Decode(err) => write!(f, "Failed to decode chain: {err}"),
			Self::Malformed(msg) => write!(f, "Malformed chain data: {msg}"),
			Self::InvalidOrder(order) => write!(f, "Prefix size must be > 0, got {order}"),
			Self::OrderMismatch { expected, found } => {
				write!(f, "Prefix size mismatch: expected {expected}, found {found}")
			}
		}
	}
}

impl std::error::Error for ChainError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Open { source, .. } => Some(source),
			Self::Io(err) => Some(err),
			Self::Encode(err) | Self::Decode(err) => Some(err),
			_ => None,
		}
	}
}

impl From<io::Error> for ChainError {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

pub type Result<T> = std::result::Result<T, ChainError>;
