use unicode_segmentation::UnicodeSegmentation;

/// Splits text into the words fed to the chain.
///
/// Implementations must case-fold consistently: the same text has to produce
/// the same tokens whether it is used for learning or as a generation seed.
pub trait Tokenizer {
	fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Default tokenizer: upper-cases the text, then keeps the Unicode (UAX #29)
/// word segments that contain at least one letter or digit.
///
/// Whitespace and punctuation segments are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
	fn tokenize(&self, text: &str) -> Vec<String> {
		text.to_uppercase()
			.unicode_words()
			.map(str::to_owned)
			.collect()
	}
}
