use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Reads a whole text file.
pub fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Reads all of stdin as one text.
pub fn read_stdin() -> io::Result<String> {
	let mut contents = String::new();
	io::stdin().read_to_string(&mut contents)?;
	Ok(contents)
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/input.txt` + `"chain"` → `data/input.chain`
pub fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn replaces_extension() {
		let output = build_output_path("data/input.txt", "chain").unwrap();
		assert_eq!(output, PathBuf::from("data/input.chain"));
	}

	#[test]
	fn adds_extension_when_missing() {
		let output = build_output_path("book", "chain").unwrap();
		assert_eq!(output, PathBuf::from("book.chain"));
	}

	#[test]
	fn rejects_path_without_filename() {
		assert!(build_output_path("..", "chain").is_err());
	}
}
