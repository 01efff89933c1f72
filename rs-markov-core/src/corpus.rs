use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Extension of corpus files looked up by [`list_corpora`] callers.
pub const CORPUS_EXTENSION: &str = "txt";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
	move |source| Error::Io { path: path.to_path_buf(), source }
}

/// Reads a corpus file, one source string per non-blank line.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
	let path = path.as_ref();
	let contents = fs::read_to_string(path).map_err(io_error(path))?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect())
}

/// Lists the corpus names (file stems) with the given extension in a directory.
///
/// Subdirectories are ignored, names are sorted.
///
/// Example: `data/{cats.txt,dogs.txt,notes.md}` with `"txt"` → `["cats", "dogs"]`
pub fn list_corpora<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>> {
	let dir = dir.as_ref();
	let mut names = Vec::new();

	for entry in fs::read_dir(dir).map_err(io_error(dir))? {
		let path = entry.map_err(io_error(dir))?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(stem) = path.file_stem() {
				names.push(stem.to_string_lossy().to_string());
			}
		}
	}

	names.sort();
	Ok(names)
}

/// Path of the corpus `name` inside `dir`.
///
/// Example: `("./data", "cats")` → `./data/cats.txt`
pub fn corpus_path<P: AsRef<Path>>(dir: P, name: &str) -> PathBuf {
	dir.as_ref().join(format!("{name}.{CORPUS_EXTENSION}"))
}

/// Reads the named corpora from `dir` and concatenates their lines in order.
pub fn load_corpora<P: AsRef<Path>, S: AsRef<str>>(dir: P, names: &[S]) -> Result<Vec<String>> {
	let mut sources = Vec::new();
	for name in names {
		let path = corpus_path(&dir, name.as_ref());
		let lines = read_corpus(&path)?;
		debug!("read {} lines from {}", lines.len(), path.display());
		sources.extend(lines);
	}
	Ok(sources)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn write(dir: &Path, name: &str, contents: &str) {
		fs::write(dir.join(name), contents).unwrap();
	}

	#[test]
	fn reads_non_blank_lines() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "cats.txt", "The cat sat.\r\n\n   \nThe cat ran.\n");
		assert_eq!(read_corpus(dir.path().join("cats.txt")).unwrap(), vec!["The cat sat.", "The cat ran."]);
	}

	#[test]
	fn lists_only_matching_files() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "dogs.txt", "woof");
		write(dir.path(), "cats.txt", "meow");
		write(dir.path(), "notes.md", "skip");
		fs::create_dir(dir.path().join("nested.txt")).unwrap();

		assert_eq!(list_corpora(dir.path(), "txt").unwrap(), vec!["cats", "dogs"]);
	}

	#[test]
	fn loads_in_requested_order() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "a.txt", "first\nsecond");
		write(dir.path(), "b.txt", "third");

		assert_eq!(load_corpora(dir.path(), &["b", "a"]).unwrap(), vec!["third", "first", "second"]);
	}

	#[test]
	fn missing_corpus_is_an_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = load_corpora(dir.path(), &["ghost"]).unwrap_err();
		assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with("ghost.txt")));
		assert!(!err.is_invalid_argument());
	}
}
