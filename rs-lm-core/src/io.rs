use std::ffi::OsStr;
use std::path::Path;
use std::{fs, io};

/// Reads a corpus file and returns its whole content as one text blob.
///
/// - No line splitting, no trimming: every character is kept
/// - Fails if the file is not valid UTF-8
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Lists the files with a given extension in a directory.
///
/// Returns base names only (no path, no extension), sorted.
pub fn list_corpora<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut names = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			if let Some(stem) = path.file_stem() {
				names.push(stem.to_string_lossy().to_string());
			}
		}
	}

	names.sort();
	Ok(names)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_corpus_keeps_everything() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		fs::write(&path, "Line one\r\nline two\n\n").unwrap();
		assert_eq!(read_corpus(&path).unwrap(), "Line one\r\nline two\n\n");
	}

	#[test]
	fn test_read_corpus_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = read_corpus(dir.path().join("missing.txt")).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}

	#[test]
	fn test_list_corpora() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("shakespeare.txt"), "to be").unwrap();
		fs::write(dir.path().join("alice.txt"), "down").unwrap();
		fs::write(dir.path().join("notes.md"), "skip").unwrap();
		fs::create_dir(dir.path().join("nested.txt")).unwrap();

		assert_eq!(list_corpora(dir.path(), "txt").unwrap(), vec!["alice", "shakespeare"]);
	}
}
