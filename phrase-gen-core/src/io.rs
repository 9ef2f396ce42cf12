use std::fs;
use std::path::{Component, Path, PathBuf};
use std::{env, io};

use crate::error::{ChainError, Result};

/// Reads a corpus file and returns one phrase per line.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
///
/// # Errors
/// Returns `InvalidInput` if the file is not valid UTF-8 text.
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let filename = filename.as_ref();
	let contents = fs::read_to_string(filename).map_err(|e| match e.kind() {
		io::ErrorKind::InvalidData => {
			ChainError::InvalidInput(format!("{} is not UTF-8 text", filename.display()))
		}
		_ => ChainError::Io(e),
	})?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/proverbs.dat"` → `"proverbs"`
/// - `"proverbs.dat"` → `"proverbs"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| ChainError::InvalidInput("Path has no filename".to_owned()))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted so that loading order does
/// not depend on the file system.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Lists the model names of a folder: stems of its `.dat` files, sorted.
///
/// Example: `my.data.dat` → `"my.data"`
pub fn list_models<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
	list_files(dir, "dat")?.iter().map(get_filename).collect()
}

/// Resolves a model name to its corpus file inside `folder`.
///
/// The name must be a single plain path component: no separators,
/// no `.`/`..`, no root.
///
/// # Errors
/// Returns `InvalidInput` for any other name.
pub fn model_path<P: AsRef<Path>>(folder: P, name: &str) -> Result<PathBuf> {
	let mut components = Path::new(name).components();
	match (components.next(), components.next()) {
		(Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => {
			Ok(folder.as_ref().join(format!("{}.dat", name)))
		}
		_ => Err(ChainError::InvalidInput(format!("Invalid model name: {:?}", name))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scratch_dir(name: &str) -> PathBuf {
		let dir = env::temp_dir().join(format!("phrase_gen_io_{}_{}", name, std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn reads_one_phrase_per_line() {
		let dir = scratch_dir("lines");
		let path = dir.join("corpus.dat");
		fs::write(&path, "the cat sat\r\nthe cat ran\n\nend").unwrap();

		let lines = read_file(&path).unwrap();
		assert_eq!(lines, vec!["the cat sat", "the cat ran", "", "end"]);
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn rejects_binary_content() {
		let dir = scratch_dir("binary");
		let path = dir.join("corpus.dat");
		fs::write(&path, [0x66, 0x6f, 0xff, 0xfe, 0x0a]).unwrap();

		assert!(matches!(read_file(&path), Err(ChainError::InvalidInput(_))));
		assert!(matches!(read_file(dir.join("missing.dat")), Err(ChainError::Io(_))));
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn lists_matching_files_sorted() {
		let dir = scratch_dir("list");
		for name in ["b.dat", "a.dat", "notes.txt"] {
			fs::write(dir.join(name), "x").unwrap();
		}
		fs::create_dir_all(dir.join("nested.dat")).unwrap();

		assert_eq!(list_files(&dir, "dat").unwrap(), vec!["a.dat", "b.dat"]);
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn filenames_and_folders() {
		assert_eq!(get_filename("./data/proverbs.dat").unwrap(), "proverbs");
		assert_eq!(get_filename("proverbs.dat").unwrap(), "proverbs");
		assert!(get_filename("/").is_err());
		assert_eq!(normalize_folder("data/"), PathBuf::from("data/"));
		assert!(normalize_folder(".").is_absolute());
	}

	#[test]
	fn model_names_strip_only_the_extension() {
		let dir = scratch_dir("models");
		for name in ["my.data.dat", "proverbs.dat", "notes.txt"] {
			fs::write(dir.join(name), "x").unwrap();
		}

		assert_eq!(list_models(&dir).unwrap(), vec!["my.data", "proverbs"]);
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn model_paths_stay_inside_the_folder() {
		let folder = Path::new("data");
		assert_eq!(model_path(folder, "proverbs").unwrap(), PathBuf::from("data/proverbs.dat"));
		assert_eq!(model_path(folder, "my.data").unwrap(), PathBuf::from("data/my.data.dat"));

		for name in ["../secret", "..", ".", "", "/etc/passwd", "sub/model", "sub\\model", "./model"] {
			assert!(
				matches!(model_path(folder, name), Err(ChainError::InvalidInput(_))),
				"{name:?} was accepted"
			);
		}
	}
}
