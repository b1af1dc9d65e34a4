//! Locating resource bundles and the files inside them.
//!
//! Query files ship as loose files in a bundle directory next to the
//! application rather than inside the grammar library. Bundle directory names
//! are usually decorated by the build system (`MyLang_MyLang.bundle`), so a
//! bundle matches when its directory name *contains* the logical name.
//!
//! Nothing here reports errors. A missing root, an unreadable directory or a
//! file that does not exist all collapse to `None`: most grammars ship no
//! resources at all, and one bad subtree must not hide a resource elsewhere.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Environment variable overriding the bundle search root.
pub const RESOURCE_ROOT_ENV: &str = "LINGO_RESOURCE_ROOT";

/// Where bundle discovery starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchRoot {
	/// A fixed directory.
	Explicit(PathBuf),
	/// The directory containing the running executable.
	Executable,
	/// The executable's directory, or `target/<profile>` when running under
	/// the cargo test harness (whose binaries live in `target/<profile>/deps`).
	#[default]
	Detect,
}

impl SearchRoot {
	/// Reads [`RESOURCE_ROOT_ENV`], falling back to [`SearchRoot::Detect`].
	pub fn from_env() -> Self {
		Self::from_var(std::env::var_os(RESOURCE_ROOT_ENV))
	}

	fn from_var(value: Option<OsString>) -> Self {
		match value {
			Some(path) if !path.is_empty() => Self::Explicit(PathBuf::from(path)),
			_ => Self::Detect,
		}
	}

	/// Resolves the strategy to a concrete directory.
	pub fn resolve(&self) -> Option<PathBuf> {
		match self {
			Self::Explicit(path) => Some(path.clone()),
			Self::Executable => executable_dir(),
			Self::Detect => executable_dir().map(|dir| detect_root(&dir)),
		}
	}
}

fn executable_dir() -> Option<PathBuf> {
	let exe = std::env::current_exe()
		.map_err(|e| debug!(error = %e, "Cannot determine current executable"))
		.ok()?;
	exe.parent().map(Path::to_path_buf)
}

/// Maps an executable directory to the root bundles are installed in.
fn detect_root(exe_dir: &Path) -> PathBuf {
	if exe_dir.file_name().is_some_and(|name| name == "deps")
		&& let Some(profile_dir) = exe_dir.parent()
	{
		trace!(root = %profile_dir.display(), "Running under test harness");
		return profile_dir.to_path_buf();
	}
	exe_dir.to_path_buf()
}

/// Finds resource bundles by logical name beneath a [`SearchRoot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleLocator {
	root: SearchRoot,
}

impl BundleLocator {
	pub fn new(root: SearchRoot) -> Self {
		Self { root }
	}

	/// A locator configured from the process environment.
	pub fn from_env() -> Self {
		Self::new(SearchRoot::from_env())
	}

	pub fn root(&self) -> &SearchRoot {
		&self.root
	}

	/// Returns the first directory directly under the root whose name
	/// contains `name`.
	///
	/// Enumeration order is whatever the OS returns; if several bundles
	/// match, which one wins is unspecified.
	pub fn locate(&self, name: &str) -> Option<PathBuf> {
		let root = self.root.resolve()?;
		let entries = match fs::read_dir(&root) {
			Ok(entries) => entries,
			Err(e) => {
				debug!(root = %root.display(), bundle = name, error = %e, "Cannot read bundle root");
				return None;
			}
		};

		let found = entries.filter_map(Result::ok).map(|entry| entry.path()).find(|path| {
			path.is_dir()
				&& path
					.file_name()
					.and_then(|n| n.to_str())
					.is_some_and(|n| n.contains(name))
		});

		match &found {
			Some(path) => debug!(bundle = name, path = %path.display(), "Resolved resource bundle"),
			None => debug!(bundle = name, root = %root.display(), "No resource bundle found"),
		}
		found
	}
}

/// Searches `directory` recursively for a file called exactly `name`.
///
/// The walk is depth-first in enumeration order and stops at the first hit.
/// Hidden entries below `directory` are skipped. Unreadable subtrees are
/// skipped as well, so the result is `None` rather than an error when the
/// file cannot be found for any reason.
pub fn find_file(name: &str, directory: &Path) -> Option<PathBuf> {
	WalkDir::new(directory)
		.min_depth(1)
		.follow_links(true)
		.into_iter()
		.filter_entry(|entry| !is_hidden(entry))
		.filter_map(|entry| {
			entry
				.map_err(|e| trace!(dir = %directory.display(), error = %e, "Skipping unreadable entry"))
				.ok()
		})
		.find(|entry| entry.file_type().is_file() && entry.file_name() == name)
		.map(DirEntry::into_path)
}

fn is_hidden(entry: &DirEntry) -> bool {
	entry.file_name().as_encoded_bytes().first() == Some(&b'.')
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn touch(path: &Path) {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).unwrap();
		}
		fs::write(path, "; query\n").unwrap();
	}

	#[test]
	fn test_find_file_nested() {
		let temp = tempfile::tempdir().unwrap();
		let root = temp.path();
		touch(&root.join("README.md"));
		touch(&root.join("a/notes.txt"));
		touch(&root.join("a/b/injections.txt"));
		touch(&root.join("a/b/c/highlights.scm"));
		touch(&root.join("z/other.scm"));

		assert_eq!(
			find_file("highlights.scm", root),
			Some(root.join("a/b/c/highlights.scm"))
		);
	}

	#[test]
	fn test_find_file_requires_exact_name() {
		let temp = tempfile::tempdir().unwrap();
		touch(&temp.path().join("highlights.scm.bak"));
		touch(&temp.path().join("my-highlights.scm"));

		assert_eq!(find_file("highlights.scm", temp.path()), None);
	}

	#[test]
	fn test_find_file_ignores_directories_with_matching_name() {
		let temp = tempfile::tempdir().unwrap();
		fs::create_dir_all(temp.path().join("highlights.scm")).unwrap();

		assert_eq!(find_file("highlights.scm", temp.path()), None);
	}

	#[test]
	fn test_find_file_empty_directory() {
		let temp = tempfile::tempdir().unwrap();
		assert_eq!(find_file("highlights.scm", temp.path()), None);
	}

	#[test]
	fn test_find_file_skips_hidden() {
		let temp = tempfile::tempdir().unwrap();
		touch(&temp.path().join(".highlights.scm"));
		touch(&temp.path().join(".cache/highlights.scm"));

		assert_eq!(find_file("highlights.scm", temp.path()), None);
	}

	#[test]
	fn test_find_file_hidden_root_is_searched() {
		let temp = tempfile::tempdir().unwrap();
		let root = temp.path().join(".resources");
		touch(&root.join("queries/highlights.scm"));

		assert_eq!(
			find_file("highlights.scm", &root),
			Some(root.join("queries/highlights.scm"))
		);
	}

	#[test]
	fn test_find_file_missing_root() {
		let temp = tempfile::tempdir().unwrap();
		assert_eq!(
			find_file("highlights.scm", &temp.path().join("does-not-exist")),
			None
		);
	}

	#[cfg(unix)]
	#[test]
	fn test_find_file_skips_hidden_non_utf8_dir() {
		use std::ffi::OsStr;
		use std::os::unix::ffi::OsStrExt;

		let temp = tempfile::tempdir().unwrap();
		let hidden = temp.path().join(OsStr::from_bytes(b".cache\xff"));
		touch(&hidden.join("highlights.scm"));

		assert_eq!(find_file("highlights.scm", temp.path()), None);
	}

	#[cfg(unix)]
	#[test]
	fn test_find_file_survives_unreadable_subtree() {
		use std::os::unix::fs::PermissionsExt;

		let temp = tempfile::tempdir().unwrap();
		let locked = temp.path().join("locked");
		touch(&locked.join("secret.txt"));
		touch(&temp.path().join("open/highlights.scm"));
		fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

		let found = find_file("highlights.scm", temp.path());

		fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
		assert_eq!(found, Some(temp.path().join("open/highlights.scm")));
	}

	#[test]
	fn test_locate_matches_by_substring() {
		let temp = tempfile::tempdir().unwrap();
		fs::create_dir(temp.path().join("MyLang_MyLang.bundle")).unwrap();
		fs::create_dir(temp.path().join("OtherLang.bundle")).unwrap();

		let locator = BundleLocator::new(SearchRoot::Explicit(temp.path().to_path_buf()));
		assert_eq!(
			locator.locate("MyLang"),
			Some(temp.path().join("MyLang_MyLang.bundle"))
		);
		assert_eq!(
			locator.locate("OtherLang"),
			Some(temp.path().join("OtherLang.bundle"))
		);
	}

	#[test]
	fn test_locate_ignores_files() {
		let temp = tempfile::tempdir().unwrap();
		touch(&temp.path().join("MyLang.bundle"));

		let locator = BundleLocator::new(SearchRoot::Explicit(temp.path().to_path_buf()));
		assert_eq!(locator.locate("MyLang"), None);
	}

	#[test]
	fn test_locate_no_match() {
		let temp = tempfile::tempdir().unwrap();
		fs::create_dir(temp.path().join("OtherLang.bundle")).unwrap();

		let locator = BundleLocator::new(SearchRoot::Explicit(temp.path().to_path_buf()));
		assert_eq!(locator.locate("MyLang"), None);
	}

	#[test]
	fn test_locate_missing_root() {
		let temp = tempfile::tempdir().unwrap();
		let locator = BundleLocator::new(SearchRoot::Explicit(temp.path().join("gone")));
		assert_eq!(locator.locate("MyLang"), None);
	}

	#[rstest]
	#[case("/work/target/debug/deps", "/work/target/debug")]
	#[case("/work/target/release/deps", "/work/target/release")]
	#[case("/usr/local/bin", "/usr/local/bin")]
	#[case("/opt/deps-tools", "/opt/deps-tools")]
	fn test_detect_root(#[case] exe_dir: &str, #[case] expected: &str) {
		assert_eq!(detect_root(Path::new(exe_dir)), PathBuf::from(expected));
	}

	#[test]
	fn test_search_root_from_var() {
		assert_eq!(SearchRoot::from_var(None), SearchRoot::Detect);
		assert_eq!(SearchRoot::from_var(Some(OsString::new())), SearchRoot::Detect);
		assert_eq!(
			SearchRoot::from_var(Some(OsString::from("/srv/bundles"))),
			SearchRoot::Explicit(PathBuf::from("/srv/bundles"))
		);
	}

	#[test]
	fn test_detect_resolves_under_test_harness() {
		// Test binaries run from target/<profile>/deps.
		let root = SearchRoot::Detect.resolve().unwrap();
		let exe_dir = SearchRoot::Executable.resolve().unwrap();
		assert_eq!(exe_dir.file_name().unwrap(), "deps");
		assert_eq!(Some(root.as_path()), exe_dir.parent());
	}
}
