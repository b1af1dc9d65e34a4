//! Well-known query resource files.

use std::fmt;

/// A query resource looked up by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
	/// Syntax highlighting captures.
	Highlights,
	/// Language injection rules.
	Injections,
}

impl QueryKind {
	pub const ALL: [QueryKind; 2] = [QueryKind::Highlights, QueryKind::Injections];

	/// File name the resource is shipped under.
	pub const fn file_name(self) -> &'static str {
		match self {
			QueryKind::Highlights => "highlights.scm",
			QueryKind::Injections => "injections.scm",
		}
	}

	/// Maps a file name back to its kind.
	pub fn from_file_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.file_name() == name)
	}
}

impl fmt::Display for QueryKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.file_name().strip_suffix(".scm").unwrap_or(self.file_name()))
	}
}
