//! Loading query files from disk.
//!
//! Only available with the `fs` feature. Targets without a filesystem still
//! get [`GrammarHandle::compile_query`] for query source embedded some other way.

use std::io;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;

use thiserror::Error;
use tracing::{debug, warn};
use tree_sitter::{Query, QueryError};

use crate::grammar::GrammarHandle;
use crate::query::QueryKind;

/// Errors that can occur when loading a query file.
#[derive(Error, Debug)]
pub enum QueryLoadError {
	/// The file could not be read.
	#[error("failed to read query file {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The file is not valid UTF-8.
	#[error("query file {} is not valid UTF-8: {source}", path.display())]
	InvalidUtf8 {
		path: PathBuf,
		#[source]
		source: Utf8Error,
	},

	/// The engine rejected the query source.
	#[error(
		"failed to compile query {} at {}:{}: {source}",
		path.display(),
		source.row + 1,
		source.column + 1
	)]
	Compile {
		path: PathBuf,
		#[source]
		source: QueryError,
	},
}

impl QueryLoadError {
	/// Path of the file that failed.
	pub fn path(&self) -> &Path {
		match self {
			Self::Io { path, .. } | Self::InvalidUtf8 { path, .. } | Self::Compile { path, .. } => path,
		}
	}

	/// True when the file itself could not be read.
	pub fn is_io(&self) -> bool {
		matches!(self, Self::Io { .. })
	}

	/// True for failures reported by the query compiler.
	pub fn is_compile(&self) -> bool {
		matches!(self, Self::Compile { .. })
	}

	/// The engine's diagnostic, for compile failures.
	pub fn query_error(&self) -> Option<&QueryError> {
		match self {
			Self::Compile { source, .. } => Some(source),
			_ => None,
		}
	}
}

/// Reads `path` and compiles it against `grammar`.
///
/// Every call reads and compiles afresh.
pub fn load_query(grammar: &GrammarHandle, path: &Path) -> Result<Query, QueryLoadError> {
	let bytes = std::fs::read(path).map_err(|source| QueryLoadError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	let source = std::str::from_utf8(&bytes).map_err(|source| QueryLoadError::InvalidUtf8 {
		path: path.to_path_buf(),
		source,
	})?;

	grammar.compile_query(source).map_err(|source| {
		warn!(
			path = %path.display(),
			row = source.row,
			column = source.column,
			error = %source.message,
			"Query compilation failed"
		);
		QueryLoadError::Compile {
			path: path.to_path_buf(),
			source,
		}
	})
}

/// The conventional queries of one grammar, each present only if shipped.
#[derive(Debug, Default)]
pub struct LanguageQueries {
	pub highlights: Option<Query>,
	pub injections: Option<Query>,
}

impl LanguageQueries {
	pub fn get(&self, kind: QueryKind) -> Option<&Query> {
		match kind {
			QueryKind::Highlights => self.highlights.as_ref(),
			QueryKind::Injections => self.injections.as_ref(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.highlights.is_none() && self.injections.is_none()
	}
}

impl GrammarHandle {
	/// Resolves and compiles the query of `kind`.
	///
	/// Returns `Ok(None)` when the grammar does not ship that file.
	pub fn load_query(&self, kind: QueryKind) -> Result<Option<Query>, QueryLoadError> {
		let Some(path) = self.query_file_url(kind) else {
			debug!(query = %kind, "No query file shipped");
			return Ok(None);
		};
		load_query(self, &path).map(Some)
	}

	/// Resolves and compiles every conventional query.
	///
	/// Stops at the first failure.
	pub fn load_queries(&self) -> Result<LanguageQueries, QueryLoadError> {
		Ok(LanguageQueries {
			highlights: self.load_query(QueryKind::Highlights)?,
			injections: self.load_query(QueryKind::Injections)?,
		})
	}
}
