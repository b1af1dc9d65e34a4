//! Deferred lookup of a grammar's resource directory.
//!
//! Providers are consulted every time a resource is requested, never at
//! construction. A provider may answer differently across calls if the
//! environment it inspects changes.

use std::path::PathBuf;

use crate::locate::BundleLocator;

/// Yields the root directory to search for a grammar's resource files.
///
/// Implementations must be free of side effects on shared state. Any
/// `Fn() -> Option<PathBuf>` closure is a provider.
pub trait DirectoryProvider: Send + Sync {
	/// Returns the search root, or `None` if the grammar has no resources here.
	fn resolve_root(&self) -> Option<PathBuf>;
}

impl<F> DirectoryProvider for F
where
	F: Fn() -> Option<PathBuf> + Send + Sync,
{
	fn resolve_root(&self) -> Option<PathBuf> {
		self()
	}
}

/// A provider that always answers with the same directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDirectory(pub PathBuf);

impl FixedDirectory {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self(path.into())
	}
}

impl DirectoryProvider for FixedDirectory {
	fn resolve_root(&self) -> Option<PathBuf> {
		Some(self.0.clone())
	}
}

/// A provider that looks up a resource bundle by logical name.
#[derive(Debug, Clone)]
pub struct BundleDirectory {
	name: String,
	locator: BundleLocator,
}

impl BundleDirectory {
	pub fn new(name: impl Into<String>, locator: BundleLocator) -> Self {
		Self {
			name: name.into(),
			locator,
		}
	}

	/// The logical bundle name being searched for.
	pub fn name(&self) -> &str {
		&self.name
	}
}

impl DirectoryProvider for BundleDirectory {
	fn resolve_root(&self) -> Option<PathBuf> {
		self.locator.locate(&self.name)
	}
}
