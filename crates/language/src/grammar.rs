//! Grammar handles.
//!
//! A [`GrammarHandle`] wraps a compiled tree-sitter grammar descriptor together
//! with an optional [`DirectoryProvider`] that says where the grammar's loose
//! query files live. The descriptor itself is owned by the engine for the
//! lifetime of the process; the handle only borrows it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

use tree_sitter::{Language, Query, QueryError};
use tree_sitter_language::LanguageFn;

use crate::locate::{BundleLocator, find_file};
use crate::provider::{BundleDirectory, DirectoryProvider};
use crate::query::QueryKind;

/// Newest grammar ABI version the linked engine understands.
pub fn engine_version() -> usize {
	tree_sitter::LANGUAGE_VERSION
}

/// Oldest grammar ABI version the linked engine still accepts.
pub fn minimum_compatible_version() -> usize {
	tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION
}

/// A compiled grammar plus the strategy used to find its query resources.
///
/// Equality and hashing are by descriptor identity: two handles are equal iff
/// they wrap the same descriptor address. Grammars with identical contents
/// loaded from different descriptors compare unequal. The attached provider
/// never takes part in equality.
#[derive(Clone)]
pub struct GrammarHandle {
	language: Language,
	provider: Option<Arc<dyn DirectoryProvider>>,
}

impl GrammarHandle {
	/// Wraps a grammar that ships no resource files.
	pub fn new(language: Language) -> Self {
		Self::with_directory_provider(language, None)
	}

	/// Wraps a grammar exported by a grammar crate (`tree_sitter_rust::LANGUAGE` etc).
	pub fn from_fn(language: LanguageFn) -> Self {
		Self::new(Language::new(language))
	}

	/// Wraps a grammar whose resources are found through `provider`.
	pub fn with_provider(language: Language, provider: impl DirectoryProvider + 'static) -> Self {
		Self::with_directory_provider(language, Some(Arc::new(provider)))
	}

	/// Wraps a grammar with an optional, already type-erased provider.
	pub fn with_directory_provider(
		language: Language,
		provider: Option<Arc<dyn DirectoryProvider>>,
	) -> Self {
		Self { language, provider }
	}

	/// Wraps a grammar whose resources live in the bundle named `bundle`.
	///
	/// The bundle is looked up under [`BundleLocator::from_env`] each time a
	/// resource is requested. A bundle that cannot be found behaves exactly
	/// like a grammar with no resources.
	pub fn with_bundle(language: Language, bundle: impl Into<String>) -> Self {
		Self::with_bundle_in(language, bundle, BundleLocator::from_env())
	}

	/// Like [`with_bundle`](Self::with_bundle), with an explicit locator.
	pub fn with_bundle_in(
		language: Language,
		bundle: impl Into<String>,
		locator: BundleLocator,
	) -> Self {
		Self::with_provider(language, BundleDirectory::new(bundle, locator))
	}

	/// The underlying engine descriptor.
	pub fn language(&self) -> &Language {
		&self.language
	}

	/// The provider consulted for resource lookups, if any.
	pub fn directory_provider(&self) -> Option<&Arc<dyn DirectoryProvider>> {
		self.provider.as_ref()
	}

	/// ABI version the grammar was generated with.
	pub fn abi_version(&self) -> usize {
		self.language.abi_version()
	}

	/// Whether the linked engine can load this grammar.
	pub fn is_compatible(&self) -> bool {
		(minimum_compatible_version()..=engine_version()).contains(&self.abi_version())
	}

	/// Number of symbols (node kinds), including hidden and anonymous ones.
	pub fn symbol_count(&self) -> usize {
		self.language.node_kind_count()
	}

	/// Number of distinct field names.
	pub fn field_count(&self) -> usize {
		self.language.field_count()
	}

	/// Name of the symbol with `id`, or `None` when `id >= symbol_count()`.
	pub fn symbol_name(&self, id: u16) -> Option<&'static str> {
		if usize::from(id) >= self.symbol_count() {
			return None;
		}
		self.language.node_kind_for_id(id)
	}

	/// Id of the symbol called `name`.
	///
	/// `named` selects between a named node and an anonymous token with the
	/// same text. Returns `None` when the grammar has no such symbol; the
	/// engine's builtin `ERROR` symbol lies outside the symbol table and is
	/// reported as `None` too, so every id returned here has a
	/// [`symbol_name`](Self::symbol_name).
	pub fn symbol_id(&self, name: &str, named: bool) -> Option<u16> {
		match self.language.id_for_node_kind(name, named) {
			0 if name != "end" => None,
			id if usize::from(id) >= self.symbol_count() => None,
			id => Some(id),
		}
	}

	/// Name of the field with `id`.
	///
	/// Field id 0 is reserved by the engine; valid ids are `1..=field_count()`.
	pub fn field_name(&self, id: u16) -> Option<&'static str> {
		if id == 0 || usize::from(id) > self.field_count() {
			return None;
		}
		self.language.field_name_for_id(id)
	}

	/// Id of the field called `name`.
	pub fn field_id(&self, name: &str) -> Option<u16> {
		self.language.field_id_for_name(name).map(u16::from)
	}

	/// Compiles in-memory query source against this grammar.
	///
	/// This path never touches the filesystem.
	pub fn compile_query(&self, source: &str) -> Result<Query, QueryError> {
		Query::new(&self.language, source)
	}

	/// Finds `file_name` anywhere under the provider's root directory.
	///
	/// Returns `None` when there is no provider, the provider resolves to
	/// nothing, or no file of that name exists.
	pub fn resource_url(&self, file_name: &str) -> Option<PathBuf> {
		let root = self.provider.as_ref()?.resolve_root()?;
		find_file(file_name, &root)
	}

	/// Location of the conventional file for `kind`.
	pub fn query_file_url(&self, kind: QueryKind) -> Option<PathBuf> {
		self.resource_url(kind.file_name())
	}

	/// Location of `highlights.scm`.
	pub fn highlights_file_url(&self) -> Option<PathBuf> {
		self.query_file_url(QueryKind::Highlights)
	}

	/// Location of `injections.scm`.
	pub fn injections_file_url(&self) -> Option<PathBuf> {
		self.query_file_url(QueryKind::Injections)
	}
}

impl From<Language> for GrammarHandle {
	fn from(language: Language) -> Self {
		Self::new(language)
	}
}

impl From<LanguageFn> for GrammarHandle {
	fn from(language: LanguageFn) -> Self {
		Self::from_fn(language)
	}
}

// `tree_sitter::Language` compares and hashes the descriptor pointer.
impl PartialEq for GrammarHandle {
	fn eq(&self, other: &Self) -> bool {
		self.language == other.language
	}
}

impl Eq for GrammarHandle {}

impl Hash for GrammarHandle {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.language.hash(state);
	}
}

impl fmt::Debug for GrammarHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GrammarHandle")
			.field("language", &self.language)
			.field("provider", &self.provider.as_ref().map(|_| ".."))
			.finish()
	}
}
