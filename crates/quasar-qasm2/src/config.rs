//! Parser configuration and include resolution.

use std::borrow::Cow;

use rustc_hash::FxHashMap;

/// Name of the standard gate library include.
pub const QELIB1: &str = "qelib1.inc";

/// Built-in `qelib1.inc`: the composite standard gates, defined in terms of
/// the primitive gate table.
pub const QELIB1_SOURCE: &str = include_str!("qelib1.inc");

/// Supplies the content of `include "<path>";` directives.
///
/// The front end never touches the filesystem itself; anything that can map
/// a path to source text can back it.
pub trait IncludeResolver: Send + Sync {
    /// Return the content of `path`, or `None` if it is unknown.
    fn resolve(&self, path: &str) -> Option<String>;
}

/// Resolver that knows no files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIncludes;

impl IncludeResolver for NoIncludes {
    fn resolve(&self, _path: &str) -> Option<String> {
        None
    }
}

/// In-memory resolver keyed by include path.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    files: FxHashMap<String, String>,
}

impl MapResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl IncludeResolver for MapResolver {
    fn resolve(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}

/// Settings for one or more parses.
pub struct ParserConfig {
    resolver: Box<dyn IncludeResolver>,
    builtin_qelib1: bool,
}

impl ParserConfig {
    /// Default configuration: no include files, built-in `qelib1.inc` enabled.
    pub fn new() -> Self {
        Self {
            resolver: Box::new(NoIncludes),
            builtin_qelib1: true,
        }
    }

    /// Use `resolver` for include directives.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl IncludeResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Do not fall back to the built-in `qelib1.inc`.
    #[must_use]
    pub fn without_builtin_qelib1(mut self) -> Self {
        self.builtin_qelib1 = false;
        self
    }

    /// Resolve an include path. The resolver is asked first; the built-in
    /// `qelib1.inc` is the fallback.
    pub fn resolve_include(&self, path: &str) -> Option<Cow<'static, str>> {
        if let Some(content) = self.resolver.resolve(path) {
            return Some(Cow::Owned(content));
        }
        if self.builtin_qelib1 && path == QELIB1 {
            return Some(Cow::Borrowed(QELIB1_SOURCE));
        }
        None
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserConfig")
            .field("resolver", &"<dyn IncludeResolver>")
            .field("builtin_qelib1", &self.builtin_qelib1)
            .finish()
    }
}
