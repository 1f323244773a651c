//! Extension matching for loader hooks.
//!
//! The same predicate is applied to bare specifiers before resolution and to
//! fully resolved URLs afterwards, so it only looks at the tail of the string.

/// Default file extension handled by the loader.
pub const DEFAULT_EXTENSION: &str = ".vue";

/// Decides whether a specifier or URL points at a single-file component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMatcher {
    extension: String,
}

impl ExtensionMatcher {
    /// Create a matcher for the given extension (e.g. `.vue`).
    ///
    /// A missing leading dot is added so that `vue` and `.vue` behave the same.
    pub fn new(extension: impl Into<String>) -> Self {
        let mut extension = extension.into();
        if !extension.starts_with('.') {
            extension.insert(0, '.');
        }
        Self { extension }
    }

    /// The extension this matcher accepts, including the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns `true` when `identifier` ends with the extension.
    ///
    /// Anything after the extension (a query string, a hash) means no match.
    #[inline]
    pub fn matches(&self, identifier: &str) -> bool {
        identifier.ends_with(self.extension.as_str())
    }
}

impl Default for ExtensionMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}
