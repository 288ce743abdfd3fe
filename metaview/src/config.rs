use regex::Regex;

use crate::Result;

const DEFAULT_ACCESSOR_PATTERN: &str = "^(get|is)";

const DEFAULT_EXCLUDED_ACCESSORS: &[&str] = &[
    "toString",
    "hashCode",
    "compareTo",
    "wait",
    "accept",
    "notify",
    "notifyAll",
    "class",
    "getClass",
    "delete",
    "getmodifDate",
    "isValid",
    "hid",
    "getHid",
    "lid",
    "getLid",
    "getMetaclassId",
    "sessionId",
    "getSessionId",
    "getElementStatus",
];

/// Session configuration for discovery, path computation and caching.
///
/// Use the builder methods to customize, or [`Default`] for the
/// settings that match the common getter-based host runtimes.
///
/// # Examples
///
/// ```rust
/// use metaview::Config;
///
/// let config = Config::default()
///     .with_max_ancestor_depth(64)        // Shallow models only
///     .with_element_cache(true)           // Reuse descriptors by identifier
///     .with_excluded_accessor("getUuid"); // Hide bookkeeping accessors
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Accessor names must match this pattern to become features.
    /// Default: `^(get|is)`
    pub accessor_pattern: Regex,

    /// Accessor names that never become features, even when they match
    /// `accessor_pattern` (generic object protocol, identity, session and
    /// validity queries).
    pub excluded_accessors: Vec<String>,

    /// Whether discovery for a metaclass descriptor includes inherited accessors.
    /// Default: true
    pub include_inherited: bool,

    /// Maximum number of ancestors walked when computing parents and paths.
    /// Default: 256
    pub max_ancestor_depth: usize,

    /// Separator between ancestor names in an element path.
    /// Default: `.`
    pub path_separator: String,

    /// Separator between metaclass names in a metaclass signature.
    /// Default: ` > `
    pub signature_separator: String,

    /// Reuse element descriptors across lookups, keyed by the host's
    /// stable identifier. Cached descriptors keep their memoized slot values,
    /// so they never reflect later changes of the underlying instance.
    /// Default: false
    pub cache_elements: bool,
}

impl Default for Config {
    /// # Panics
    ///
    /// Never in practice: the default accessor pattern is a constant, valid regex.
    fn default() -> Self {
        Config {
            accessor_pattern: Regex::new(DEFAULT_ACCESSOR_PATTERN)
                .expect("default accessor pattern is valid"),
            excluded_accessors: DEFAULT_EXCLUDED_ACCESSORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            include_inherited: true,
            max_ancestor_depth: 256,
            path_separator: ".".into(),
            signature_separator: " > ".into(),
            cache_elements: false,
        }
    }
}

impl Config {
    /// Replace the accessor name pattern.
    ///
    /// Fails with [`Error::InvalidAccessorPattern`](crate::Error::InvalidAccessorPattern)
    /// if `pattern` is not a valid regular expression.
    pub fn with_accessor_pattern(mut self, pattern: &str) -> Result<Self> {
        self.accessor_pattern = Regex::new(pattern)?;
        Ok(self)
    }

    /// Add a name to the accessor denylist.
    pub fn with_excluded_accessor(mut self, name: impl Into<String>) -> Self {
        self.excluded_accessors.push(name.into());
        self
    }

    pub fn with_inherited_features(mut self, include: bool) -> Self {
        self.include_inherited = include;
        self
    }

    /// Set the ancestor walk cutoff.
    ///
    /// Ancestor chains deeper than this are reported as
    /// [`Error::AncestorDepthExceeded`](crate::Error::AncestorDepthExceeded).
    pub fn with_max_ancestor_depth(mut self, depth: usize) -> Self {
        self.max_ancestor_depth = depth;
        self
    }

    pub fn with_path_separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = separator.into();
        self
    }

    pub fn with_signature_separator(mut self, separator: impl Into<String>) -> Self {
        self.signature_separator = separator.into();
        self
    }

    /// Enable or disable element descriptor reuse across lookups.
    pub fn with_element_cache(mut self, enabled: bool) -> Self {
        self.cache_elements = enabled;
        self
    }

    pub(crate) fn is_excluded(&self, accessor: &str) -> bool {
        self.excluded_accessors.iter().any(|name| name == accessor)
    }

    pub(crate) fn is_accessor_name(&self, accessor: &str) -> bool {
        self.accessor_pattern.is_match(accessor) && !self.is_excluded(accessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_getters_and_queries() {
        let config = Config::default();
        assert!(config.is_accessor_name("getName"));
        assert!(config.is_accessor_name("isAbstract"));
        assert!(!config.is_accessor_name("setName"));
        assert!(!config.is_accessor_name("name"));
    }

    #[test]
    fn denylist_wins_over_pattern() {
        let config = Config::default();
        assert!(!config.is_accessor_name("getClass"));
        assert!(!config.is_accessor_name("isValid"));
        assert!(!config.is_accessor_name("getSessionId"));

        let config = config.with_excluded_accessor("getUuid");
        assert!(!config.is_accessor_name("getUuid"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let result = Config::default().with_accessor_pattern("^(get");
        assert!(matches!(result, Err(crate::Error::InvalidAccessorPattern(_))));
    }
}
