use crate::host::AccessorFault;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Metaclass '{metaclass}' has no feature named '{feature}'")]
    UnknownFeature { metaclass: String, feature: String },

    #[error("No metaclass is registered under the name '{0}'")]
    UnresolvedMetaclass(String),

    #[error("Ancestor cycle detected at element '{identifier}'")]
    AncestorCycle { identifier: String },

    #[error("Ancestor chain exceeds the configured depth of {limit}")]
    AncestorDepthExceeded { limit: usize },

    #[error("Accessor invocation failed: {0}")]
    Accessor(#[from] AccessorFault),

    #[error("Expected exactly one '{metaclass}' named '{name}', found {matches}")]
    AmbiguousOrMissingNamedInstance {
        metaclass: String,
        name: String,
        matches: usize,
    },

    #[error("Synthetic feature '{metaclass}.{feature}' registered after descriptors were built")]
    LateSyntheticFeature { metaclass: String, feature: String },

    #[error("Invalid accessor pattern: {0}")]
    InvalidAccessorPattern(String),
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidAccessorPattern(e.to_string())
    }
}
