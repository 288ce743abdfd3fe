//! Metamodel-level introspection: accessor discovery, feature descriptors
//! and the per-metaclass descriptors cached by a [`Session`](crate::Session).

mod discovery;
mod feature;
mod metaclass_info;
mod type_name;

pub use discovery::{SyntheticFeatures, discover_features};
pub use feature::{
    Evaluator, FEATURE_HTML_TEMPLATE, FEATURE_TEMPLATE, FeatureKind, MetaFeature,
    QUALIFIED_FEATURE_TEMPLATE, SyntheticFn,
};
pub use metaclass_info::{MetaclassInfo, MetaclassView};
pub use type_name::{
    TypeClass, UNNAMED_TYPE, classify_type, is_enumeration_type, is_metaclass, type_name,
};
