//! Metaview - cached introspection for reflective object models
//!
//! Given any instance of a host object model, metaview computes a browsable
//! description of it: its metaclass, the metaclass's features in discovery
//! order, and one classified value per feature. Nothing about the
//! application's types is compiled in; everything comes from the host
//! through [`ObjectModel`].
//!
//! The pieces, leaves first:
//! - [`meta`]: accessor discovery, [`MetaFeature`] and cached [`MetaclassInfo`]
//! - [`model`]: value classification into [`ModelValue`], lazily evaluated
//!   [`Slot`]s, [`ElementInfo`] and the parent/path [`Hierarchy`]
//! - [`tree`]: a node contract for generic tree widgets
//! - [`Session`]: owns the caches and ties it all together
//!
//! See the [`memory`] module for a complete in-memory host.

extern crate self as metaview;

mod config;
mod docs;
mod error;
mod host;
mod literal;
mod session;
mod template;

pub mod meta;
pub mod model;
pub mod tree;

#[cfg(feature = "memory")]
pub mod memory;

pub use config::Config;
pub use docs::{DocumentationResolver, ReferenceDocs};
pub use error::Error;
pub use host::{AccessorDescriptor, AccessorFault, ObjectModel, RawValue, Scalar, TypeRef};
pub use literal::{EnumLiteral, Literal};
pub use meta::{FeatureKind, MetaFeature, MetaclassInfo};
pub use model::{ElementInfo, ElementSnapshot, Hierarchy, ModelValue, ParentTable, Slot, ValueKind};
pub use session::Session;
pub use tree::{IconKey, IconProvider, ModelTree, TreeContent, TreeNode};

#[cfg(feature = "macros")]
pub use metaview_macros::Literal;

pub type Result<T = ()> = std::result::Result<T, Error>;
