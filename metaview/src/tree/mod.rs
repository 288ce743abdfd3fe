//! Projection of element descriptors onto a generic tree widget.
//!
//! A host widget drives [`TreeContent`]: it asks for roots, expands nodes
//! with `children`, and styles them with the label, icon and color hints.
//! The hints carry no semantics.

mod icon;
mod projector;

pub use icon::{ELEMENT_FOREGROUND, IconKey, IconProvider, Rgb, SLOT_FOREGROUND};
pub use projector::{ModelTree, TreeContent, TreeNode};
