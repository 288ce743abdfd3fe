//! Model-level introspection: classified values, slots, element
//! descriptors and the parent hierarchy.

mod classify;
mod element_info;
mod hierarchy;
mod model_value;
mod naming;
mod slot;

pub use classify::{classify, is_atomic, is_element_list};
pub use element_info::{ElementInfo, ElementSnapshot, SlotSnapshot};
pub use hierarchy::{Hierarchy, ParentEntry, ParentTable};
pub use model_value::{ModelValue, ValueKind};
pub use naming::{element_signature, name_or_id};
pub use slot::Slot;
