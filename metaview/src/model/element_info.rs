use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::host::ObjectModel;
use crate::meta::MetaclassInfo;
use crate::{Error, Result};

use super::{ModelValue, Slot, ValueKind};

/// Description of one instance: identity, name, path, metaclass and slots.
///
/// Slots are bound lazily on first access, in feature discovery order, and
/// each slot memoizes its own value. The name index is derived from the
/// slot list and never populated on its own.
pub struct ElementInfo<H: ObjectModel> {
    host: Rc<H>,
    element: H::Element,
    identifier: String,
    name: String,
    path: String,
    metaclass: Rc<MetaclassInfo<H>>,
    metaclass_signature: String,
    slots: OnceCell<Vec<Rc<Slot<H>>>>,
    slots_by_name: OnceCell<HashMap<String, Rc<Slot<H>>>>,
}

impl<H: ObjectModel> ElementInfo<H> {
    pub(crate) fn new(
        host: Rc<H>,
        element: H::Element,
        identifier: String,
        name: String,
        path: String,
        metaclass: Rc<MetaclassInfo<H>>,
        metaclass_signature: String,
    ) -> Self {
        Self {
            host,
            element,
            identifier,
            name,
            path,
            metaclass,
            metaclass_signature,
            slots: OnceCell::new(),
            slots_by_name: OnceCell::new(),
        }
    }

    pub fn element(&self) -> &H::Element {
        &self.element
    }

    /// The host's stable identifier for the instance.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Declared name, or the identifier when the instance has none.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn metaclass_info(&self) -> &Rc<MetaclassInfo<H>> {
        &self.metaclass
    }

    pub fn metaclass(&self) -> &H::Metaclass {
        self.metaclass.metaclass()
    }

    pub fn metaclass_name(&self) -> &str {
        self.metaclass.name()
    }

    /// All slots, in feature order.
    pub fn all_slots(&self) -> &[Rc<Slot<H>>] {
        self.slots.get_or_init(|| {
            self.metaclass
                .features()
                .iter()
                .map(|feature| {
                    Rc::new(Slot::new(
                        self.host.clone(),
                        feature.clone(),
                        self.element.clone(),
                    ))
                })
                .collect()
        })
    }

    /// Slots in feature order, skipping the empty ones unless asked.
    pub fn slots(&self, include_empty: bool) -> Vec<Rc<Slot<H>>> {
        self.all_slots()
            .iter()
            .filter(|slot| include_empty || !slot.is_empty())
            .cloned()
            .collect()
    }

    pub fn slot_map(&self) -> &HashMap<String, Rc<Slot<H>>> {
        self.slots_by_name.get_or_init(|| {
            self.all_slots()
                .iter()
                .map(|slot| (slot.name().to_string(), slot.clone()))
                .collect()
        })
    }

    /// The slot of a feature, by feature name.
    pub fn slot(&self, name: &str) -> Result<&Rc<Slot<H>>> {
        self.slot_map().get(name).ok_or_else(|| Error::UnknownFeature {
            metaclass: self.metaclass.name().to_string(),
            feature: name.to_string(),
        })
    }

    pub fn model_value(&self, name: &str) -> Result<&ModelValue<H::Element>> {
        Ok(self.slot(name)?.model_value())
    }

    /// `path : Metaclass > Super > ...`, or with the plain name instead of the path.
    pub fn signature(&self, with_path: bool) -> String {
        let head = if with_path { &self.path } else { &self.name };
        format!("{head} : {}", self.metaclass_signature)
    }

    /// The signature followed by one indented line per slot.
    pub fn text(&self, include_empty: bool) -> String {
        let mut lines = vec![self.signature(true)];
        lines.extend(
            self.slots(include_empty)
                .iter()
                .map(|slot| format!("  {}", slot.text())),
        );
        lines.join("\n")
    }

    /// Evaluate every slot and capture the rendered result.
    pub fn snapshot(&self) -> ElementSnapshot {
        ElementSnapshot {
            identifier: self.identifier.clone(),
            name: self.name.clone(),
            path: self.path.clone(),
            metaclass: self.metaclass.name().to_string(),
            slots: self
                .all_slots()
                .iter()
                .map(|slot| SlotSnapshot {
                    name: slot.name().to_string(),
                    signature: slot.feature().signature(None, false),
                    kind: slot.model_value().kind(),
                    card: slot.card(),
                    text: slot.model_value().text(self.host.as_ref()),
                })
                .collect(),
        }
    }
}

impl<H: ObjectModel> fmt::Debug for ElementInfo<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementInfo")
            .field("identifier", &self.identifier)
            .field("path", &self.path)
            .field("metaclass", &self.metaclass.name())
            .finish()
    }
}

impl<H: ObjectModel> fmt::Display for ElementInfo<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature(true))
    }
}

/// Rendered state of one slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotSnapshot {
    pub name: String,
    pub signature: String,
    pub kind: ValueKind,
    pub card: usize,
    pub text: String,
}

/// Point-in-time rendering of an element and all its slots.
///
/// Holds no host handles, so it outlives the session and can be
/// serialized with the `serde` feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementSnapshot {
    pub identifier: String,
    pub name: String,
    pub path: String,
    pub metaclass: String,
    pub slots: Vec<SlotSnapshot>,
}

impl ElementSnapshot {
    pub fn slot(&self, name: &str) -> Option<&SlotSnapshot> {
        self.slots.iter().find(|s| s.name == name)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
