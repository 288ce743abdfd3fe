use std::fmt;

use crate::EnumLiteral;
use crate::host::{ObjectModel, Scalar};

use super::naming::element_signature;

/// The kind of a [`ModelValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ValueKind {
    None,
    Scalar,
    String,
    EnumerationLiteral,
    Element,
    ElementList,
    Failure,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::None => write!(f, "none"),
            ValueKind::Scalar => write!(f, "scalar"),
            ValueKind::String => write!(f, "string"),
            ValueKind::EnumerationLiteral => write!(f, "enumerationLiteral"),
            ValueKind::Element => write!(f, "element"),
            ValueKind::ElementList => write!(f, "elementList"),
            ValueKind::Failure => write!(f, "failure"),
        }
    }
}

/// A classified feature value.
///
/// Element variants hold host handles only; the instances stay owned by the
/// host. `Failed` is never produced by classification: it marks a slot whose
/// accessor faulted.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValue<E> {
    None,
    Scalar(Scalar),
    String(String),
    Literal(EnumLiteral),
    Element(E),
    ElementList(Vec<E>),
    Failed { feature: String, reason: String },
}

impl<E> ModelValue<E> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ModelValue::None => ValueKind::None,
            ModelValue::Scalar(_) => ValueKind::Scalar,
            ModelValue::String(_) => ValueKind::String,
            ModelValue::Literal(_) => ValueKind::EnumerationLiteral,
            ModelValue::Element(_) => ValueKind::Element,
            ModelValue::ElementList(_) => ValueKind::ElementList,
            ModelValue::Failed { .. } => ValueKind::Failure,
        }
    }

    /// Scalars, strings, literals and failure markers.
    pub fn is_atomic(&self) -> bool {
        !self.is_element_container()
    }

    /// Absent values and element references.
    pub fn is_element_container(&self) -> bool {
        matches!(
            self,
            ModelValue::None | ModelValue::Element(_) | ModelValue::ElementList(_)
        )
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, ModelValue::ElementList(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ModelValue::Failed { .. })
    }

    /// Number of values held: 0 for `None`, the list length for element
    /// lists, 1 for everything else.
    pub fn card(&self) -> usize {
        match self {
            ModelValue::None => 0,
            ModelValue::ElementList(items) => items.len(),
            _ => 1,
        }
    }

    /// Only `None` and empty element lists are empty; atomic values never are.
    pub fn is_empty(&self) -> bool {
        match self {
            ModelValue::None => true,
            ModelValue::ElementList(items) => items.is_empty(),
            _ => false,
        }
    }

    /// The referenced elements, if any.
    pub fn elements(&self) -> &[E] {
        match self {
            ModelValue::Element(e) => std::slice::from_ref(e),
            ModelValue::ElementList(items) => items,
            _ => &[],
        }
    }

    /// Render the value for display.
    ///
    /// Strings are quoted, elements are listed one per line as
    /// `name : Metaclass`, failures render as `ERROR("feature")`.
    pub fn text<H: ObjectModel<Element = E>>(&self, host: &H) -> String {
        const INDENT: &str = "\n    ";
        match self {
            ModelValue::None => "None".to_string(),
            ModelValue::Scalar(s) => s.to_string(),
            ModelValue::String(s) => format!("\"{s}\""),
            ModelValue::Literal(l) => l.name().to_string(),
            ModelValue::Element(e) => format!("{INDENT}{}", element_signature(host, e)),
            ModelValue::ElementList(items) => items
                .iter()
                .map(|e| format!("{INDENT}{}", element_signature(host, e)))
                .collect(),
            ModelValue::Failed { feature, .. } => format!("ERROR(\"{feature}\")"),
        }
    }
}
