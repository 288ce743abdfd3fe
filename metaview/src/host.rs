//! The contract between the engine and a reflective host runtime.
//!
//! The engine never owns metaclasses or instances. Everything it knows about
//! them comes through [`ObjectModel`], and every value an accessor returns is
//! already shaped by the host into a [`RawValue`], so classification is a
//! matter of reading the host's answer rather than probing.

use std::borrow::Cow;
use std::fmt;

use crate::EnumLiteral;

/// Reflective access to a live object model and its metamodel.
///
/// `Metaclass` and `Element` are handles owned by the host; they are cloned
/// freely, so they should be cheap to clone (ids, `Rc`s, interned pointers).
pub trait ObjectModel {
    type Metaclass: Clone + fmt::Debug;
    type Element: Clone + fmt::Debug;

    /// Look up a metaclass by its metamodel-registered name.
    fn resolve_metaclass(&self, name: &str) -> Option<Self::Metaclass>;

    /// Metamodel-registered name of a metaclass, or `None` if the handle is
    /// not a metaclass of this metamodel.
    fn metaclass_name(&self, metaclass: &Self::Metaclass) -> Option<String>;

    /// Fully qualified (package-prefixed) name, when the host has one.
    fn metaclass_qualified_name(&self, metaclass: &Self::Metaclass) -> Option<String> {
        let _m = metaclass;
        None
    }

    fn sub_metaclasses(&self, metaclass: &Self::Metaclass) -> Vec<Self::Metaclass>;

    /// Direct super-metaclasses, primary parent first.
    fn super_metaclasses(&self, metaclass: &Self::Metaclass) -> Vec<Self::Metaclass>;

    /// Accessor operations declared by the metaclass, optionally including
    /// the inherited ones.
    fn declared_accessors(
        &self,
        metaclass: &Self::Metaclass,
        inherited: bool,
    ) -> Vec<AccessorDescriptor<Self::Metaclass>>;

    fn invoke_accessor(
        &self,
        element: &Self::Element,
        accessor: &str,
    ) -> Result<RawValue<Self::Element>, AccessorFault>;

    fn instance_metaclass(&self, element: &Self::Element) -> Self::Metaclass;

    /// Whether `element` is an instance of `metaclass` or of one of its sub-metaclasses.
    fn is_instance_of(&self, element: &Self::Element, metaclass: &Self::Metaclass) -> bool;

    fn instance_declared_name(&self, element: &Self::Element) -> Option<String>;

    fn instance_stable_identifier(&self, element: &Self::Element) -> String;

    /// All instances of a metaclass (sub-metaclasses included).
    ///
    /// Only used by the named-instance lookups; hosts without an instance
    /// index can keep the default.
    fn instances_of(&self, metaclass: &Self::Metaclass) -> Vec<Self::Element> {
        let _m = metaclass;
        Vec::new()
    }
}

/// One accessor operation as reported by the host's reflection.
#[derive(Debug, Clone)]
pub struct AccessorDescriptor<M> {
    pub name: String,
    pub declaring_type: M,
    pub parameter_types: Vec<TypeRef<M>>,
    pub return_type: TypeRef<M>,
    /// The declared return type is one of the host's collection types.
    pub returns_collection: bool,
}

impl<M> AccessorDescriptor<M> {
    pub fn is_nullary(&self) -> bool {
        self.parameter_types.is_empty()
    }

    /// The type of the values the accessor yields.
    ///
    /// For collection accessors this is the element type: the first type
    /// argument if present, otherwise the first declared bound, otherwise
    /// the collection type itself.
    pub fn value_type(&self) -> &TypeRef<M> {
        if !self.returns_collection {
            return &self.return_type;
        }
        match &self.return_type {
            TypeRef::Parameterized {
                arguments, bounds, ..
            } => arguments
                .first()
                .or_else(|| bounds.first())
                .unwrap_or(&self.return_type),
            other => other,
        }
    }
}

/// A declared type in the host's type system.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef<M> {
    /// The host's character string type.
    String,
    /// Numeric, boolean or other primitive type.
    Primitive(Cow<'static, str>),
    /// An enumeration type, named with its qualified name.
    Enumeration { qualified_name: String },
    /// A metaclass (element type) of the metamodel.
    Metaclass(M),
    /// A generic type such as a collection of elements.
    Parameterized {
        raw: Box<TypeRef<M>>,
        arguments: Vec<TypeRef<M>>,
        bounds: Vec<TypeRef<M>>,
    },
    /// Anything else the host can only partially describe.
    Opaque {
        native_name: Option<String>,
        display: Option<String>,
    },
}

impl<M> TypeRef<M> {
    pub fn primitive(name: impl Into<Cow<'static, str>>) -> Self {
        TypeRef::Primitive(name.into())
    }

    pub fn enumeration(qualified_name: impl Into<String>) -> Self {
        TypeRef::Enumeration {
            qualified_name: qualified_name.into(),
        }
    }

    pub fn named(native_name: impl Into<String>) -> Self {
        TypeRef::Opaque {
            native_name: Some(native_name.into()),
            display: None,
        }
    }

    /// A collection type `raw<argument>`.
    pub fn collection_of(raw: impl Into<String>, argument: TypeRef<M>) -> Self {
        TypeRef::Parameterized {
            raw: Box::new(TypeRef::named(raw)),
            arguments: vec![argument],
            bounds: Vec::new(),
        }
    }
}

/// Scalar values other than strings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Char(c) => write!(f, "{c}"),
        }
    }
}

/// A value returned by an accessor, shaped by the host.
///
/// The host answers the capability questions (is it an element, an
/// enumeration literal, a scalar?) by choosing the variant. Values it cannot
/// describe go to [`RawValue::Opaque`] with whatever text it can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue<E> {
    Null,
    Str(String),
    Literal(EnumLiteral),
    Scalar(Scalar),
    Element(E),
    Sequence(Vec<RawValue<E>>),
    Opaque(String),
}

impl<E> RawValue<E> {
    pub fn literal(literal: &impl crate::Literal) -> Self {
        RawValue::Literal(literal.to_enum_literal())
    }

    pub fn elements(elements: impl IntoIterator<Item = E>) -> Self {
        RawValue::Sequence(elements.into_iter().map(RawValue::Element).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl<E: fmt::Debug> RawValue<E> {
    /// Best-effort text for values that cannot be classified.
    pub fn describe(&self) -> String {
        match self {
            RawValue::Null => "None".into(),
            RawValue::Str(s) => s.clone(),
            RawValue::Literal(l) => l.to_string(),
            RawValue::Scalar(s) => s.to_string(),
            RawValue::Element(e) => format!("{e:?}"),
            RawValue::Sequence(items) => {
                let items: Vec<String> = items.iter().map(|i| i.describe()).collect();
                format!("[{}]", items.join(", "))
            }
            RawValue::Opaque(text) => text.clone(),
        }
    }
}

impl<E> From<&str> for RawValue<E> {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl<E> From<String> for RawValue<E> {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

impl<E> From<bool> for RawValue<E> {
    fn from(b: bool) -> Self {
        RawValue::Scalar(Scalar::Bool(b))
    }
}

impl<E> From<i64> for RawValue<E> {
    fn from(i: i64) -> Self {
        RawValue::Scalar(Scalar::Int(i))
    }
}

impl<E> From<i32> for RawValue<E> {
    fn from(i: i32) -> Self {
        RawValue::Scalar(Scalar::Int(i.into()))
    }
}

impl<E> From<f64> for RawValue<E> {
    fn from(x: f64) -> Self {
        RawValue::Scalar(Scalar::Float(x))
    }
}

impl<E> From<EnumLiteral> for RawValue<E> {
    fn from(l: EnumLiteral) -> Self {
        RawValue::Literal(l)
    }
}

/// An accessor invocation that failed inside the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply '{accessor}': {reason}")]
pub struct AccessorFault {
    pub accessor: String,
    pub reason: String,
}

impl AccessorFault {
    pub fn new(accessor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_value_type_is_return_type() {
        let acc = AccessorDescriptor {
            name: "getName".into(),
            declaring_type: 0u8,
            parameter_types: vec![],
            return_type: TypeRef::String,
            returns_collection: false,
        };
        assert!(acc.is_nullary());
        assert_eq!(acc.value_type(), &TypeRef::String);
    }

    #[test]
    fn collection_value_type_prefers_argument_then_bound() {
        let mut acc = AccessorDescriptor {
            name: "getActors".into(),
            declaring_type: 0u8,
            parameter_types: vec![],
            return_type: TypeRef::collection_of("List", TypeRef::Metaclass(7u8)),
            returns_collection: true,
        };
        assert_eq!(acc.value_type(), &TypeRef::Metaclass(7));

        acc.return_type = TypeRef::Parameterized {
            raw: Box::new(TypeRef::named("List")),
            arguments: vec![],
            bounds: vec![TypeRef::Metaclass(3)],
        };
        assert_eq!(acc.value_type(), &TypeRef::Metaclass(3));
    }

    #[test]
    fn describe_sequences() {
        let v: RawValue<u8> = RawValue::Sequence(vec![RawValue::from(1i64), RawValue::from("x")]);
        assert_eq!(v.describe(), "[1, x]");
    }
}
