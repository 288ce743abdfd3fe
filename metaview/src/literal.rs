use std::borrow::Cow;
use std::fmt;

/// An enumeration literal as seen by the introspection engine.
///
/// Carries the (possibly qualified) name of the enumeration type and the
/// literal's own name. Hosts produce these from their native enum values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumLiteral {
    enumeration: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl EnumLiteral {
    pub fn new(
        enumeration: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            enumeration: enumeration.into(),
            name: name.into(),
        }
    }

    /// Name of the enumeration type the literal belongs to.
    pub fn enumeration(&self) -> &str {
        &self.enumeration
    }

    /// Name of the literal itself.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Rust enums usable as enumeration literals of a host model.
///
/// Usually derived with `#[derive(Literal)]`, which names the enumeration
/// after the type and each literal after its variant.
pub trait Literal {
    /// Returns the enumeration type name.
    fn enumeration(&self) -> Cow<'static, str>;

    /// Returns the literal name.
    fn literal(&self) -> Cow<'static, str>;

    fn to_enum_literal(&self) -> EnumLiteral {
        EnumLiteral::new(self.enumeration(), self.literal())
    }
}
