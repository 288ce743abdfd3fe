use std::fmt;

/// Which icon a tree node asks for.
///
/// Slot nodes use one of three fixed keys; element nodes ask for the icon
/// of their metaclass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconKey {
    Atomic,
    SingleReference,
    MultipleReference,
    Metaclass(String),
}

impl IconKey {
    /// The lookup key: `atomic`, `assoc-1`, `assoc-n` or the metaclass name.
    pub fn as_str(&self) -> &str {
        match self {
            IconKey::Atomic => "atomic",
            IconKey::SingleReference => "assoc-1",
            IconKey::MultipleReference => "assoc-n",
            IconKey::Metaclass(name) => name,
        }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supplies icon resources to a tree host.
pub trait IconProvider {
    type Icon;

    fn lookup(&self, key: &str) -> Option<Self::Icon>;
}

/// A display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const ELEMENT_FOREGROUND: Rgb = Rgb(0, 0, 150);
pub const SLOT_FOREGROUND: Rgb = Rgb(0, 150, 0);
