use std::fmt;
use std::rc::Rc;

use crate::host::{AccessorFault, ObjectModel, RawValue, TypeRef};
use crate::template::substitute;

use super::type_name::{TypeClass, classify_type, type_name};

pub const FEATURE_TEMPLATE: &str = "${fname} : ${ftype}${fmult}";
pub const FEATURE_HTML_TEMPLATE: &str = "<b>${fname}</b> : <em>${ftype}</em>${fmult}";
pub const QUALIFIED_FEATURE_TEMPLATE: &str = "${mclass}.${fname} : ${ftype}${fmult}";

/// Whether a feature is a plain attribute or an association end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureKind {
    Attribute,
    EnumerationAttribute,
    AssociationEnd,
}

impl FeatureKind {
    pub(crate) fn of_type<H: ObjectModel>(host: &H, ty: &TypeRef<H::Metaclass>) -> Self {
        match classify_type(host, ty) {
            TypeClass::Metaclass => FeatureKind::AssociationEnd,
            TypeClass::Enumeration => FeatureKind::EnumerationAttribute,
            TypeClass::String | TypeClass::Other => FeatureKind::Attribute,
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Attribute => write!(f, "attribute"),
            FeatureKind::EnumerationAttribute => write!(f, "enumerationAttribute"),
            FeatureKind::AssociationEnd => write!(f, "associationEnd"),
        }
    }
}

/// Computes a derived feature value for one instance.
pub type SyntheticFn<H> = dyn Fn(
    &H,
    &<H as ObjectModel>::Element,
) -> Result<RawValue<<H as ObjectModel>::Element>, AccessorFault>;

/// How a feature's value is obtained.
pub enum Evaluator<H: ObjectModel> {
    /// Invoke the host accessor named like the feature.
    Accessor,
    /// Call a registered function instead of a host accessor.
    Synthetic(Rc<SyntheticFn<H>>),
}

impl<H: ObjectModel> Clone for Evaluator<H> {
    fn clone(&self) -> Self {
        match self {
            Evaluator::Accessor => Evaluator::Accessor,
            Evaluator::Synthetic(f) => Evaluator::Synthetic(f.clone()),
        }
    }
}

/// A discovered feature of a metaclass.
///
/// Immutable once built. The owning metaclass and value type names are
/// resolved at discovery time so rendering never touches the host.
/// Two features are equal when they have the same owner and name.
pub struct MetaFeature<H: ObjectModel> {
    owner: H::Metaclass,
    owner_name: String,
    name: String,
    value_type: TypeRef<H::Metaclass>,
    type_name: String,
    kind: FeatureKind,
    multiple: bool,
    evaluator: Evaluator<H>,
}

impl<H: ObjectModel> MetaFeature<H> {
    pub(crate) fn new(
        host: &H,
        owner: H::Metaclass,
        name: impl Into<String>,
        value_type: TypeRef<H::Metaclass>,
        multiple: bool,
        evaluator: Evaluator<H>,
    ) -> Self {
        let owner_name = host
            .metaclass_name(&owner)
            .unwrap_or_else(|| type_name(host, &TypeRef::Metaclass(owner.clone())));
        Self {
            kind: FeatureKind::of_type(host, &value_type),
            type_name: type_name(host, &value_type),
            owner,
            owner_name,
            name: name.into(),
            value_type,
            multiple,
            evaluator,
        }
    }

    pub fn owner(&self) -> &H::Metaclass {
        &self.owner
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &TypeRef<H::Metaclass> {
        &self.value_type
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn is_attribute(&self) -> bool {
        self.kind != FeatureKind::AssociationEnd
    }

    pub fn is_association_end(&self) -> bool {
        self.kind == FeatureKind::AssociationEnd
    }

    pub fn is_enumeration(&self) -> bool {
        self.kind == FeatureKind::EnumerationAttribute
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self.evaluator, Evaluator::Synthetic(_))
    }

    /// Evaluate the feature against one instance.
    pub fn evaluate(
        &self,
        host: &H,
        element: &H::Element,
    ) -> Result<RawValue<H::Element>, AccessorFault> {
        match &self.evaluator {
            Evaluator::Accessor => host.invoke_accessor(element, &self.name),
            Evaluator::Synthetic(f) => f(host, element),
        }
    }

    /// Render the feature with a template.
    ///
    /// Placeholders: `${mclass}`, `${fname}`, `${ftype}`, `${fmult}` (`[*]`
    /// for multi-valued features, empty otherwise). Without a template the
    /// plain or HTML default is used.
    pub fn signature(&self, template: Option<&str>, html: bool) -> String {
        let template = template.unwrap_or(if html {
            FEATURE_HTML_TEMPLATE
        } else {
            FEATURE_TEMPLATE
        });
        substitute(
            template,
            &[
                ("mclass", self.owner_name.as_str()),
                ("fname", self.name.as_str()),
                ("ftype", self.type_name.as_str()),
                ("fmult", if self.multiple { "[*]" } else { "" }),
            ],
        )
    }

    /// `Owner.name : Type[*]`
    pub fn qualified(&self) -> String {
        self.signature(Some(QUALIFIED_FEATURE_TEMPLATE), false)
    }
}

impl<H: ObjectModel> PartialEq for MetaFeature<H> {
    fn eq(&self, other: &Self) -> bool {
        self.owner_name == other.owner_name && self.name == other.name
    }
}

impl<H: ObjectModel> Eq for MetaFeature<H> {}

impl<H: ObjectModel> fmt::Debug for MetaFeature<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaFeature")
            .field("owner", &self.owner_name)
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("kind", &self.kind)
            .field("multiple", &self.multiple)
            .field("synthetic", &self.is_synthetic())
            .finish()
    }
}

impl<H: ObjectModel> fmt::Display for MetaFeature<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature(None, false))
    }
}
