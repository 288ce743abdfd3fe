//! Type-level classification and best-effort naming of host types.

use crate::host::{ObjectModel, TypeRef};

/// Sentinel used when no rule can name a type.
pub const UNNAMED_TYPE: &str = "<unnamed type>";

/// What a declared type denotes, from the engine's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    String,
    Enumeration,
    Metaclass,
    Other,
}

pub fn classify_type<H: ObjectModel>(host: &H, ty: &TypeRef<H::Metaclass>) -> TypeClass {
    match ty {
        TypeRef::String => TypeClass::String,
        TypeRef::Enumeration { .. } => TypeClass::Enumeration,
        TypeRef::Metaclass(_) if is_metaclass(host, ty) => TypeClass::Metaclass,
        _ => TypeClass::Other,
    }
}

/// True if the type is a metaclass registered in the host's metamodel.
pub fn is_metaclass<H: ObjectModel>(host: &H, ty: &TypeRef<H::Metaclass>) -> bool {
    match ty {
        TypeRef::Metaclass(m) => host.metaclass_name(m).is_some(),
        _ => false,
    }
}

pub fn is_enumeration_type<M>(ty: &TypeRef<M>) -> bool {
    matches!(ty, TypeRef::Enumeration { .. })
}

type Extractor<H> = fn(&H, &TypeRef<<H as ObjectModel>::Metaclass>) -> Option<String>;

/// One step of the naming chain: the first rule whose extractor yields a
/// name wins.
struct NamingRule<H: ObjectModel> {
    rule: &'static str,
    extract: Extractor<H>,
}

fn naming_rules<H: ObjectModel>() -> [NamingRule<H>; 7] {
    [
        NamingRule {
            rule: "string",
            extract: |_, ty| matches!(ty, TypeRef::String).then(|| "string".to_string()),
        },
        NamingRule {
            rule: "enumeration",
            extract: |_, ty| match ty {
                TypeRef::Enumeration { qualified_name } => qualified_name
                    .rsplit('.')
                    .next()
                    .map(str::to_string),
                _ => None,
            },
        },
        NamingRule {
            rule: "metaclass",
            extract: |host, ty| match ty {
                TypeRef::Metaclass(m) => host.metaclass_name(m),
                _ => None,
            },
        },
        NamingRule {
            rule: "primitive",
            extract: |_, ty| match ty {
                TypeRef::Primitive(name) => Some(name.to_string()),
                _ => None,
            },
        },
        NamingRule {
            rule: "parameterized",
            extract: |host, ty| match ty {
                TypeRef::Parameterized { raw, .. } => Some(type_name(host, raw)),
                _ => None,
            },
        },
        NamingRule {
            rule: "native",
            extract: |_, ty| match ty {
                TypeRef::Opaque { native_name, .. } => native_name.clone(),
                _ => None,
            },
        },
        NamingRule {
            rule: "display",
            extract: |_, ty| match ty {
                TypeRef::Opaque { display, .. } => display.clone(),
                _ => None,
            },
        },
    ]
}

/// Human-readable name of a host type. Never fails.
///
/// Strings are named `string`, enumerations by their unqualified name,
/// metaclasses by their metamodel name; anything else falls back to the
/// native name, then the display text, then [`UNNAMED_TYPE`].
pub fn type_name<H: ObjectModel>(host: &H, ty: &TypeRef<H::Metaclass>) -> String {
    for rule in naming_rules::<H>() {
        if let Some(name) = (rule.extract)(host, ty).filter(|n| !n.is_empty()) {
            tracing::trace!(rule = rule.rule, %name, "type named");
            return name;
        }
    }
    UNNAMED_TYPE.to_string()
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::memory::MemoryModel;

    #[test]
    fn names_follow_the_rule_order() {
        let mut model = MemoryModel::new();
        let actor = model.metaclass("Actor", &[]);

        assert_eq!(type_name(&model, &TypeRef::String), "string");
        assert_eq!(
            type_name(&model, &TypeRef::enumeration("org.uml.VisibilityMode")),
            "VisibilityMode"
        );
        assert_eq!(type_name(&model, &TypeRef::Metaclass(actor)), "Actor");
        assert_eq!(type_name(&model, &TypeRef::primitive("int")), "int");
        assert_eq!(
            type_name(&model, &TypeRef::collection_of("List", TypeRef::String)),
            "List"
        );
    }

    #[test]
    fn opaque_types_fall_back_to_display_then_sentinel() {
        let model = MemoryModel::new();
        let shown = TypeRef::Opaque {
            native_name: None,
            display: Some("Handle@1f".into()),
        };
        assert_eq!(type_name(&model, &shown), "Handle@1f");

        let blank = TypeRef::Opaque {
            native_name: Some(String::new()),
            display: None,
        };
        assert_eq!(type_name(&model, &blank), UNNAMED_TYPE);
    }

    #[test]
    fn type_classes() {
        let mut model = MemoryModel::new();
        let actor = model.metaclass("Actor", &[]);

        assert_eq!(classify_type(&model, &TypeRef::String), TypeClass::String);
        assert_eq!(
            classify_type(&model, &TypeRef::enumeration("Kind")),
            TypeClass::Enumeration
        );
        assert_eq!(
            classify_type(&model, &TypeRef::Metaclass(actor)),
            TypeClass::Metaclass
        );
        assert_eq!(
            classify_type(&model, &TypeRef::primitive("bool")),
            TypeClass::Other
        );
        assert!(is_enumeration_type(&TypeRef::<()>::enumeration("Kind")));
    }
}
