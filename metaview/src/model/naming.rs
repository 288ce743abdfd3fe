use crate::host::{ObjectModel, TypeRef};
use crate::meta::type_name;

/// The instance's declared name, or its stable identifier when the name is
/// absent or blank.
pub fn name_or_id<H: ObjectModel>(host: &H, element: &H::Element) -> String {
    declared_name(host, element).unwrap_or_else(|| host.instance_stable_identifier(element))
}

/// `name : Metaclass`
pub fn element_signature<H: ObjectModel>(host: &H, element: &H::Element) -> String {
    let metaclass = host.instance_metaclass(element);
    format!(
        "{} : {}",
        name_or_id(host, element),
        type_name(host, &TypeRef::Metaclass(metaclass))
    )
}

pub(crate) fn declared_name<H: ObjectModel>(host: &H, element: &H::Element) -> Option<String> {
    host.instance_declared_name(element)
        .filter(|name| !name.trim().is_empty())
}
