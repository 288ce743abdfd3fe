//! Integration test for the Literal derive macro.
#![cfg(feature = "macros")]

use metaview::{Literal, RawValue};

#[derive(Literal)]
#[allow(dead_code)]
enum Visibility {
    Public,
    Private,
    #[literal(name = "PACKAGE")]
    Package,
}

#[derive(Literal)]
#[literal(enumeration = "uml.AggregationKind")]
#[allow(dead_code)]
enum Aggregation {
    Composite,
}

#[test]
fn test_derived_literal_names() {
    assert_eq!(Visibility::Public.literal(), "Public");
    assert_eq!(Visibility::Private.literal(), "Private");
    assert_eq!(Visibility::Public.enumeration(), "Visibility");
}

#[test]
fn test_literal_name_override() {
    assert_eq!(Visibility::Package.literal(), "PACKAGE");
}

#[test]
fn test_enumeration_override() {
    let literal = Aggregation::Composite.to_enum_literal();
    assert_eq!(literal.enumeration(), "uml.AggregationKind");
    assert_eq!(literal.name(), "Composite");
}

#[test]
fn test_literal_raw_value() {
    let raw: RawValue<u32> = RawValue::literal(&Visibility::Private);
    assert_eq!(raw, RawValue::Literal(Visibility::Private.to_enum_literal()));
}
