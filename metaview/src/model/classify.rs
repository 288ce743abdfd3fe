use std::fmt;

use crate::host::RawValue;

use super::ModelValue;

/// Classify an accessor result into a [`ModelValue`].
///
/// First match wins: null, string, enumeration literal, scalar, list of
/// elements, element. A list holding anything but elements and values the
/// host left opaque cannot be classified; they are logged and rendered as a
/// best-effort string. Never fails.
pub fn classify<E: fmt::Debug>(raw: RawValue<E>) -> ModelValue<E> {
    match raw {
        RawValue::Null => ModelValue::None,
        RawValue::Str(s) => ModelValue::String(s),
        RawValue::Literal(l) => ModelValue::Literal(l),
        RawValue::Scalar(s) => ModelValue::Scalar(s),
        RawValue::Sequence(items) if is_element_list(&items) => ModelValue::ElementList(
            items
                .into_iter()
                .filter_map(|item| match item {
                    RawValue::Element(e) => Some(e),
                    _ => None,
                })
                .collect(),
        ),
        RawValue::Element(e) => ModelValue::Element(e),
        other => unclassified(other),
    }
}

/// True for sequences made only of elements, including the empty sequence.
pub fn is_element_list<E>(items: &[RawValue<E>]) -> bool {
    items.iter().all(|item| matches!(item, RawValue::Element(_)))
}

/// Strings, scalars and enumeration literals.
pub fn is_atomic<E>(raw: &RawValue<E>) -> bool {
    matches!(
        raw,
        RawValue::Str(_) | RawValue::Scalar(_) | RawValue::Literal(_)
    )
}

fn unclassified<E: fmt::Debug>(raw: RawValue<E>) -> ModelValue<E> {
    let text = raw.describe();
    tracing::warn!(value = %text, "value kind not recognized, rendering as text");
    ModelValue::String(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnumLiteral;
    use crate::host::Scalar;
    use crate::model::ValueKind;

    #[test]
    fn decision_order() {
        assert_eq!(classify::<u32>(RawValue::Null).kind(), ValueKind::None);
        assert_eq!(classify::<u32>("abc".into()).kind(), ValueKind::String);
        assert_eq!(
            classify::<u32>(EnumLiteral::new("Visibility", "Public").into()).kind(),
            ValueKind::EnumerationLiteral
        );
        assert_eq!(classify::<u32>(true.into()).kind(), ValueKind::Scalar);
        assert_eq!(classify::<u32>(2.5.into()).kind(), ValueKind::Scalar);
        assert_eq!(classify(RawValue::Element(1u32)).kind(), ValueKind::Element);
        assert_eq!(
            classify(RawValue::elements([1u32, 2, 3])).kind(),
            ValueKind::ElementList
        );
    }

    #[test]
    fn empty_sequence_is_an_empty_element_list() {
        let v = classify::<u32>(RawValue::Sequence(vec![]));
        assert_eq!(v, ModelValue::ElementList(vec![]));
        assert!(v.is_empty());
    }

    #[test]
    fn mixed_sequences_degrade_to_text() {
        let v = classify(RawValue::Sequence(vec![
            RawValue::Element(1u32),
            RawValue::Scalar(Scalar::Int(4)),
        ]));
        assert_eq!(v, ModelValue::String("[1, 4]".into()));
    }

    #[test]
    fn opaque_values_degrade_to_text() {
        let v = classify::<u32>(RawValue::Opaque("Widget@3".into()));
        assert_eq!(v, ModelValue::String("Widget@3".into()));
    }

    #[test]
    fn list_items_classify_as_elements() {
        let ModelValue::ElementList(items) = classify(RawValue::elements([4u32, 5])) else {
            panic!("expected an element list");
        };
        for item in items {
            assert_eq!(classify(RawValue::Element(item)).kind(), ValueKind::Element);
        }
    }

    #[test]
    fn atomic_predicate() {
        assert!(is_atomic::<u32>(&"x".into()));
        assert!(is_atomic::<u32>(&RawValue::from(1)));
        assert!(!is_atomic(&RawValue::Element(1u32)));
        assert!(!is_atomic::<u32>(&RawValue::Null));
    }
}
