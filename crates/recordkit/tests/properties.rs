use proptest::prelude::*;
use recordkit::{
    core::matcher::{cast_value, validate_value},
    prelude::*,
};
use std::sync::Arc;

// ---- helpers ----

fn entry_type() -> Arc<RecordType> {
    RecordType::builder("Entry")
        .field("id", TypeShape::int())
        .field("label", TypeShape::text())
        .field("attrs", TypeShape::dict(TypeShape::text(), TypeShape::int()))
        .features(Features::IMMUTABLE)
        .build()
        .expect("declare")
}

fn entry(ty: &Arc<RecordType>, id: i64, label: &str, attrs: &[(String, i64)]) -> Record {
    Record::new(
        ty,
        kwargs! {
            id: id,
            label: label,
            attrs: Value::dict(attrs.iter().cloned()),
        },
    )
    .expect("construct")
}

fn arb_attrs() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::btree_map("[ab]", 0i64..2, 0..3)
        .prop_map(|map| map.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

fn arb_input() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(Value::Int),
        (-50.0f64..50.0).prop_map(Value::Float),
        "[0-9]{1,3}".prop_map(Value::Text),
    ]
}

fn arb_target() -> impl Strategy<Value = TypeShape> {
    prop_oneof![
        Just(TypeShape::int()),
        Just(TypeShape::float()),
        Just(TypeShape::text()),
        Just(TypeShape::bool()),
        Just(TypeShape::optional(TypeShape::text())),
        Just(TypeShape::union([TypeShape::int(), TypeShape::text()])),
        Just(TypeShape::list(TypeShape::text())),
    ]
}

proptest! {
    #[test]
    fn equal_records_hash_equally(
        a_id in 0i64..2,
        b_id in 0i64..2,
        a_label in "[xy]",
        b_label in "[xy]",
        a_attrs in arb_attrs(),
        b_attrs in arb_attrs(),
    ) {
        let ty = entry_type();
        let a = entry(&ty, a_id, &a_label, &a_attrs);
        let b = entry(&ty, b_id, &b_label, &b_attrs);

        if a == b {
            prop_assert_eq!(a.hash_value(), b.hash_value());
        }
    }

    #[test]
    fn shuffled_mappings_compare_and_hash_equal(attrs in arb_attrs()) {
        let ty = entry_type();
        let mut reversed = attrs.clone();
        reversed.reverse();

        let a = entry(&ty, 1, "x", &attrs);
        let b = entry(&ty, 1, "x", &reversed);

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.hash_value(), b.hash_value());
    }

    #[test]
    fn casting_twice_changes_nothing(value in arb_input(), target in arb_target()) {
        if let Ok(once) = cast_value(&value, &target) {
            prop_assert_eq!(cast_value(&once, &target), Ok(once.clone()));
            prop_assert!(validate_value(&once, &target).is_ok());
        }
    }

    #[test]
    fn lossy_records_hold_validated_values(value in arb_input()) {
        let ty = RecordType::builder("Slot")
            .field("v", TypeShape::optional(TypeShape::int()))
            .features(Features::DEFAULT | Features::LOSSY_AUTOCAST | Features::VALIDATION)
            .build()
            .expect("declare");

        if let Ok(record) = Record::new(&ty, kwargs! { v: value }) {
            let stored = record.get("v").expect("v");
            prop_assert!(stored.is_none() || stored.as_int().is_some());
        }
    }
}
