use crate::{
    shape::TypeShape,
    value::{ContainerKind, MapKind, Value},
};

#[test]
fn union_flattens_and_deduplicates() {
    let inner = TypeShape::union([TypeShape::int(), TypeShape::text()]);
    let outer = TypeShape::union([inner, TypeShape::int(), TypeShape::None]);

    assert_eq!(
        outer,
        TypeShape::Union(vec![TypeShape::int(), TypeShape::text(), TypeShape::None])
    );
}

#[test]
fn single_member_union_collapses() {
    assert_eq!(TypeShape::union([TypeShape::float()]), TypeShape::float());
}

#[test]
fn optional_of_optional_is_flat() {
    let once = TypeShape::optional(TypeShape::text());
    let twice = TypeShape::optional(once.clone());

    assert_eq!(once, twice);
    assert_eq!(once.members().len(), 2);
}

#[test]
fn counter_implies_int_values() {
    let TypeShape::Mapping { kind, value, .. } = TypeShape::counter(TypeShape::text()) else {
        panic!("counter should be a mapping shape");
    };

    assert_eq!(kind, MapKind::Counter);
    assert_eq!(*value, TypeShape::int());
}

#[test]
fn outer_kind_matching() {
    assert!(TypeShape::list(TypeShape::int()).outer_kind_matches(&Value::list([1])));
    assert!(!TypeShape::list(TypeShape::int()).outer_kind_matches(&Value::set([1])));
    assert!(!TypeShape::set(TypeShape::int()).outer_kind_matches(&Value::frozenset([1])));
    assert!(
        TypeShape::dict(TypeShape::text(), TypeShape::int())
            .outer_kind_matches(&Value::map(MapKind::Counter, vec![]))
    );
    assert!(
        !TypeShape::counter(TypeShape::text()).outer_kind_matches(&Value::dict([("a", 1)]))
    );
    assert!(TypeShape::variadic_tuple(TypeShape::int()).outer_kind_matches(&Value::tuple([1])));
    assert!(!TypeShape::int().outer_kind_matches(&Value::Int(1)));
}

#[test]
fn container_shapes() {
    assert!(TypeShape::tuple([TypeShape::int()]).is_container_shape());
    assert!(TypeShape::container(ContainerKind::iterable("bag"), TypeShape::Any).is_container_shape());
    assert!(!TypeShape::optional(TypeShape::list(TypeShape::int())).is_container_shape());
    assert!(!TypeShape::instance("Point").is_container_shape());
}

#[test]
fn display_forms() {
    assert_eq!(TypeShape::int().to_string(), "int");
    assert_eq!(TypeShape::list(TypeShape::text()).to_string(), "list[str]");
    assert_eq!(
        TypeShape::dict(TypeShape::text(), TypeShape::int()).to_string(),
        "dict[str, int]"
    );
    assert_eq!(TypeShape::counter(TypeShape::text()).to_string(), "counter[str]");
    assert_eq!(
        TypeShape::variadic_tuple(TypeShape::int()).to_string(),
        "tuple[int, ...]"
    );
    assert_eq!(
        TypeShape::tuple([TypeShape::int(), TypeShape::text()]).to_string(),
        "tuple[int, str]"
    );
    assert_eq!(TypeShape::optional(TypeShape::int()).to_string(), "int | None");
    assert_eq!(TypeShape::self_ref("Node").to_string(), "'Node'");
}

#[test]
fn serde_roundtrip() {
    let shape = TypeShape::optional(TypeShape::dict(
        TypeShape::text(),
        TypeShape::list(TypeShape::instance("Point")),
    ));

    let json = serde_json::to_string(&shape).expect("serialize shape");
    let back: TypeShape = serde_json::from_str(&json).expect("deserialize shape");

    assert_eq!(back, shape);
}

#[test]
fn deserialize_from_config_text() {
    let shape: TypeShape =
        serde_json::from_str(r#"{"sequence":{"kind":"list","element":{"scalar":"int"}}}"#)
            .expect("deserialize shape");

    assert_eq!(shape, TypeShape::list(TypeShape::int()));
}
