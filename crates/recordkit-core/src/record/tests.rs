use crate::{
    Error,
    error::{AccessError, MutationError},
    model::{FieldConfig, Features, RecordType},
    record::Record,
    shape::TypeShape,
    value::{ContainerKind, Value},
};
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

// ---- helpers ----

fn point(features: Features) -> Arc<RecordType> {
    RecordType::builder("Point")
        .field("x", TypeShape::int())
        .field_default("y", TypeShape::int(), 0)
        .features(features)
        .build()
        .expect("declare")
}

fn message(err: &Error) -> String {
    err.to_string()
}

fn std_hash(record: &Record) -> u64 {
    let mut hasher = DefaultHasher::new();
    record.hash(&mut hasher);
    hasher.finish()
}

// ---- construction ------------------------------------------------------

#[test]
fn arguments_and_defaults_fill_slots() {
    let ty = point(Features::DEFAULT);
    let p = Record::new(&ty, kwargs! { x: 3 }).expect("construct");

    assert_eq!(p.get("x").expect("x"), &Value::Int(3));
    assert_eq!(p.get("y").expect("y"), &Value::Int(0));
    assert_eq!(p.values(), [Value::Int(3), Value::Int(0)]);
}

#[test]
fn missing_required_arguments_are_listed() {
    let ty = RecordType::builder("Point")
        .field("x", TypeShape::int())
        .field("y", TypeShape::int())
        .build()
        .expect("declare");

    let err = Record::new(&ty, kwargs! {}).expect_err("missing");
    assert!(matches!(err, Error::MissingFieldsError(_)));
    assert_eq!(
        message(&err),
        "Point.new() missing 2 required arguments: 'x', 'y'"
    );

    let err = Record::new(&ty, kwargs! { y: 1 }).expect_err("missing");
    assert_eq!(message(&err), "Point.new() missing 1 required argument: 'x'");
}

#[test]
fn unexpected_arguments_are_rejected() {
    let ty = point(Features::DEFAULT);
    let err = Record::new(&ty, kwargs! { x: 1, z: 2 }).expect_err("unexpected");

    assert!(matches!(err, Error::UnexpectedFieldsError(ref e) if e.fields == ["z"]));
}

#[test]
fn missing_fields_win_over_unexpected_arguments() {
    let ty = point(Features::DEFAULT);
    let err = Record::new(&ty, kwargs! { z: 2 }).expect_err("missing");

    assert!(matches!(err, Error::MissingFieldsError(ref e) if e.fields == ["x"]));
}

#[test]
fn default_factory_runs_once_per_instance() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let ty = RecordType::builder("Bag")
        .field_with(
            "items",
            TypeShape::list(TypeShape::int()),
            FieldConfig::new().default_factory(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Value::list(Vec::<Value>::new())
            }),
        )
        .build()
        .expect("declare");

    let mut first = Record::new(&ty, kwargs! {}).expect("construct");
    let second = Record::new(&ty, kwargs! {}).expect("construct");
    Record::new(&ty, kwargs! { items: Value::list([1]) }).expect("construct");

    assert_eq!(calls.load(Ordering::SeqCst), 2);

    first.set("items", Value::list([9])).expect("write");
    assert_eq!(second.get("items").expect("items"), &Value::list(Vec::<Value>::new()));
}

#[test]
fn protocol_states_can_be_driven_by_hand() {
    let ty = point(Features::DEFAULT | Features::LOSSY_AUTOCAST);

    let populated = ty.construct().populate(kwargs! { x: "4" }).expect("populate");
    assert_eq!(populated.record().get("x").expect("x"), &Value::text("4"));

    let record = populated.post_process().expect("post-process").finish();
    assert_eq!(record.get("x").expect("x"), &Value::Int(4));
}

// ---- attribute access --------------------------------------------------

#[test]
fn writes_replace_field_values() {
    let ty = point(Features::DEFAULT);
    let mut p = Record::new(&ty, kwargs! { x: 1 }).expect("construct");

    p.set("x", 10).expect("write");
    assert_eq!(p.get("x").expect("x"), &Value::Int(10));
}

#[test]
fn undeclared_attributes_become_extras() {
    let ty = point(Features::DEFAULT);
    let mut p = Record::new(&ty, kwargs! { x: 1 }).expect("construct");

    p.set("label", "origin").expect("write");
    assert_eq!(p.get("label").expect("label"), &Value::text("origin"));
    assert_eq!(p.extras().len(), 1);

    assert_eq!(p.delete("label").expect("delete"), Value::text("origin"));
    assert!(matches!(
        p.get("label"),
        Err(AccessError::UnknownAttribute { .. })
    ));
}

#[test]
fn slots_reject_undeclared_attributes() {
    let ty = point(Features::DEFAULT | Features::SLOTS);
    let mut p = Record::new(&ty, kwargs! { x: 1 }).expect("construct");

    let err = p.set("label", "origin").expect_err("slots");
    assert!(matches!(
        err,
        Error::AccessError(AccessError::UndeclaredSlot { .. })
    ));
    assert!(p.extras().is_empty());

    p.set("x", 2).expect("declared write");
}

#[test]
fn declared_fields_cannot_be_deleted() {
    let ty = point(Features::DEFAULT);
    let mut p = Record::new(&ty, kwargs! { x: 1 }).expect("construct");

    let err = p.delete("x").expect_err("declared");
    assert!(matches!(
        err,
        Error::AccessError(AccessError::DeclaredFieldDelete { .. })
    ));

    let err = p.delete("nope").expect_err("unknown");
    assert_eq!(message(&err), "Point has no attribute 'nope'");
}

// ---- frozen ------------------------------------------------------------

#[test]
fn frozen_records_reject_writes_and_deletes() {
    let ty = point(Features::IMMUTABLE);
    let mut p = Record::new(&ty, kwargs! { x: 1 }).expect("construct");

    let err = p.set("x", 2).expect_err("frozen write");
    assert!(matches!(err, Error::MutationError(MutationError::Modify { .. })));
    assert_eq!(
        message(&err),
        "Cannot modify attributes of frozen record Point"
    );

    let err = p.set("fresh", 2).expect_err("frozen new attribute");
    assert!(matches!(err, Error::MutationError(MutationError::Modify { .. })));

    let err = p.delete("x").expect_err("frozen delete");
    assert!(matches!(err, Error::MutationError(MutationError::Delete { .. })));

    assert_eq!(p.get("x").expect("x"), &Value::Int(1));
}

#[test]
fn replace_builds_a_new_record() {
    let ty = point(Features::IMMUTABLE);
    let p = Record::new(&ty, kwargs! { x: 1, y: 2 }).expect("construct");

    let q = p.replace(kwargs! { y: 5 }).expect("replace");
    assert_eq!(q.values(), [Value::Int(1), Value::Int(5)]);
    assert_eq!(p.values(), [Value::Int(1), Value::Int(2)]);
}

#[test]
fn replace_reruns_validation() {
    let ty = point(Features::IMMUTABLE | Features::VALIDATION);
    let p = Record::new(&ty, kwargs! { x: 1 }).expect("construct");

    let err = p.replace(kwargs! { x: "bad" }).expect_err("invalid");
    assert!(matches!(err, Error::ValidationError(_)));

    let err = p.replace(kwargs! { z: 1 }).expect_err("unexpected");
    assert!(matches!(err, Error::UnexpectedFieldsError(_)));
}

// ---- private -----------------------------------------------------------

#[test]
fn private_fields_are_written_through_underscore_names() {
    let ty = RecordType::builder("Account")
        .field("owner", TypeShape::text())
        .features(Features::DEFAULT | Features::PRIVATE)
        .build()
        .expect("declare");

    let mut acct = Record::new(&ty, kwargs! { owner: "ann" }).expect("construct");

    let err = acct.set("owner", "bob").expect_err("direct write");
    assert_eq!(
        message(&err),
        "Cannot write to private fields directly. Use _owner to set private fields."
    );

    acct.set("_owner", "bob").expect("underscore write");
    assert_eq!(acct.get("owner").expect("owner"), &Value::text("bob"));
    assert_eq!(acct.get("_owner").expect("_owner"), &Value::text("bob"));

    let err = acct.set("_missing", 1).expect_err("not found");
    assert_eq!(message(&err), "Private field '_missing' not found");

    acct.set("note", "extra").expect("undeclared write");
    assert_eq!(acct.get("note").expect("note"), &Value::text("extra"));
}

#[test]
fn private_repr_hides_underscore_fields() {
    let ty = RecordType::builder("Session")
        .field("user", TypeShape::text())
        .field("_token", TypeShape::text())
        .features(Features::DEFAULT | Features::PRIVATE)
        .build()
        .expect("declare");

    let s = Record::new(&ty, kwargs! { user: "ann", _token: "s3cr3t" }).expect("construct");
    assert_eq!(s.repr(), r#"Session(user="ann")"#);
}

// ---- repr / views ------------------------------------------------------

#[test]
fn repr_lists_fields_in_order() {
    let ty = RecordType::builder("User")
        .field("name", TypeShape::text())
        .field("tags", TypeShape::list(TypeShape::text()))
        .field_default("score", TypeShape::optional(TypeShape::float()), Value::None)
        .build()
        .expect("declare");

    let u = Record::new(&ty, kwargs! { name: "ann", tags: Value::list(["a"]) })
        .expect("construct");

    assert_eq!(u.repr(), r#"User(name="ann", tags=["a"], score=None)"#);
    assert_eq!(u.to_string(), u.repr());
}

#[test]
fn repr_without_feature_is_generic() {
    let ty = point(Features::EQ);
    let p = Record::new(&ty, kwargs! { x: 1 }).expect("construct");

    assert_eq!(p.repr(), "<Point record>");
}

#[test]
fn to_map_pairs_names_with_values() {
    let ty = point(Features::DEFAULT);
    let p = Record::new(&ty, kwargs! { x: 1, y: 2 }).expect("construct");

    assert_eq!(p.to_map(), Value::dict([("x", 1), ("y", 2)]));
}

// ---- comparison --------------------------------------------------------

#[test]
fn equality_and_ordering_follow_features() {
    let ty = point(Features::DEFAULT);
    let a = Record::new(&ty, kwargs! { x: 1, y: 2 }).expect("construct");
    let b = Record::new(&ty, kwargs! { x: 1, y: 2 }).expect("construct");
    let c = Record::new(&ty, kwargs! { x: 2, y: 0 }).expect("construct");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
    assert_eq!(a.hash_value(), None);
}

#[test]
fn equal_hashable_records_hash_equally() {
    let ty = point(Features::IMMUTABLE);
    let a = Record::new(&ty, kwargs! { x: 1, y: 2 }).expect("construct");
    let b = Record::new(&ty, kwargs! { x: 1, y: 2 }).expect("construct");
    let c = Record::new(&ty, kwargs! { x: 3 }).expect("construct");

    assert_eq!(a, b);
    assert_eq!(a.hash_value(), b.hash_value());
    assert_eq!(std_hash(&a), std_hash(&b));
    assert_ne!(std_hash(&a), std_hash(&c));
}

// ---- validation --------------------------------------------------------

#[test]
fn validation_reports_every_failing_field() {
    let ty = point(Features::DEFAULT | Features::VALIDATION);
    let err = Record::new(&ty, kwargs! { x: "a", y: 1.5 }).expect_err("invalid");

    let Error::ValidationError(ref inner) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(inner.issues.fields(), vec!["x", "y"]);
    assert_eq!(
        message(&err),
        "\n  - Validation error for field 'x': expected int, got \"a\" of type str;\
         \n  - Validation error for field 'y': expected int, got 1.5 of type float;"
    );
}

#[test]
fn validated_writes_leave_the_old_value_on_failure() {
    let ty = point(Features::DEFAULT | Features::VALIDATION);
    let mut p = Record::new(&ty, kwargs! { x: 1 }).expect("construct");

    let err = p.set("x", "oops").expect_err("invalid write");
    assert!(matches!(err, Error::ValidationError(_)));
    assert_eq!(p.get("x").expect("x"), &Value::Int(1));

    p.set("x", 7).expect("valid write");
    assert_eq!(p.get("x").expect("x"), &Value::Int(7));
}

#[test]
fn bool_is_not_an_int() {
    let ty = point(Features::DEFAULT | Features::VALIDATION);
    let err = Record::new(&ty, kwargs! { x: true }).expect_err("bool");

    assert!(matches!(err, Error::ValidationError(_)));
}

#[test]
fn nested_records_validate_by_type_name() {
    let inner = point(Features::DEFAULT);
    let outer = RecordType::builder("Segment")
        .field("start", TypeShape::instance("Point"))
        .field("end", TypeShape::optional(TypeShape::instance("Point")))
        .features(Features::DEFAULT | Features::VALIDATION)
        .build()
        .expect("declare");

    let start = Record::new(&inner, kwargs! { x: 0 }).expect("construct");
    let seg = Record::new(&outer, kwargs! { start: start, end: Value::None }).expect("construct");
    assert_eq!(seg.get("end").expect("end"), &Value::None);

    let err = Record::new(&outer, kwargs! { start: 5, end: Value::None }).expect_err("invalid");
    assert!(matches!(err, Error::ValidationError(_)));
}

#[test]
fn opaque_containers_have_no_validation_handler() {
    let ty = RecordType::builder("Holder")
        .field("first", TypeShape::int())
        .field(
            "blob",
            TypeShape::container(ContainerKind::opaque("Blob"), TypeShape::int()),
        )
        .features(Features::DEFAULT | Features::VALIDATION)
        .build()
        .expect("declare");

    let blob = Value::container(ContainerKind::opaque("Blob"), [1]);
    let err = Record::new(&ty, kwargs! { first: "bad", blob: blob }).expect_err("no handler");

    let Error::NoHandlerError(ref inner) = err else {
        panic!("expected missing handler, got {err:?}");
    };
    assert_eq!(inner.field, "blob");
}

// ---- lossy autocast ----------------------------------------------------

#[test]
fn lossy_autocast_converts_arguments() {
    let ty = point(Features::DEFAULT | Features::LOSSY_AUTOCAST);
    let p = Record::new(&ty, kwargs! { x: "5", y: 3.7 }).expect("construct");

    assert_eq!(p.values(), [Value::Int(5), Value::Int(3)]);
}

#[test]
fn lossy_autocast_reports_failures() {
    let ty = point(Features::DEFAULT | Features::LOSSY_AUTOCAST);
    let err = Record::new(&ty, kwargs! { x: "abc" }).expect_err("uncastable");

    assert!(matches!(err, Error::CastingError(_)));
    assert_eq!(
        message(&err),
        "\n  - Casting error for field 'x': Cannot cast \"abc\" of type str to int: \
         invalid literal for int() with base 10: 'abc';"
    );
}

#[test]
fn lossy_writes_are_cast_then_validated() {
    let ty = point(Features::DEFAULT | Features::LOSSY_AUTOCAST | Features::VALIDATION);
    let mut p = Record::new(&ty, kwargs! { x: "1" }).expect("construct");

    p.set("y", "42").expect("cast write");
    assert_eq!(p.get("y").expect("y"), &Value::Int(42));

    let err = p.set("y", "forty").expect_err("uncastable write");
    assert!(matches!(err, Error::CastingError(_)));
    assert_eq!(p.get("y").expect("y"), &Value::Int(42));
}

#[test]
fn union_fields_keep_members_and_cast_the_rest() {
    let ty = RecordType::builder("Tagged")
        .field("value", TypeShape::union([TypeShape::int(), TypeShape::text()]))
        .field_default("note", TypeShape::optional(TypeShape::text()), Value::None)
        .features(Features::DEFAULT | Features::LOSSY_AUTOCAST)
        .build()
        .expect("declare");

    let kept = Record::new(&ty, kwargs! { value: "x" }).expect("construct");
    assert_eq!(kept.get("value").expect("value"), &Value::text("x"));
    assert_eq!(kept.get("note").expect("note"), &Value::None);

    let cast = Record::new(&ty, kwargs! { value: 1.5, note: 2 }).expect("construct");
    assert_eq!(cast.get("value").expect("value"), &Value::Int(1));
    assert_eq!(cast.get("note").expect("note"), &Value::text("2"));
}

#[test]
fn containers_cast_element_wise() {
    let ty = RecordType::builder("Scores")
        .field("values", TypeShape::list(TypeShape::int()))
        .field("lookup", TypeShape::dict(TypeShape::text(), TypeShape::float()))
        .features(Features::DEFAULT | Features::LOSSY_AUTOCAST | Features::VALIDATION)
        .build()
        .expect("declare");

    let s = Record::new(
        &ty,
        kwargs! {
            values: Value::tuple(["1", "2"]),
            lookup: Value::dict([(1, 2)]),
        },
    )
    .expect("construct");

    assert_eq!(s.get("values").expect("values"), &Value::list([1, 2]));
    assert_eq!(
        s.get("lookup").expect("lookup"),
        &Value::dict([("1", 2.0)])
    );
}

#[test]
fn union_of_lists_keeps_an_already_matching_value() {
    let ty = RecordType::builder("Bag")
        .field(
            "v",
            TypeShape::union([
                TypeShape::list(TypeShape::text()),
                TypeShape::list(TypeShape::int()),
            ]),
        )
        .features(Features::DEFAULT | Features::LOSSY_AUTOCAST | Features::VALIDATION)
        .build()
        .expect("declare");

    let bag = Record::new(&ty, kwargs! { v: Value::list([1, 2]) }).expect("construct");
    assert_eq!(bag.get("v").expect("v"), &Value::list([1, 2]));
}

// ---- post-init ---------------------------------------------------------

fn labelled(features: Features) -> Arc<RecordType> {
    RecordType::builder("Labelled")
        .field("count", TypeShape::int())
        .field_default("label", TypeShape::text(), "")
        .features(features)
        .post_init(|record| {
            let count = record.get("count")?.clone();
            record.set("label", format!("n={count}"))
        })
        .build()
        .expect("declare")
}

#[test]
fn post_init_runs_after_casting() {
    let ty = labelled(Features::DEFAULT | Features::LOSSY_AUTOCAST | Features::VALIDATION);
    let rec = Record::new(&ty, kwargs! { count: "3" }).expect("construct");

    assert_eq!(rec.get("count").expect("count"), &Value::Int(3));
    assert_eq!(rec.get("label").expect("label"), &Value::text("n=3"));

    let next = rec.replace(kwargs! { count: 4 }).expect("replace");
    assert_eq!(next.get("label").expect("label"), &Value::text("n=4"));
}

#[test]
fn post_init_is_skipped_when_validation_fails() {
    let ty = labelled(Features::DEFAULT | Features::VALIDATION);
    let err = Record::new(&ty, kwargs! { count: "three" }).expect_err("invalid");

    assert!(matches!(err, Error::ValidationError(_)));
}

#[test]
fn post_init_errors_abort_construction() {
    let ty = labelled(Features::IMMUTABLE);
    let err = Record::new(&ty, kwargs! { count: 1 }).expect_err("frozen hook write");

    assert!(matches!(err, Error::MutationError(MutationError::Modify { .. })));
}

#[test]
fn post_init_is_inherited() {
    let parent = labelled(Features::DEFAULT);
    let child = RecordType::builder("Child")
        .extends(&parent)
        .field_default("extra", TypeShape::bool(), false)
        .build()
        .expect("declare");

    let rec = Record::new(&child, kwargs! { count: 2 }).expect("construct");
    assert_eq!(rec.get("label").expect("label"), &Value::text("n=2"));
    assert!(child.post_init().is_some());
}
