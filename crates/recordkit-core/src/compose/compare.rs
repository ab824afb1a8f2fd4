use crate::{
    compose::KeySet,
    model::Features,
    record::Record,
    value::Value,
};
use std::{cmp::Ordering, sync::Arc};

/// Equality over eq keys.
///
/// `None` when the records belong to different declared types or the type
/// does not compose `EQ`.
#[must_use]
pub fn try_eq(left: &Record, right: &Record) -> Option<bool> {
    comparable(left, right, Features::EQ)?;

    let keys = left.record_type().eq_keys();
    Some(key_values(left, keys).eq(key_values(right, keys)))
}

/// Lexicographic ordering over order keys.
///
/// `None` when the records are not comparable or some key pair is unordered.
#[must_use]
pub fn try_cmp(left: &Record, right: &Record) -> Option<Ordering> {
    comparable(left, right, Features::ORDER)?;

    let keys = left.record_type().order_keys();
    for (a, b) in key_values(left, keys).zip(key_values(right, keys)) {
        match a.partial_cmp(b)? {
            Ordering::Equal => {}
            other => return Some(other),
        }
    }

    Some(Ordering::Equal)
}

fn comparable(left: &Record, right: &Record, feature: Features) -> Option<()> {
    let same_type = Arc::ptr_eq(left.record_type(), right.record_type());

    (same_type && left.record_type().features().contains(feature)).then_some(())
}

fn key_values<'a>(record: &'a Record, keys: &'a KeySet) -> impl Iterator<Item = &'a Value> {
    let values = record.values();
    keys.positions().iter().map(move |&position| &values[position])
}
