use crate::value::{SeqKind, Value};
use std::cmp::Ordering;

/// Structural equality.
///
/// - variants never compare equal across each other (`Int(1) != Float(1.0)`)
/// - `Set` and `FrozenSet` compare by members
/// - maps compare order-insensitively, regardless of map kind
/// - nested records compare by type name and field values
pub(super) fn value_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        #[allow(clippy::float_cmp)]
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Bytes(a), Value::Bytes(b)) | (Value::ByteBuffer(a), Value::ByteBuffer(b)) => a == b,
        (Value::Seq(ka, a), Value::Seq(kb, b)) => seq_family(*ka) == seq_family(*kb) && a == b,
        (Value::Tuple(a), Value::Tuple(b)) => a == b,
        (Value::Map(_, a), Value::Map(_, b)) => map_eq(a, b),
        (Value::Container(ka, a), Value::Container(kb, b)) => ka == kb && a == b,
        (Value::Record(a), Value::Record(b)) => {
            a.type_name() == b.type_name() && a.values() == b.values()
        }
        _ => false,
    }
}

/// Partial ordering between values of the same variant.
///
/// Returns `None` for mismatched variants and for unordered kinds (maps,
/// sets, containers) unless the two values are equal.
pub(super) fn value_partial_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) | (Value::ByteBuffer(a), Value::ByteBuffer(b)) => {
            a.partial_cmp(b)
        }
        (Value::Seq(ka, a), Value::Seq(kb, b)) if ka == kb && !ka.is_set_like() => {
            lexicographic(a, b)
        }
        (Value::Tuple(a), Value::Tuple(b)) => lexicographic(a, b),
        (Value::Record(a), Value::Record(b)) if a.type_name() == b.type_name() => {
            lexicographic(a.values(), b.values())
        }
        _ => value_eq(left, right).then_some(Ordering::Equal),
    }
}

/// Total canonical comparator used for set normalization and hash surrogates.
///
/// Ordering rules:
/// 1. Canonical variant rank
/// 2. Variant-specific comparison for same-ranked values
///
/// Values that are equal under `==` always compare `Equal` here.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = canonical_rank(left).cmp(&canonical_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::None => 0,
        Value::Bool(_) => 1,
        Value::Int(_) => 2,
        Value::Float(_) => 3,
        Value::Text(_) => 4,
        Value::Bytes(_) => 5,
        Value::ByteBuffer(_) => 6,
        Value::Seq(..) => 7,
        Value::Tuple(_) => 8,
        Value::Map(..) => 9,
        Value::Container(..) => 10,
        Value::Record(_) => 11,
    }
}

// Set and FrozenSet share a family so that equal sets sort together.
const fn seq_family(kind: SeqKind) -> u8 {
    match kind {
        SeqKind::List => 0,
        SeqKind::Set | SeqKind::FrozenSet => 1,
        SeqKind::Deque => 2,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    #[allow(clippy::match_same_arms)]
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => canonical_cmp_float(*a, *b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) | (Value::ByteBuffer(a), Value::ByteBuffer(b)) => {
            a.cmp(b)
        }
        (Value::Seq(ka, a), Value::Seq(kb, b)) => seq_family(*ka)
            .cmp(&seq_family(*kb))
            .then_with(|| canonical_cmp_list(a, b)),
        (Value::Tuple(a), Value::Tuple(b)) => canonical_cmp_list(a, b),
        (Value::Map(_, a), Value::Map(_, b)) => canonical_cmp_map(a, b),
        (Value::Container(ka, a), Value::Container(kb, b)) => ka
            .name()
            .cmp(kb.name())
            .then_with(|| ka.is_iterable().cmp(&kb.is_iterable()))
            .then_with(|| canonical_cmp_list(a, b)),
        (Value::Record(a), Value::Record(b)) => a
            .type_name()
            .cmp(b.type_name())
            .then_with(|| canonical_cmp_list(a.values(), b.values())),
        (Value::None, Value::None) => Ordering::Equal,
        _ => Ordering::Equal,
    }
}

#[allow(clippy::float_cmp)]
fn canonical_cmp_float(left: f64, right: f64) -> Ordering {
    if left == right {
        Ordering::Equal
    } else {
        left.total_cmp(&right)
    }
}

fn canonical_cmp_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

// Maps are unordered, so both sides are compared in canonical key order.
fn canonical_cmp_map(left: &[(Value, Value)], right: &[(Value, Value)]) -> Ordering {
    let left = sorted_entries(left);
    let right = sorted_entries(right);

    for ((left_key, left_value), (right_key, right_value)) in left.iter().zip(right.iter()) {
        let key_cmp = canonical_cmp(left_key, right_key);
        if key_cmp != Ordering::Equal {
            return key_cmp;
        }

        let value_cmp = canonical_cmp(left_value, right_value);
        if value_cmp != Ordering::Equal {
            return value_cmp;
        }
    }

    left.len().cmp(&right.len())
}

fn sorted_entries(entries: &[(Value, Value)]) -> Vec<&(Value, Value)> {
    let mut sorted: Vec<_> = entries.iter().collect();
    sorted.sort_by(|(a, _), (b, _)| canonical_cmp(a, b));
    sorted
}

fn map_eq(left: &[(Value, Value)], right: &[(Value, Value)]) -> bool {
    left.len() == right.len()
        && left.iter().all(|(key, value)| {
            right
                .iter()
                .any(|(other_key, other_value)| key == other_key && value == other_value)
        })
}

// Lexicographic partial comparison; the first incomparable pair poisons the result.
fn lexicographic(left: &[Value], right: &[Value]) -> Option<Ordering> {
    for (left, right) in left.iter().zip(right.iter()) {
        match value_partial_cmp(left, right)? {
            Ordering::Equal => {}
            other => return Some(other),
        }
    }

    Some(left.len().cmp(&right.len()))
}
