use crate::{
    record::Record,
    value::{Value, canonical_cmp},
};
use xxhash_rust::xxh3::Xxh3;

///
/// HashSurrogate
///
/// Hashable stand-in for a value: mappings become key-sorted pairs, iterables
/// become element lists, opaque containers become their textual form.
///

#[derive(Clone, Debug, PartialEq)]
pub enum HashSurrogate {
    Leaf(Value),
    Text(String),
    List(Vec<Self>),
    Pairs(Vec<(Self, Self)>),
}

const TAG_LEAF: u8 = 0x01;
const TAG_TEXT: u8 = 0x02;
const TAG_LIST: u8 = 0x03;
const TAG_PAIRS: u8 = 0x04;

///
/// surrogate
///
#[must_use]
pub fn surrogate(value: &Value) -> HashSurrogate {
    match value {
        Value::Map(_, entries) => {
            let mut sorted: Vec<&(Value, Value)> = entries.iter().collect();
            sorted.sort_by(|(a, _), (b, _)| canonical_cmp(a, b));

            HashSurrogate::Pairs(
                sorted
                    .into_iter()
                    .map(|(k, v)| (surrogate(k), surrogate(v)))
                    .collect(),
            )
        }
        Value::Seq(_, items) | Value::Tuple(items) => list(items),
        Value::Container(kind, items) if kind.is_iterable() => list(items),
        Value::Container(..) => HashSurrogate::Text(value.to_string()),
        Value::Record(record) => list(record.values()),
        leaf => HashSurrogate::Leaf(leaf.clone()),
    }
}

fn list(items: &[Value]) -> HashSurrogate {
    HashSurrogate::List(items.iter().map(surrogate).collect())
}

///
/// hash_record
///
/// Digest of the record's hash-key values. Equal records (same keys) always
/// digest identically.
///
#[must_use]
pub fn hash_record(record: &Record) -> u64 {
    let mut h = Xxh3::new();
    feed_str(&mut h, record.type_name());

    let values = record.values();
    for &position in record.record_type().hash_keys().positions() {
        write_surrogate(&surrogate(&values[position]), &mut h);
    }

    h.digest()
}

fn feed_u8(h: &mut Xxh3, x: u8) {
    h.update(&[x]);
}
fn feed_u64(h: &mut Xxh3, x: u64) {
    h.update(&x.to_be_bytes());
}
fn feed_i64(h: &mut Xxh3, x: i64) {
    h.update(&x.to_be_bytes());
}
fn feed_bytes(h: &mut Xxh3, b: &[u8]) {
    feed_u64(h, b.len() as u64);
    h.update(b);
}
fn feed_str(h: &mut Xxh3, s: &str) {
    feed_bytes(h, s.as_bytes());
}

fn write_surrogate(surrogate: &HashSurrogate, h: &mut Xxh3) {
    match surrogate {
        HashSurrogate::Leaf(value) => {
            feed_u8(h, TAG_LEAF);
            write_leaf(value, h);
        }
        HashSurrogate::Text(text) => {
            feed_u8(h, TAG_TEXT);
            feed_str(h, text);
        }
        HashSurrogate::List(items) => {
            feed_u8(h, TAG_LIST);
            feed_u64(h, items.len() as u64);
            for item in items {
                write_surrogate(item, h);
            }
        }
        HashSurrogate::Pairs(pairs) => {
            feed_u8(h, TAG_PAIRS);
            feed_u64(h, pairs.len() as u64);
            for (key, value) in pairs {
                write_surrogate(key, h);
                write_surrogate(value, h);
            }
        }
    }
}

fn write_leaf(value: &Value, h: &mut Xxh3) {
    match value {
        Value::None => feed_u8(h, 0),
        Value::Bool(b) => {
            feed_u8(h, 1);
            feed_u8(h, u8::from(*b));
        }
        Value::Int(i) => {
            feed_u8(h, 2);
            feed_i64(h, *i);
        }
        Value::Float(x) => {
            feed_u8(h, 3);
            // 0.0 and -0.0 compare equal, so they must digest equally
            let x = if *x == 0.0 { 0.0 } else { *x };
            feed_u64(h, x.to_bits());
        }
        Value::Text(s) => {
            feed_u8(h, 4);
            feed_str(h, s);
        }
        Value::Bytes(b) => {
            feed_u8(h, 5);
            feed_bytes(h, b);
        }
        Value::ByteBuffer(b) => {
            feed_u8(h, 6);
            feed_bytes(h, b);
        }
        // containers and records never reach a leaf surrogate
        other => feed_str(h, &other.repr()),
    }
}
