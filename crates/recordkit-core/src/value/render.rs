use crate::value::{MapKind, SeqKind, Value};
use std::fmt::{self, Write};

///
/// Textual forms
///
/// `Display` is the plain textual form used when a value is cast to text:
/// text renders bare, everything else renders as its representation.
/// `repr` quotes text and is used inside containers and record reprs.
///

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            other => write_repr(f, other),
        }
    }
}

impl Value {
    /// Quoted representation of this value.
    #[must_use]
    pub fn repr(&self) -> String {
        let mut out = String::new();
        let _ = write_repr(&mut out, self);
        out
    }
}

fn write_repr(out: &mut dyn Write, value: &Value) -> fmt::Result {
    match value {
        Value::None => out.write_str("None"),
        Value::Bool(b) => write!(out, "{b}"),
        Value::Int(i) => write!(out, "{i}"),
        Value::Float(x) => write_float(out, *x),
        Value::Text(s) => write!(out, "{s:?}"),
        Value::Bytes(b) => write_bytes(out, b),
        Value::ByteBuffer(b) => {
            out.write_str("bytebuffer(")?;
            write_bytes(out, b)?;
            out.write_char(')')
        }
        Value::Seq(kind, items) => match kind {
            SeqKind::List => write_items(out, "[", items, "]"),
            SeqKind::Set if items.is_empty() => out.write_str("set()"),
            SeqKind::Set => write_items(out, "{", items, "}"),
            SeqKind::FrozenSet => write_items(out, "frozenset({", items, "})"),
            SeqKind::Deque => write_items(out, "deque([", items, "])"),
        },
        Value::Tuple(items) if items.len() == 1 => {
            out.write_char('(')?;
            write_repr(out, &items[0])?;
            out.write_str(",)")
        }
        Value::Tuple(items) => write_items(out, "(", items, ")"),
        Value::Map(kind, entries) => {
            let (open, close) = match kind {
                MapKind::Dict => ("{", "}"),
                MapKind::Ordered => ("ordered_dict({", "})"),
                MapKind::Default => ("default_dict({", "})"),
                MapKind::Counter => ("counter({", "})"),
            };

            out.write_str(open)?;
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_repr(out, key)?;
                out.write_str(": ")?;
                write_repr(out, value)?;
            }
            out.write_str(close)
        }
        Value::Container(kind, items) => {
            out.write_str(kind.name())?;
            write_items(out, "([", items, "])")
        }
        Value::Record(record) => write!(out, "{}", record.repr()),
    }
}

fn write_items(out: &mut dyn Write, open: &str, items: &[Value], close: &str) -> fmt::Result {
    out.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_repr(out, item)?;
    }
    out.write_str(close)
}

// Shortest round-trip digits; exponents carry a sign and at least two digits
// (`1e+20`, `1.5e-07`), non-finite values render as `nan` / `inf` / `-inf`.
fn write_float(out: &mut dyn Write, x: f64) -> fmt::Result {
    if x.is_nan() {
        return out.write_str("nan");
    }
    if x.is_infinite() {
        return out.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }

    let digits = format!("{x:?}");
    match digits.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, magnitude) = match exponent.strip_prefix('-') {
                Some(magnitude) => ('-', magnitude),
                None => ('+', exponent),
            };
            write!(out, "{mantissa}e{sign}{magnitude:0>2}")
        }
        None => out.write_str(&digits),
    }
}

fn write_bytes(out: &mut dyn Write, bytes: &[u8]) -> fmt::Result {
    write!(out, "b\"{}\"", bytes.escape_ascii())
}
