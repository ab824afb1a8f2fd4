#[cfg(test)]
mod tests;

use crate::value::{ContainerKind, MapKind, SeqKind, Value};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ScalarKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("float")]
    Float,
    #[display("str")]
    Text,
    #[display("bytes")]
    Bytes,
    #[display("bytebuffer")]
    ByteBuffer,
}

impl ScalarKind {
    /// Runtime-kind membership; `Bool` values are not `Int`.
    #[must_use]
    pub const fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Bool, Value::Bool(_))
                | (Self::Int, Value::Int(_))
                | (Self::Float, Value::Float(_))
                | (Self::Text, Value::Text(_))
                | (Self::Bytes, Value::Bytes(_))
                | (Self::ByteBuffer, Value::ByteBuffer(_))
        )
    }
}

///
/// TypeShape
///
/// Closed description of what a field slot may hold.
/// Walked by recursive descent for both validation and casting.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeShape {
    Any,
    /// The absence marker; only meaningful as a union member.
    None,
    Scalar(ScalarKind),
    /// A nested record type, matched by declared type name.
    Instance(String),
    /// Reference to the record type being declared.
    SelfRef(String),
    Union(Vec<Self>),
    Sequence {
        kind: SeqKind,
        element: Box<Self>,
    },
    Mapping {
        kind: MapKind,
        key: Box<Self>,
        value: Box<Self>,
    },
    Tuple(Vec<Self>),
    VariadicTuple(Box<Self>),
    Container {
        kind: ContainerKind,
        element: Box<Self>,
    },
}

impl TypeShape {
    ///
    /// SCALARS
    ///

    #[must_use]
    pub const fn bool() -> Self {
        Self::Scalar(ScalarKind::Bool)
    }

    #[must_use]
    pub const fn int() -> Self {
        Self::Scalar(ScalarKind::Int)
    }

    #[must_use]
    pub const fn float() -> Self {
        Self::Scalar(ScalarKind::Float)
    }

    #[must_use]
    pub const fn text() -> Self {
        Self::Scalar(ScalarKind::Text)
    }

    #[must_use]
    pub const fn bytes() -> Self {
        Self::Scalar(ScalarKind::Bytes)
    }

    #[must_use]
    pub const fn bytebuffer() -> Self {
        Self::Scalar(ScalarKind::ByteBuffer)
    }

    pub fn instance(name: impl Into<String>) -> Self {
        Self::Instance(name.into())
    }

    pub fn self_ref(name: impl Into<String>) -> Self {
        Self::SelfRef(name.into())
    }

    ///
    /// UNIONS
    ///

    /// Build a union, flattening nested unions and dropping repeated members.
    /// A single remaining member is returned as-is.
    #[must_use]
    pub fn union(members: impl IntoIterator<Item = Self>) -> Self {
        let mut flat: Vec<Self> = Vec::new();

        for member in members {
            let parts = match member {
                Self::Union(inner) => inner,
                other => vec![other],
            };
            for part in parts {
                if !flat.contains(&part) {
                    flat.push(part);
                }
            }
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Union(flat)
        }
    }

    /// `Union[inner, None]`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::union([inner, Self::None])
    }

    ///
    /// CONTAINERS
    ///

    #[must_use]
    pub fn sequence(kind: SeqKind, element: Self) -> Self {
        Self::Sequence {
            kind,
            element: Box::new(element),
        }
    }

    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::sequence(SeqKind::List, element)
    }

    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::sequence(SeqKind::Set, element)
    }

    #[must_use]
    pub fn frozenset(element: Self) -> Self {
        Self::sequence(SeqKind::FrozenSet, element)
    }

    #[must_use]
    pub fn deque(element: Self) -> Self {
        Self::sequence(SeqKind::Deque, element)
    }

    #[must_use]
    pub fn mapping(kind: MapKind, key: Self, value: Self) -> Self {
        Self::Mapping {
            kind,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    #[must_use]
    pub fn dict(key: Self, value: Self) -> Self {
        Self::mapping(MapKind::Dict, key, value)
    }

    /// Counters only name their key shape; counts are always `int`.
    #[must_use]
    pub fn counter(key: Self) -> Self {
        Self::mapping(MapKind::Counter, key, Self::int())
    }

    #[must_use]
    pub fn tuple(positions: impl IntoIterator<Item = Self>) -> Self {
        Self::Tuple(positions.into_iter().collect())
    }

    #[must_use]
    pub fn variadic_tuple(element: Self) -> Self {
        Self::VariadicTuple(Box::new(element))
    }

    #[must_use]
    pub fn container(kind: ContainerKind, element: Self) -> Self {
        Self::Container {
            kind,
            element: Box::new(element),
        }
    }

    ///
    /// INSPECTION
    ///

    #[must_use]
    pub const fn is_absence(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Shapes that describe a parameterised container.
    #[must_use]
    pub const fn is_container_shape(&self) -> bool {
        matches!(
            self,
            Self::Sequence { .. }
                | Self::Mapping { .. }
                | Self::Tuple(_)
                | Self::VariadicTuple(_)
                | Self::Container { .. }
        )
    }

    /// Whether the value's outer container kind is the one this shape names,
    /// ignoring element shapes.
    #[must_use]
    pub fn outer_kind_matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Sequence { kind, .. }, Value::Seq(actual, _)) => kind == actual,
            (Self::Mapping { kind, .. }, Value::Map(actual, _)) => kind.accepts(*actual),
            (Self::Tuple(_) | Self::VariadicTuple(_), Value::Tuple(_)) => true,
            (Self::Container { kind, .. }, Value::Container(actual, _)) => kind == actual,
            _ => false,
        }
    }

    /// Union members, or the shape itself as a one-member slice.
    #[must_use]
    pub fn members(&self) -> &[Self] {
        match self {
            Self::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::None => f.write_str("None"),
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Instance(name) => f.write_str(name),
            Self::SelfRef(name) => write!(f, "'{name}'"),
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Self::Sequence { kind, element } => write!(f, "{kind}[{element}]"),
            Self::Mapping {
                kind: MapKind::Counter,
                key,
                ..
            } => write!(f, "counter[{key}]"),
            Self::Mapping { kind, key, value } => write!(f, "{kind}[{key}, {value}]"),
            Self::Tuple(positions) if positions.is_empty() => f.write_str("tuple[()]"),
            Self::Tuple(positions) => {
                f.write_str("tuple[")?;
                for (i, position) in positions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{position}")?;
                }
                f.write_str("]")
            }
            Self::VariadicTuple(element) => write!(f, "tuple[{element}, ...]"),
            Self::Container { kind, element } => write!(f, "{}[{element}]", kind.name()),
        }
    }
}
