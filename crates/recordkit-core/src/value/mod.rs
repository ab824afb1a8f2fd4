mod compare;
mod render;


use crate::record::Record;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub(crate) use compare::canonical_cmp;

///
/// SeqKind
/// Dynamic-length homogeneous container kinds.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeqKind {
    #[display("list")]
    List,
    #[display("set")]
    Set,
    #[display("frozenset")]
    FrozenSet,
    #[display("deque")]
    Deque,
}

impl SeqKind {
    /// Set-like kinds deduplicate and keep their elements in canonical order.
    #[must_use]
    pub const fn is_set_like(self) -> bool {
        matches!(self, Self::Set | Self::FrozenSet)
    }

    #[must_use]
    pub const fn is_mutable(self) -> bool {
        !matches!(self, Self::FrozenSet)
    }
}

///
/// MapKind
///
/// Mapping container kinds. `Dict` is the general mapping; the others are
/// specialised mappings that a `Dict` shape also accepts.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    #[display("dict")]
    Dict,
    #[display("ordered_dict")]
    Ordered,
    #[display("default_dict")]
    Default,
    #[display("counter")]
    Counter,
}

impl MapKind {
    /// Whether a map of kind `actual` satisfies a shape declared with `self`.
    #[must_use]
    pub fn accepts(self, actual: Self) -> bool {
        self == Self::Dict || self == actual
    }
}

///
/// ContainerKind
///
/// A user-defined container kind. Only kinds flagged as generically iterable
/// can be walked element-wise; the rest have no element handler.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ContainerKind {
    name: String,
    iterable: bool,
}

impl ContainerKind {
    pub fn iterable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iterable: true,
        }
    }

    /// A kind with no element-wise handler (text-like or otherwise opaque).
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iterable: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_iterable(&self) -> bool {
        self.iterable
    }
}

///
/// Value
///
/// Runtime value held by a record slot.
///
/// None        → the absence marker (an optional field with nothing in it).
/// ByteBuffer  → mutable byte buffer; `Bytes` is the immutable form.
/// Record      → a nested record instance, owned by the enclosing value.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    ByteBuffer(Vec<u8>),
    /// Homogeneous dynamic-length container.
    /// Set-like kinds are always deduplicated and canonically ordered.
    Seq(SeqKind, Vec<Self>),
    Tuple(Vec<Self>),
    /// Mapping with unique keys; insertion order is preserved.
    Map(MapKind, Vec<(Self, Self)>),
    Container(ContainerKind, Vec<Self>),
    #[serde(skip)]
    Record(Box<Record>),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn list<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::seq(SeqKind::List, items.into_iter().map(Into::into).collect())
    }

    pub fn set<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::seq(SeqKind::Set, items.into_iter().map(Into::into).collect())
    }

    pub fn frozenset<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::seq(SeqKind::FrozenSet, items.into_iter().map(Into::into).collect())
    }

    pub fn deque<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::seq(SeqKind::Deque, items.into_iter().map(Into::into).collect())
    }

    pub fn tuple<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a sequence of the given kind, normalizing set-like kinds.
    #[must_use]
    pub fn seq(kind: SeqKind, mut items: Vec<Self>) -> Self {
        if kind.is_set_like() {
            items.sort_by(canonical_cmp);
            items.dedup_by(|a, b| canonical_cmp(a, b) == Ordering::Equal);
        }

        Self::Seq(kind, items)
    }

    pub fn dict<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Self>,
        V: Into<Self>,
    {
        Self::map(
            MapKind::Dict,
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a map of the given kind.
    ///
    /// Duplicate keys collapse onto the first occurrence's position; the
    /// later value wins.
    #[must_use]
    pub fn map(kind: MapKind, entries: Vec<(Self, Self)>) -> Self {
        let mut out: Vec<(Self, Self)> = Vec::with_capacity(entries.len());

        for (key, value) in entries {
            match out.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }

        Self::Map(kind, out)
    }

    pub fn container<T: Into<Self>>(kind: ContainerKind, items: impl IntoIterator<Item = T>) -> Self {
        Self::Container(kind, items.into_iter().map(Into::into).collect())
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Containers that must never be shared between instances as a literal
    /// default.
    #[must_use]
    pub const fn is_mutable_container(&self) -> bool {
        match self {
            Self::Seq(kind, _) => kind.is_mutable(),
            Self::Map(..) | Self::ByteBuffer(_) => true,
            _ => false,
        }
    }

    /// Runtime kind name used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Text(_) => "str".to_string(),
            Self::Bytes(_) => "bytes".to_string(),
            Self::ByteBuffer(_) => "bytebuffer".to_string(),
            Self::Seq(kind, _) => kind.to_string(),
            Self::Tuple(_) => "tuple".to_string(),
            Self::Map(kind, _) => kind.to_string(),
            Self::Container(kind, _) => kind.name().to_string(),
            Self::Record(record) => record.type_name().to_string(),
        }
    }

    ///
    /// ACCESS
    ///

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_items(&self) -> Option<&[Self]> {
        match self {
            Self::Seq(_, items) | Self::Tuple(items) | Self::Container(_, items) => {
                Some(items.as_slice())
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&[(Self, Self)]> {
        if let Self::Map(_, entries) = self {
            Some(entries.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        if let Self::Record(record) = self {
            Some(record.as_ref())
        } else {
            None
        }
    }

    /// Elements visited when this value is iterated generically.
    ///
    /// Maps iterate their keys. Text and bytes are not iterable here, and
    /// neither are opaque containers.
    #[must_use]
    pub fn elements(&self) -> Option<Vec<&Self>> {
        match self {
            Self::Seq(_, items) | Self::Tuple(items) => Some(items.iter().collect()),
            Self::Container(kind, items) if kind.is_iterable() => Some(items.iter().collect()),
            Self::Map(_, entries) => Some(entries.iter().map(|(k, _)| k).collect()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        compare::value_eq(self, other)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        compare::value_partial_cmp(self, other)
    }
}

// Conversion traits

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(Box::new(v))
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::list(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}
