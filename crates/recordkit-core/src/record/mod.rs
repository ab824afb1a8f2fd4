mod construct;

#[cfg(test)]
mod tests;

pub use construct::{Allocated, Populated, PostProcessed};

use crate::{
    Error,
    compose::{WriteTarget, hash_record, run_pipeline, try_cmp, try_eq},
    error::{AccessError, MutationError},
    model::{Features, RecordType},
    value::{MapKind, Value},
};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

///
/// Record
///
/// One instance of a declared record type: a value slot per declared field,
/// plus extra attributes when the type does not use a compact layout.
///

#[derive(Clone)]
pub struct Record {
    ty: Arc<RecordType>,
    values: Vec<Value>,
    extras: BTreeMap<String, Value>,
}

impl Record {
    ///
    /// CONSTRUCTION
    ///

    /// Run the whole construction protocol in one go.
    pub fn new<K, V>(
        ty: &Arc<RecordType>,
        args: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, Error>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Ok(ty.construct().populate(args)?.post_process()?.finish())
    }

    /// Rebuild through the construction protocol from the current field
    /// values overlaid with `args`. Works on frozen records.
    pub fn replace<K, V>(&self, args: impl IntoIterator<Item = (K, V)>) -> Result<Self, Error>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut merged: Vec<(String, Value)> = self
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();

        for (name, value) in args {
            let name = name.into();
            let value = value.into();
            match merged.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => merged.push((name, value)),
            }
        }

        Self::new(&self.ty, merged)
    }

    ///
    /// ACCESS
    ///

    #[must_use]
    pub const fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// Field values in declaration order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub const fn extras(&self) -> &BTreeMap<String, Value> {
        &self.extras
    }

    /// Field name / value pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.ty.fields().names().zip(self.values.iter())
    }

    /// Read a field or extra attribute. With `PRIVATE`, `_name` reads `name`.
    pub fn get(&self, name: &str) -> Result<&Value, AccessError> {
        if let Some(index) = self.resolve_read(name) {
            return Ok(&self.values[index]);
        }

        self.extras
            .get(name)
            .ok_or_else(|| AccessError::UnknownAttribute {
                type_name: self.type_name().to_string(),
                field: name.to_string(),
            })
    }

    /// Field → value view.
    #[must_use]
    pub fn to_map(&self) -> Value {
        Value::map(
            MapKind::Dict,
            self.iter()
                .map(|(name, value)| (Value::text(name), value.clone()))
                .collect(),
        )
    }

    ///
    /// MUTATION
    ///

    /// Write an attribute through the type's write pipeline.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        run_pipeline(self, name, value.into())
    }

    /// Remove an extra attribute. Declared fields cannot be removed.
    pub fn delete(&mut self, name: &str) -> Result<Value, Error> {
        if self.ty.has(Features::FROZEN) {
            return Err(MutationError::Delete {
                type_name: self.type_name().to_string(),
            }
            .into());
        }

        if self.resolve_read(name).is_some() {
            return Err(AccessError::DeclaredFieldDelete {
                type_name: self.type_name().to_string(),
                field: name.to_string(),
            }
            .into());
        }

        self.extras.remove(name).ok_or_else(|| {
            AccessError::UnknownAttribute {
                type_name: self.type_name().to_string(),
                field: name.to_string(),
            }
            .into()
        })
    }

    ///
    /// COMPARISON
    ///

    /// Equality over eq keys; `None` when the records are not comparable.
    #[must_use]
    pub fn try_eq(&self, other: &Self) -> Option<bool> {
        try_eq(self, other)
    }

    /// Ordering over order keys; `None` when the records are not comparable.
    #[must_use]
    pub fn try_cmp(&self, other: &Self) -> Option<Ordering> {
        try_cmp(self, other)
    }

    /// Digest of the hash keys, or `None` when the type does not compose `HASH`.
    #[must_use]
    pub fn hash_value(&self) -> Option<u64> {
        self.ty.has(Features::HASH).then(|| hash_record(self))
    }

    /// Representation: `Name(field=repr, ...)`, or `<Name record>` without `REPR`.
    #[must_use]
    pub fn repr(&self) -> String {
        if !self.ty.has(Features::REPR) {
            return format!("<{} record>", self.type_name());
        }

        let hide_private = self.ty.has(Features::PRIVATE);
        let fields = self
            .ty
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(field, _)| !(hide_private && field.is_private()))
            .map(|(field, value)| format!("{}={}", field.name(), value.repr()))
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}({fields})", self.type_name())
    }

    ///
    /// RAW STORAGE
    ///

    pub(crate) fn set_raw(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }

    pub(crate) fn store(&mut self, target: WriteTarget, name: String, value: Value) {
        match target {
            WriteTarget::Slot(index) => self.set_raw(index, value),
            WriteTarget::Extra => {
                self.extras.insert(name, value);
            }
        }
    }

    fn resolve_read(&self, name: &str) -> Option<usize> {
        let fields = self.ty.fields();

        fields.position(name).or_else(|| {
            if self.ty.has(Features::PRIVATE) {
                name.strip_prefix('_')
                    .and_then(|stripped| fields.position(stripped))
            } else {
                None
            }
        })
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.type_name());
        for (name, value) in self.iter() {
            out.field(name, value);
        }
        if !self.extras.is_empty() {
            out.field("extras", &self.extras);
        }
        out.finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other) == Some(true)
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other)
    }
}

// Without HASH, records hash by type name only.
impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.hash_value() {
            Some(digest) => state.write_u64(digest),
            None => self.type_name().hash(state),
        }
    }
}
