use crate::{
    Error,
    cast::cast_fields,
    error::{MissingFieldsError, UnexpectedFieldsError},
    model::{Features, RecordType},
    record::Record,
    validate::validate_fields,
    value::Value,
};
use std::{collections::BTreeMap, sync::Arc};
use tracing::trace;

///
/// Construction protocol
///
/// Allocated → Populated → PostProcessed → Record
///
/// Each transition consumes the previous state, so a failed step leaves
/// nothing half-built behind.
///

impl RecordType {
    /// Start constructing an instance of this type.
    #[must_use]
    pub fn construct(self: &Arc<Self>) -> Allocated {
        Allocated {
            ty: Arc::clone(self),
        }
    }
}

///
/// Allocated
///

#[derive(Debug)]
pub struct Allocated {
    ty: Arc<RecordType>,
}

impl Allocated {
    /// Fill every slot from the arguments, the literal default, or the
    /// default factory, in that order of preference.
    pub fn populate<K, V>(self, args: impl IntoIterator<Item = (K, V)>) -> Result<Populated, Error>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut args: BTreeMap<String, Value> = args
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();

        let fields = self.ty.fields();
        let mut values = Vec::with_capacity(fields.len());
        let mut missing = Vec::new();

        for field in fields.iter() {
            match args.remove(field.name()).or_else(|| field.produce_default()) {
                Some(value) => values.push(value),
                None => missing.push(field.name().to_string()),
            }
        }

        // missing fields are reported ahead of unexpected arguments
        if !missing.is_empty() {
            return Err(MissingFieldsError {
                type_name: self.ty.name().to_string(),
                fields: missing,
            }
            .into());
        }

        if !args.is_empty() {
            return Err(UnexpectedFieldsError {
                type_name: self.ty.name().to_string(),
                fields: args.into_keys().collect(),
            }
            .into());
        }

        trace!(target: "recordkit::construct", record = self.ty.name(), "populated");

        Ok(Populated {
            record: Record {
                ty: self.ty,
                values,
                extras: BTreeMap::new(),
            },
        })
    }
}

///
/// Populated
///

#[derive(Debug)]
pub struct Populated {
    record: Record,
}

impl Populated {
    /// Whole-record casting, then whole-record validation, then the type's
    /// post-init hook.
    pub fn post_process(mut self) -> Result<PostProcessed, Error> {
        let ty = Arc::clone(self.record.record_type());

        if ty.has(Features::LOSSY_AUTOCAST) {
            cast_fields(&mut self.record)?;
        }
        if ty.has(Features::VALIDATION) {
            validate_fields(&self.record)?;
        }
        if let Some(hook) = ty.post_init() {
            trace!(target: "recordkit::construct", record = ty.name(), "post-init hook");
            hook(&mut self.record)?;
        }

        trace!(target: "recordkit::construct", record = ty.name(), "post-processed");

        Ok(PostProcessed {
            record: self.record,
        })
    }

    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }
}

///
/// PostProcessed
///

#[derive(Debug)]
pub struct PostProcessed {
    record: Record,
}

impl PostProcessed {
    #[must_use]
    pub fn finish(self) -> Record {
        self.record
    }
}
