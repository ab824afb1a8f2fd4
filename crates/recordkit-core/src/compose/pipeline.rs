use crate::{
    Error,
    cast::cast_field,
    error::{AccessError, MutationError},
    model::{Features, RecordType},
    record::Record,
    validate::validate_field,
    value::Value,
};
use std::{fmt, sync::Arc};
use tracing::trace;

///
/// WriteTarget
/// Where a committed write lands.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteTarget {
    /// Undeclared name; stored as an extra attribute.
    Extra,
    /// Declared field at this position.
    Slot(usize),
}

///
/// AttributeWrite
///
/// One attribute write travelling through the pipeline. Stages may rename
/// it, replace its value, or reject it.
///

#[derive(Clone, Debug)]
pub struct AttributeWrite {
    pub name: String,
    pub value: Value,
    pub target: WriteTarget,
}

impl AttributeWrite {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            target: WriteTarget::Extra,
        }
    }
}

///
/// WriteStage
///

pub trait WriteStage: fmt::Debug + Send + Sync {
    fn label(&self) -> &'static str;

    fn on_write(&self, ty: &RecordType, write: &mut AttributeWrite) -> Result<(), Error>;
}

///
/// NameResolution
///
/// Declared names are not writable directly; `_name` addresses field `name`.
///

#[derive(Debug)]
pub struct NameResolution;

impl WriteStage for NameResolution {
    fn label(&self) -> &'static str {
        "name_resolution"
    }

    fn on_write(&self, ty: &RecordType, write: &mut AttributeWrite) -> Result<(), Error> {
        if ty.fields().contains(&write.name) {
            return Err(AccessError::PrivateWrite {
                field: write.name.clone(),
            }
            .into());
        }

        if let Some(stripped) = write.name.strip_prefix('_') {
            if !ty.fields().contains(stripped) {
                return Err(AccessError::PrivateNotFound {
                    field: write.name.clone(),
                }
                .into());
            }
            write.name = stripped.to_string();
        }

        Ok(())
    }
}

///
/// MutationGuard
///

#[derive(Debug)]
pub struct MutationGuard;

impl WriteStage for MutationGuard {
    fn label(&self) -> &'static str {
        "mutation_guard"
    }

    fn on_write(&self, ty: &RecordType, _: &mut AttributeWrite) -> Result<(), Error> {
        Err(MutationError::Modify {
            type_name: ty.name().to_string(),
        }
        .into())
    }
}

///
/// Coercion
///

#[derive(Debug)]
pub struct Coercion;

impl WriteStage for Coercion {
    fn label(&self) -> &'static str {
        "coercion"
    }

    fn on_write(&self, ty: &RecordType, write: &mut AttributeWrite) -> Result<(), Error> {
        if let Some(field) = ty.fields().get(&write.name) {
            write.value = cast_field(field, &write.value)?;
        }

        Ok(())
    }
}

///
/// Verification
///

#[derive(Debug)]
pub struct Verification;

impl WriteStage for Verification {
    fn label(&self) -> &'static str {
        "verification"
    }

    fn on_write(&self, ty: &RecordType, write: &mut AttributeWrite) -> Result<(), Error> {
        if let Some(field) = ty.fields().get(&write.name) {
            validate_field(field, &write.value)?;
        }

        Ok(())
    }
}

///
/// Commit
/// Binds the write to a slot, or to the extra attributes if allowed.
///

#[derive(Debug)]
pub struct Commit;

impl WriteStage for Commit {
    fn label(&self) -> &'static str {
        "commit"
    }

    fn on_write(&self, ty: &RecordType, write: &mut AttributeWrite) -> Result<(), Error> {
        write.target = match ty.fields().position(&write.name) {
            Some(index) => WriteTarget::Slot(index),
            None if ty.features().contains(Features::SLOTS) => {
                return Err(AccessError::UndeclaredSlot {
                    type_name: ty.name().to_string(),
                    field: write.name.clone(),
                }
                .into());
            }
            None => WriteTarget::Extra,
        };

        Ok(())
    }
}

///
/// WritePipeline
///
/// Ordered write stages for one record type. Coercion always runs before
/// verification, and commit always runs last.
///

pub struct WritePipeline {
    stages: Vec<Box<dyn WriteStage>>,
}

impl WritePipeline {
    #[must_use]
    pub fn compose(features: Features) -> Self {
        let mut stages: Vec<Box<dyn WriteStage>> = Vec::new();

        if features.contains(Features::PRIVATE) {
            stages.push(Box::new(NameResolution));
        }
        if features.contains(Features::FROZEN) {
            stages.push(Box::new(MutationGuard));
        }
        if features.contains(Features::LOSSY_AUTOCAST) {
            stages.push(Box::new(Coercion));
        }
        if features.contains(Features::VALIDATION) {
            stages.push(Box::new(Verification));
        }
        stages.push(Box::new(Commit));

        Self { stages }
    }

    #[must_use]
    pub fn stages(&self) -> &[Box<dyn WriteStage>] {
        &self.stages
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.label())
    }
}

impl fmt::Debug for WritePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

///
/// run_pipeline
///
/// Run one attribute write through the record type's pipeline and store it.
/// Nothing is stored unless every stage accepts the write.
///
pub fn run_pipeline(record: &mut Record, name: &str, value: Value) -> Result<(), Error> {
    let ty = Arc::clone(record.record_type());
    let mut write = AttributeWrite::new(name, value);

    for stage in ty.pipeline().stages() {
        trace!(
            target: "recordkit::write",
            record = ty.name(),
            field = %write.name,
            stage = stage.label(),
            "write stage"
        );
        stage.on_write(&ty, &mut write)?;
    }

    record.store(write.target, write.name, write.value);

    Ok(())
}
