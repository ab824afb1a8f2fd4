use crate::{error::ConfigError, shape::TypeShape, value::Value};
use derive_more::Deref;
use std::{collections::BTreeMap, fmt, sync::Arc};

/// Zero-argument producer of a fresh default value per instance.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Read-only per-field metadata, shared by every clone of the field.
pub type Metadata = Arc<BTreeMap<String, Value>>;

///
/// FieldConfig
///
/// Explicit field marker: default, default factory and metadata.
/// Conflicts are reported when the field table is built, not here.
///

#[derive(Clone, Default)]
pub struct FieldConfig {
    default: Option<Value>,
    default_factory: Option<DefaultFactory>,
    metadata: BTreeMap<String, Value>,
}

impl FieldConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default_factory = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("default", &self.default)
            .field("default_factory", &self.default_factory.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

///
/// FieldInit
/// How a declaration supplies the field's initial value.
///

#[derive(Clone, Debug)]
pub enum FieldInit {
    Required,
    /// A bare literal, treated as the default.
    Literal(Value),
    Config(FieldConfig),
}

impl From<FieldConfig> for FieldInit {
    fn from(config: FieldConfig) -> Self {
        Self::Config(config)
    }
}

///
/// FieldDecl
/// One unresolved field declaration, in declaration order.
///

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: String,
    pub shape: TypeShape,
    pub init: FieldInit,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, shape: TypeShape, init: impl Into<FieldInit>) -> Self {
        Self {
            name: name.into(),
            shape,
            init: init.into(),
        }
    }

    pub fn required(name: impl Into<String>, shape: TypeShape) -> Self {
        Self::new(name, shape, FieldInit::Required)
    }
}

///
/// FieldModel
/// Resolved field: name, shape, default policy and metadata.
///

#[derive(Clone)]
pub struct FieldModel {
    name: String,
    shape: TypeShape,
    default: Option<Value>,
    default_factory: Option<DefaultFactory>,
    metadata: Metadata,
}

impl FieldModel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn shape(&self) -> &TypeShape {
        &self.shape
    }

    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn has_default_factory(&self) -> bool {
        self.default_factory.is_some()
    }

    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none() && self.default_factory.is_none()
    }

    /// Underscore-prefixed fields are hidden from reprs of `PRIVATE` types.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }

    /// A clone of the literal default, or a fresh value from the factory.
    #[must_use]
    pub fn produce_default(&self) -> Option<Value> {
        match (&self.default, &self.default_factory) {
            (Some(value), _) => Some(value.clone()),
            (None, Some(factory)) => Some(factory()),
            (None, None) => None,
        }
    }
}

impl fmt::Debug for FieldModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldModel")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("default", &self.default)
            .field("default_factory", &self.default_factory.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

///
/// FieldTable
/// Ordered field list; order is declaration order, parents first.
///

#[derive(Clone, Debug, Default, Deref)]
pub struct FieldTable(Vec<FieldModel>);

impl FieldTable {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldModel> {
        self.0.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|field| field.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(FieldModel::name)
    }

    /// Child fields replace same-named parent fields in place; new ones append.
    #[must_use]
    pub fn inherit(parent: &Self, child: Self) -> Self {
        let mut fields = parent.0.clone();

        for field in child.0 {
            match fields.iter_mut().find(|existing| existing.name == field.name) {
                Some(slot) => *slot = field,
                None => fields.push(field),
            }
        }

        Self(fields)
    }
}

///
/// build_field_table
///
/// Resolve declarations into field models, preserving declaration order.
///
pub fn build_field_table(decls: Vec<FieldDecl>) -> Result<FieldTable, ConfigError> {
    let mut fields: Vec<FieldModel> = Vec::with_capacity(decls.len());

    for decl in decls {
        if fields.iter().any(|field| field.name == decl.name) {
            return Err(ConfigError::DuplicateField { field: decl.name });
        }

        let (default, default_factory, metadata) = match decl.init {
            FieldInit::Required => (None, None, BTreeMap::new()),
            FieldInit::Literal(value) => (Some(value), None, BTreeMap::new()),
            FieldInit::Config(config) => {
                if config.default.is_some() && config.default_factory.is_some() {
                    return Err(ConfigError::ConflictingDefaults { field: decl.name });
                }
                (config.default, config.default_factory, config.metadata)
            }
        };

        if let Some(value) = default.as_ref().filter(|value| value.is_mutable_container()) {
            return Err(ConfigError::MutableDefault {
                field: decl.name,
                kind: value.kind_name(),
                value: value.repr(),
            });
        }

        fields.push(FieldModel {
            name: decl.name,
            shape: decl.shape,
            default,
            default_factory,
            metadata: Arc::new(metadata),
        });
    }

    Ok(FieldTable(fields))
}
