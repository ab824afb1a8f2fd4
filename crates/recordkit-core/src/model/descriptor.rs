use crate::{
    Error,
    compose::{ComposedFeatures, KeyOverrides, KeySet, WritePipeline, compose_features},
    error::ConfigError,
    model::{
        Features,
        field::{FieldConfig, FieldDecl, FieldInit, FieldTable, build_field_table},
    },
    record::Record,
    shape::TypeShape,
    value::Value,
};
use std::{fmt, sync::Arc};
use tracing::debug;

/// Hook run on every freshly constructed record, after casting and validation.
pub type PostInit = Arc<dyn Fn(&mut Record) -> Result<(), Error> + Send + Sync>;

///
/// RecordType
///
/// Immutable descriptor of a declared record type: its field table and the
/// behaviour composed from its features. Shared by every instance via `Arc`.
///

pub struct RecordType {
    name: String,
    fields: FieldTable,
    overrides: KeyOverrides,
    composed: ComposedFeatures,
    post_init: Option<PostInit>,
}

impl RecordType {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder::new(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn fields(&self) -> &FieldTable {
        &self.fields
    }

    #[must_use]
    pub const fn features(&self) -> Features {
        self.composed.features
    }

    #[must_use]
    pub const fn has(&self, feature: Features) -> bool {
        self.composed.features.contains(feature)
    }

    #[must_use]
    pub const fn key_overrides(&self) -> &KeyOverrides {
        &self.overrides
    }

    #[must_use]
    pub const fn eq_keys(&self) -> &KeySet {
        &self.composed.eq_keys
    }

    #[must_use]
    pub const fn hash_keys(&self) -> &KeySet {
        &self.composed.hash_keys
    }

    #[must_use]
    pub const fn order_keys(&self) -> &KeySet {
        &self.composed.order_keys
    }

    #[must_use]
    pub const fn pipeline(&self) -> &WritePipeline {
        &self.composed.pipeline
    }

    #[must_use]
    pub const fn post_init(&self) -> Option<&PostInit> {
        self.post_init.as_ref()
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("overrides", &self.overrides)
            .field("composed", &self.composed)
            .field("post_init", &self.post_init.is_some())
            .finish()
    }
}

///
/// RecordTypeBuilder
///
/// Collects field declarations, an optional parent and feature settings,
/// then resolves them into a shared [`RecordType`].
///

pub struct RecordTypeBuilder {
    name: String,
    parent: Option<Arc<RecordType>>,
    decls: Vec<FieldDecl>,
    features: Option<Features>,
    overrides: KeyOverrides,
    post_init: Option<PostInit>,
}

impl fmt::Debug for RecordTypeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordTypeBuilder")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .field("decls", &self.decls)
            .field("features", &self.features)
            .field("overrides", &self.overrides)
            .field("post_init", &self.post_init.is_some())
            .finish()
    }
}

impl RecordTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            decls: Vec::new(),
            features: None,
            overrides: KeyOverrides::default(),
            post_init: None,
        }
    }

    ///
    /// FIELDS
    ///

    /// Declare a required field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, shape: TypeShape) -> Self {
        self.declare(FieldDecl::required(name, shape))
    }

    /// Declare a field with a bare literal default.
    #[must_use]
    pub fn field_default(
        self,
        name: impl Into<String>,
        shape: TypeShape,
        default: impl Into<Value>,
    ) -> Self {
        self.declare(FieldDecl::new(
            name,
            shape,
            FieldInit::Literal(default.into()),
        ))
    }

    /// Declare a field with an explicit field marker.
    #[must_use]
    pub fn field_with(self, name: impl Into<String>, shape: TypeShape, config: FieldConfig) -> Self {
        self.declare(FieldDecl::new(name, shape, config))
    }

    #[must_use]
    pub fn declare(mut self, decl: FieldDecl) -> Self {
        self.decls.push(decl);
        self
    }

    ///
    /// TYPE SETTINGS
    ///

    /// Start from `parent`'s fields, features and key overrides.
    #[must_use]
    pub fn extends(mut self, parent: &Arc<RecordType>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    #[must_use]
    pub fn features(mut self, features: Features) -> Self {
        self.features = Some(features);
        self
    }

    #[must_use]
    pub fn eq_keys<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.overrides.eq = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn hash_keys<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.overrides.hash = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn order_keys<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.overrides.order = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub(crate) fn key_overrides(mut self, overrides: KeyOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Run `hook` on each new record once casting and validation are done.
    /// Writes made by the hook go through the record's write pipeline.
    #[must_use]
    pub fn post_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Record) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.post_init = Some(Arc::new(hook));
        self
    }

    ///
    /// BUILD
    ///

    pub fn build(self) -> Result<Arc<RecordType>, ConfigError> {
        let own = build_field_table(self.decls)?;

        let (fields, features, overrides, post_init) = match &self.parent {
            Some(parent) => (
                FieldTable::inherit(parent.fields(), own),
                self.features.unwrap_or_else(|| parent.features()),
                self.overrides.or_inherit(parent.key_overrides()),
                self.post_init.or_else(|| parent.post_init.clone()),
            ),
            None => (
                own,
                self.features.unwrap_or_default(),
                self.overrides,
                self.post_init,
            ),
        };

        let composed = compose_features(&fields, features, &overrides)?;

        debug!(
            target: "recordkit::declare",
            record = %self.name,
            fields = fields.len(),
            features = %features,
            parent = self.parent.as_ref().map(|parent| parent.name()),
            "record type declared"
        );

        Ok(Arc::new(RecordType {
            name: self.name,
            fields,
            overrides,
            composed,
            post_init,
        }))
    }
}
