use crate::{
    compose::KeyOverrides,
    model::{
        Features,
        descriptor::RecordTypeBuilder,
        field::{FieldConfig, FieldDecl, FieldInit},
    },
    shape::TypeShape,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// RecordDeclaration
///
/// Data form of a record type declaration, for types declared from
/// configuration rather than code. Default factories have no data form.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RecordDeclaration {
    pub name: String,

    #[serde(default)]
    pub features: Features,

    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,

    #[serde(default, flatten)]
    pub keys: KeyOverrides,
}

///
/// FieldDeclaration
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FieldDeclaration {
    pub name: String,
    pub shape: TypeShape,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl FieldDeclaration {
    fn into_decl(self) -> FieldDecl {
        let init = match (self.default, self.metadata.is_empty()) {
            (None, true) => FieldInit::Required,
            (Some(value), true) => FieldInit::Literal(value),
            (default, false) => {
                let mut config = FieldConfig::new();
                if let Some(value) = default {
                    config = config.default_value(value);
                }
                for (key, value) in self.metadata {
                    config = config.metadata(key, value);
                }
                FieldInit::Config(config)
            }
        };

        FieldDecl::new(self.name, self.shape, init)
    }
}

impl RecordDeclaration {
    /// Feed this declaration into the regular builder path.
    #[must_use]
    pub fn into_builder(self) -> RecordTypeBuilder {
        let builder = RecordTypeBuilder::new(self.name)
            .features(self.features)
            .key_overrides(self.keys);

        self.fields
            .into_iter()
            .fold(builder, |builder, field| builder.declare(field.into_decl()))
    }
}
