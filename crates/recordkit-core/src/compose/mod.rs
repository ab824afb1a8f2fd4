//! Feature composition: a flag set becomes key sets, a write pipeline and the
//! comparison / hashing / repr behaviour of a record type.

mod compare;
mod hash;
mod pipeline;


pub use compare::{try_cmp, try_eq};
pub use hash::{HashSurrogate, hash_record, surrogate};
pub use pipeline::{
    AttributeWrite, Coercion, Commit, MutationGuard, NameResolution, Verification, WritePipeline,
    WriteStage, WriteTarget, run_pipeline,
};

use crate::{
    error::ConfigError,
    model::{Features, FieldTable},
};
use serde::{Deserialize, Serialize};

///
/// KeyOverrides
///
/// Explicit eq / hash / order key lists. `None` or an empty list means
/// "every declared field".
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyOverrides {
    #[serde(default, rename = "eq_keys", skip_serializing_if = "Option::is_none")]
    pub eq: Option<Vec<String>>,
    #[serde(default, rename = "hash_keys", skip_serializing_if = "Option::is_none")]
    pub hash: Option<Vec<String>>,
    #[serde(default, rename = "order_keys", skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
}

impl KeyOverrides {
    /// Overrides set on `self` win; unset ones fall back to `parent`.
    #[must_use]
    pub fn or_inherit(self, parent: &Self) -> Self {
        Self {
            eq: self.eq.or_else(|| parent.eq.clone()),
            hash: self.hash.or_else(|| parent.hash.clone()),
            order: self.order.or_else(|| parent.order.clone()),
        }
    }
}

///
/// KeySet
/// Resolved field positions used by one comparison capability.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeySet {
    names: Vec<String>,
    positions: Vec<usize>,
}

impl KeySet {
    fn resolve(
        fields: &FieldTable,
        key_set: &'static str,
        names: Option<&[String]>,
    ) -> Result<Self, ConfigError> {
        let names: Vec<String> = match names {
            Some(names) if !names.is_empty() => names.to_vec(),
            _ => fields.names().map(str::to_string).collect(),
        };

        let positions = names
            .iter()
            .map(|name| {
                fields.position(name).ok_or_else(|| ConfigError::UnknownKey {
                    key_set,
                    field: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { names, positions })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

///
/// ComposedFeatures
///
/// Everything a record type needs at runtime to honour its feature flags.
/// Built once per type and never changed afterwards.
///

#[derive(Debug)]
pub struct ComposedFeatures {
    pub features: Features,
    pub eq_keys: KeySet,
    pub hash_keys: KeySet,
    pub order_keys: KeySet,
    pub pipeline: WritePipeline,
}

///
/// compose_features
///
pub fn compose_features(
    fields: &FieldTable,
    features: Features,
    overrides: &KeyOverrides,
) -> Result<ComposedFeatures, ConfigError> {
    Ok(ComposedFeatures {
        features,
        eq_keys: KeySet::resolve(fields, "eq", overrides.eq.as_deref())?,
        hash_keys: KeySet::resolve(fields, "hash", overrides.hash.as_deref())?,
        order_keys: KeySet::resolve(fields, "order", overrides.order.as_deref())?,
        pipeline: WritePipeline::compose(features),
    })
}
