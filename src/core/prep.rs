use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::ids::IdentifierSet;

/// Default name of the column mapping prep sample ids to table sample ids
pub const DEFAULT_PREFIX_COLUMN: &str = "run_prefix";

/// Attribute values for a single prep sample (column -> value)
pub type SampleAttributes = BTreeMap<String, String>;

/// Prep information: the authoritative sample ids of a template and their
/// metadata columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrepInformation {
    samples: BTreeMap<String, SampleAttributes>,
}

impl PrepInformation {
    #[must_use]
    pub fn new(samples: BTreeMap<String, SampleAttributes>) -> Self {
        Self { samples }
    }

    /// Builder-style insertion of one sample
    #[must_use]
    pub fn with_sample<I, K, V>(mut self, id: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.samples.insert(
            id.into(),
            attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn sample_ids(&self) -> IdentifierSet {
        self.samples.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value of `column` for sample `id`; empty values count as absent
    #[must_use]
    pub fn get(&self, id: &str, column: &str) -> Option<&str> {
        self.samples
            .get(id)
            .and_then(|attrs| attrs.get(column))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether at least one sample declares a non-empty value for `column`
    #[must_use]
    pub fn declares(&self, column: &str) -> bool {
        self.samples.keys().any(|id| self.get(id, column).is_some())
    }

    /// (sample id, value) for every sample with a non-empty `column` value
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.samples
            .keys()
            .filter_map(move |id| self.get(id, column).map(|v| (id.as_str(), v)))
    }
}
