use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::core::ids::IdentifierSet;

#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("Duplicate sample id in table: {0}")]
    DuplicateSampleId(String),

    #[error("Duplicate observation id in table: {0}")]
    DuplicateObservationId(String),

    #[error("Matrix entry ({row}, {col}) is outside the table shape ({rows}, {cols})")]
    EntryOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Expected {expected} sample ids but got {found}")]
    SampleCountMismatch { expected: usize, found: usize },

    #[error("Table has no samples")]
    NoSamples,
}

/// Element type declared for the matrix values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Int,
    #[default]
    Float,
    Unicode,
}

/// One non-zero cell of the matrix: (observation index, sample index, value)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub observation: usize,
    pub sample: usize,
    pub value: f64,
}

/// A sparse observation-by-sample abundance table.
///
/// Rows are observations and columns are samples. Ids on each axis are
/// unique; this is checked whenever a table is built or its sample ids are
/// replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table id as recorded in the file (if any)
    pub id: Option<String>,

    /// Table type, e.g. "OTU table"
    pub table_type: String,

    pub element_type: ElementType,

    observation_ids: Vec<String>,
    sample_ids: Vec<String>,

    /// Per-observation metadata, aligned with `observation_ids`
    observation_metadata: Vec<Value>,

    /// Per-sample metadata, aligned with `sample_ids`
    sample_metadata: Vec<Value>,

    entries: Vec<Entry>,
}

impl Table {
    /// Build a table from its axis ids and non-zero entries.
    ///
    /// # Errors
    ///
    /// Returns `TableError::NoSamples` if the sample axis is empty,
    /// `TableError::DuplicateObservationId`/`DuplicateSampleId` if an axis
    /// repeats an id, or `TableError::EntryOutOfBounds` if an entry falls
    /// outside the shape implied by the ids.
    pub fn new(
        observation_ids: Vec<String>,
        sample_ids: Vec<String>,
        entries: Vec<Entry>,
    ) -> Result<Self, TableError> {
        if sample_ids.is_empty() {
            return Err(TableError::NoSamples);
        }
        if let Some(dup) = first_duplicate(&observation_ids) {
            return Err(TableError::DuplicateObservationId(dup));
        }
        if let Some(dup) = first_duplicate(&sample_ids) {
            return Err(TableError::DuplicateSampleId(dup));
        }

        let (rows, cols) = (observation_ids.len(), sample_ids.len());
        if let Some(e) = entries
            .iter()
            .find(|e| e.observation >= rows || e.sample >= cols)
        {
            return Err(TableError::EntryOutOfBounds {
                row: e.observation,
                col: e.sample,
                rows,
                cols,
            });
        }

        Ok(Self {
            id: None,
            table_type: "OTU table".to_string(),
            element_type: ElementType::default(),
            observation_metadata: vec![Value::Null; rows],
            sample_metadata: vec![Value::Null; cols],
            observation_ids,
            sample_ids,
            entries,
        })
    }

    /// Build a table from a dense observation-major matrix, dropping zeros.
    ///
    /// # Errors
    ///
    /// Same as [`Table::new`]; a row longer than the sample axis is reported
    /// as `EntryOutOfBounds`.
    pub fn from_dense(
        observation_ids: Vec<String>,
        sample_ids: Vec<String>,
        rows: &[Vec<f64>],
    ) -> Result<Self, TableError> {
        let entries = rows
            .iter()
            .enumerate()
            .flat_map(|(observation, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, v)| **v != 0.0)
                    .map(move |(sample, &value)| Entry {
                        observation,
                        sample,
                        value,
                    })
            })
            .collect();
        Self::new(observation_ids, sample_ids, entries)
    }

    /// Attach per-axis metadata. Vectors of the wrong length are ignored.
    #[must_use]
    pub fn with_metadata(mut self, observations: Vec<Value>, samples: Vec<Value>) -> Self {
        if observations.len() == self.observation_ids.len() {
            self.observation_metadata = observations;
        }
        if samples.len() == self.sample_ids.len() {
            self.sample_metadata = samples;
        }
        self
    }

    #[must_use]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    #[must_use]
    pub fn observation_ids(&self) -> &[String] {
        &self.observation_ids
    }

    #[must_use]
    pub fn sample_metadata(&self) -> &[Value] {
        &self.sample_metadata
    }

    #[must_use]
    pub fn observation_metadata(&self) -> &[Value] {
        &self.observation_metadata
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// (observations, samples)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.observation_ids.len(), self.sample_ids.len())
    }

    #[must_use]
    pub fn sample_set(&self) -> IdentifierSet {
        self.sample_ids.iter().cloned().collect()
    }

    #[must_use]
    pub fn observation_set(&self) -> IdentifierSet {
        self.observation_ids.iter().cloned().collect()
    }

    /// Sum of values per sample, in sample order
    #[must_use]
    pub fn sample_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.sample_ids.len()];
        for e in &self.entries {
            totals[e.sample] += e.value;
        }
        totals
    }

    /// Replace the sample ids, keeping the matrix and observation axis.
    ///
    /// # Errors
    ///
    /// Returns `TableError::SampleCountMismatch` if the number of ids differs,
    /// or `TableError::DuplicateSampleId` if the new ids are not unique.
    pub fn with_sample_ids(&self, sample_ids: Vec<String>) -> Result<Self, TableError> {
        if sample_ids.len() != self.sample_ids.len() {
            return Err(TableError::SampleCountMismatch {
                expected: self.sample_ids.len(),
                found: sample_ids.len(),
            });
        }
        if let Some(dup) = first_duplicate(&sample_ids) {
            return Err(TableError::DuplicateSampleId(dup));
        }

        Ok(Self {
            sample_ids,
            ..self.clone()
        })
    }
}

fn first_duplicate(ids: &[String]) -> Option<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().find(|id| !seen.insert(id.as_str())).cloned()
}
