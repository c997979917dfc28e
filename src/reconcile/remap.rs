use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::ids::IdentifierSet;
use crate::core::prep::PrepInformation;
use crate::core::table::{Table, TableError};
use crate::reconcile::compare::Classification;

#[derive(Error, Debug, PartialEq)]
pub enum RemapError {
    #[error("No prep sample declares a value for the \"{0}\" column")]
    NoMappingDefined(String),

    #[error("Prep samples {first} and {second} both declare \"{value}\" in the \"{column}\" column")]
    AmbiguousPrefix {
        column: String,
        value: String,
        first: String,
        second: String,
    },

    #[error("Sample {0} has no entry in the renaming")]
    Unresolved(String),

    #[error("Renamed table is invalid: {0}")]
    Table(#[from] TableError),
}

/// A one-to-one mapping from table sample ids to prep sample ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renaming(BTreeMap<String, String>);

impl Renaming {
    /// Prep sample id for a table sample id
    #[must_use]
    pub fn get(&self, candidate: &str) -> Option<&str> {
        self.0.get(candidate).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Candidate ids with no entry in this renaming
    #[must_use]
    pub fn unresolved(&self, candidate: &IdentifierSet) -> IdentifierSet {
        candidate.iter().filter(|id| !self.0.contains_key(*id)).collect()
    }

    /// `ExactOrSubset` when every candidate id resolves, otherwise
    /// `Missing` with the ids that do not
    #[must_use]
    pub fn coverage(&self, candidate: &IdentifierSet) -> Classification {
        let unresolved = self.unresolved(candidate);
        if unresolved.is_empty() {
            Classification::ExactOrSubset
        } else {
            Classification::Missing(unresolved)
        }
    }
}

impl FromIterator<(String, String)> for Renaming {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build the renaming declared by `prefix_column` of the prep information.
///
/// Each prep sample's `prefix_column` value is the id it is expected to have
/// in the table. The result holds an entry for every candidate id that is
/// such a value; candidate ids that are not are left for the caller to find
/// with [`Renaming::unresolved`].
///
/// # Errors
///
/// Returns `RemapError::NoMappingDefined` if no prep sample declares the
/// column, or `RemapError::AmbiguousPrefix` if two prep samples declare the
/// same value.
pub fn build_remap(
    candidate: &IdentifierSet,
    reference: &PrepInformation,
    prefix_column: &str,
) -> Result<Renaming, RemapError> {
    if !reference.declares(prefix_column) {
        return Err(RemapError::NoMappingDefined(prefix_column.to_string()));
    }

    // Invert prep id -> prefix into prefix -> prep id
    let mut inverse: BTreeMap<&str, &str> = BTreeMap::new();
    for (prep_id, prefix) in reference.column(prefix_column) {
        match inverse.entry(prefix) {
            Entry::Vacant(slot) => {
                slot.insert(prep_id);
            }
            Entry::Occupied(existing) => {
                return Err(RemapError::AmbiguousPrefix {
                    column: prefix_column.to_string(),
                    value: prefix.to_string(),
                    first: (*existing.get()).to_string(),
                    second: prep_id.to_string(),
                });
            }
        }
    }

    Ok(candidate
        .iter()
        .filter_map(|id| {
            inverse
                .get(id)
                .map(|prep_id| (id.to_string(), (*prep_id).to_string()))
        })
        .collect())
}

/// Build the renaming that qualifies every candidate id with the study
/// qualifier shared by all reference ids (`SKB8.640193` -> `1.SKB8.640193`).
///
/// Returns `None` when the reference ids do not share a qualifier or when
/// any qualified candidate id is not a reference id.
#[must_use]
pub fn build_qualified_remap(
    candidate: &IdentifierSet,
    reference: &IdentifierSet,
) -> Option<Renaming> {
    let qualifier = common_qualifier(reference)?;

    candidate
        .iter()
        .map(|id| {
            let qualified = format!("{qualifier}.{id}");
            reference
                .contains(&qualified)
                .then(|| (id.to_string(), qualified))
        })
        .collect::<Option<Renaming>>()
}

/// Text before the first `.` when every id has the same one
fn common_qualifier(ids: &IdentifierSet) -> Option<&str> {
    let mut qualifiers = ids.iter().map(|id| id.split_once('.').map(|(q, _)| q));
    let first = qualifiers.next()??;
    if first.is_empty() {
        return None;
    }
    qualifiers
        .all(|q| q == Some(first))
        .then_some(first)
}

/// Rename the table's sample ids.
///
/// The renaming must cover every sample id; this is checked and reported as
/// `RemapError::Unresolved` rather than leaving an id untouched.
///
/// # Errors
///
/// Returns `RemapError::Unresolved` for the first sample id without an
/// entry, or `RemapError::Table` if the renamed ids are not unique.
pub fn apply_remap(table: &Table, renaming: &Renaming) -> Result<Table, RemapError> {
    let renamed = table
        .sample_ids()
        .iter()
        .map(|id| {
            renaming
                .get(id)
                .map(str::to_string)
                .ok_or_else(|| RemapError::Unresolved(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(table.with_sample_ids(renamed)?)
}
