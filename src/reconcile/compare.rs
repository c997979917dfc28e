use crate::core::ids::IdentifierSet;

/// Outcome of comparing a candidate id set against a reference id set.
///
/// Exactly one outcome is produced per comparison. Every variant that
/// carries ids carries them as an [`IdentifierSet`], so rendering them is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Candidate and reference are the same set
    ExactOrSubset,

    /// Candidate is a proper subset of the reference; holds the reference ids
    /// the candidate does not use
    Superset(IdentifierSet),

    /// Candidate ids a renaming could not resolve
    Missing(IdentifierSet),

    /// Candidate ids absent from the reference
    Unmappable(IdentifierSet),

    /// Sequence ids absent from the table's observations
    RepresentativeExtra(IdentifierSet),

    /// Table observation ids absent from the sequences
    RepresentativeMissing(IdentifierSet),
}

impl Classification {
    /// Whether the candidate can be used against the reference as-is
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::ExactOrSubset | Self::Superset(_))
    }
}

/// Compare the candidate ids against the reference ids.
///
/// The reference may hold more ids than the candidate uses; only candidate
/// ids foreign to the reference make the comparison fail.
#[must_use]
pub fn compare(candidate: &IdentifierSet, reference: &IdentifierSet) -> Classification {
    let foreign = candidate.difference(reference);
    if !foreign.is_empty() {
        return Classification::Unmappable(foreign);
    }

    let unused = reference.difference(candidate);
    if unused.is_empty() {
        Classification::ExactOrSubset
    } else {
        Classification::Superset(unused)
    }
}

/// Compare table observation ids against sequence ids, requiring equality.
///
/// Extra sequence ids are reported before missing ones.
#[must_use]
pub fn compare_exact(table_ids: &IdentifierSet, sequence_ids: &IdentifierSet) -> Classification {
    let extra = sequence_ids.difference(table_ids);
    if !extra.is_empty() {
        return Classification::RepresentativeExtra(extra);
    }

    let missing = table_ids.difference(sequence_ids);
    if !missing.is_empty() {
        return Classification::RepresentativeMissing(missing);
    }

    Classification::ExactOrSubset
}
