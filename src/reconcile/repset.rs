use crate::core::ids::IdentifierSet;
use crate::reconcile::compare::{compare_exact, Classification};
use crate::reconcile::error::ReconcileError;

/// Check that a representative set holds exactly the table's observations.
///
/// Sequence ids missing from the table are reported before table ids
/// missing from the sequences; only the first failing direction is returned.
///
/// # Errors
///
/// Returns `ReconcileError::RepresentativeExtra` or
/// `ReconcileError::RepresentativeMissing` with the offending ids.
pub fn check_representative_set(
    table_observation_ids: &IdentifierSet,
    sequence_ids: &IdentifierSet,
) -> Result<(), ReconcileError> {
    match compare_exact(table_observation_ids, sequence_ids) {
        Classification::RepresentativeExtra(extra) => {
            Err(ReconcileError::RepresentativeExtra(extra))
        }
        Classification::RepresentativeMissing(missing) => {
            Err(ReconcileError::RepresentativeMissing(missing))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> IdentifierSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_exact_match() {
        assert!(check_representative_set(&set(&["O1", "O2"]), &set(&["O2", "O1"])).is_ok());
    }

    #[test]
    fn test_extra_sequences() {
        let err = check_representative_set(&set(&["O1", "O2"]), &set(&["O1", "O2", "O3"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The representative set sequence file includes observations not found in the BIOM \
             table: O3"
        );
    }

    #[test]
    fn test_missing_sequences() {
        let err = check_representative_set(&set(&["O1", "O2"]), &set(&["O1"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The representative set sequence file is missing observation ids found in the BIOM \
             table: O2"
        );
    }

    #[test]
    fn test_both_directions_reports_extra() {
        let err = check_representative_set(&set(&["O1", "O2"]), &set(&["O1", "O9"]))
            .unwrap_err();
        assert_eq!(err, ReconcileError::RepresentativeExtra(set(&["O9"])));
    }
}
