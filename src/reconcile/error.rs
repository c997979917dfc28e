use thiserror::Error;

use crate::core::ids::IdentifierSet;
use crate::reconcile::remap::RemapError;

/// Why a table failed reconciliation.
///
/// The `Display` text of the non-fatal variants is the exact message shown
/// to the submitter.
#[derive(Error, Debug, PartialEq)]
pub enum ReconcileError {
    #[error(
        "The sample ids in the BIOM table do not match the ones in the prep information. \
         Please, provide the column \"{column}\" in the prep information to map the existing \
         sample ids to the prep information sample ids."
    )]
    UnknownSamples {
        column: String,
        unknown: IdentifierSet,
    },

    #[error("Your prep information is missing samples that are present in your BIOM table: {0}")]
    PrepMissingSamples(IdentifierSet),

    #[error(
        "The representative set sequence file includes observations not found in the BIOM table: {0}"
    )]
    RepresentativeExtra(IdentifierSet),

    #[error(
        "The representative set sequence file is missing observation ids found in the BIOM table: {0}"
    )]
    RepresentativeMissing(IdentifierSet),

    #[error("Prep samples {first} and {second} both declare \"{value}\" in the \"{column}\" column")]
    AmbiguousPrefix {
        column: String,
        value: String,
        first: String,
        second: String,
    },

    #[error("Renamed sample ids are not in the prep information: {0}")]
    RemapInconsistent(IdentifierSet),

    #[error(transparent)]
    Remap(RemapError),
}

impl ReconcileError {
    /// Errors caused by bad prep information or an internal defect rather
    /// than by the submitted files. These halt the job instead of being
    /// reported as a failed validation.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousPrefix { .. } | Self::RemapInconsistent(_) | Self::Remap(_)
        )
    }
}

impl From<RemapError> for ReconcileError {
    fn from(err: RemapError) -> Self {
        match err {
            RemapError::AmbiguousPrefix {
                column,
                value,
                first,
                second,
            } => Self::AmbiguousPrefix {
                column,
                value,
                first,
                second,
            },
            other => Self::Remap(other),
        }
    }
}
