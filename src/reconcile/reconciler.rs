use tracing::{debug, info};

use crate::core::ids::IdentifierSet;
use crate::core::prep::{PrepInformation, DEFAULT_PREFIX_COLUMN};
use crate::core::table::Table;
use crate::reconcile::compare::{compare, Classification};
use crate::reconcile::error::ReconcileError;
use crate::reconcile::remap::{apply_remap, build_qualified_remap, build_remap, RemapError, Renaming};

/// Configuration for sample reconciliation
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Prep column holding the table-side sample id of each prep sample
    pub prefix_column: String,

    /// Fall back to qualifying table ids with the prep's study qualifier
    /// when the prefix column is not declared
    pub qualify_ids: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            prefix_column: DEFAULT_PREFIX_COLUMN.to_string(),
            qualify_ids: true,
        }
    }
}

/// A table that passed reconciliation
#[derive(Debug, Clone)]
pub enum Reconciled {
    /// Sample ids already matched the prep information
    Unchanged(Table),

    /// Sample ids were rewritten; the table must be saved as a new file
    Remapped { table: Table, renaming: Renaming },
}

impl Reconciled {
    #[must_use]
    pub fn table(&self) -> &Table {
        match self {
            Self::Unchanged(table) | Self::Remapped { table, .. } => table,
        }
    }

    #[must_use]
    pub fn into_table(self) -> Table {
        match self {
            Self::Unchanged(table) | Self::Remapped { table, .. } => table,
        }
    }

    #[must_use]
    pub fn is_remapped(&self) -> bool {
        matches!(self, Self::Remapped { .. })
    }
}

/// Reconciles a table's sample ids with prep information
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    #[must_use]
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    /// Check the table's sample ids against `prep`, renaming them if the prep
    /// information declares how.
    ///
    /// With no prep information the table is accepted as-is. A direct match
    /// (the table uses all or some of the prep samples) always wins over a
    /// rename, even when the prefix column exists.
    ///
    /// # Errors
    ///
    /// - `UnknownSamples` if the ids do not match and no rename is declared
    /// - `PrepMissingSamples` if a rename is declared but does not cover every id
    /// - `AmbiguousPrefix` if two prep samples declare the same prefix (fatal)
    /// - `RemapInconsistent` if renamed ids still do not match (fatal)
    pub fn reconcile(
        &self,
        table: Table,
        prep: Option<&PrepInformation>,
    ) -> Result<Reconciled, ReconcileError> {
        let Some(prep) = prep else {
            debug!("No prep information, accepting table as-is");
            return Ok(Reconciled::Unchanged(table));
        };

        let reference = prep.sample_ids();
        let candidate = table.sample_set();

        let Some(foreign) = foreign_samples(compare(&candidate, &reference))? else {
            return Ok(Reconciled::Unchanged(table));
        };

        info!(
            unknown = foreign.len(),
            "Sample ids do not match the prep information, attempting to rename"
        );

        let renaming = match build_remap(&candidate, prep, &self.config.prefix_column) {
            Ok(renaming) => renaming,
            Err(RemapError::NoMappingDefined(column)) => {
                let qualified = if self.config.qualify_ids {
                    build_qualified_remap(&candidate, &reference)
                } else {
                    None
                };
                qualified.ok_or(ReconcileError::UnknownSamples {
                    column,
                    unknown: foreign,
                })?
            }
            Err(e) => return Err(e.into()),
        };

        if let Classification::Missing(unresolved) = renaming.coverage(&candidate) {
            return Err(ReconcileError::PrepMissingSamples(unresolved));
        }

        let remapped = apply_remap(&table, &renaming)?;

        let remapped_ids = remapped.sample_set();
        if !compare(&remapped_ids, &reference).is_accepted() {
            return Err(ReconcileError::RemapInconsistent(
                remapped_ids.difference(&reference),
            ));
        }

        info!(renamed = renaming.len(), "Renamed table sample ids");
        Ok(Reconciled::Remapped {
            table: remapped,
            renaming,
        })
    }
}

/// Sample ids foreign to the prep information, or `None` when the table can
/// be used as-is.
///
/// Only the direct comparison outcomes are expected here; any other
/// classification is treated as an inconsistent reconciliation.
fn foreign_samples(
    classification: Classification,
) -> Result<Option<IdentifierSet>, ReconcileError> {
    match classification {
        Classification::ExactOrSubset => Ok(None),
        Classification::Superset(unused) => {
            debug!(
                unused = unused.len(),
                "Table uses a subset of the prep samples"
            );
            Ok(None)
        }
        Classification::Unmappable(foreign) => Ok(Some(foreign)),
        Classification::Missing(ids)
        | Classification::RepresentativeExtra(ids)
        | Classification::RepresentativeMissing(ids) => {
            Err(ReconcileError::RemapInconsistent(ids))
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}
