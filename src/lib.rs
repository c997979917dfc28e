//! # biom-validate
//!
//! A library for validating BIOM tables before they are accepted as artifacts.
//!
//! Tables produced by upstream tools rarely use the sample names a study was
//! registered with: they carry sequencing-run names, or the study's sample
//! names without the study qualifier. Before such a table can be attached to
//! a prep template its sample ids have to be checked, and often rewritten.
//!
//! `biom-validate` does this by reconciling the table's sample ids with the
//! prep information and checking any representative set against the table's
//! observations.
//!
//! ## Features
//!
//! - **Subset acceptance**: Tables using some or all prep samples pass unchanged
//! - **Run prefix renaming**: Maps run names to prep samples via the `run_prefix` column
//! - **Study qualification**: Adds the study qualifier when the table lacks it
//! - **Representative sets**: Requires FASTA ids to equal the table's observation ids
//! - **Deterministic errors**: Offending ids are always listed in sorted order
//!
//! ## Example
//!
//! ```rust,no_run
//! use biom_validate::store::DirectoryPrepStore;
//! use biom_validate::validate::{JobParameters, Validator};
//! use std::path::{Path, PathBuf};
//!
//! let store = DirectoryPrepStore::new("preps");
//! let params = JobParameters {
//!     artifact_type: "BIOM".to_string(),
//!     template: Some("1".to_string()),
//!     analysis: None,
//!     files: [("biom".to_string(), vec![PathBuf::from("otu_table.biom")])].into(),
//! };
//!
//! let outcome = Validator::new(&store).validate(&params, Path::new("out")).unwrap();
//! if !outcome.success {
//!     eprintln!("{}", outcome.error);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Identifier sets, tables, prep information and artifact types
//! - [`reconcile`]: Id comparison, renaming and the representative set check
//! - [`parsing`]: BIOM, FASTA and prep information readers
//! - [`store`]: Prep information lookup
//! - [`summary`]: HTML summary generation
//! - [`validate`]: The end-to-end validation of one job
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod reconcile;
pub mod store;
pub mod summary;
pub mod utils;
pub mod validate;

// Re-export commonly used types for convenience
pub use core::ids::IdentifierSet;
pub use core::prep::PrepInformation;
pub use core::table::Table;
pub use core::types::*;
pub use reconcile::reconciler::{ReconcileConfig, Reconciled, Reconciler};
pub use reconcile::ReconcileError;
pub use validate::{JobParameters, ValidationOutcome, Validator};
