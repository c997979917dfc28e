//! Sample and observation reconciliation.
//!
//! This module decides whether a table's ids agree with its references:
//!
//! - [`compare`](compare::compare): classify a candidate id set against a reference set
//! - [`Renaming`](remap::Renaming): table sample id -> prep sample id, built from the
//!   prep's prefix column or from its study qualifier
//! - [`Reconciler`](reconciler::Reconciler): check (and rename) a table's samples
//! - [`check_representative_set`](repset::check_representative_set): require the
//!   sequence file ids to equal the table's observation ids
//!
//! ## Sample reconciliation
//!
//! 1. No prep information: accept the table.
//! 2. Table samples are all prep samples: accept unchanged.
//! 3. The prep declares `run_prefix`: rename through it; every table sample must resolve.
//! 4. The prep ids share a study qualifier the table lacks: qualify the table ids.
//! 5. Otherwise fail, asking for the `run_prefix` column.
//!
//! ## Example
//!
//! ```rust
//! use biom_validate::core::prep::PrepInformation;
//! use biom_validate::core::table::Table;
//! use biom_validate::reconcile::reconciler::Reconciler;
//!
//! let prep = PrepInformation::default()
//!     .with_sample("SKB8.640193", [("run_prefix", "Sample1")])
//!     .with_sample("SKD8.640184", [("run_prefix", "Sample2")]);
//! let table = Table::from_dense(
//!     vec!["O1".to_string()],
//!     vec!["Sample1".to_string(), "Sample2".to_string()],
//!     &[vec![10.0, 3.0]],
//! )
//! .unwrap();
//!
//! let reconciled = Reconciler::default().reconcile(table, Some(&prep)).unwrap();
//! assert!(reconciled.is_remapped());
//! assert_eq!(reconciled.table().sample_ids(), &["SKB8.640193", "SKD8.640184"]);
//! ```

pub mod compare;
pub mod error;
pub mod reconciler;
pub mod remap;
pub mod repset;

pub use error::ReconcileError;
