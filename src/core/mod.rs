//! Core data types for BIOM artifact validation.
//!
//! - [`IdentifierSet`](ids::IdentifierSet): an order-independent set of sample or observation ids
//! - [`Table`](table::Table): a sparse observation-by-sample abundance table
//! - [`PrepInformation`](prep::PrepInformation): the prep template a table is validated against
//! - [`ArtifactType`](types::ArtifactType), [`FileRole`](types::FileRole),
//!   [`ArtifactInfo`](types::ArtifactInfo): the shape of a validated artifact
//!
//! ## Sample naming
//!
//! The platform stores sample ids qualified by study, while upstream tools
//! usually emit the names they were given at sequencing time:
//!
//! | Source        | Example          |
//! |---------------|------------------|
//! | Prep template | `1.SKB8.640193`  |
//! | Unqualified   | `SKB8.640193`    |
//! | Run prefix    | `Sample1`        |
//!
//! Reconciliation (see [`crate::reconcile`]) maps the latter two onto the first.

pub mod ids;
pub mod prep;
pub mod table;
pub mod types;
