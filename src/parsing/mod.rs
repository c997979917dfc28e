//! Readers and writers for the files a BIOM artifact is made of.
//!
//! This module provides parsers for:
//!
//! - **BIOM tables**: JSON BIOM 1.0 documents, sparse or dense, optionally gzipped
//! - **Representative sequences**: FASTA record ids via noodles
//! - **Prep information**: JSON (`sample id -> {column: value}`) or tab-separated files
//!
//! ## Example
//!
//! ```rust,no_run
//! use biom_validate::parsing::biom::load_table;
//! use biom_validate::parsing::fasta::parse_sequence_ids;
//! use std::path::Path;
//!
//! let table = load_table(Path::new("otu_table.biom")).unwrap();
//! let sequences = parse_sequence_ids(Path::new("rep_set.fna")).unwrap();
//!
//! assert_eq!(table.observation_set(), sequences);
//! ```

use thiserror::Error;

use crate::core::table::TableError;

pub mod biom;
pub mod fasta;
pub mod prep;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Invalid table: {0}")]
    Table(#[from] TableError),

    #[error(
        "BIOM 2.x (HDF5) tables are not supported; convert the table with \
         `biom convert --to-json` first"
    )]
    Hdf5Table,

    #[error("Too many identifiers: {0} exceeds maximum allowed")]
    TooManyIds(usize),
}
