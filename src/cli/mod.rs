//! Command-line interface for biom-validate.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **validate**: Validate a BIOM artifact against its prep information
//! - **check-repset**: Check only that a FASTA file matches a table's observations
//!
//! ## Usage
//!
//! ```text
//! # Validate a table against prep template 1 stored in ./preps/1.json
//! biom-validate validate --biom otu_table.biom --template 1 --prep-dir preps --out-dir out
//!
//! # Include a representative set
//! biom-validate validate --biom otu_table.biom --fasta rep_set.fna --out-dir out
//!
//! # Job parameters as sent by the platform
//! biom-validate validate --parameters job.json --prep-dir preps --out-dir out --format json
//!
//! # Representative set only
//! biom-validate check-repset otu_table.biom rep_set.fna
//! ```

use clap::{Parser, Subcommand};

pub mod repset;
pub mod validate;

#[derive(Parser)]
#[command(name = "biom-validate")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Validate BIOM tables against prep information")]
#[command(
    long_about = "biom-validate checks a BIOM table before it is accepted as an artifact.\n\nIt:\n- Checks the table's sample ids against the prep information, renaming them through the \"run_prefix\" column when needed\n- Checks that a representative set FASTA holds exactly the table's observations\n- Writes the (renamed) table and an HTML summary"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a BIOM artifact
    Validate(validate::ValidateArgs),

    /// Check a representative set against a BIOM table
    CheckRepset(repset::CheckRepsetArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
