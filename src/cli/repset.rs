use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::biom::load_table;
use crate::parsing::fasta::parse_sequence_ids;
use crate::reconcile::repset::check_representative_set;

#[derive(Args)]
pub struct CheckRepsetArgs {
    /// BIOM table
    #[arg(required = true)]
    pub biom: PathBuf,

    /// Representative set FASTA
    #[arg(required = true)]
    pub fasta: PathBuf,
}

/// Returns whether the representative set matches the table
pub fn run(args: CheckRepsetArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<bool> {
    let table = load_table(&args.biom)
        .with_context(|| format!("Failed to load BIOM table {}", args.biom.display()))?;
    let sequence_ids = parse_sequence_ids(&args.fasta)
        .with_context(|| format!("Failed to read FASTA {}", args.fasta.display()))?;
    let observation_ids = table.observation_set();

    if verbose {
        eprintln!(
            "Table: {} observations; FASTA: {} records",
            observation_ids.len(),
            sequence_ids.len()
        );
    }

    let result = check_representative_set(&observation_ids, &sequence_ids);

    match format {
        OutputFormat::Text => match &result {
            Ok(()) => println!("Representative set matches the BIOM table"),
            Err(e) => println!("{e}"),
        },
        OutputFormat::Json => {
            let output = serde_json::json!({
                "biom": args.biom.display().to_string(),
                "fasta": args.fasta.display().to_string(),
                "observations": observation_ids.len(),
                "sequences": sequence_ids.len(),
                "success": result.is_ok(),
                "error": result.as_ref().err().map(ToString::to_string).unwrap_or_default(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("observations\tsequences\tsuccess");
            println!(
                "{}\t{}\t{}",
                observation_ids.len(),
                sequence_ids.len(),
                result.is_ok()
            );
        }
    }

    Ok(result.is_ok())
}
