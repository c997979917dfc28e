use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::prep::DEFAULT_PREFIX_COLUMN;
use crate::reconcile::reconciler::ReconcileConfig;
use crate::store::DirectoryPrepStore;
use crate::validate::{JobParameters, ValidationOutcome, Validator, BIOM_FILES_KEY, FASTA_FILES_KEY};

#[derive(Args)]
pub struct ValidateArgs {
    /// JSON file with the job parameters (artifact_type, template, analysis, files)
    #[arg(long, conflicts_with_all = ["biom", "fasta", "template", "analysis"])]
    pub parameters: Option<PathBuf>,

    /// Declared artifact type
    #[arg(long, default_value = "BIOM")]
    pub artifact_type: String,

    /// BIOM table to validate
    #[arg(long, required_unless_present = "parameters")]
    pub biom: Option<PathBuf>,

    /// Representative set FASTA whose ids must match the table's observations
    #[arg(long)]
    pub fasta: Option<PathBuf>,

    /// Prep template id; looked up as <prep-dir>/<template>.{json,tsv,txt}
    #[arg(long)]
    pub template: Option<String>,

    /// Analysis id; tables from an analysis are not checked against a template
    #[arg(long)]
    pub analysis: Option<u64>,

    /// Directory holding prep information files
    #[arg(long, default_value = ".")]
    pub prep_dir: PathBuf,

    /// Directory for the renamed table and the HTML summary
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Prep column mapping prep sample ids to table sample ids
    #[arg(long, default_value = DEFAULT_PREFIX_COLUMN)]
    pub prefix_column: String,

    /// Do not try qualifying table sample ids with the prep's study prefix
    #[arg(long)]
    pub no_qualify_ids: bool,
}

impl ValidateArgs {
    fn job_parameters(&self) -> anyhow::Result<JobParameters> {
        if let Some(path) = &self.parameters {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid job parameters in {}", path.display()));
        }

        let mut files = BTreeMap::new();
        if let Some(biom) = &self.biom {
            files.insert(BIOM_FILES_KEY.to_string(), vec![biom.clone()]);
        }
        if let Some(fasta) = &self.fasta {
            files.insert(FASTA_FILES_KEY.to_string(), vec![fasta.clone()]);
        }

        Ok(JobParameters {
            artifact_type: self.artifact_type.clone(),
            template: self.template.clone(),
            analysis: self.analysis,
            files,
        })
    }
}

/// Returns whether the artifact passed validation
pub fn run(args: ValidateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<bool> {
    let params = args.job_parameters()?;

    if verbose {
        eprintln!(
            "Validating {} artifact (template: {}, analysis: {})",
            params.artifact_type,
            params.template.as_deref().unwrap_or("none"),
            params
                .analysis
                .map_or_else(|| "none".to_string(), |a| a.to_string()),
        );
    }

    let store = DirectoryPrepStore::new(&args.prep_dir);
    let config = ReconcileConfig {
        prefix_column: args.prefix_column.clone(),
        qualify_ids: !args.no_qualify_ids,
    };
    let outcome = Validator::new(&store)
        .with_config(config)
        .validate(&params, &args.out_dir)?;

    match format {
        OutputFormat::Text => print_text_outcome(&outcome),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Tsv => print_tsv_outcome(&outcome),
    }

    Ok(outcome.success)
}

fn print_text_outcome(outcome: &ValidationOutcome) {
    if !outcome.success {
        println!("Validation failed");
        println!("{}", "=".repeat(60));
        println!("{}", outcome.error);
        return;
    }

    println!("Validation passed");
    println!("{}", "=".repeat(60));
    for artifact in outcome.artifacts.iter().flatten() {
        println!("\nArtifact type: {}", artifact.artifact_type);
        for (path, role) in &artifact.files {
            println!("  {:<18} {}", role.as_str(), path.display());
        }
    }
}

fn print_tsv_outcome(outcome: &ValidationOutcome) {
    if !outcome.success {
        println!("error\t{}", outcome.error);
        return;
    }

    println!("role\tpath");
    for artifact in outcome.artifacts.iter().flatten() {
        for (path, role) in &artifact.files {
            println!("{}\t{}", role.as_str(), path.display());
        }
    }
}
