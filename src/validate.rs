//! Validation of a submitted artifact.
//!
//! [`Validator::validate`] runs the whole check for one job:
//!
//! 1. Dispatch on the declared artifact type
//! 2. Load the BIOM table
//! 3. Reconcile its sample ids with the prep information (if any)
//! 4. Check the representative set (if supplied)
//! 5. Write the renamed table (if renamed) and the HTML summary
//!
//! Problems with the submitted files come back as a failed
//! [`ValidationOutcome`] carrying a user-facing message. Problems with the
//! prep information or the environment (unreadable template, ambiguous
//! `run_prefix`, unwritable output directory) are returned as `Err` and
//! should fail the job.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::prep::PrepInformation;
use crate::core::types::{ArtifactInfo, ArtifactType, FileRole};
use crate::parsing::biom::{load_table, write_table};
use crate::parsing::fasta::{is_fasta_file, parse_sequence_ids};
use crate::reconcile::reconciler::{ReconcileConfig, Reconciled, Reconciler};
use crate::reconcile::repset::check_representative_set;
use crate::store::PrepStore;
use crate::summary::{HtmlSummary, SummaryGenerator};
use crate::utils::validation::output_file_name;

/// Key of the table in [`JobParameters::files`]
pub const BIOM_FILES_KEY: &str = "biom";

/// Key of the representative set in [`JobParameters::files`]
pub const FASTA_FILES_KEY: &str = "preprocessed_fasta";

/// Parameters of a validation job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParameters {
    pub artifact_type: String,

    /// Prep template the table belongs to
    #[serde(default, deserialize_with = "string_or_number")]
    pub template: Option<String>,

    /// Analysis the table was derived in; derived tables skip the template check
    #[serde(default)]
    pub analysis: Option<u64>,

    /// Input files by role. The platform sends this as a JSON-encoded string.
    #[serde(deserialize_with = "object_or_json_string")]
    pub files: BTreeMap<String, Vec<PathBuf>>,
}

impl JobParameters {
    /// First file listed under `key`
    #[must_use]
    pub fn file(&self, key: &str) -> Option<&Path> {
        self.files
            .get(key)
            .and_then(|paths| paths.first())
            .map(PathBuf::as_path)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

fn object_or_json_string<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<PathBuf>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let value = match value {
        Value::String(s) => serde_json::from_str(&s).map_err(serde::de::Error::custom)?,
        other => other,
    };
    serde_json::from_value(value).map_err(serde::de::Error::custom)
}

/// Result of validating one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub success: bool,
    pub artifacts: Option<Vec<ArtifactInfo>>,
    pub error: String,
}

impl ValidationOutcome {
    #[must_use]
    pub fn success(artifacts: Vec<ArtifactInfo>) -> Self {
        Self {
            success: true,
            artifacts: Some(artifacts),
            error: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            artifacts: None,
            error: message.into(),
        }
    }
}

/// Validates artifacts against prep information from a [`PrepStore`]
pub struct Validator<'a> {
    store: &'a dyn PrepStore,
    summary: Box<dyn SummaryGenerator + 'a>,
    reconciler: Reconciler,
}

impl<'a> Validator<'a> {
    pub fn new(store: &'a dyn PrepStore) -> Self {
        Self {
            store,
            summary: Box::new(HtmlSummary),
            reconciler: Reconciler::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ReconcileConfig) -> Self {
        self.reconciler = Reconciler::new(config);
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl SummaryGenerator + 'a) -> Self {
        self.summary = Box::new(summary);
        self
    }

    /// Validate the artifact described by `params`, writing outputs to `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the prep information cannot be read or is
    /// inconsistent, or if outputs cannot be written. Invalid submissions are
    /// reported through a failed [`ValidationOutcome`] instead.
    pub fn validate(
        &self,
        params: &JobParameters,
        out_dir: &Path,
    ) -> anyhow::Result<ValidationOutcome> {
        let artifact_type = match params.artifact_type.parse::<ArtifactType>() {
            Ok(t) => t,
            Err(e) => return Ok(ValidationOutcome::failure(e.to_string())),
        };

        match artifact_type {
            ArtifactType::Biom => self.validate_biom(params, out_dir),
        }
    }

    fn validate_biom(
        &self,
        params: &JobParameters,
        out_dir: &Path,
    ) -> anyhow::Result<ValidationOutcome> {
        let Some(biom_path) = params.file(BIOM_FILES_KEY) else {
            return Ok(ValidationOutcome::failure("No BIOM file provided"));
        };

        info!(path = %biom_path.display(), "Step 1: loading BIOM table");
        let table = match load_table(biom_path) {
            Ok(table) => table,
            Err(e) => {
                return Ok(ValidationOutcome::failure(format!(
                    "Error loading BIOM table {}: {e}",
                    biom_path.display()
                )))
            }
        };

        info!("Step 2: validating sample ids");
        let prep = self.fetch_prep(params)?;
        let reconciled = match self.reconciler.reconcile(table, prep.as_ref()) {
            Ok(reconciled) => reconciled,
            Err(e) if e.is_fatal() => {
                return Err(anyhow::Error::new(e).context("Failed to reconcile BIOM sample ids"))
            }
            Err(e) => return Ok(ValidationOutcome::failure(e.to_string())),
        };

        let fasta_path = params.file(FASTA_FILES_KEY);
        if let Some(fasta_path) = fasta_path {
            info!(path = %fasta_path.display(), "Step 3: validating representative set");
            if !is_fasta_file(fasta_path) {
                warn!(path = %fasta_path.display(), "Representative set has no FASTA extension");
            }

            let sequence_ids = match parse_sequence_ids(fasta_path) {
                Ok(ids) => ids,
                Err(e) => {
                    return Ok(ValidationOutcome::failure(format!(
                        "Error reading representative set {}: {e}",
                        fasta_path.display()
                    )))
                }
            };

            let observation_ids = reconciled.table().observation_set();
            if let Err(e) = check_representative_set(&observation_ids, &sequence_ids) {
                return Ok(ValidationOutcome::failure(e.to_string()));
            }
        }

        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

        let output_biom = match &reconciled {
            Reconciled::Unchanged(_) => biom_path.to_path_buf(),
            Reconciled::Remapped { table, renaming } => {
                let name = output_file_name(biom_path)?;
                let path = out_dir.join(name);
                if path == biom_path {
                    warn!(path = %path.display(), "Overwriting input table with renamed table");
                }
                write_table(table, &path)
                    .with_context(|| format!("Failed to write BIOM table {}", path.display()))?;
                debug!(renamed = renaming.len(), path = %path.display(), "wrote renamed table");
                path
            }
        };

        info!("Step 4: generating HTML summary");
        let summary = self
            .summary
            .generate(reconciled.table(), out_dir)
            .context("Failed to generate HTML summary")?;

        let mut files = vec![(output_biom, FileRole::Biom)];
        if let Some(fasta_path) = fasta_path {
            files.push((fasta_path.to_path_buf(), FileRole::PreprocessedFasta));
        }
        files.push((summary.index, FileRole::HtmlSummary));
        files.push((summary.support_dir, FileRole::HtmlSummaryDir));

        Ok(ValidationOutcome::success(vec![ArtifactInfo {
            name: None,
            artifact_type: ArtifactType::Biom,
            files,
        }]))
    }

    /// Prep information for the job, or `None` when the table is accepted as-is
    fn fetch_prep(&self, params: &JobParameters) -> anyhow::Result<Option<PrepInformation>> {
        if let Some(analysis) = params.analysis {
            debug!(analysis, "Table belongs to an analysis, skipping prep information");
            return Ok(None);
        }
        let Some(template) = &params.template else {
            return Ok(None);
        };

        let prep = self
            .store
            .fetch_reference(template)
            .with_context(|| format!("Failed to fetch prep information {template}"))?;
        if prep.is_none() {
            warn!(template = %template, "Prep information not found, accepting table as-is");
        }
        Ok(prep)
    }
}
