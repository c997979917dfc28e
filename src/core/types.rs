use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Artifact types this crate knows how to validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactType {
    #[serde(rename = "BIOM")]
    Biom,
}

impl ArtifactType {
    pub const ALL: &'static [ArtifactType] = &[ArtifactType::Biom];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Biom => "BIOM",
        }
    }

    /// Comma-joined names of every supported type
    #[must_use]
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for an artifact type outside [`ArtifactType::ALL`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown artifact type {0}. Supported types: {supported}", supported = ArtifactType::supported())]
pub struct UnknownArtifactType(pub String);

impl FromStr for ArtifactType {
    type Err = UnknownArtifactType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownArtifactType(s.to_string()))
    }
}

/// Role of a file within an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    Biom,
    PreprocessedFasta,
    HtmlSummary,
    HtmlSummaryDir,
}

impl FileRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Biom => "biom",
            Self::PreprocessedFasta => "preprocessed_fasta",
            Self::HtmlSummary => "html_summary",
            Self::HtmlSummaryDir => "html_summary_dir",
        }
    }
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated artifact ready to be registered with the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    /// Output name; `None` lets the platform choose one
    pub name: Option<String>,

    pub artifact_type: ArtifactType,

    /// Files in registration order
    pub files: Vec<(PathBuf, FileRole)>,
}
