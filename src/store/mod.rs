//! Sources of prep information.
//!
//! A [`PrepStore`] resolves a template id to the prep information a table is
//! validated against. `Ok(None)` means the store holds no such template and
//! the table is accepted as-is.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::core::prep::PrepInformation;
use crate::parsing::prep::parse_prep_file;
use crate::parsing::ParseError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid template id: {0}")]
    InvalidId(String),

    #[error("Failed to read prep information {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Looks up prep information by template id
pub trait PrepStore {
    /// # Errors
    ///
    /// Returns `StoreError` if the template exists but cannot be read.
    fn fetch_reference(&self, template: &str) -> Result<Option<PrepInformation>, StoreError>;
}

/// File extensions tried, in order, for a template in a [`DirectoryPrepStore`]
pub const PREP_EXTENSIONS: &[&str] = &["json", "tsv", "txt"];

/// Prep information stored as `<dir>/<template>.{json,tsv,txt}`
#[derive(Debug, Clone)]
pub struct DirectoryPrepStore {
    root: PathBuf,
}

impl DirectoryPrepStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, template: &str) -> Result<Option<PathBuf>, StoreError> {
        // Template ids name a file directly under the root
        if template.is_empty()
            || template.contains("..")
            || template.contains('/')
            || template.contains('\\')
            || template.contains('\0')
        {
            return Err(StoreError::InvalidId(template.to_string()));
        }

        Ok(PREP_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{template}.{ext}")))
            .find(|p| p.is_file()))
    }
}

impl PrepStore for DirectoryPrepStore {
    fn fetch_reference(&self, template: &str) -> Result<Option<PrepInformation>, StoreError> {
        let Some(path) = self.path_for(template)? else {
            return Ok(None);
        };

        let prep =
            parse_prep_file(&path).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(
            template,
            path = %path.display(),
            samples = prep.len(),
            "loaded prep information"
        );
        Ok(Some(prep))
    }
}

/// Prep information held in memory, keyed by template id
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrepStore {
    templates: HashMap<String, PrepInformation>,
}

impl InMemoryPrepStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a template
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>, prep: PrepInformation) -> Self {
        self.templates.insert(template.into(), prep);
        self
    }
}

impl PrepStore for InMemoryPrepStore {
    fn fetch_reference(&self, template: &str) -> Result<Option<PrepInformation>, StoreError> {
        Ok(self.templates.get(template).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_store_json_and_tsv() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("1.json"),
            r#"{"1.SKB8.640193": {"col": "val1"}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("2.tsv"),
            "sample_name\trun_prefix\n1.SKD8.640184\tSample2\n",
        )
        .unwrap();

        let store = DirectoryPrepStore::new(dir.path());

        let json = store.fetch_reference("1").unwrap().unwrap();
        assert_eq!(json.sample_ids().joined(), "1.SKB8.640193");

        let tsv = store.fetch_reference("2").unwrap().unwrap();
        assert_eq!(tsv.get("1.SKD8.640184", "run_prefix"), Some("Sample2"));

        assert!(store.fetch_reference("3").unwrap().is_none());
    }

    #[test]
    fn test_directory_store_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryPrepStore::new(dir.path());

        for id in ["../secret", "a/b", "", "..\\x"] {
            assert!(matches!(
                store.fetch_reference(id),
                Err(StoreError::InvalidId(_))
            ));
        }
    }

    #[test]
    fn test_directory_store_malformed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json").unwrap();

        let store = DirectoryPrepStore::new(dir.path());
        assert!(matches!(
            store.fetch_reference("bad"),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn test_in_memory_store() {
        let prep = PrepInformation::default().with_sample("S1", [("col", "a")]);
        let store = InMemoryPrepStore::new().with_template("7", prep.clone());

        assert_eq!(store.fetch_reference("7").unwrap(), Some(prep));
        assert_eq!(store.fetch_reference("8").unwrap(), None);
    }
}
