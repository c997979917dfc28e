//! Centralized validation and helper functions.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Maximum number of ids read from a single table axis or FASTA file (DOS protection)
pub const MAX_IDENTIFIERS: usize = 5_000_000;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Check if adding another id would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new id.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_id_limit(ids.len()).is_some() {
///     return Err(...);
/// }
/// ids.push(new_id); // Safe to add
/// ```
#[must_use]
pub fn check_id_limit(count: usize) -> Option<String> {
    if count >= MAX_IDENTIFIERS {
        Some(format!(
            "Too many identifiers: adding another would exceed maximum of {MAX_IDENTIFIERS}"
        ))
    } else {
        None
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Path validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Path has no file name: {0}")]
    NoFileName(PathBuf),
}

/// File name of `input`, validated for reuse inside an output directory.
///
/// # Errors
///
/// Returns `ValidationError::NoFileName` if the path ends in `..` or is a
/// root, or `ValidationError::FilenameTooLong` if the name exceeds the limit.
pub fn output_file_name(input: &Path) -> Result<OsString, ValidationError> {
    let name = input
        .file_name()
        .ok_or_else(|| ValidationError::NoFileName(input.to_path_buf()))?;

    if name.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    Ok(name.to_os_string())
}
