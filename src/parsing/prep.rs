use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::core::prep::{PrepInformation, SampleAttributes};
use crate::parsing::ParseError;

/// Parse a prep information file, choosing the reader by extension
/// (`.json`, otherwise tab-separated).
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_prep_file(path: &Path) -> Result<PrepInformation, ParseError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        parse_prep_json(&content)
    } else {
        parse_prep_tsv(&content)
    }
}

/// Parse prep information from a JSON object of `sample id -> {column: value}`.
///
/// Non-string scalar values are stored in their JSON text form; `null`
/// values are dropped.
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON, or
/// `ParseError::InvalidFormat` if the document is not an object of objects
/// or holds no samples.
pub fn parse_prep_json(text: &str) -> Result<PrepInformation, ParseError> {
    let doc: BTreeMap<String, BTreeMap<String, Value>> = serde_json::from_str(text)?;

    let mut samples = BTreeMap::new();
    for (id, columns) in doc {
        let mut attrs = SampleAttributes::new();
        for (column, value) in columns {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(_) | Value::Number(_) => value.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ParseError::InvalidFormat(format!(
                        "Column '{column}' of sample '{id}' is not a scalar"
                    )))
                }
            };
            attrs.insert(column, value);
        }
        samples.insert(id, attrs);
    }

    if samples.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No samples found in prep information".to_string(),
        ));
    }

    Ok(PrepInformation::new(samples))
}

/// Parse tab-separated prep information. The first non-comment line is the
/// header; its first column holds the sample ids (usually `sample_name`).
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row has a different number of
/// fields than the header, a sample id repeats, or no samples are found.
pub fn parse_prep_tsv(text: &str) -> Result<PrepInformation, ParseError> {
    let mut lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'));

    let Some((_, header)) = lines.next() else {
        return Err(ParseError::InvalidFormat(
            "No samples found in prep information".to_string(),
        ));
    };
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();

    let mut samples = BTreeMap::new();
    for (i, line) in lines {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() != columns.len() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has {} fields but the header has {}",
                fields.len(),
                columns.len()
            )));
        }

        let id = fields[0].to_string();
        let attrs: SampleAttributes = columns[1..]
            .iter()
            .zip(&fields[1..])
            .map(|(c, v)| ((*c).to_string(), (*v).to_string()))
            .collect();

        if samples.insert(id.clone(), attrs).is_some() {
            return Err(ParseError::InvalidFormat(format!(
                "Sample '{id}' is repeated on line {line_num}"
            )));
        }
    }

    if samples.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No samples found in prep information".to_string(),
        ));
    }

    Ok(PrepInformation::new(samples))
}
