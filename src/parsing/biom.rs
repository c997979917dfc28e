//! Reader and writer for JSON BIOM (format 1.0) tables.
//!
//! Both `sparse` and `dense` matrix layouts are read; tables are always
//! written sparse. Paths ending in `.gz`/`.bgz` are transparently
//! (de)compressed.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::core::table::{ElementType, Entry, Table};
use crate::parsing::ParseError;
use crate::utils::validation::{is_gzipped, MAX_IDENTIFIERS};

pub const BIOM_FORMAT: &str = "Biological Observation Matrix 1.0.0";
pub const BIOM_FORMAT_URL: &str = "http://biom-format.org";

/// First bytes of every HDF5 file, i.e. of BIOM 2.x tables
const HDF5_SIGNATURE: &[u8] = b"\x89HDF\r\n\x1a\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MatrixType {
    Sparse,
    Dense,
}

#[derive(Debug, Serialize, Deserialize)]
struct AxisEntry {
    id: String,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct BiomDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    format_url: Option<String>,
    #[serde(rename = "type", default)]
    table_type: Option<String>,
    #[serde(default)]
    generated_by: Option<String>,
    #[serde(default)]
    date: Option<String>,
    rows: Vec<AxisEntry>,
    columns: Vec<AxisEntry>,
    matrix_type: MatrixType,
    #[serde(default)]
    matrix_element_type: ElementType,
    shape: [usize; 2],
    data: Value,
}

/// Load a BIOM table from a file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Json` if
/// it is not a BIOM document, `ParseError::InvalidFormat` if the declared
/// shape disagrees with the axes, `ParseError::TooManyIds` if an axis exceeds
/// the id limit, `ParseError::Table` if the axes repeat an id, or
/// `ParseError::Hdf5Table` for a BIOM 2.x table.
pub fn load_table(path: &Path) -> Result<Table, ParseError> {
    let file = File::open(path)?;
    let mut content = Vec::new();
    if is_gzipped(path) {
        GzDecoder::new(file).read_to_end(&mut content)?;
    } else {
        BufReader::new(file).read_to_end(&mut content)?;
    }

    if content.starts_with(HDF5_SIGNATURE) {
        return Err(ParseError::Hdf5Table);
    }
    let content = String::from_utf8(content)
        .map_err(|e| ParseError::InvalidFormat(format!("BIOM table is not UTF-8: {e}")))?;

    let table = parse_table_json(&content)?;
    debug!(
        path = %path.display(),
        observations = table.shape().0,
        samples = table.shape().1,
        "loaded BIOM table"
    );
    Ok(table)
}

/// Parse a BIOM table from JSON text.
///
/// # Errors
///
/// See [`load_table`].
pub fn parse_table_json(text: &str) -> Result<Table, ParseError> {
    let doc: BiomDocument = serde_json::from_str(text)?;

    for axis in [&doc.rows, &doc.columns] {
        if axis.len() > MAX_IDENTIFIERS {
            return Err(ParseError::TooManyIds(axis.len()));
        }
    }

    let [n_rows, n_cols] = doc.shape;
    if n_rows != doc.rows.len() || n_cols != doc.columns.len() {
        return Err(ParseError::InvalidFormat(format!(
            "Declared shape ({n_rows}, {n_cols}) does not match {} rows and {} columns",
            doc.rows.len(),
            doc.columns.len()
        )));
    }

    let (observation_ids, observation_metadata): (Vec<_>, Vec<_>) =
        doc.rows.into_iter().map(|r| (r.id, r.metadata)).unzip();
    let (sample_ids, sample_metadata): (Vec<_>, Vec<_>) =
        doc.columns.into_iter().map(|c| (c.id, c.metadata)).unzip();

    let mut table = match doc.matrix_type {
        MatrixType::Sparse => {
            let triples: Vec<(usize, usize, f64)> = serde_json::from_value(doc.data)?;
            let entries = triples
                .into_iter()
                .map(|(observation, sample, value)| Entry {
                    observation,
                    sample,
                    value,
                })
                .collect();
            Table::new(observation_ids, sample_ids, entries)?
        }
        MatrixType::Dense => {
            let rows: Vec<Vec<f64>> = serde_json::from_value(doc.data)?;
            if rows.len() != n_rows {
                return Err(ParseError::InvalidFormat(format!(
                    "Dense matrix has {} rows but shape declares {n_rows}",
                    rows.len()
                )));
            }
            Table::from_dense(observation_ids, sample_ids, &rows)?
        }
    }
    .with_metadata(observation_metadata, sample_metadata);

    table.id = doc.id;
    table.element_type = doc.matrix_element_type;
    if let Some(table_type) = doc.table_type {
        table.table_type = table_type;
    }

    Ok(table)
}

/// Serialize a table as a sparse JSON BIOM document.
///
/// # Errors
///
/// Returns `ParseError::Json` if serialization fails.
pub fn table_to_json(table: &Table) -> Result<String, ParseError> {
    let axis = |ids: &[String], metadata: &[Value]| -> Vec<AxisEntry> {
        ids.iter()
            .zip(metadata)
            .map(|(id, metadata)| AxisEntry {
                id: id.clone(),
                metadata: metadata.clone(),
            })
            .collect()
    };

    let data: Vec<Value> = table
        .entries()
        .iter()
        .map(|e| {
            let value = match table.element_type {
                #[allow(clippy::cast_possible_truncation)]
                ElementType::Int if e.value.fract() == 0.0 => json!(e.value as i64),
                _ => json!(e.value),
            };
            json!([e.observation, e.sample, value])
        })
        .collect();

    let (n_rows, n_cols) = table.shape();
    let doc = BiomDocument {
        id: table.id.clone(),
        format: Some(BIOM_FORMAT.to_string()),
        format_url: Some(BIOM_FORMAT_URL.to_string()),
        table_type: Some(table.table_type.clone()),
        generated_by: Some(format!("biom-validate {}", env!("CARGO_PKG_VERSION"))),
        date: Some(chrono::Utc::now().to_rfc3339()),
        rows: axis(table.observation_ids(), table.observation_metadata()),
        columns: axis(table.sample_ids(), table.sample_metadata()),
        matrix_type: MatrixType::Sparse,
        matrix_element_type: table.element_type,
        shape: [n_rows, n_cols],
        data: Value::Array(data),
    };

    Ok(serde_json::to_string(&doc)?)
}

/// Write a table to `path`, gzip-compressing when the name ends in `.gz`.
///
/// The write is not atomic; a failure may leave a partial file behind.
///
/// # Errors
///
/// Returns `ParseError::Io` on write failure or `ParseError::Json` if
/// serialization fails.
pub fn write_table(table: &Table, path: &Path) -> Result<(), ParseError> {
    let json = table_to_json(table)?;
    let file = File::create(path)?;

    if is_gzipped(path) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(json.as_bytes())?;
        encoder.finish()?;
    } else {
        let mut writer = BufWriter::new(file);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
    }

    debug!(path = %path.display(), "wrote BIOM table");
    Ok(())
}
