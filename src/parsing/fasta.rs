//! Parser for representative-sequence FASTA files using noodles.
//!
//! Only record ids are extracted; sequences are read and discarded.
//! Supports both uncompressed and gzip/bgzip compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;

use crate::core::ids::IdentifierSet;
use crate::parsing::ParseError;
use crate::utils::validation::{check_id_limit, is_gzipped};

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    // Check for gzipped FASTA
    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".fna.bgz")
    {
        return true;
    }

    // Check for uncompressed FASTA
    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Parse a FASTA file and collect its record ids.
///
/// The id of a record is its name up to the first whitespace; any
/// description after it is ignored.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, or `ParseError::TooManyIds` if the limit is exceeded.
/// Repeated ids collapse into one entry, and a file without records gives an
/// empty set.
pub fn parse_sequence_ids(path: &Path) -> Result<IdentifierSet, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        let reader = BufReader::new(GzDecoder::new(file));
        parse_fasta_reader(&mut fasta::io::Reader::new(reader))
    } else {
        let reader = BufReader::new(file);
        parse_fasta_reader(&mut fasta::io::Reader::new(reader))
    }
}

/// Parse from a noodles FASTA reader
fn parse_fasta_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<IdentifierSet, ParseError> {
    let mut ids = BTreeSet::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        // Check id limit for DOS protection
        if check_id_limit(ids.len()).is_some() {
            return Err(ParseError::TooManyIds(ids.len()));
        }

        ids.insert(String::from_utf8_lossy(record.name()).to_string());
    }

    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fasta(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(suffix).unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("seqs.fa")));
        assert!(is_fasta_file(Path::new("seqs.fna")));
        assert!(is_fasta_file(Path::new("seqs.fasta.gz")));
        assert!(is_fasta_file(Path::new("/path/to/Rep_Set.FNA")));

        assert!(!is_fasta_file(Path::new("table.biom")));
        assert!(!is_fasta_file(Path::new("seqs.fai")));
    }

    #[test]
    fn test_parse_ids_ignores_description() {
        let temp = write_fasta(".fna", b">O1 something\nACTG\n>O2\nATGC\n");
        let ids = parse_sequence_ids(temp.path()).unwrap();
        assert_eq!(ids.joined(), "O1, O2");
    }

    #[test]
    fn test_parse_gzipped() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">O3\nAC\n>O1\nGT\n").unwrap();
        let temp = write_fasta(".fna.gz", &encoder.finish().unwrap());

        let ids = parse_sequence_ids(temp.path()).unwrap();
        assert_eq!(ids.joined(), "O1, O3");
    }

    #[test]
    fn test_repeated_ids_merge() {
        let temp = write_fasta(".fna", b">O1\nACTG\n>O1 again\nATGC\n>O2\nAA\n");
        let ids = parse_sequence_ids(temp.path()).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.joined(), "O1, O2");
    }

    #[test]
    fn test_parse_empty_fasta() {
        let temp = write_fasta(".fna", b"");
        let ids = parse_sequence_ids(temp.path()).unwrap();
        assert!(ids.is_empty());
    }
}
