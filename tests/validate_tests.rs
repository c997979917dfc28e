//! End-to-end validation of BIOM artifacts
//!
//! These tests drive `Validator::validate` the way the platform does: a
//! table on disk, job parameters naming it, and prep information served by
//! an in-memory store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use biom_validate::core::types::{ArtifactInfo, ArtifactType, FileRole};
use biom_validate::parsing::biom::{load_table, write_table};
use biom_validate::store::InMemoryPrepStore;
use biom_validate::{IdentifierSet, JobParameters, PrepInformation, Table, Validator};
use tempfile::TempDir;

const STUDY_SAMPLES: [&str; 27] = [
    "1.SKB2.640194",
    "1.SKM4.640180",
    "1.SKB3.640195",
    "1.SKB6.640176",
    "1.SKD6.640190",
    "1.SKM6.640187",
    "1.SKD9.640182",
    "1.SKM8.640201",
    "1.SKM2.640199",
    "1.SKD2.640178",
    "1.SKB7.640196",
    "1.SKD4.640185",
    "1.SKB8.640193",
    "1.SKM3.640197",
    "1.SKD5.640186",
    "1.SKB1.640202",
    "1.SKM1.640183",
    "1.SKD1.640179",
    "1.SKD3.640198",
    "1.SKB5.640181",
    "1.SKB4.640189",
    "1.SKB9.640200",
    "1.SKM9.640192",
    "1.SKD8.640184",
    "1.SKM5.640177",
    "1.SKM7.640188",
    "1.SKD7.640191",
];

struct Fixture {
    dir: TempDir,
    out_dir: PathBuf,
    store: InMemoryPrepStore,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("out");
        fs::create_dir(&out_dir).unwrap();

        let study = STUDY_SAMPLES
            .iter()
            .enumerate()
            .fold(PrepInformation::default(), |prep, (i, id)| {
                prep.with_sample(*id, [("barcode", format!("BC{i:02}"))])
            });

        let store = InMemoryPrepStore::new()
            .with_template("1", study)
            .with_template(
                "2",
                PrepInformation::default()
                    .with_sample("1.SKB8.640193", [("col", "val1")])
                    .with_sample("1.SKD8.640184", [("col", "val2")]),
            )
            .with_template(
                "3",
                PrepInformation::default()
                    .with_sample("1.SKB8.640193", [("col", "val1"), ("run_prefix", "Sample1")])
                    .with_sample("1.SKD8.640184", [("col", "val2"), ("run_prefix", "Sample2")]),
            );

        Self {
            dir,
            out_dir,
            store,
        }
    }

    /// Write a 2-observation table with the given samples into the input directory
    fn biom(&self, sample_ids: &[&str]) -> PathBuf {
        let samples: Vec<String> = sample_ids.iter().map(|s| (*s).to_string()).collect();
        let row: Vec<f64> = (0..samples.len()).map(|i| (i * 3 + 1) as f64).collect();
        let table = Table::from_dense(
            vec!["O1".to_string(), "O2".to_string()],
            samples,
            &[row.clone(), row],
        )
        .unwrap();

        let path = self.dir.path().join("table.biom");
        write_table(&table, &path).unwrap();
        path
    }

    fn fasta(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("rep_set.fna");
        fs::write(&path, content).unwrap();
        path
    }

    fn index(&self) -> PathBuf {
        self.out_dir.join("index.html")
    }

    fn support(&self) -> PathBuf {
        self.out_dir.join("support_files")
    }
}

fn params(biom: &Path, template: Option<&str>, analysis: Option<u64>) -> JobParameters {
    JobParameters {
        artifact_type: "BIOM".to_string(),
        template: template.map(str::to_string),
        analysis,
        files: BTreeMap::from([("biom".to_string(), vec![biom.to_path_buf()])]),
    }
}

fn set(ids: &[&str]) -> IdentifierSet {
    ids.iter().copied().collect()
}

#[test]
fn test_validate_analysis() {
    let fx = Fixture::new();
    let biom = fx.biom(&[
        "1.SKM4.640180",
        "1.SKB8.640193",
        "1.SKD8.640184",
        "1.SKM9.640192",
        "1.SKB7.640196",
    ]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, None, Some(1)), &fx.out_dir)
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.error, "");
    assert_eq!(
        outcome.artifacts,
        Some(vec![ArtifactInfo {
            name: None,
            artifact_type: ArtifactType::Biom,
            files: vec![
                (biom, FileRole::Biom),
                (fx.index(), FileRole::HtmlSummary),
                (fx.support(), FileRole::HtmlSummaryDir),
            ],
        }])
    );
    assert!(fx.index().is_file());
    assert!(fx.support().is_dir());
}

#[test]
fn test_validate_analysis_ignores_template() {
    let fx = Fixture::new();
    let biom = fx.biom(&["Sample1", "Sample2", "Sample3"]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("2"), Some(1)), &fx.out_dir)
        .unwrap();
    assert!(outcome.success);
}

#[test]
fn test_validate_unknown_type() {
    let fx = Fixture::new();
    let mut job = params(Path::new("ignored"), Some("1"), None);
    job.artifact_type = "UNKNOWN".to_string();

    let outcome = Validator::new(&fx.store).validate(&job, &fx.out_dir).unwrap();
    assert!(!outcome.success);
    assert!(outcome.artifacts.is_none());
    assert_eq!(
        outcome.error,
        "Unknown artifact type UNKNOWN. Supported types: BIOM"
    );
}

#[test]
fn test_validate_no_changes() {
    let fx = Fixture::new();
    let biom = fx.biom(&STUDY_SAMPLES);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("1"), None), &fx.out_dir)
        .unwrap();

    assert!(outcome.success);
    let files = &outcome.artifacts.unwrap()[0].files;
    assert_eq!(files[0], (biom, FileRole::Biom));
    assert!(!fx.out_dir.join("table.biom").exists());
}

#[test]
fn test_validate_no_changes_superset() {
    let fx = Fixture::new();
    let biom = fx.biom(&STUDY_SAMPLES[..9]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("1"), None), &fx.out_dir)
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.artifacts.unwrap()[0].files[0], (biom, FileRole::Biom));
}

#[test]
fn test_validate_five_samples_of_study() {
    let fx = Fixture::new();
    let biom = fx.biom(&STUDY_SAMPLES[10..15]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("1"), None), &fx.out_dir)
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.artifacts.unwrap()[0].files[0].0, biom);
}

#[test]
fn test_validate_unknown_samples() {
    let fx = Fixture::new();
    let biom = fx.biom(&["Sample1", "Sample2", "Sample3"]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("2"), None), &fx.out_dir)
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.artifacts.is_none());
    assert_eq!(
        outcome.error,
        "The sample ids in the BIOM table do not match the ones in the prep information. \
         Please, provide the column \"run_prefix\" in the prep information to map the existing \
         sample ids to the prep information sample ids."
    );
}

#[test]
fn test_validate_missing_samples() {
    let fx = Fixture::new();
    let biom = fx.biom(&["Sample1", "Sample2", "New.Sample"]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("3"), None), &fx.out_dir)
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.artifacts.is_none());
    assert_eq!(
        outcome.error,
        "Your prep information is missing samples that are present in your BIOM table: New.Sample"
    );
    assert!(!fx.out_dir.join("table.biom").exists());
}

#[test]
fn test_validate_run_prefix() {
    let fx = Fixture::new();
    let biom = fx.biom(&["Sample1", "Sample2"]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("3"), None), &fx.out_dir)
        .unwrap();

    let renamed = fx.out_dir.join("table.biom");
    assert!(outcome.success, "{}", outcome.error);
    assert_eq!(
        outcome.artifacts.unwrap()[0].files,
        vec![
            (renamed.clone(), FileRole::Biom),
            (fx.index(), FileRole::HtmlSummary),
            (fx.support(), FileRole::HtmlSummaryDir),
        ]
    );

    let original = load_table(&biom).unwrap();
    let table = load_table(&renamed).unwrap();
    assert_eq!(table.sample_set(), set(&["1.SKB8.640193", "1.SKD8.640184"]));
    assert_eq!(table.observation_ids(), original.observation_ids());
    assert_eq!(table.entries(), original.entries());
}

#[test]
fn test_validate_renamed_table_revalidates_unchanged() {
    let fx = Fixture::new();
    let biom = fx.biom(&["Sample2", "Sample1"]);
    let validator = Validator::new(&fx.store);

    assert!(validator
        .validate(&params(&biom, Some("3"), None), &fx.out_dir)
        .unwrap()
        .success);

    let renamed = fx.out_dir.join("table.biom");
    let second_out = fx.dir.path().join("second");
    let outcome = validator
        .validate(&params(&renamed, Some("3"), None), &second_out)
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.artifacts.unwrap()[0].files[0].0, renamed);
    assert!(!second_out.join("table.biom").exists());
}

#[test]
fn test_validate_prefix() {
    let fx = Fixture::new();
    let biom = fx.biom(&["SKB8.640193", "SKD8.640184"]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("2"), None), &fx.out_dir)
        .unwrap();

    let renamed = fx.out_dir.join("table.biom");
    assert!(outcome.success, "{}", outcome.error);
    assert_eq!(outcome.artifacts.unwrap()[0].files[0], (renamed.clone(), FileRole::Biom));
    assert_eq!(
        load_table(&renamed).unwrap().sample_set(),
        set(&["1.SKB8.640193", "1.SKD8.640184"])
    );
}

#[test]
fn test_validate_representative_set() {
    let fx = Fixture::new();
    let biom = fx.biom(&STUDY_SAMPLES[..9]);
    let fasta = fx.fasta(">O1 something\nACTG\n>O2\nATGC\n");

    // Summary outputs from an earlier run are replaced
    fs::write(fx.index(), "my html").unwrap();
    fs::create_dir(fx.support()).unwrap();

    let mut job = params(&biom, Some("1"), None);
    job.files
        .insert("preprocessed_fasta".to_string(), vec![fasta.clone()]);

    let validator = Validator::new(&fx.store);
    let outcome = validator.validate(&job, &fx.out_dir).unwrap();
    assert!(outcome.success, "{}", outcome.error);
    assert_eq!(
        outcome.artifacts.unwrap()[0].files,
        vec![
            (biom.clone(), FileRole::Biom),
            (fasta.clone(), FileRole::PreprocessedFasta),
            (fx.index(), FileRole::HtmlSummary),
            (fx.support(), FileRole::HtmlSummaryDir),
        ]
    );
    assert_ne!(fs::read_to_string(fx.index()).unwrap(), "my html");

    // Extra ids
    fx.fasta(">O1 something\nACTG\n>O2\nATGC\n>O3\nATGC\n");
    let outcome = validator.validate(&job, &fx.out_dir).unwrap();
    assert!(!outcome.success);
    assert!(outcome.artifacts.is_none());
    assert_eq!(
        outcome.error,
        "The representative set sequence file includes observations not found in the BIOM \
         table: O3"
    );

    // Missing ids
    fx.fasta(">O1 something\nACTG\n");
    let outcome = validator.validate(&job, &fx.out_dir).unwrap();
    assert!(!outcome.success);
    assert!(outcome.artifacts.is_none());
    assert_eq!(
        outcome.error,
        "The representative set sequence file is missing observation ids found in the BIOM \
         table: O2"
    );
}

#[test]
fn test_validate_representative_set_empty_and_repeated() {
    let fx = Fixture::new();
    let biom = fx.biom(&["S1", "S2"]);
    let fasta = fx.fasta("");

    let mut job = params(&biom, None, None);
    job.files
        .insert("preprocessed_fasta".to_string(), vec![fasta]);
    let validator = Validator::new(&fx.store);

    let outcome = validator.validate(&job, &fx.out_dir).unwrap();
    assert!(!outcome.success);
    assert_eq!(
        outcome.error,
        "The representative set sequence file is missing observation ids found in the BIOM \
         table: O1, O2"
    );

    // A repeated record id counts once
    fx.fasta(">O1\nACTG\n>O1 again\nATGC\n>O2\nAAAA\n");
    let outcome = validator.validate(&job, &fx.out_dir).unwrap();
    assert!(outcome.success, "{}", outcome.error);
}

#[test]
fn test_validate_missing_template_accepts() {
    let fx = Fixture::new();
    let biom = fx.biom(&["Sample1"]);

    let outcome = Validator::new(&fx.store)
        .validate(&params(&biom, Some("404"), None), &fx.out_dir)
        .unwrap();
    assert!(outcome.success);
}

#[test]
fn test_validate_ambiguous_prefix_is_an_error() {
    let fx = Fixture::new();
    let store = InMemoryPrepStore::new().with_template(
        "9",
        PrepInformation::default()
            .with_sample("1.SKB8.640193", [("run_prefix", "Sample1")])
            .with_sample("1.SKD8.640184", [("run_prefix", "Sample1")]),
    );
    let biom = fx.biom(&["Sample1"]);

    let err = Validator::new(&store)
        .validate(&params(&biom, Some("9"), None), &fx.out_dir)
        .unwrap_err();
    assert!(format!("{err:#}").contains("both declare \"Sample1\""));
}

#[test]
fn test_validate_no_biom_file() {
    let fx = Fixture::new();
    let job = JobParameters {
        artifact_type: "BIOM".to_string(),
        ..JobParameters::default()
    };

    let outcome = Validator::new(&fx.store).validate(&job, &fx.out_dir).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.error, "No BIOM file provided");
}

#[test]
fn test_validate_unreadable_biom() {
    let fx = Fixture::new();
    let path = fx.dir.path().join("broken.biom");
    fs::write(&path, "not a table").unwrap();

    let outcome = Validator::new(&fx.store)
        .validate(&params(&path, None, None), &fx.out_dir)
        .unwrap();
    assert!(!outcome.success);
    assert!(outcome.error.starts_with("Error loading BIOM table"));
}
