//! Static HTML summary of a validated table.
//!
//! The summary is an `index.html` file plus a `support_files/` directory
//! holding per-sample and per-observation count tables that the page links
//! to. Existing files at those paths are overwritten.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::table::Table;

pub const INDEX_FILE: &str = "index.html";
pub const SUPPORT_DIR: &str = "support_files";

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Failed to write summary: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to format summary: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Paths of a generated summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub index: PathBuf,
    pub support_dir: PathBuf,
}

/// Renders a summary of a table into an output directory
pub trait SummaryGenerator {
    /// # Errors
    ///
    /// Returns `SummaryError` if the summary files cannot be written.
    fn generate(&self, table: &Table, output_dir: &Path) -> Result<Summary, SummaryError>;
}

/// Summary statistics over per-sample totals
#[derive(Debug, Clone, PartialEq)]
pub struct CountStats {
    pub min: f64,
    pub median: f64,
    pub max: f64,
    pub total: f64,
}

impl CountStats {
    /// `None` for an empty slice
    #[must_use]
    pub fn from_totals(totals: &[f64]) -> Option<Self> {
        if totals.is_empty() {
            return None;
        }
        let mut sorted = totals.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            min: sorted[0],
            median,
            max: sorted[sorted.len() - 1],
            total: sorted.iter().sum(),
        })
    }
}

/// Default generator: a self-contained HTML page and TSV support files
#[derive(Debug, Clone, Default)]
pub struct HtmlSummary;

impl SummaryGenerator for HtmlSummary {
    fn generate(&self, table: &Table, output_dir: &Path) -> Result<Summary, SummaryError> {
        let index = output_dir.join(INDEX_FILE);
        let support_dir = output_dir.join(SUPPORT_DIR);
        fs::create_dir_all(&support_dir)?;

        let sample_totals = table.sample_totals();
        let mut observation_totals = vec![0.0; table.observation_ids().len()];
        for e in table.entries() {
            observation_totals[e.observation] += e.value;
        }

        fs::write(
            support_dir.join("sample_counts.tsv"),
            counts_tsv("sample_id", table.sample_ids(), &sample_totals),
        )?;
        fs::write(
            support_dir.join("observation_counts.tsv"),
            counts_tsv("observation_id", table.observation_ids(), &observation_totals),
        )?;

        fs::write(&index, render_index(table, &sample_totals)?)?;
        debug!(path = %index.display(), "wrote HTML summary");

        Ok(Summary { index, support_dir })
    }
}

/// Rows sorted by count (descending), then id
fn counts_tsv(header: &str, ids: &[String], totals: &[f64]) -> String {
    let mut rows: Vec<(&String, f64)> = ids.iter().zip(totals.iter().copied()).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut out = format!("{header}\tcount\n");
    for (id, count) in rows {
        out.push_str(id);
        out.push('\t');
        out.push_str(&count.to_string());
        out.push('\n');
    }
    out
}

fn render_index(table: &Table, sample_totals: &[f64]) -> Result<String, std::fmt::Error> {
    let (n_obs, n_samples) = table.shape();
    let cells = n_obs * n_samples;
    #[allow(clippy::cast_precision_loss)]
    let density = if cells == 0 {
        0.0
    } else {
        table.entries().len() as f64 / cells as f64
    };

    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html><head><meta charset=\"utf-8\">")?;
    writeln!(html, "<title>BIOM table summary</title></head><body>")?;
    writeln!(html, "<h1>BIOM table summary</h1>")?;
    if let Some(id) = &table.id {
        writeln!(html, "<p>Table: {}</p>", escape_html(id))?;
    }
    writeln!(html, "<table>")?;
    writeln!(html, "<tr><th>Samples</th><td>{n_samples}</td></tr>")?;
    writeln!(html, "<tr><th>Observations</th><td>{n_obs}</td></tr>")?;
    writeln!(
        html,
        "<tr><th>Non-zero entries</th><td>{}</td></tr>",
        table.entries().len()
    )?;
    writeln!(html, "<tr><th>Density</th><td>{density:.4}</td></tr>")?;
    if let Some(stats) = CountStats::from_totals(sample_totals) {
        writeln!(html, "<tr><th>Total count</th><td>{}</td></tr>", stats.total)?;
        writeln!(html, "<tr><th>Min/sample</th><td>{}</td></tr>", stats.min)?;
        writeln!(html, "<tr><th>Median/sample</th><td>{}</td></tr>", stats.median)?;
        writeln!(html, "<tr><th>Max/sample</th><td>{}</td></tr>", stats.max)?;
    }
    writeln!(html, "</table>")?;
    writeln!(
        html,
        "<p><a href=\"{SUPPORT_DIR}/sample_counts.tsv\">Counts per sample</a> | \
         <a href=\"{SUPPORT_DIR}/observation_counts.tsv\">Counts per observation</a></p>"
    )?;
    writeln!(
        html,
        "<p>Generated {}</p>",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(html, "</body></html>")?;
    Ok(html)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
