//! Post-processing for Ginkgo benchmark results.
//!
//! Reads `report.json` from a results directory, decodes the measurement
//! payloads embedded in its report entries, groups every measurement's
//! values by annotation and writes the result to `measurements.json`.

use log::info;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

pub mod annotate;
pub mod error;
pub mod report;
pub mod settings;

pub use annotate::{annotate_documents, group_by_annotation, AnnotatedValues, MeasurementSet};
pub use error::{Error, Result};
pub use report::{extract_documents, BenchmarkReport, MeasurementDocument};
pub use settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The results directory has no report; nothing was written.
    NoReport { report: PathBuf },
    Written {
        output: PathBuf,
        documents: usize,
        measurements: usize,
    },
}

pub fn load_report(path: &Path) -> Result<BenchmarkReport> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::ReportJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-prints `sets` with `indent` spaces per level.
pub fn render_measurements(sets: &[MeasurementSet], indent: usize) -> Result<Vec<u8>> {
    let indent = vec![b' '; indent];
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    sets.serialize(&mut serializer)?;
    Ok(out)
}

/// Replaces `path` with the rendered `sets`.
pub fn write_measurements(path: &Path, sets: &[MeasurementSet], settings: &Settings) -> Result<()> {
    let rendered = render_measurements(sets, settings.indent)?;
    std::fs::write(path, rendered).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Processes the results directory `dir`.
pub fn run(dir: &Path, settings: &Settings) -> Result<Outcome> {
    let report_path = dir.join(&settings.report_file);
    if !report_path.exists() {
        return Ok(Outcome::NoReport {
            report: report_path,
        });
    }

    let report = load_report(&report_path)?;
    let documents = extract_documents(&report)?;
    let sets = annotate_documents(&documents)?;

    let output = dir.join(&settings.output_file);
    write_measurements(&output, &sets, settings)?;
    let measurements = sets.iter().map(MeasurementSet::len).sum();
    info!(
        "wrote {} documents, {} measurements to {}",
        sets.len(),
        measurements,
        output.display()
    );
    Ok(Outcome::Written {
        output,
        documents: sets.len(),
        measurements,
    })
}
