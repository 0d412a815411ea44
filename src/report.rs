//! Ginkgo `report.json` model and measurement payload extraction.
//!
//! The report is a tree of suite reports, spec reports and report entries.
//! Only the keys needed to reach each entry's `Value.AsJSON` payload are
//! modelled; everything else in the report is ignored.

use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Payload used for an entry whose `Value` carries no `AsJSON`.
pub const EMPTY_PAYLOAD: &str = "{}";

/// Treats an explicit `null` the same as an absent key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkReport {
    pub suites: Vec<SuiteReport>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuiteReport {
    #[serde(rename = "SpecReports", default, deserialize_with = "null_as_default")]
    pub spec_reports: Vec<SpecReport>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpecReport {
    #[serde(rename = "ReportEntries", default, deserialize_with = "null_as_default")]
    pub report_entries: Vec<ReportEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportEntry {
    #[serde(rename = "Value", default, deserialize_with = "null_as_default")]
    pub value: EntryValue,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryValue {
    #[serde(rename = "AsJSON", default)]
    pub as_json: Option<String>,
}

impl ReportEntry {
    /// The embedded JSON text, `"{}"` when absent.
    pub fn payload(&self) -> &str {
        self.value.as_json.as_deref().unwrap_or(EMPTY_PAYLOAD)
    }
}

impl BenchmarkReport {
    /// All report entries, suite by suite, spec by spec, in document order.
    pub fn entries(&self) -> impl Iterator<Item = &ReportEntry> {
        self.suites
            .iter()
            .flat_map(|suite| suite.spec_reports.iter())
            .flat_map(|spec| spec.report_entries.iter())
    }
}

/// A decoded `AsJSON` payload. Only `Measurements` is kept.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct MeasurementDocument {
    #[serde(rename = "Measurements", default, deserialize_with = "null_as_default")]
    pub measurements: Vec<Value>,
}

impl MeasurementDocument {
    fn from_payload(index: usize, payload: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(payload).map_err(|source| Error::EmbeddedJson { index, source })?;
        if !value.is_object() {
            return Err(Error::NotAnObject { index });
        }
        serde_json::from_value(value).map_err(|source| Error::EmbeddedJson { index, source })
    }
}

/// Decodes every entry payload of `report`, one document per entry.
///
/// Entries without a payload yield an empty document. The first malformed
/// payload aborts extraction.
pub fn extract_documents(report: &BenchmarkReport) -> Result<Vec<MeasurementDocument>> {
    let documents = report
        .entries()
        .enumerate()
        .map(|(index, entry)| MeasurementDocument::from_payload(index, entry.payload()))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "extracted {} documents from {} suites",
        documents.len(),
        report.suites.len()
    );
    Ok(documents)
}
