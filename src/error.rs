use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: malformed report: {source}", path.display())]
    ReportJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("report entry {index}: malformed AsJSON payload: {source}")]
    EmbeddedJson {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("report entry {index}: AsJSON payload is not a JSON object")]
    NotAnObject { index: usize },
    #[error("document {document}, measurement {measurement}: {reason}")]
    InvalidMeasurement {
        document: usize,
        measurement: usize,
        reason: String,
    },
    #[error(
        "document {document}, measurement {measurement}: {values} values for {annotations} annotations"
    )]
    LengthMismatch {
        document: usize,
        measurement: usize,
        values: usize,
        annotations: usize,
    },
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
