use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Ginkgo JSON report, relative to the results directory.
    #[serde(default = "default_report_file")]
    pub report_file: String,
    /// Flattened measurements, relative to the results directory.
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Spaces per nesting level in the output.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_report_file() -> String {
    "report.json".to_string()
}
fn default_output_file() -> String {
    "measurements.json".to_string()
}
fn default_indent() -> usize {
    4
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_file: default_report_file(),
            output_file: default_output_file(),
            indent: default_indent(),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }
}
