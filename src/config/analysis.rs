use crate::SolverParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration for the `dic_demo` tool.
#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    /// Reference (undeformed) grayscale image.
    pub reference_image: PathBuf,
    /// Deformed grayscale image of the same specimen.
    pub deformed_image: PathBuf,
    /// Analysis centers in pixels.
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub solver: SolverParams,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub json_out: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<AnalysisConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
