use std::fs;
use std::path::Path;

use hecon_core::{LinearOutcomeModel, PsaConfig};
use serde::{Deserialize, Serialize};

use super::DataError;

/// Run configuration file: PSA settings plus the outcome model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFile {
    pub psa: PsaConfig,
    pub model: LinearOutcomeModel,
}

impl RunFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }
}

/// Load the run configuration YAML at `path`
pub fn load_run_file(path: &Path) -> Result<RunFile, DataError> {
    let content = fs::read_to_string(path)
        .map_err(|e| DataError::Io(format!("Failed to read {}: {e}", path.display())))?;
    RunFile::from_yaml(&content).map_err(|e| DataError::Parse(format!("{}: {e}", path.display())))
}
