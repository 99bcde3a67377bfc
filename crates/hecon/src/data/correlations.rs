use std::fs;
use std::path::Path;

use hecon_core::model::CorrelationBlock;
use serde::{Deserialize, Serialize};

use super::DataError;

/// Correlation block file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFile {
    #[serde(default)]
    pub blocks: Vec<CorrelationBlock>,
}

impl CorrelationFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }
}

/// Load correlation blocks from YAML.
///
/// An unreadable or malformed file is fatal; problems inside individual
/// blocks are only detected (and skipped) at sampling time.
pub fn load_correlations(path: &Path) -> Result<Vec<CorrelationBlock>, DataError> {
    let content = fs::read_to_string(path)
        .map_err(|e| DataError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let file = CorrelationFile::from_yaml(&content)
        .map_err(|e| DataError::Parse(format!("{}: {e}", path.display())))?;
    tracing::debug!(blocks = file.blocks.len(), "loaded correlation blocks");
    Ok(file.blocks)
}
