//! Output artifacts
//!
//! ```text
//! <output-dir>/
//!   psa_results.csv
//!   parameter_samples.csv
//!   ceac.csv  ceaf.csv  regret_table.csv  dr_nmb.csv  evpi.csv  summary.csv
//!   run_summary.json
//! ```

mod summary;
mod tables;

pub use summary::{RunSummary, SkippedBlock, SliceSummary};
pub use tables::{
    ceac_csv, ceaf_csv, dr_nmb_csv, evpi_csv, parameter_samples_csv, psa_results_csv,
    regret_csv, summary_csv,
};

use std::fs;
use std::path::{Path, PathBuf};

use hecon_core::model::ParameterSamples;
use hecon_core::{PsaConfig, PsaRun};

use crate::data::DataError;
use crate::util::io::atomic_write_bytes;

pub const PSA_RESULTS: &str = "psa_results.csv";
pub const PARAMETER_SAMPLES: &str = "parameter_samples.csv";
pub const CEAC: &str = "ceac.csv";
pub const CEAF: &str = "ceaf.csv";
pub const REGRET: &str = "regret_table.csv";
pub const DR_NMB: &str = "dr_nmb.csv";
pub const EVPI: &str = "evpi.csv";
pub const SUMMARY: &str = "summary.csv";
pub const RUN_SUMMARY: &str = "run_summary.json";

/// Writes artifacts into one output directory
pub struct OutputDirectory {
    root: PathBuf,
}

impl OutputDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory if needed
    pub fn init(&self) -> Result<(), DataError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            DataError::Io(format!(
                "Failed to create output directory {}: {e}",
                self.root.display()
            ))
        })
    }

    fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf, DataError> {
        let path = self.root.join(name);
        atomic_write_bytes(&path, content)
            .map_err(|e| DataError::Io(format!("Failed to write {}: {e}", path.display())))?;
        tracing::debug!("wrote {}", path.display());
        Ok(path)
    }

    /// Write `parameter_samples.csv`
    pub fn write_samples(&self, samples: &ParameterSamples) -> Result<PathBuf, DataError> {
        self.write(PARAMETER_SAMPLES, &parameter_samples_csv(samples)?)
    }

    /// Write every artifact of a full run, returning the paths written
    pub fn write_run(
        &self,
        config: &PsaConfig,
        run: &PsaRun,
        generated_at: jiff::Timestamp,
    ) -> Result<Vec<PathBuf>, DataError> {
        let reports = run.reports.as_slice();
        let summary = RunSummary::new(config, run, generated_at);
        let json = serde_json::to_vec_pretty(&summary)
            .map_err(|e| DataError::Serialize(e.to_string()))?;

        Ok(vec![
            self.write(PSA_RESULTS, &psa_results_csv(&run.outcomes)?)?,
            self.write_samples(&run.samples)?,
            self.write(CEAC, &ceac_csv(reports)?)?,
            self.write(CEAF, &ceaf_csv(reports)?)?,
            self.write(REGRET, &regret_csv(reports)?)?,
            self.write(DR_NMB, &dr_nmb_csv(reports)?)?,
            self.write(EVPI, &evpi_csv(reports, &config.wtp_grid)?)?,
            self.write(SUMMARY, &summary_csv(reports)?)?,
            self.write(RUN_SUMMARY, &json)?,
        ])
    }
}
