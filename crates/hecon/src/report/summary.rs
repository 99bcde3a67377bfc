use hecon_core::{PsaConfig, PsaRun};
use serde::{Deserialize, Serialize};

/// Failure messages kept in the run summary
const MAX_REPORTED_FAILURES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBlock {
    pub block: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceSummary {
    pub jurisdiction: String,
    pub perspective: String,
    pub iterations: usize,
    pub excluded_iterations: usize,
    pub minimax_strategy: Option<String>,
    pub minimax_regret: Option<f64>,
}

/// Contents of `run_summary.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: jiff::Timestamp,
    pub seed: u64,
    pub n_iterations: usize,
    pub correlated_psa: bool,
    pub strategies: Vec<String>,
    pub base_strategy: String,
    pub skipped_blocks: Vec<SkippedBlock>,
    pub simulation_failures: usize,
    pub failure_messages: Vec<String>,
    pub slices: Vec<SliceSummary>,
}

impl RunSummary {
    pub fn new(config: &PsaConfig, run: &PsaRun, generated_at: jiff::Timestamp) -> Self {
        Self {
            generated_at,
            seed: config.seed,
            n_iterations: config.n_iterations,
            correlated_psa: config.correlated_psa,
            strategies: config.strategies.clone(),
            base_strategy: config.base_strategy.clone(),
            skipped_blocks: run
                .block_warnings
                .iter()
                .map(|w| SkippedBlock {
                    block: w.block.clone(),
                    reason: w.reason.to_string(),
                })
                .collect(),
            simulation_failures: run.outcomes.failures.len(),
            failure_messages: run
                .outcomes
                .failures
                .iter()
                .take(MAX_REPORTED_FAILURES)
                .map(ToString::to_string)
                .collect(),
            slices: run
                .reports
                .iter()
                .map(|r| SliceSummary {
                    jurisdiction: r.jurisdiction.clone(),
                    perspective: r.perspective.clone(),
                    iterations: r.n_iterations,
                    excluded_iterations: r.excluded,
                    minimax_strategy: r.minimax_strategy().map(str::to_string),
                    minimax_regret: r.minimax.map(|m| m.max_regret),
                })
                .collect(),
        }
    }
}
