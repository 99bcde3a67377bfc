//! Decision-uncertainty aggregates
//!
//! Pure functions over the simulated cost/QALY table. Every aggregate is
//! computed per (jurisdiction, perspective) slice, since net benefits from
//! different settings are not comparable within one iteration:
//!
//! - [`ceac`]: probability each strategy has the highest NMB
//! - [`ceaf`]: probability of being the arg-max, expected-NMB optimum and
//!   mean cost/QALY frontier
//! - [`expected_regret`] and [`minimax_regret`]
//! - [`dr_nmb`]: bootstrapped worst-case net benefit
//! - [`evpi`]: expected value of perfect information
//! - [`summarize`]: mean and incremental results against the base strategy
//!
//! ```ignore
//! let mut rng = StdRng::seed_from_u64(bootstrap_seed);
//! let reports = analyze(&result, &config, &mut rng);
//! for report in &reports {
//!     let p = report.ceac.get(0, 1);
//! }
//! ```

mod ceac;
mod ceaf;
mod evpi;
mod regret;
mod robust;
mod summary;

pub use ceac::ceac;
pub use ceaf::{Ceaf, ceaf, pareto_frontier};
pub use evpi::evpi;
pub use regret::{MinimaxRegret, expected_regret, minimax_regret};
pub use robust::dr_nmb;
pub use summary::{StrategySummary, summarize};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PsaConfig;
use crate::model::{OutcomeSlice, SimulationResult};

/// Values keyed by (WTP threshold, strategy), stored WTP-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionCurve {
    wtp_grid: Vec<f64>,
    strategies: Vec<String>,
    values: Vec<f64>,
}

impl DecisionCurve {
    /// Create from WTP-major data. Returns `None` if the length does not match.
    #[must_use]
    pub fn from_data(wtp_grid: Vec<f64>, strategies: Vec<String>, values: Vec<f64>) -> Option<Self> {
        if values.len() != wtp_grid.len() * strategies.len() {
            return None;
        }
        Some(Self {
            wtp_grid,
            strategies,
            values,
        })
    }

    fn filled(wtp_grid: &[f64], strategies: &[String], value: f64) -> Self {
        Self {
            wtp_grid: wtp_grid.to_vec(),
            strategies: strategies.to_vec(),
            values: vec![value; wtp_grid.len() * strategies.len()],
        }
    }

    #[must_use]
    pub fn wtp_grid(&self) -> &[f64] {
        &self.wtp_grid
    }

    #[must_use]
    pub fn strategies(&self) -> &[String] {
        &self.strategies
    }

    #[must_use]
    pub fn get(&self, wtp: usize, strategy: usize) -> f64 {
        self.values[wtp * self.strategies.len() + strategy]
    }

    fn set(&mut self, wtp: usize, strategy: usize, value: f64) {
        let width = self.strategies.len();
        self.values[wtp * width + strategy] = value;
    }

    /// All strategies' values at one WTP index
    #[must_use]
    pub fn at_wtp(&self, wtp: usize) -> &[f64] {
        let width = self.strategies.len();
        &self.values[wtp * width..(wtp + 1) * width]
    }

    /// Iterate `(wtp, strategy, value)` in storage order
    pub fn iter(&self) -> impl Iterator<Item = (f64, &str, f64)> + '_ {
        let width = self.strategies.len().max(1);
        self.values.iter().enumerate().map(move |(k, &v)| {
            (
                self.wtp_grid[k / width],
                self.strategies[k % width].as_str(),
                v,
            )
        })
    }
}

/// Every decision aggregate for one (jurisdiction, perspective) slice
#[derive(Debug, Clone)]
pub struct DecisionReport {
    pub jurisdiction: String,
    pub perspective: String,
    /// Complete iterations the aggregates were computed from
    pub n_iterations: usize,
    /// Iterations dropped because a strategy failed
    pub excluded: usize,
    pub ceac: DecisionCurve,
    pub ceaf: Ceaf,
    pub regret: DecisionCurve,
    pub minimax: Option<MinimaxRegret>,
    pub dr_nmb: DecisionCurve,
    /// EVPI per WTP threshold
    pub evpi: Vec<f64>,
    pub summary: Vec<StrategySummary>,
}

impl DecisionReport {
    /// Name of the minimax-regret strategy, if one could be determined
    #[must_use]
    pub fn minimax_strategy(&self) -> Option<&str> {
        self.minimax
            .as_ref()
            .map(|m| self.regret.strategies()[m.strategy].as_str())
    }
}

/// Compute every aggregate for one slice.
///
/// `rng` drives the bootstrap of [`dr_nmb`]; nothing else is random.
pub fn analyze_slice<R: Rng + ?Sized>(
    slice: &OutcomeSlice,
    config: &PsaConfig,
    rng: &mut R,
) -> DecisionReport {
    let wtp_grid = config.wtp_grid.as_slice();
    let base = config
        .base_strategy_id()
        .map_or(0, |id| id.index());

    let regret = expected_regret(slice, wtp_grid);
    let minimax = minimax_regret(&regret);

    DecisionReport {
        jurisdiction: slice.jurisdiction.clone(),
        perspective: slice.perspective.clone(),
        n_iterations: slice.n_iterations(),
        excluded: slice.excluded(),
        ceac: ceac(slice, wtp_grid, config.tie_break),
        ceaf: ceaf(slice, wtp_grid),
        minimax,
        regret,
        dr_nmb: dr_nmb(slice, wtp_grid, config.bootstrap_resamples, rng),
        evpi: evpi(slice, wtp_grid),
        summary: summarize(slice, base),
    }
}

/// Compute the aggregates for every slice of a simulation, jurisdiction-major
pub fn analyze<R: Rng + ?Sized>(
    result: &SimulationResult,
    config: &PsaConfig,
    rng: &mut R,
) -> Vec<DecisionReport> {
    result
        .slices()
        .map(|slice| {
            if slice.excluded() > 0 {
                tracing::warn!(
                    jurisdiction = %slice.jurisdiction,
                    perspective = %slice.perspective,
                    excluded = slice.excluded(),
                    retained = slice.n_iterations(),
                    "iterations with failed outcomes excluded from decision analysis"
                );
            }
            let report = analyze_slice(&slice, config, rng);
            tracing::debug!(
                jurisdiction = %report.jurisdiction,
                perspective = %report.perspective,
                minimax = report.minimax_strategy().unwrap_or("-"),
                "decision analysis complete"
            );
            report
        })
        .collect()
}
