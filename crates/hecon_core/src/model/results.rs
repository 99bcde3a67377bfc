//! Simulation results
//!
//! Contains the full outcome table of a PSA run and the per
//! (jurisdiction, perspective) slices consumed by the decision aggregates.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::outcome::Outcome;

use super::ids::{JurisdictionId, PerspectiveId, StrategyId};

/// Realized cost and effect for one (iteration, strategy, jurisdiction, perspective) tuple.
///
/// A failed evaluation keeps its row with NaN cost and QALY so gaps stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRow {
    pub iteration: usize,
    pub strategy: StrategyId,
    pub jurisdiction: JurisdictionId,
    pub perspective: PerspectiveId,
    pub cost: f64,
    pub qaly: f64,
}

impl OutcomeRow {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cost.is_finite() && self.qaly.is_finite()
    }
}

/// Complete outcome table of a PSA run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub strategies: Vec<String>,
    pub jurisdictions: Vec<String>,
    pub perspectives: Vec<String>,
    pub n_iterations: usize,
    /// Ordered by iteration, then strategy, jurisdiction, perspective
    pub rows: Vec<OutcomeRow>,
    /// Failed evaluations, in row order
    pub failures: Vec<SimulationError>,
}

impl SimulationResult {
    #[must_use]
    pub fn strategy_name(&self, id: StrategyId) -> &str {
        &self.strategies[id.index()]
    }

    #[must_use]
    pub fn jurisdiction_name(&self, id: JurisdictionId) -> &str {
        &self.jurisdictions[id.index()]
    }

    #[must_use]
    pub fn perspective_name(&self, id: PerspectiveId) -> &str {
        &self.perspectives[id.index()]
    }

    /// Look up a single row
    #[must_use]
    pub fn row(
        &self,
        iteration: usize,
        strategy: StrategyId,
        jurisdiction: JurisdictionId,
        perspective: PerspectiveId,
    ) -> Option<&OutcomeRow> {
        if iteration >= self.n_iterations
            || strategy.index() >= self.strategies.len()
            || jurisdiction.index() >= self.jurisdictions.len()
            || perspective.index() >= self.perspectives.len()
        {
            return None;
        }
        let per_strategy = self.jurisdictions.len() * self.perspectives.len();
        let per_iteration = self.strategies.len() * per_strategy;
        let flat = iteration * per_iteration
            + strategy.index() * per_strategy
            + jurisdiction.index() * self.perspectives.len()
            + perspective.index();
        self.rows.get(flat)
    }

    /// Whether every tuple evaluated successfully
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Cost/QALY matrix for one jurisdiction and perspective.
    ///
    /// Iterations where any strategy failed are dropped from the slice and
    /// counted in [`OutcomeSlice::excluded`].
    #[must_use]
    pub fn slice(&self, jurisdiction: JurisdictionId, perspective: PerspectiveId) -> OutcomeSlice {
        let n_strategies = self.strategies.len();
        let mut slice = OutcomeSlice {
            jurisdiction: self.jurisdiction_name(jurisdiction).to_string(),
            perspective: self.perspective_name(perspective).to_string(),
            strategies: self.strategies.clone(),
            iterations: Vec::with_capacity(self.n_iterations),
            costs: Vec::with_capacity(self.n_iterations * n_strategies),
            qalys: Vec::with_capacity(self.n_iterations * n_strategies),
            excluded: 0,
        };

        let mut buffer = Vec::with_capacity(n_strategies);
        for iteration in 0..self.n_iterations {
            buffer.clear();
            for s in 0..n_strategies {
                let strategy = StrategyId(s as u16);
                match self.row(iteration, strategy, jurisdiction, perspective) {
                    Some(row) if row.is_complete() => buffer.push((row.cost, row.qaly)),
                    _ => break,
                }
            }

            if buffer.len() == n_strategies {
                slice.iterations.push(iteration);
                for (cost, qaly) in &buffer {
                    slice.costs.push(*cost);
                    slice.qalys.push(*qaly);
                }
            } else {
                slice.excluded += 1;
            }
        }

        slice
    }

    /// All slices, jurisdiction-major
    pub fn slices(&self) -> impl Iterator<Item = OutcomeSlice> + '_ {
        (0..self.jurisdictions.len()).flat_map(move |j| {
            (0..self.perspectives.len())
                .map(move |p| self.slice(JurisdictionId(j as u16), PerspectiveId(p as u16)))
        })
    }
}

/// Complete-case cost and QALY draws for every strategy in one
/// (jurisdiction, perspective) setting.
#[derive(Debug, Clone)]
pub struct OutcomeSlice {
    pub jurisdiction: String,
    pub perspective: String,
    strategies: Vec<String>,
    iterations: Vec<usize>,
    costs: Vec<f64>,
    qalys: Vec<f64>,
    excluded: usize,
}

impl OutcomeSlice {
    /// Build a slice directly from per-iteration outcomes (one `Outcome` per
    /// strategy). Returns `None` if any iteration has the wrong width.
    #[must_use]
    pub fn new(strategies: Vec<String>, draws: Vec<Vec<Outcome>>) -> Option<Self> {
        let width = strategies.len();
        if draws.iter().any(|row| row.len() != width) {
            return None;
        }

        let iterations = (0..draws.len()).collect();
        let mut costs = Vec::with_capacity(draws.len() * width);
        let mut qalys = Vec::with_capacity(draws.len() * width);
        for outcome in draws.iter().flatten() {
            costs.push(outcome.cost);
            qalys.push(outcome.qaly);
        }

        Some(Self {
            jurisdiction: String::new(),
            perspective: String::new(),
            strategies,
            iterations,
            costs,
            qalys,
            excluded: 0,
        })
    }

    #[must_use]
    pub fn strategies(&self) -> &[String] {
        &self.strategies
    }

    #[must_use]
    pub fn n_strategies(&self) -> usize {
        self.strategies.len()
    }

    /// Number of retained (complete) iterations
    #[must_use]
    pub fn n_iterations(&self) -> usize {
        self.iterations.len()
    }

    /// Original iteration numbers of the retained rows
    #[must_use]
    pub fn iterations(&self) -> &[usize] {
        &self.iterations
    }

    /// Iterations dropped because at least one strategy failed
    #[must_use]
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty() || self.strategies.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn cost(&self, iteration: usize, strategy: usize) -> f64 {
        self.costs[iteration * self.strategies.len() + strategy]
    }

    #[inline]
    #[must_use]
    pub fn qaly(&self, iteration: usize, strategy: usize) -> f64 {
        self.qalys[iteration * self.strategies.len() + strategy]
    }

    /// Net monetary benefit `qaly * wtp - cost`
    #[inline]
    #[must_use]
    pub fn nmb(&self, iteration: usize, strategy: usize, wtp: f64) -> f64 {
        self.qaly(iteration, strategy) * wtp - self.cost(iteration, strategy)
    }

    /// Fill `out` with every strategy's NMB for one iteration
    pub fn nmb_row(&self, iteration: usize, wtp: f64, out: &mut Vec<f64>) {
        out.clear();
        out.extend((0..self.strategies.len()).map(|s| self.nmb(iteration, s, wtp)));
    }

    #[must_use]
    pub fn mean_cost(&self, strategy: usize) -> f64 {
        self.mean_of(|i| self.cost(i, strategy))
    }

    #[must_use]
    pub fn mean_qaly(&self, strategy: usize) -> f64 {
        self.mean_of(|i| self.qaly(i, strategy))
    }

    #[must_use]
    pub fn mean_nmb(&self, strategy: usize, wtp: f64) -> f64 {
        self.mean_of(|i| self.nmb(i, strategy, wtp))
    }

    fn mean_of(&self, value: impl Fn(usize) -> f64) -> f64 {
        let n = self.n_iterations();
        if n == 0 {
            return f64::NAN;
        }
        (0..n).map(value).sum::<f64>() / n as f64
    }
}
