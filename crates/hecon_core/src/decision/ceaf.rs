use serde::{Deserialize, Serialize};

use super::DecisionCurve;
use crate::model::OutcomeSlice;

/// Cost-effectiveness acceptability frontier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ceaf {
    /// Fraction of iterations in which each strategy is the NMB arg-max
    pub prob_optimal: DecisionCurve,
    /// Strategy with the highest expected NMB at each WTP
    pub expected_optimal: Vec<Option<usize>>,
    /// Strategies on the mean cost/QALY frontier, by ascending cost
    pub frontier: Vec<usize>,
}

impl Ceaf {
    #[must_use]
    pub fn is_expected_optimal(&self, wtp: usize, strategy: usize) -> bool {
        self.expected_optimal.get(wtp).copied().flatten() == Some(strategy)
    }

    #[must_use]
    pub fn on_frontier(&self, strategy: usize) -> bool {
        self.frontier.contains(&strategy)
    }
}

/// First index holding the maximum; NaN entries never win
fn arg_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Arg-max counting with first-wins ties, so each iteration credits exactly
/// one strategy and the probabilities at one WTP sum to 1.
#[must_use]
pub fn ceaf(slice: &OutcomeSlice, wtp_grid: &[f64]) -> Ceaf {
    let n = slice.n_iterations();
    let width = slice.n_strategies();
    let mut prob_optimal = DecisionCurve::filled(wtp_grid, slice.strategies(), f64::NAN);
    let mut expected_optimal = vec![None; wtp_grid.len()];

    if !slice.is_empty() {
        let mut nmb = Vec::with_capacity(width);
        let mut wins = vec![0usize; width];
        let mut means = vec![0.0; width];
        for (w, &wtp) in wtp_grid.iter().enumerate() {
            wins.fill(0);
            for i in 0..n {
                slice.nmb_row(i, wtp, &mut nmb);
                if let Some(s) = arg_max(&nmb) {
                    wins[s] += 1;
                }
            }
            for (s, &count) in wins.iter().enumerate() {
                prob_optimal.set(w, s, count as f64 / n as f64);
            }

            for (s, mean) in means.iter_mut().enumerate() {
                *mean = slice.mean_nmb(s, wtp);
            }
            expected_optimal[w] = arg_max(&means);
        }
    }

    let points: Vec<(f64, f64)> = (0..width)
        .map(|s| (slice.mean_cost(s), slice.mean_qaly(s)))
        .collect();

    Ceaf {
        prob_optimal,
        expected_optimal,
        frontier: pareto_frontier(&points),
    }
}

/// Non-dominated frontier of `(cost, qaly)` points.
///
/// Points are scanned by ascending cost (higher QALY first at equal cost) and
/// kept only if their QALY strictly exceeds every cheaper point's. Returns
/// indices in scan order; non-finite points are ignored.
#[must_use]
pub fn pareto_frontier(points: &[(f64, f64)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len())
        .filter(|&i| points[i].0.is_finite() && points[i].1.is_finite())
        .collect();
    order.sort_by(|&a, &b| {
        points[a]
            .0
            .total_cmp(&points[b].0)
            .then(points[b].1.total_cmp(&points[a].1))
            .then(a.cmp(&b))
    });

    let mut frontier = Vec::new();
    let mut best_qaly = f64::NEG_INFINITY;
    for i in order {
        if points[i].1 > best_qaly {
            best_qaly = points[i].1;
            frontier.push(i);
        }
    }
    frontier
}
