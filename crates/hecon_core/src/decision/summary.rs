use serde::{Deserialize, Serialize};

use crate::model::OutcomeSlice;

/// Mean outcomes of one strategy and its increments over the base strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: String,
    pub mean_cost: f64,
    pub mean_qaly: f64,
    pub incremental_cost: f64,
    pub incremental_qaly: f64,
    /// Incremental cost-effectiveness ratio; `None` for the base strategy or
    /// when the incremental QALY is zero
    pub icer: Option<f64>,
}

/// Summarize every strategy of a slice against `base`
#[must_use]
pub fn summarize(slice: &OutcomeSlice, base: usize) -> Vec<StrategySummary> {
    let base_cost = slice.mean_cost(base);
    let base_qaly = slice.mean_qaly(base);

    slice
        .strategies()
        .iter()
        .enumerate()
        .map(|(s, name)| {
            let mean_cost = slice.mean_cost(s);
            let mean_qaly = slice.mean_qaly(s);
            let incremental_cost = mean_cost - base_cost;
            let incremental_qaly = mean_qaly - base_qaly;
            let icer = if s == base || incremental_qaly == 0.0 || !incremental_qaly.is_finite() {
                None
            } else {
                Some(incremental_cost / incremental_qaly)
            };
            StrategySummary {
                strategy: name.clone(),
                mean_cost,
                mean_qaly,
                incremental_cost,
                incremental_qaly,
                icer,
            }
        })
        .collect()
}
