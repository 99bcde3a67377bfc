//! Outcome simulation
//!
//! Evaluates the outcome model for every (iteration, strategy, jurisdiction,
//! perspective) tuple. Iterations are independent, so batches of them run in
//! parallel when the `parallel` feature is enabled; the resulting table is in
//! the same order either way.
//!
//! A model failure does not abort the run: the tuple's row keeps NaN cost and
//! QALY, and the error is recorded in [`SimulationResult::failures`].

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::PsaConfig;
use crate::error::SimulationError;
use crate::model::{
    JurisdictionId, OutcomeRow, ParameterSamples, PerspectiveId, SimulationResult, StrategyId,
};
use crate::outcome::{OutcomeModel, Scenario};

/// Iterations evaluated per work unit
const MAX_BATCH_SIZE: usize = 100;

type Evaluated = (Vec<OutcomeRow>, Vec<SimulationError>);

/// Evaluate the model on every sampled iteration
pub fn simulate_outcomes<M: OutcomeModel + ?Sized>(
    samples: &ParameterSamples,
    model: &M,
    config: &PsaConfig,
) -> SimulationResult {
    let n_iterations = samples.n_iterations();
    let num_batches = n_iterations.div_ceil(MAX_BATCH_SIZE);

    let run_batch = |b: usize| -> Evaluated {
        let start = b * MAX_BATCH_SIZE;
        let end = (start + MAX_BATCH_SIZE).min(n_iterations);
        let mut rows = Vec::new();
        let mut failures = Vec::new();
        for iteration in start..end {
            evaluate_iteration(samples, model, config, iteration, &mut rows, &mut failures);
        }
        (rows, failures)
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Evaluated> = (0..num_batches).into_par_iter().map(run_batch).collect();

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Evaluated> = (0..num_batches).map(run_batch).collect();

    let per_iteration =
        config.strategies.len() * config.jurisdictions.len() * config.perspectives.len();
    let mut rows = Vec::with_capacity(n_iterations * per_iteration);
    let mut failures = Vec::new();
    for (batch_rows, batch_failures) in batches {
        rows.extend(batch_rows);
        failures.extend(batch_failures);
    }

    if !failures.is_empty() {
        for failure in &failures {
            tracing::debug!("outcome evaluation failed: {failure}");
        }
        tracing::warn!(
            failed = failures.len(),
            total = rows.len(),
            first = %failures[0],
            "outcome model failed for some tuples; rows kept as NaN"
        );
    }

    tracing::debug!(
        iterations = n_iterations,
        rows = rows.len(),
        "outcome simulation complete"
    );

    SimulationResult {
        strategies: config.strategies.clone(),
        jurisdictions: config.jurisdictions.clone(),
        perspectives: config.perspectives.clone(),
        n_iterations,
        rows,
        failures,
    }
}

fn evaluate_iteration<M: OutcomeModel + ?Sized>(
    samples: &ParameterSamples,
    model: &M,
    config: &PsaConfig,
    iteration: usize,
    rows: &mut Vec<OutcomeRow>,
    failures: &mut Vec<SimulationError>,
) {
    let draw = samples.draw(iteration);
    for (s, strategy) in config.strategies.iter().enumerate() {
        for (j, jurisdiction) in config.jurisdictions.iter().enumerate() {
            for (p, perspective) in config.perspectives.iter().enumerate() {
                let scenario = Scenario {
                    strategy,
                    jurisdiction,
                    perspective,
                };
                let (cost, qaly) = match model.evaluate(&draw, &scenario) {
                    Ok(outcome) => (outcome.cost, outcome.qaly),
                    Err(source) => {
                        failures.push(SimulationError {
                            iteration,
                            strategy: strategy.clone(),
                            jurisdiction: jurisdiction.clone(),
                            perspective: perspective.clone(),
                            source,
                        });
                        (f64::NAN, f64::NAN)
                    }
                };
                rows.push(OutcomeRow {
                    iteration,
                    strategy: StrategyId(s as u16),
                    jurisdiction: JurisdictionId(j as u16),
                    perspective: PerspectiveId(p as u16),
                    cost,
                    qaly,
                });
            }
        }
    }
}
