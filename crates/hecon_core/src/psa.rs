//! End-to-end PSA driver
//!
//! Validates the configuration, samples parameters, simulates outcomes and
//! computes the decision aggregates. All randomness derives from
//! `PsaConfig::seed`: the master generator hands one seed to the sampler and
//! one to the bootstrap, so identical inputs give identical results.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::PsaConfig;
use crate::decision::{DecisionReport, analyze};
use crate::error::{BlockWarning, ConfigError, PsaError};
use crate::model::{CorrelationBlock, ParameterSamples, ParameterSpec, SimulationResult};
use crate::outcome::OutcomeModel;
use crate::sampling::{SamplingOutcome, sample_parameters};
use crate::simulation::simulate_outcomes;

/// Everything produced by one PSA run
#[derive(Debug, Clone)]
pub struct PsaRun {
    pub samples: ParameterSamples,
    /// Correlation blocks that were skipped, in input order
    pub block_warnings: Vec<BlockWarning>,
    pub outcomes: SimulationResult,
    /// One report per (jurisdiction, perspective), jurisdiction-major
    pub reports: Vec<DecisionReport>,
}

/// Seeds derived from the run seed, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSeeds {
    pub sampling: u64,
    pub bootstrap: u64,
}

impl RunSeeds {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mut master = StdRng::seed_from_u64(seed);
        Self {
            sampling: master.next_u64(),
            bootstrap: master.next_u64(),
        }
    }
}

/// Validate the configuration, model and parameter table without sampling
pub fn validate_inputs<M: OutcomeModel + ?Sized>(
    config: &PsaConfig,
    parameters: &[ParameterSpec],
    model: &M,
) -> Result<(), PsaError> {
    config.validate()?;
    if parameters.is_empty() {
        return Err(ConfigError::EmptyParameterTable.into());
    }
    for spec in parameters {
        spec.marginal()?;
    }
    let names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
    model.validate(config, &names)?;
    Ok(())
}

/// Sample the parameter table only.
///
/// Rejects an invalid configuration or an empty parameter table before
/// drawing anything.
pub fn sample_only(
    config: &PsaConfig,
    parameters: &[ParameterSpec],
    blocks: &[CorrelationBlock],
) -> Result<SamplingOutcome, PsaError> {
    config.validate()?;
    if parameters.is_empty() {
        return Err(ConfigError::EmptyParameterTable.into());
    }
    let seeds = RunSeeds::from_seed(config.seed);
    let mut rng = StdRng::seed_from_u64(seeds.sampling);
    let outcome = sample_parameters(
        parameters,
        blocks,
        config.n_iterations,
        config.sampling_mode(),
        &mut rng,
    )?;
    Ok(outcome)
}

/// Run the full pipeline
pub fn run_psa<M: OutcomeModel + ?Sized>(
    config: &PsaConfig,
    parameters: &[ParameterSpec],
    blocks: &[CorrelationBlock],
    model: &M,
) -> Result<PsaRun, PsaError> {
    validate_inputs(config, parameters, model)?;

    tracing::info!(
        iterations = config.n_iterations,
        parameters = parameters.len(),
        strategies = config.strategies.len(),
        jurisdictions = config.jurisdictions.len(),
        perspectives = config.perspectives.len(),
        correlated = config.correlated_psa,
        seed = config.seed,
        "starting PSA"
    );

    let SamplingOutcome { samples, warnings } = sample_only(config, parameters, blocks)?;
    let outcomes = simulate_outcomes(&samples, model, config);

    let seeds = RunSeeds::from_seed(config.seed);
    let mut bootstrap_rng = StdRng::seed_from_u64(seeds.bootstrap);
    let reports = analyze(&outcomes, config, &mut bootstrap_rng);

    tracing::info!(
        rows = outcomes.rows.len(),
        failures = outcomes.failures.len(),
        skipped_blocks = warnings.len(),
        "PSA complete"
    );

    Ok(PsaRun {
        samples,
        block_warnings: warnings,
        outcomes,
        reports,
    })
}
