//! Monte Carlo parameter sampling
//!
//! Produces an `n_iterations x n_parameters` sample table, either with every
//! parameter drawn independently from its marginal, or with correlation blocks
//! applied through a Gaussian copula:
//!
//! 1. draw independent standard normals for every parameter in a usable block
//! 2. correlate each block with its Cholesky factor
//! 3. map `Phi(z)` through each marginal's inverse CDF
//!
//! Parameters outside any usable block are sampled independently. All
//! randomness comes from the generator passed in, so a seeded generator makes
//! the table reproducible.

use rand::Rng;
use rand_distr::StandardNormal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::correlation::resolve_blocks;
use crate::distributions::Marginal;
use crate::error::{BlockWarning, ParameterError};
use crate::model::{CorrelationBlock, ParameterSamples, ParameterSpec};

/// How parameters are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    #[default]
    Independent,
    Correlated,
}

/// Sample table plus the correlation blocks that had to be skipped
#[derive(Debug, Clone)]
pub struct SamplingOutcome {
    pub samples: ParameterSamples,
    pub warnings: Vec<BlockWarning>,
}

/// Draw `n_iterations` parameter vectors.
///
/// Fails with a [`ParameterError`] if any parameter's moments are invalid or a
/// name repeats; correlation problems only produce warnings.
pub fn sample_parameters<R: Rng + ?Sized>(
    specs: &[ParameterSpec],
    blocks: &[CorrelationBlock],
    n_iterations: usize,
    mode: SamplingMode,
    rng: &mut R,
) -> Result<SamplingOutcome, ParameterError> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, spec) in specs.iter().enumerate() {
        if index.insert(spec.name.as_str(), i).is_some() {
            return Err(ParameterError::Duplicate {
                parameter: spec.name.clone(),
            });
        }
    }

    let marginals = specs
        .iter()
        .map(ParameterSpec::marginal)
        .collect::<Result<Vec<_>, _>>()?;

    let (resolved, warnings) = match mode {
        SamplingMode::Independent => {
            if !blocks.is_empty() {
                tracing::debug!(
                    blocks = blocks.len(),
                    "independent sampling requested; correlation blocks ignored"
                );
            }
            (Vec::new(), Vec::new())
        }
        SamplingMode::Correlated => resolve_blocks(blocks, &index),
    };

    let mut covered = vec![false; specs.len()];
    for block in &resolved {
        for &column in &block.columns {
            covered[column] = true;
        }
    }

    // Independent standard normals for block members, in parameter order
    let mut normals: Vec<Vec<f64>> = vec![Vec::new(); specs.len()];
    for (column, normal) in normals.iter_mut().enumerate() {
        if covered[column] {
            *normal = (0..n_iterations)
                .map(|_| rng.sample::<f64, _>(StandardNormal))
                .collect();
        }
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); specs.len()];

    // Uncovered parameters straight from their marginal
    for (column, marginal) in marginals.iter().enumerate() {
        if !covered[column] {
            columns[column] = marginal
                .sample_n(rng, n_iterations)
                .map_err(|e| rejected(&specs[column], e.0))?;
        }
    }

    // Gaussian copula for each usable block
    let phi = Normal::standard();
    for block in &resolved {
        let correlated = block.correlate(&normals);
        for (&column, z) in block.columns.iter().zip(correlated) {
            let quantile = marginals[column]
                .quantile()
                .map_err(|e| rejected(&specs[column], e.0))?;
            columns[column] = z
                .into_iter()
                .map(|z| quantile.inverse_cdf(phi.cdf(z)))
                .collect();
        }
    }

    let names = specs.iter().map(|s| s.name.clone()).collect();
    let samples = ParameterSamples::from_sampled(names, columns, n_iterations);

    tracing::debug!(
        iterations = n_iterations,
        parameters = specs.len(),
        correlated_blocks = resolved.len(),
        skipped_blocks = warnings.len(),
        "parameter sampling complete"
    );

    Ok(SamplingOutcome { samples, warnings })
}

fn rejected(spec: &ParameterSpec, marginal: Marginal) -> ParameterError {
    ParameterError::Rejected {
        parameter: spec.name.clone(),
        marginal,
    }
}
