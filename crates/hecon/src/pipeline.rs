//! CLI pipeline: load inputs, run the PSA core, write artifacts

use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use hecon_core::correlation::resolve_blocks;
use hecon_core::model::{CorrelationBlock, ParameterSpec};
use hecon_core::{LinearOutcomeModel, PsaConfig, PsaRun, run_psa, sample_only, validate_inputs};
use rustc_hash::FxHashMap;

use crate::data::{DataError, load_correlations, load_parameters, load_run_file};
use crate::report::OutputDirectory;

/// Input files of a run
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub config: PathBuf,
    pub parameters: PathBuf,
    pub correlations: Option<PathBuf>,
}

/// Command-line values that take precedence over the run configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub correlated: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut PsaConfig) {
        if let Some(n) = self.iterations {
            config.n_iterations = n;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.correlated {
            config.correlated_psa = true;
        }
    }
}

/// Everything a run needs, loaded and with overrides applied
#[derive(Debug, Clone)]
pub struct Inputs {
    pub config: PsaConfig,
    pub model: LinearOutcomeModel,
    pub parameters: Vec<ParameterSpec>,
    pub blocks: Vec<CorrelationBlock>,
}

pub fn load_inputs(paths: &InputPaths, overrides: &Overrides) -> Result<Inputs, DataError> {
    let run_file = load_run_file(&paths.config)?;
    let mut config = run_file.psa;
    overrides.apply(&mut config);

    let parameters = load_parameters(&paths.parameters)?;
    let blocks = match &paths.correlations {
        Some(path) => load_correlations(path)?,
        None => Vec::new(),
    };

    Ok(Inputs {
        config,
        model: run_file.model,
        parameters,
        blocks,
    })
}

/// Validate inputs without sampling. Returns the number of correlation
/// blocks that would be skipped.
pub fn check(inputs: &Inputs) -> color_eyre::Result<usize> {
    validate_inputs(&inputs.config, &inputs.parameters, &inputs.model)
        .wrap_err("input validation failed")?;

    let index: FxHashMap<&str, usize> = inputs
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.as_str(), i))
        .collect();
    let (usable, skipped) = resolve_blocks(&inputs.blocks, &index);

    tracing::info!(
        parameters = inputs.parameters.len(),
        usable_blocks = usable.len(),
        skipped_blocks = skipped.len(),
        "inputs are valid"
    );
    Ok(skipped.len())
}

/// Sample parameters and write `parameter_samples.csv`
pub fn sample(inputs: &Inputs, output: &OutputDirectory) -> color_eyre::Result<PathBuf> {
    let outcome = sample_only(&inputs.config, &inputs.parameters, &inputs.blocks)
        .wrap_err("parameter sampling failed")?;

    output.init()?;
    let path = output.write_samples(&outcome.samples)?;
    tracing::info!(
        iterations = outcome.samples.n_iterations(),
        skipped_blocks = outcome.warnings.len(),
        "wrote {}",
        path.display()
    );
    Ok(path)
}

/// Run the full PSA and write every artifact
pub fn run(
    inputs: &Inputs,
    output: &OutputDirectory,
    generated_at: jiff::Timestamp,
) -> color_eyre::Result<(PsaRun, Vec<PathBuf>)> {
    let run = run_psa(
        &inputs.config,
        &inputs.parameters,
        &inputs.blocks,
        &inputs.model,
    )
    .wrap_err("PSA run failed")?;

    output.init()?;
    let written = output
        .write_run(&inputs.config, &run, generated_at)
        .wrap_err_with(|| format!("failed to write results to {}", output.path().display()))?;

    for report in &run.reports {
        tracing::info!(
            jurisdiction = %report.jurisdiction,
            perspective = %report.perspective,
            minimax = report.minimax_strategy().unwrap_or("-"),
            "minimax-regret strategy"
        );
    }
    tracing::info!(
        files = written.len(),
        "results written to {}",
        output.path().display()
    );
    Ok((run, written))
}
