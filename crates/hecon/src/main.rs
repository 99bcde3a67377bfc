use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hecon::pipeline;
use hecon::report::OutputDirectory;
use hecon::{InputPaths, Overrides, init_logging, load_inputs};

#[derive(Parser, Debug)]
#[command(name = "hecon")]
#[command(about = "Probabilistic sensitivity analysis for health-economic comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Also write logs to this file (rotated at 5MB)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full PSA and write every artifact
    Run {
        #[command(flatten)]
        inputs: InputArgs,

        /// Directory for the result files
        #[arg(short, long)]
        output_dir: PathBuf,
    },
    /// Sample parameters only and write parameter_samples.csv
    Sample {
        #[command(flatten)]
        inputs: InputArgs,

        #[arg(short, long)]
        output_dir: PathBuf,
    },
    /// Load and validate inputs without sampling
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Run configuration YAML (`psa:` and `model:` sections)
    #[arg(short, long)]
    config: PathBuf,

    /// Parameter table CSV (parameter,distribution,mean,std)
    #[arg(short, long)]
    parameters: PathBuf,

    /// Correlation blocks YAML
    #[arg(long)]
    correlations: Option<PathBuf>,

    /// Override the number of iterations
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Override the random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Force correlated sampling
    #[arg(long)]
    correlated: bool,
}

impl InputArgs {
    fn split(&self) -> (InputPaths, Overrides) {
        (
            InputPaths {
                config: self.config.clone(),
                parameters: self.parameters.clone(),
                correlations: self.correlations.clone(),
            },
            Overrides {
                iterations: self.iterations,
                seed: self.seed,
                correlated: self.correlated,
            },
        )
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_file.as_deref())?;

    match cli.command {
        Command::Run { inputs, output_dir } => {
            let (paths, overrides) = inputs.split();
            let inputs = load_inputs(&paths, &overrides)?;
            let output = OutputDirectory::new(output_dir);
            let (run, _) = pipeline::run(&inputs, &output, jiff::Timestamp::now())?;
            if !run.outcomes.failures.is_empty() {
                tracing::warn!(
                    "{} outcome evaluations failed; see run_summary.json",
                    run.outcomes.failures.len()
                );
            }
        }
        Command::Sample { inputs, output_dir } => {
            let (paths, overrides) = inputs.split();
            let inputs = load_inputs(&paths, &overrides)?;
            pipeline::sample(&inputs, &OutputDirectory::new(output_dir))?;
        }
        Command::Check { inputs } => {
            let (paths, overrides) = inputs.split();
            let inputs = load_inputs(&paths, &overrides)?;
            let skipped = pipeline::check(&inputs)?;
            if skipped > 0 {
                tracing::warn!("{skipped} correlation block(s) would be skipped");
            }
        }
    }

    tracing::debug!("done");
    Ok(())
}
