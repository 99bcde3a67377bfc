//! Input loaders
//!
//! - `parameters.csv`: `parameter,distribution,mean,std` (extra columns ignored)
//! - correlation YAML: `blocks: [{name, params, corr}]`
//! - run configuration YAML: `psa:` (run settings) and `model:` (linear outcome model)

mod correlations;
mod error;
mod parameters;
mod run_file;

pub use correlations::{CorrelationFile, load_correlations};
pub use error::DataError;
pub use parameters::{load_parameters, read_parameters};
pub use run_file::{RunFile, load_run_file};
