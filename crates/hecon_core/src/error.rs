use std::fmt;

use crate::distributions::Marginal;

/// A distribution family name that is not one of normal, beta, gamma or lognormal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedDistribution {
    pub family: String,
}

impl fmt::Display for UnsupportedDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported distribution family '{}' (expected normal, beta, gamma or lognormal)",
            self.family
        )
    }
}

impl std::error::Error for UnsupportedDistribution {}

/// A parameter whose moments do not describe a valid distribution
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    Unsupported {
        parameter: String,
        source: UnsupportedDistribution,
    },
    NonFinite {
        parameter: String,
        mean: f64,
        std: f64,
    },
    NonPositiveStd {
        parameter: String,
        std: f64,
    },
    BetaMeanOutOfRange {
        parameter: String,
        mean: f64,
    },
    /// `std^2 >= mean * (1 - mean)` leaves no valid Beta shape parameters
    BetaVarianceTooLarge {
        parameter: String,
        mean: f64,
        std: f64,
    },
    NonPositiveGammaMean {
        parameter: String,
        mean: f64,
    },
    /// The sampling backend refused the derived native parameters
    Rejected {
        parameter: String,
        marginal: Marginal,
    },
    Duplicate {
        parameter: String,
    },
}

impl ParameterError {
    /// Name of the offending parameter
    #[must_use]
    pub fn parameter(&self) -> &str {
        match self {
            ParameterError::Unsupported { parameter, .. }
            | ParameterError::NonFinite { parameter, .. }
            | ParameterError::NonPositiveStd { parameter, .. }
            | ParameterError::BetaMeanOutOfRange { parameter, .. }
            | ParameterError::BetaVarianceTooLarge { parameter, .. }
            | ParameterError::NonPositiveGammaMean { parameter, .. }
            | ParameterError::Rejected { parameter, .. }
            | ParameterError::Duplicate { parameter } => parameter,
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::Unsupported { parameter, source } => {
                write!(f, "parameter '{parameter}': {source}")
            }
            ParameterError::NonFinite {
                parameter,
                mean,
                std,
            } => write!(
                f,
                "parameter '{parameter}': mean and std must be finite (mean={mean}, std={std})"
            ),
            ParameterError::NonPositiveStd { parameter, std } => {
                write!(f, "parameter '{parameter}': std must be positive (std={std})")
            }
            ParameterError::BetaMeanOutOfRange { parameter, mean } => write!(
                f,
                "parameter '{parameter}': beta mean must lie strictly between 0 and 1 (mean={mean})"
            ),
            ParameterError::BetaVarianceTooLarge {
                parameter,
                mean,
                std,
            } => write!(
                f,
                "parameter '{parameter}': beta variance {} must be below mean*(1-mean) = {} (mean={mean}, std={std})",
                std * std,
                mean * (1.0 - mean)
            ),
            ParameterError::NonPositiveGammaMean { parameter, mean } => {
                write!(f, "parameter '{parameter}': gamma mean must be positive (mean={mean})")
            }
            ParameterError::Rejected {
                parameter,
                marginal,
            } => write!(
                f,
                "parameter '{parameter}': invalid native distribution parameters {marginal:?}"
            ),
            ParameterError::Duplicate { parameter } => {
                write!(f, "parameter '{parameter}' is defined more than once")
            }
        }
    }
}

impl std::error::Error for ParameterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParameterError::Unsupported { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Fatal configuration problems, detected before any sampling
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroIterations,
    ZeroBootstrapResamples,
    EmptyList(&'static str),
    DuplicateName { list: &'static str, name: String },
    UnknownBaseStrategy(String),
    EmptyWtpGrid,
    /// WTP thresholds must be finite and strictly ascending
    InvalidWtpGrid { index: usize, value: f64 },
    EmptyParameterTable,
    MissingArmModel(String),
    UnknownModelKey { section: &'static str, key: String },
    UnknownParameter { context: String, parameter: String },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroIterations => write!(f, "n_iterations must be greater than zero"),
            ConfigError::ZeroBootstrapResamples => {
                write!(f, "bootstrap_resamples must be greater than zero")
            }
            ConfigError::EmptyList(list) => write!(f, "{list} must not be empty"),
            ConfigError::DuplicateName { list, name } => {
                write!(f, "'{name}' appears more than once in {list}")
            }
            ConfigError::UnknownBaseStrategy(name) => {
                write!(f, "base_strategy '{name}' is not in the strategy list")
            }
            ConfigError::EmptyWtpGrid => write!(f, "wtp_grid must contain at least one threshold"),
            ConfigError::InvalidWtpGrid { index, value } => write!(
                f,
                "wtp_grid must be finite and strictly ascending (entry {index} = {value})"
            ),
            ConfigError::EmptyParameterTable => write!(f, "parameter table is empty"),
            ConfigError::MissingArmModel(name) => {
                write!(f, "strategy '{name}' has no outcome model entry")
            }
            ConfigError::UnknownModelKey { section, key } => {
                write!(f, "outcome model {section} entry '{key}' is not configured")
            }
            ConfigError::UnknownParameter { context, parameter } => {
                write!(f, "{context} references unknown parameter '{parameter}'")
            }
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Why a correlation block was left out of correlated sampling
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    DimensionMismatch {
        parameters: usize,
        rows: usize,
        columns: usize,
    },
    UnknownParameter(String),
    DuplicateParameter(String),
    /// Parameter already belongs to an earlier, successfully factorized block
    AlreadyCorrelated {
        parameter: String,
        block: String,
    },
    NotCorrelationMatrix(&'static str),
    NotPositiveDefinite,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DimensionMismatch {
                parameters,
                rows,
                columns,
            } => write!(
                f,
                "{parameters} parameters but a {rows}x{columns} correlation matrix"
            ),
            SkipReason::UnknownParameter(name) => {
                write!(f, "parameter '{name}' is not in the parameter table")
            }
            SkipReason::DuplicateParameter(name) => {
                write!(f, "parameter '{name}' is listed twice")
            }
            SkipReason::AlreadyCorrelated { parameter, block } => {
                write!(f, "parameter '{parameter}' is already correlated by block '{block}'")
            }
            SkipReason::NotCorrelationMatrix(reason) => {
                write!(f, "not a correlation matrix: {reason}")
            }
            SkipReason::NotPositiveDefinite => {
                write!(f, "correlation matrix is not positive-definite")
            }
        }
    }
}

impl std::error::Error for SkipReason {}

/// A skipped correlation block, surfaced to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct BlockWarning {
    pub block: String,
    pub reason: SkipReason,
}

impl fmt::Display for BlockWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "correlation block '{}' skipped: {}",
            self.block, self.reason
        )
    }
}

/// Errors raised by an outcome model for a single evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    MissingParameter(String),
    UnknownStrategy(String),
    NonFinite { quantity: &'static str, value: f64 },
    Failed(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::MissingParameter(name) => {
                write!(f, "parameter '{name}' missing from draw")
            }
            ModelError::UnknownStrategy(name) => write!(f, "no model for strategy '{name}'"),
            ModelError::NonFinite { quantity, value } => {
                write!(f, "{quantity} evaluated to non-finite value {value}")
            }
            ModelError::Failed(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ModelError {}

/// An outcome model failure recorded against one (iteration, strategy,
/// jurisdiction, perspective) tuple
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationError {
    pub iteration: usize,
    pub strategy: String,
    pub jurisdiction: String,
    pub perspective: String,
    pub source: ModelError,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iteration {} ({} / {} / {}): {}",
            self.iteration, self.strategy, self.jurisdiction, self.perspective, self.source
        )
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Fatal errors that abort a PSA run
#[derive(Debug, Clone, PartialEq)]
pub enum PsaError {
    Config(ConfigError),
    Parameter(ParameterError),
}

impl fmt::Display for PsaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsaError::Config(e) => write!(f, "configuration error: {e}"),
            PsaError::Parameter(e) => write!(f, "parameter error: {e}"),
        }
    }
}

impl std::error::Error for PsaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PsaError::Config(e) => Some(e),
            PsaError::Parameter(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PsaError {
    fn from(err: ConfigError) -> Self {
        PsaError::Config(err)
    }
}

impl From<ParameterError> for PsaError {
    fn from(err: ParameterError) -> Self {
        PsaError::Parameter(err)
    }
}
