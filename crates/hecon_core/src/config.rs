//! Run configuration for a PSA

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::StrategyId;
use crate::sampling::SamplingMode;

/// How CEAC credits an iteration whose maximum NMB is shared by several strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Each of the k tied strategies receives 1/k
    #[default]
    Split,
    /// The first tied strategy in configured order receives the full credit
    First,
}

/// Complete configuration for a PSA run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsaConfig {
    /// Number of Monte Carlo iterations
    pub n_iterations: usize,

    /// Apply correlation blocks through the Gaussian copula
    #[serde(default)]
    pub correlated_psa: bool,

    /// Seed for every random draw of the run
    #[serde(default)]
    pub seed: u64,

    /// Willingness-to-pay thresholds, strictly ascending
    pub wtp_grid: Vec<f64>,

    /// Strategies in comparison order; ties resolve toward earlier entries
    pub strategies: Vec<String>,

    /// Reference arm for incremental results
    pub base_strategy: String,

    pub jurisdictions: Vec<String>,
    pub perspectives: Vec<String>,

    /// Resamples for the distributionally-robust net benefit
    #[serde(default = "default_bootstrap_resamples")]
    pub bootstrap_resamples: usize,

    #[serde(default)]
    pub tie_break: TieBreak,
}

fn default_bootstrap_resamples() -> usize {
    100
}

impl Default for PsaConfig {
    fn default() -> Self {
        Self {
            n_iterations: 1000,
            correlated_psa: false,
            seed: 0,
            wtp_grid: vec![0.0, 25_000.0, 50_000.0, 75_000.0, 100_000.0],
            strategies: Vec::new(),
            base_strategy: String::new(),
            jurisdictions: vec!["default".to_string()],
            perspectives: vec!["health_system".to_string()],
            bootstrap_resamples: default_bootstrap_resamples(),
            tie_break: TieBreak::default(),
        }
    }
}

impl PsaConfig {
    /// Check every invariant of the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.bootstrap_resamples == 0 {
            return Err(ConfigError::ZeroBootstrapResamples);
        }

        if self.wtp_grid.is_empty() {
            return Err(ConfigError::EmptyWtpGrid);
        }
        for (index, &value) in self.wtp_grid.iter().enumerate() {
            let ascending = index == 0 || value > self.wtp_grid[index - 1];
            if !value.is_finite() || !ascending {
                return Err(ConfigError::InvalidWtpGrid { index, value });
            }
        }

        unique_names("strategies", &self.strategies)?;
        unique_names("jurisdictions", &self.jurisdictions)?;
        unique_names("perspectives", &self.perspectives)?;

        if u16::try_from(self.strategies.len()).is_err()
            || u16::try_from(self.jurisdictions.len()).is_err()
            || u16::try_from(self.perspectives.len()).is_err()
        {
            return Err(ConfigError::Invalid(
                "at most 65535 strategies, jurisdictions and perspectives are supported"
                    .to_string(),
            ));
        }

        if self.base_strategy_id().is_none() {
            return Err(ConfigError::UnknownBaseStrategy(self.base_strategy.clone()));
        }

        Ok(())
    }

    /// Position of `base_strategy` in the strategy list
    #[must_use]
    pub fn base_strategy_id(&self) -> Option<StrategyId> {
        self.strategies
            .iter()
            .position(|s| *s == self.base_strategy)
            .map(|i| StrategyId(i as u16))
    }

    #[must_use]
    pub fn sampling_mode(&self) -> SamplingMode {
        if self.correlated_psa {
            SamplingMode::Correlated
        } else {
            SamplingMode::Independent
        }
    }
}

fn unique_names(list: &'static str, names: &[String]) -> Result<(), ConfigError> {
    if names.is_empty() {
        return Err(ConfigError::EmptyList(list));
    }
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::DuplicateName {
                list,
                name: name.clone(),
            });
        }
    }
    Ok(())
}
