//! Parameter table rows and distribution families

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::distributions::Marginal;
use crate::error::{ParameterError, UnsupportedDistribution};

/// Supported marginal distribution families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionFamily {
    Normal,
    Beta,
    Gamma,
    /// `mean` and `std` are the moments of the underlying normal (log space)
    #[serde(alias = "lognorm")]
    LogNormal,
}

impl DistributionFamily {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DistributionFamily::Normal => "normal",
            DistributionFamily::Beta => "beta",
            DistributionFamily::Gamma => "gamma",
            DistributionFamily::LogNormal => "lognormal",
        }
    }
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionFamily {
    type Err = UnsupportedDistribution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "norm" | "gaussian" => Ok(DistributionFamily::Normal),
            "beta" => Ok(DistributionFamily::Beta),
            "gamma" => Ok(DistributionFamily::Gamma),
            "lognormal" | "lognorm" | "log-normal" => Ok(DistributionFamily::LogNormal),
            _ => Err(UnsupportedDistribution {
                family: s.trim().to_string(),
            }),
        }
    }
}

/// One row of the parameter table: a named uncertain input and its first two moments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub distribution: DistributionFamily,
    pub mean: f64,
    pub std: f64,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, distribution: DistributionFamily, mean: f64, std: f64) -> Self {
        Self {
            name: name.into(),
            distribution,
            mean,
            std,
        }
    }

    /// Parse the family from free text, as found in a parameter table
    pub fn parse(
        name: impl Into<String>,
        distribution: &str,
        mean: f64,
        std: f64,
    ) -> Result<Self, ParameterError> {
        let name = name.into();
        match distribution.parse() {
            Ok(family) => Ok(Self::new(name, family, mean, std)),
            Err(source) => Err(ParameterError::Unsupported {
                parameter: name,
                source,
            }),
        }
    }

    /// Native distribution parameters matching this row's moments
    pub fn marginal(&self) -> Result<Marginal, ParameterError> {
        Marginal::from_moments(&self.name, self.distribution, self.mean, self.std)
    }
}
