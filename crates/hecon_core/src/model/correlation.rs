use serde::{Deserialize, Serialize};

/// A named group of parameters sampled jointly through a correlation matrix.
///
/// `corr` is indexed in the order of `params`. Blocks are validated lazily by
/// the sampler: a block that cannot be used is skipped with a warning rather
/// than aborting the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationBlock {
    pub name: String,
    #[serde(alias = "parameters")]
    pub params: Vec<String>,
    #[serde(alias = "matrix")]
    pub corr: Vec<Vec<f64>>,
}

impl CorrelationBlock {
    pub fn new(name: impl Into<String>, params: Vec<String>, corr: Vec<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            params,
            corr,
        }
    }

    /// Two-parameter block with a single correlation coefficient
    pub fn pair(name: impl Into<String>, first: &str, second: &str, rho: f64) -> Self {
        Self::new(
            name,
            vec![first.to_string(), second.to_string()],
            vec![vec![1.0, rho], vec![rho, 1.0]],
        )
    }
}
