//! Distribution parameterization
//!
//! Converts a parameter's `(mean, std, family)` into native distribution
//! parameters by the method of moments, draws variates with `rand_distr`, and
//! evaluates inverse CDFs for the Gaussian copula.
//!
//! LogNormal inputs follow the log-space convention: `mean` and `std` are the
//! moments of the underlying normal, so `mu = mean` (scale `exp(mean)`) and
//! `sigma = std`.

use rand::Rng;
use rand::distr::Distribution;
use statrs::distribution::{self as sd, ContinuousCDF};

use crate::error::ParameterError;
use crate::model::DistributionFamily;

/// Probabilities are clamped into `[P_EPSILON, 1 - P_EPSILON]` before inversion
/// so unbounded marginals never produce infinities.
const P_EPSILON: f64 = 1e-12;

/// Bisection steps for the Gamma inverse CDF
const MAX_BISECTION_STEPS: usize = 200;

/// Native parameters of a marginal distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marginal {
    Normal { mean: f64, std: f64 },
    Beta { alpha: f64, beta: f64 },
    Gamma { shape: f64, scale: f64 },
    /// `mu`/`sigma` of the underlying normal; scale is `exp(mu)`
    LogNormal { mu: f64, sigma: f64 },
}

/// The native parameters were rejected by the sampling or CDF backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidMarginal(pub Marginal);

impl Marginal {
    /// Method-of-moments parameterization.
    ///
    /// - Beta: `k = mean(1-mean)/var - 1`, `alpha = mean k`, `beta = (1-mean) k`
    /// - Gamma: `shape = mean^2/var`, `scale = var/mean`
    /// - LogNormal: log-space passthrough
    /// - Normal: passthrough
    pub fn from_moments(
        parameter: &str,
        family: DistributionFamily,
        mean: f64,
        std: f64,
    ) -> Result<Self, ParameterError> {
        if !mean.is_finite() || !std.is_finite() {
            return Err(ParameterError::NonFinite {
                parameter: parameter.to_string(),
                mean,
                std,
            });
        }
        if std <= 0.0 {
            return Err(ParameterError::NonPositiveStd {
                parameter: parameter.to_string(),
                std,
            });
        }

        let variance = std * std;
        let marginal = match family {
            DistributionFamily::Normal => Marginal::Normal { mean, std },
            DistributionFamily::Beta => {
                if mean <= 0.0 || mean >= 1.0 {
                    return Err(ParameterError::BetaMeanOutOfRange {
                        parameter: parameter.to_string(),
                        mean,
                    });
                }
                let spread = mean * (1.0 - mean);
                if variance >= spread {
                    return Err(ParameterError::BetaVarianceTooLarge {
                        parameter: parameter.to_string(),
                        mean,
                        std,
                    });
                }
                let k = spread / variance - 1.0;
                Marginal::Beta {
                    alpha: mean * k,
                    beta: (1.0 - mean) * k,
                }
            }
            DistributionFamily::Gamma => {
                if mean <= 0.0 {
                    return Err(ParameterError::NonPositiveGammaMean {
                        parameter: parameter.to_string(),
                        mean,
                    });
                }
                Marginal::Gamma {
                    shape: mean * mean / variance,
                    scale: variance / mean,
                }
            }
            DistributionFamily::LogNormal => Marginal::LogNormal {
                mu: mean,
                sigma: std,
            },
        };

        if marginal.is_valid() {
            Ok(marginal)
        } else {
            Err(ParameterError::Rejected {
                parameter: parameter.to_string(),
                marginal,
            })
        }
    }

    /// Native parameters are finite and strictly positive where required
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let positive = |x: f64| x.is_finite() && x > 0.0;
        match *self {
            Marginal::Normal { mean, std } => mean.is_finite() && positive(std),
            Marginal::Beta { alpha, beta } => positive(alpha) && positive(beta),
            Marginal::Gamma { shape, scale } => positive(shape) && positive(scale),
            Marginal::LogNormal { mu, sigma } => mu.is_finite() && positive(sigma),
        }
    }

    /// Mean on the natural (sampled) scale
    #[must_use]
    pub fn mean(&self) -> f64 {
        match *self {
            Marginal::Normal { mean, .. } => mean,
            Marginal::Beta { alpha, beta } => alpha / (alpha + beta),
            Marginal::Gamma { shape, scale } => shape * scale,
            Marginal::LogNormal { mu, sigma } => (mu + sigma * sigma / 2.0).exp(),
        }
    }

    /// Variance on the natural (sampled) scale
    #[must_use]
    pub fn variance(&self) -> f64 {
        match *self {
            Marginal::Normal { std, .. } => std * std,
            Marginal::Beta { alpha, beta } => {
                let total = alpha + beta;
                alpha * beta / (total * total * (total + 1.0))
            }
            Marginal::Gamma { shape, scale } => shape * scale * scale,
            Marginal::LogNormal { mu, sigma } => {
                let s2 = sigma * sigma;
                (s2.exp() - 1.0) * (2.0 * mu + s2).exp()
            }
        }
    }

    /// Draw `n` independent variates
    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<f64>, InvalidMarginal> {
        match *self {
            Marginal::Normal { mean, std } => {
                let d = rand_distr::Normal::new(mean, std).map_err(|_| InvalidMarginal(*self))?;
                Ok(draw(&d, rng, n))
            }
            Marginal::Beta { alpha, beta } => {
                let d = rand_distr::Beta::new(alpha, beta).map_err(|_| InvalidMarginal(*self))?;
                Ok(draw(&d, rng, n))
            }
            Marginal::Gamma { shape, scale } => {
                let d =
                    rand_distr::Gamma::new(shape, scale).map_err(|_| InvalidMarginal(*self))?;
                Ok(draw(&d, rng, n))
            }
            Marginal::LogNormal { mu, sigma } => {
                let d =
                    rand_distr::LogNormal::new(mu, sigma).map_err(|_| InvalidMarginal(*self))?;
                Ok(draw(&d, rng, n))
            }
        }
    }

    /// Inverse-CDF evaluator for this marginal
    pub fn quantile(&self) -> Result<Quantile, InvalidMarginal> {
        match *self {
            Marginal::Normal { mean, std } => sd::Normal::new(mean, std)
                .map(Quantile::Normal)
                .map_err(|_| InvalidMarginal(*self)),
            Marginal::LogNormal { mu, sigma } => sd::LogNormal::new(mu, sigma)
                .map(Quantile::LogNormal)
                .map_err(|_| InvalidMarginal(*self)),
            Marginal::Beta { alpha, beta } => sd::Beta::new(alpha, beta)
                .map(Quantile::Beta)
                .map_err(|_| InvalidMarginal(*self)),
            Marginal::Gamma { shape, scale } => sd::Gamma::new(shape, 1.0 / scale)
                .map(|dist| Quantile::Gamma {
                    dist,
                    mean: shape * scale,
                })
                .map_err(|_| InvalidMarginal(*self)),
        }
    }
}

fn draw<D: Distribution<f64>, R: Rng + ?Sized>(dist: &D, rng: &mut R, n: usize) -> Vec<f64> {
    (0..n).map(|_| dist.sample(rng)).collect()
}

/// Inverse CDF of a marginal, used to map copula uniforms onto the native scale
#[derive(Debug, Clone)]
pub enum Quantile {
    Normal(sd::Normal),
    LogNormal(sd::LogNormal),
    Beta(sd::Beta),
    /// Gamma is inverted by bracketed bisection over `cdf`
    Gamma { dist: sd::Gamma, mean: f64 },
}

impl Quantile {
    /// Value `x` with `P(X <= x) = p`
    #[must_use]
    pub fn inverse_cdf(&self, p: f64) -> f64 {
        let p = p.clamp(P_EPSILON, 1.0 - P_EPSILON);
        match self {
            Quantile::Normal(dist) => dist.inverse_cdf(p),
            Quantile::LogNormal(dist) => dist.inverse_cdf(p),
            Quantile::Beta(dist) => dist.inverse_cdf(p),
            Quantile::Gamma { dist, mean } => {
                let mut hi = (2.0 * mean).max(1.0);
                let mut doublings = 0;
                while dist.cdf(hi) < p && doublings < 1024 {
                    hi *= 2.0;
                    doublings += 1;
                }
                bisect(|x| dist.cdf(x), p, 0.0, hi)
            }
        }
    }

    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        match self {
            Quantile::Normal(dist) => dist.cdf(x),
            Quantile::LogNormal(dist) => dist.cdf(x),
            Quantile::Beta(dist) => dist.cdf(x),
            Quantile::Gamma { dist, .. } => dist.cdf(x),
        }
    }
}

/// Bisection on a monotone CDF over `[lo, hi]`
fn bisect(cdf: impl Fn(f64) -> f64, p: f64, mut lo: f64, mut hi: f64) -> f64 {
    for _ in 0..MAX_BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
