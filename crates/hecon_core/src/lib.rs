//! Health-economic probabilistic sensitivity analysis library
//!
//! This crate provides the Monte Carlo engine behind cost-effectiveness
//! comparisons of treatment strategies across jurisdictions and perspectives.
//! It supports:
//! - Method-of-moments parameterization of Normal, Beta, Gamma and LogNormal inputs
//! - Correlated sampling through a Gaussian copula (Cholesky per correlation block)
//! - Partial-failure tolerant evaluation of an outcome model per iteration
//! - Decision-uncertainty aggregates: CEAC, CEAF, expected regret, minimax regret,
//!   bootstrapped worst-case net benefit and EVPI
//!
//! # Example
//!
//! ```ignore
//! use hecon_core::{PsaConfig, run_psa};
//! use hecon_core::model::{DistributionFamily, ParameterSpec};
//!
//! let parameters = vec![
//!     ParameterSpec::new("p_remission", DistributionFamily::Beta, 0.6, 0.05),
//!     ParameterSpec::new("c_session", DistributionFamily::Gamma, 450.0, 60.0),
//! ];
//! let run = run_psa(&config, &parameters, &[], &model)?;
//! for report in &run.reports {
//!     println!("{} / {}: {:?}", report.jurisdiction, report.perspective, report.minimax);
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod correlation;
pub mod decision;
pub mod distributions;
pub mod error;
pub mod outcome;
pub mod psa;
pub mod sampling;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{PsaConfig, TieBreak};
pub use decision::DecisionReport;
pub use error::{ConfigError, ParameterError, PsaError};
pub use outcome::{LinearOutcomeModel, Outcome, OutcomeModel, Scenario};
pub use psa::{PsaRun, RunSeeds, run_psa, sample_only, validate_inputs};
pub use sampling::SamplingMode;
