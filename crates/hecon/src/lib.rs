//! Command-line front end for the hecon PSA engine
//!
//! Loads the run configuration, parameter table and correlation blocks, runs
//! [`hecon_core::run_psa`] and writes the CSV/JSON artifacts.

// ============================================================================
// Modules
// ============================================================================

pub mod data;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod util;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use logging::init_logging;
pub use pipeline::{InputPaths, Inputs, Overrides, load_inputs};
