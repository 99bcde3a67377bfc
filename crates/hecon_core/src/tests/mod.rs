//! Scenario tests for the PSA engine
//!
//! Tests are organized by topic:
//! - `sampling` - Marginal fidelity and correlation reproduction at scale
//! - `decision` - Property tests over random outcome tables
//! - `pipeline` - End-to-end runs: reproducibility, partial failures, skipped blocks

mod decision;
mod sampling;
