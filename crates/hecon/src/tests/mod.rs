//! Integration tests for the hecon CLI pipeline
//!
//! - `pipeline` - Loading inputs from disk, writing artifacts, reproducibility
