//! Index identifiers for the comparison axes of a PSA run
//!
//! Each axis has its own ID type so a strategy index can never be used to
//! look up a jurisdiction. The wrapped value is the position in the
//! corresponding configured list.

use serde::{Deserialize, Serialize};

/// Position of a strategy (treatment arm) in the configured strategy list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StrategyId(pub u16);

/// Position of a jurisdiction in the configured jurisdiction list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JurisdictionId(pub u16);

/// Position of a costing perspective in the configured perspective list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PerspectiveId(pub u16);

impl StrategyId {
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl JurisdictionId {
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl PerspectiveId {
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}
