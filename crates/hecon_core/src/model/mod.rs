mod correlation;
mod ids;
mod parameters;
mod results;
mod samples;

pub use correlation::CorrelationBlock;
pub use ids::{JurisdictionId, PerspectiveId, StrategyId};
pub use parameters::{DistributionFamily, ParameterSpec};
pub use results::{OutcomeRow, OutcomeSlice, SimulationResult};
pub use samples::{ParameterDraw, ParameterSamples};
