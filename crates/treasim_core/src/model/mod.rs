mod allocation;
mod bucket;
mod market;
mod results;

pub use allocation::{Allocation, TargetWeights, WEIGHT_TOLERANCE};
pub use bucket::{Bucket, BucketMap};
pub use market::{BucketProfile, ReturnHistory};
pub use results::{
    MonteCarloResult, OptimizationWindow, OptimizerRun, RiskSummary, ScenarioOutcome,
    SimulationPath, StressReport, WindowOutcome,
};
