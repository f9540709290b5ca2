//! Treasury portfolio simulation and optimization engine
//!
//! This crate projects the future value of a fixed-income treasury portfolio
//! split across short-, medium-, and long-term buckets. It provides:
//! - A multi-year, multi-path Monte Carlo simulator with annual rebalancing,
//!   drawdown tracking, and inflation adjustment
//! - Pooled risk metrics per run (percentiles, CAGR, Sharpe ratio,
//!   probability of meeting a target return)
//! - A rolling-window optimizer that fits constrained maximum-Sharpe weights
//!   on each historical window and tests them out-of-sample on the next
//! - A stress evaluator applying discrete shocks to an allocation snapshot
//!
//! The engine is purely data-in/data-out: callers hand it in-memory
//! configuration and history and receive immutable result snapshots. Chart
//! rendering, file loading, and dashboards live outside this crate.
//!
//! ```ignore
//! use treasim_core::config::SimulationConfig;
//! use treasim_core::simulation::monte_carlo_simulate;
//!
//! let result = monte_carlo_simulate(&SimulationConfig::default())?;
//! println!("mean real terminal value: {:.2}", result.summary.mean_terminal_value);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod config;
pub mod error;
pub mod optimization;
pub mod rolling;
pub mod simulation;
pub mod stress;
pub mod summary;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::SimulationConfig;
pub use error::{ConfigError, SkipReason, SolveError};
pub use model::{
    Allocation, Bucket, BucketMap, BucketProfile, MonteCarloResult, OptimizationWindow,
    OptimizerRun, ReturnHistory, RiskSummary, SimulationPath, StressReport, TargetWeights,
};
pub use rolling::{RollingConfig, optimize_rolling};
pub use simulation::monte_carlo_simulate;
pub use stress::{ShockScenario, evaluate_scenarios, standard_catalogue};
