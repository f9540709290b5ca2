//! Error types for the simulation and optimization engines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Bucket;

/// Errors raised by up-front configuration validation.
///
/// Every variant is detected before any sampling or optimization begins;
/// nothing here is raised mid-run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Horizon must be at least one period.
    InvalidHorizon(usize),
    /// At least one simulation trial is required.
    InvalidSimulationCount(usize),
    /// Corpus and portfolio values must be positive and finite.
    InvalidCorpus(f64),
    /// A configured rate is non-finite or below -100%.
    InvalidRate { name: &'static str, value: f64 },
    /// A weight fraction is outside [0, 1] or non-finite.
    InvalidWeight { bucket: Bucket, value: f64 },
    /// Weight fractions do not sum to 1 within tolerance.
    WeightSumMismatch { sum: f64 },
    /// An upper weight bound is outside [0, 1] or non-finite.
    InvalidBound { bucket: Bucket, value: f64 },
    /// The upper bounds sum to less than 1: no weight vector can satisfy them.
    InfeasibleBounds { bound_sum: f64 },
    /// The rolling window is too short to estimate a covariance matrix.
    WindowTooShort(usize),
    /// A bucket value is negative or non-finite.
    InvalidBucketValue { bucket: Bucket, value: f64 },
    /// Distribution parameters rejected by the sampler.
    InvalidDistribution {
        bucket: Bucket,
        mean: f64,
        std_dev: f64,
        reason: &'static str,
    },
    /// Return history arrays have mismatched lengths.
    HistoryLengthMismatch { dates: usize, observations: usize },
    /// Return history timestamps are not strictly ascending.
    UnsortedHistory { index: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidHorizon(h) => {
                write!(f, "horizon must be at least 1 period, got {h}")
            }
            ConfigError::InvalidSimulationCount(n) => {
                write!(f, "simulation count must be at least 1, got {n}")
            }
            ConfigError::InvalidCorpus(v) => {
                write!(f, "corpus must be positive and finite, got {v}")
            }
            ConfigError::InvalidRate { name, value } => {
                write!(f, "{name} must be finite and above -100%, got {value}")
            }
            ConfigError::InvalidWeight { bucket, value } => {
                write!(f, "weight for {bucket} must be in [0, 1], got {value}")
            }
            ConfigError::WeightSumMismatch { sum } => {
                write!(f, "weights must sum to 1, got {sum}")
            }
            ConfigError::InvalidBound { bucket, value } => {
                write!(f, "upper bound for {bucket} must be in [0, 1], got {value}")
            }
            ConfigError::InfeasibleBounds { bound_sum } => {
                write!(f, "upper bounds sum to {bound_sum}, below the required total of 1")
            }
            ConfigError::WindowTooShort(len) => {
                write!(
                    f,
                    "window length {len} is too short to estimate a covariance matrix (need >= 2)"
                )
            }
            ConfigError::InvalidBucketValue { bucket, value } => {
                write!(f, "value for {bucket} must be non-negative and finite, got {value}")
            }
            ConfigError::InvalidDistribution {
                bucket,
                mean,
                std_dev,
                reason,
            } => {
                write!(
                    f,
                    "invalid return distribution for {bucket} (mean={mean}, std_dev={std_dev}): {reason}"
                )
            }
            ConfigError::HistoryLengthMismatch {
                dates,
                observations,
            } => {
                write!(
                    f,
                    "return history has {dates} timestamps but {observations} observations"
                )
            }
            ConfigError::UnsortedHistory { index } => {
                write!(f, "return history timestamps are not ascending at index {index}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors from the constrained maximum-Sharpe solve.
///
/// In a rolling run these are not fatal: the offending window is carried in
/// the output sequence as an explicit skip rather than raised to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveError {
    /// The bound set admits no weight vector summing to 1.
    InfeasibleBounds { bound_sum: f64 },
    /// The window covariance matrix is singular even after regularization.
    SingularCovariance,
    /// The solve produced non-finite weights.
    NonFinite,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::InfeasibleBounds { bound_sum } => {
                write!(f, "bounds sum to {bound_sum}, below the required total of 1")
            }
            SolveError::SingularCovariance => {
                write!(f, "window covariance matrix is singular")
            }
            SolveError::NonFinite => write!(f, "solve produced non-finite weights"),
        }
    }
}

impl std::error::Error for SolveError {}

/// Why a rolling window was skipped, carried on the window record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    InfeasibleBounds,
    SingularCovariance,
    NonFiniteSolution,
}

impl From<SolveError> for SkipReason {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::InfeasibleBounds { .. } => SkipReason::InfeasibleBounds,
            SolveError::SingularCovariance => SkipReason::SingularCovariance,
            SolveError::NonFinite => SkipReason::NonFiniteSolution,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InfeasibleBounds => write!(f, "infeasible bounds"),
            SkipReason::SingularCovariance => write!(f, "singular covariance"),
            SkipReason::NonFiniteSolution => write!(f, "non-finite solution"),
        }
    }
}
