//! Simulation run configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{BucketMap, BucketProfile, TargetWeights};

/// Everything a Monte Carlo run needs, supplied up front by the caller.
///
/// Fields omitted from a serialized scenario fall back to the reference
/// defaults. Run `validate` before use; deserialization does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Starting portfolio total.
    pub initial_corpus: f64,
    /// Rebalancing target, and the initial split of the corpus.
    pub target_weights: TargetWeights,
    /// Per-bucket return distributions.
    pub profiles: BucketMap<BucketProfile>,
    /// Horizon in whole periods (years).
    pub horizon_years: usize,
    pub inflation_rate: f64,
    pub risk_free_rate: f64,
    /// Nominal annual return target used for the probability metric.
    pub target_return: f64,
    /// Reset bucket values to the target weights at each period boundary;
    /// otherwise allocations drift.
    pub rebalance_annually: bool,
    pub n_simulations: usize,
    /// Run seed; trial sub-streams are derived from this deterministically.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_corpus: 2000.0,
            target_weights: TargetWeights::BASELINE_SPLIT,
            profiles: BucketMap::TREASURY_BASELINE,
            horizon_years: 10,
            inflation_rate: 0.05,
            risk_free_rate: 0.06,
            target_return: 0.072,
            rebalance_annually: true,
            n_simulations: 1000,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Reject invalid configurations before any sampling begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_years < 1 {
            return Err(ConfigError::InvalidHorizon(self.horizon_years));
        }
        if self.n_simulations < 1 {
            return Err(ConfigError::InvalidSimulationCount(self.n_simulations));
        }
        if !self.initial_corpus.is_finite() || self.initial_corpus <= 0.0 {
            return Err(ConfigError::InvalidCorpus(self.initial_corpus));
        }
        for (name, value) in [
            ("inflation rate", self.inflation_rate),
            ("risk-free rate", self.risk_free_rate),
            ("target return", self.target_return),
        ] {
            if !value.is_finite() || value <= -1.0 {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        self.target_weights.validate()?;
        for (bucket, profile) in self.profiles.iter() {
            profile.distribution(bucket)?;
        }
        Ok(())
    }
}
