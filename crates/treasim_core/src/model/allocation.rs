//! Monetary allocations and target weight vectors.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Bucket, BucketMap};

/// Tolerance for the weights-sum-to-one invariant.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Money assigned to each bucket.
///
/// Invariant: every value is non-negative and finite; the total is the
/// portfolio's current corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation {
    values: BucketMap<f64>,
}

impl Allocation {
    pub fn new(values: BucketMap<f64>) -> Result<Self, ConfigError> {
        for (bucket, &value) in values.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidBucketValue { bucket, value });
            }
        }
        Ok(Self { values })
    }

    /// Split a corpus across buckets by target weight.
    pub fn from_weights(corpus: f64, weights: &TargetWeights) -> Result<Self, ConfigError> {
        if !corpus.is_finite() || corpus <= 0.0 {
            return Err(ConfigError::InvalidCorpus(corpus));
        }
        Ok(Self {
            values: weights.fractions.map(|_, &w| w * corpus),
        })
    }

    #[must_use]
    pub fn values(&self) -> &BucketMap<f64> {
        &self.values
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.total()
    }

    /// The weight each bucket represents of the current total.
    pub fn weights(&self) -> Result<TargetWeights, ConfigError> {
        let total = self.total();
        if total <= 0.0 {
            return Err(ConfigError::InvalidCorpus(total));
        }
        TargetWeights::new(self.values.map(|_, &v| v / total))
    }
}

/// Fractional bucket weights summing to one.
///
/// Invariant: each fraction is in [0, 1] and the sum is within
/// `WEIGHT_TOLERANCE` of 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetWeights {
    pub(crate) fractions: BucketMap<f64>,
}

impl TargetWeights {
    /// The 70/15/15 split from the reference scenario.
    pub const BASELINE_SPLIT: Self = Self {
        fractions: BucketMap::new(0.70, 0.15, 0.15),
    };

    pub fn new(fractions: BucketMap<f64>) -> Result<Self, ConfigError> {
        let weights = Self { fractions };
        weights.validate()?;
        Ok(weights)
    }

    /// Re-check the invariant, for weight vectors that arrived through
    /// deserialization rather than `new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (bucket, &value) in self.fractions.iter() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidWeight { bucket, value });
            }
        }
        let sum = self.fractions.total();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightSumMismatch { sum });
        }
        Ok(())
    }

    #[must_use]
    pub fn fractions(&self) -> &BucketMap<f64> {
        &self.fractions
    }

    #[must_use]
    pub fn get(&self, bucket: Bucket) -> f64 {
        self.fractions[bucket]
    }
}
