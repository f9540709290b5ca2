//! Per-bucket return characteristics and historical return series.

use jiff::civil::Date;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Bucket, BucketMap};

/// Expected per-period return and volatility for one bucket.
///
/// Volatility is a per-period (annual) standard deviation; draws are
/// independent per bucket per period with no cross-bucket correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketProfile {
    pub mean_return: f64,
    pub volatility: f64,
}

impl BucketProfile {
    /// Build the sampling distribution for this profile.
    ///
    /// The error carries the offending parameters so the caller can report
    /// which bucket was misconfigured.
    pub fn distribution(&self, bucket: Bucket) -> Result<Normal<f64>, ConfigError> {
        Normal::new(self.mean_return, self.volatility).map_err(|_| {
            ConfigError::InvalidDistribution {
                bucket,
                mean: self.mean_return,
                std_dev: self.volatility,
                reason: "volatility must be non-negative and finite",
            }
        })
    }
}

impl BucketMap<BucketProfile> {
    /// Baseline treasury ladder profiles from the reference scenario.
    pub const TREASURY_BASELINE: Self = Self {
        short_term: BucketProfile {
            mean_return: 0.06,
            volatility: 0.01,
        },
        medium_term: BucketProfile {
            mean_return: 0.07,
            volatility: 0.015,
        },
        long_term: BucketProfile {
            mean_return: 0.11,
            volatility: 0.05,
        },
    };
}

/// Chronologically ordered per-bucket return observations.
///
/// One observation per trading period, strictly ascending by date with no
/// gaps; filling gaps is the loader's responsibility, not the engine's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnHistory {
    dates: Vec<Date>,
    observations: Vec<BucketMap<f64>>,
}

impl ReturnHistory {
    pub fn new(dates: Vec<Date>, observations: Vec<BucketMap<f64>>) -> Result<Self, ConfigError> {
        if dates.len() != observations.len() {
            return Err(ConfigError::HistoryLengthMismatch {
                dates: dates.len(),
                observations: observations.len(),
            });
        }
        if let Some(index) = dates.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::UnsortedHistory { index: index + 1 });
        }
        Ok(Self {
            dates,
            observations,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn observations(&self) -> &[BucketMap<f64>] {
        &self.observations
    }
}
