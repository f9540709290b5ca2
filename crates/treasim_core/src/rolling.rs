//! Walk-forward rebalancing over a historical return series.
//!
//! Weights fitted on window *k* are held through window *k+1*; a window's own
//! observations never touch its own realized return, which keeps the
//! sequence free of look-ahead bias. Window processing order is fixed: the
//! rolled value is a running accumulator.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{
    BucketMap, OptimizationWindow, OptimizerRun, ReturnHistory, TargetWeights, WEIGHT_TOLERANCE,
    WindowOutcome,
};
use crate::optimization::{estimate_window, max_sharpe};

/// Configuration of a walk-forward optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Observations per window; windows do not overlap.
    pub window_len: usize,
    /// Per-bucket upper weight bounds for the solve.
    pub bounds: BucketMap<f64>,
    /// Risk-free rate per period, at the frequency of the history.
    pub risk_free_rate: f64,
    /// Starting portfolio value for the roll-forward.
    pub initial_value: f64,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window_len: 13,
            bounds: BucketMap::new(0.70, 0.15, 0.15),
            risk_free_rate: 0.0,
            initial_value: 2000.0,
        }
    }
}

impl RollingConfig {
    /// Reject invalid configurations before any optimization starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_len < 2 {
            return Err(ConfigError::WindowTooShort(self.window_len));
        }
        if !self.initial_value.is_finite() || self.initial_value <= 0.0 {
            return Err(ConfigError::InvalidCorpus(self.initial_value));
        }
        if !self.risk_free_rate.is_finite() || self.risk_free_rate <= -1.0 {
            return Err(ConfigError::InvalidRate {
                name: "risk-free rate",
                value: self.risk_free_rate,
            });
        }
        for (bucket, &value) in self.bounds.iter() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidBound { bucket, value });
            }
        }
        let bound_sum = self.bounds.total();
        if bound_sum < 1.0 - WEIGHT_TOLERANCE {
            return Err(ConfigError::InfeasibleBounds { bound_sum });
        }
        Ok(())
    }
}

/// Slide non-overlapping windows across the history, fitting weights on each
/// window and holding them through the next.
///
/// Stops when fewer than one full window remains after the current one.
/// Windows whose constraint set has no solution are carried in the output as
/// explicit skips with the portfolio value unchanged; the caller decides
/// whether to halt on them.
pub fn optimize_rolling(
    history: &ReturnHistory,
    config: &RollingConfig,
) -> Result<OptimizerRun, ConfigError> {
    config.validate()?;

    let window = config.window_len;
    let mut windows = Vec::new();
    let mut value = config.initial_value;

    let mut start = 0;
    while start + 2 * window <= history.len() {
        let fit = &history.observations()[start..start + window];
        let estimate = estimate_window(fit);

        let outcome = match max_sharpe(&estimate, config.risk_free_rate, &config.bounds) {
            Ok(weights) => {
                let hold = &history.observations()[start + window..start + 2 * window];
                let realized_return = compound_return(&weights, hold);
                value *= 1.0 + realized_return;
                WindowOutcome::Allocated {
                    weights,
                    realized_return,
                }
            }
            Err(err) => WindowOutcome::Infeasible { reason: err.into() },
        };

        windows.push(OptimizationWindow {
            fit_start: start,
            fit_end: start + window,
            start_date: history.dates()[start],
            end_date: history.dates()[start + 2 * window - 1],
            outcome,
            portfolio_value: value,
        });

        start += window;
    }

    Ok(OptimizerRun {
        windows,
        final_value: value,
    })
}

/// Compounded weighted return over a holding window.
fn compound_return(weights: &TargetWeights, observations: &[BucketMap<f64>]) -> f64 {
    observations
        .iter()
        .map(|obs| 1.0 + weights.fractions().dot(obs))
        .product::<f64>()
        - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_return_single_period() {
        let weights = TargetWeights::new(BucketMap::new(0.5, 0.25, 0.25)).unwrap();
        let observations = [BucketMap::new(0.02, 0.04, -0.02)];

        // 0.5 * 0.02 + 0.25 * 0.04 + 0.25 * -0.02 = 0.015
        assert!((compound_return(&weights, &observations) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_compound_return_compounds() {
        let weights = TargetWeights::new(BucketMap::new(1.0, 0.0, 0.0)).unwrap();
        let observations = [
            BucketMap::new(0.10, 0.0, 0.0),
            BucketMap::new(0.10, 0.0, 0.0),
        ];

        assert!((compound_return(&weights, &observations) - 0.21).abs() < 1e-12);
    }

    #[test]
    fn test_short_window_rejected() {
        let config = RollingConfig {
            window_len: 1,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::WindowTooShort(1));
    }

    #[test]
    fn test_infeasible_bounds_rejected_up_front() {
        let config = RollingConfig {
            bounds: BucketMap::new(0.3, 0.3, 0.3),
            ..Default::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::InfeasibleBounds { .. }
        ));
    }
}
