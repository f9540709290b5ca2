//! Window statistics: per-bucket expected returns and sample covariance.

use crate::model::{Bucket, BucketMap};

/// Covariance matrix over the closed bucket set, in canonical bucket order.
pub type CovMatrix = [[f64; Bucket::COUNT]; Bucket::COUNT];

/// Moment estimates fitted on one window of observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowEstimate {
    /// Mean per-period return per bucket.
    pub mean_returns: BucketMap<f64>,
    /// Sample covariance (n-1 denominator) of per-period bucket returns.
    pub covariance: CovMatrix,
}

/// Estimate moments from a window of at least two observations.
#[must_use]
pub fn estimate_window(observations: &[BucketMap<f64>]) -> WindowEstimate {
    let n = observations.len() as f64;
    let mean_returns = BucketMap::from_fn(|b| {
        observations.iter().map(|obs| obs[b]).sum::<f64>() / n
    });

    let mut covariance = [[0.0; Bucket::COUNT]; Bucket::COUNT];
    for (i, &bi) in Bucket::ALL.iter().enumerate() {
        for (j, &bj) in Bucket::ALL.iter().enumerate() {
            covariance[i][j] = observations
                .iter()
                .map(|obs| (obs[bi] - mean_returns[bi]) * (obs[bj] - mean_returns[bj]))
                .sum::<f64>()
                / (n - 1.0);
        }
    }

    WindowEstimate {
        mean_returns,
        covariance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_constant_series() {
        let observations = vec![BucketMap::new(0.01, 0.02, 0.03); 4];
        let estimate = estimate_window(&observations);

        assert!((estimate.mean_returns[Bucket::ShortTerm] - 0.01).abs() < 1e-12);
        assert!((estimate.mean_returns[Bucket::LongTerm] - 0.03).abs() < 1e-12);
        // No variation, so every covariance entry is zero.
        for row in estimate.covariance {
            for entry in row {
                assert!(entry.abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_sample_covariance_two_points() {
        let observations = vec![
            BucketMap::new(0.00, 0.00, 0.00),
            BucketMap::new(0.02, 0.04, -0.02),
        ];
        let estimate = estimate_window(&observations);

        // Two points, n-1 = 1: cov(x, y) = (x0-mx)(y0-my) + (x1-mx)(y1-my).
        assert!((estimate.covariance[0][0] - 0.0002).abs() < 1e-12);
        assert!((estimate.covariance[0][1] - 0.0004).abs() < 1e-12);
        assert!((estimate.covariance[0][2] + 0.0002).abs() < 1e-12);
        assert!((estimate.covariance[1][2] + 0.0004).abs() < 1e-12);
    }

    #[test]
    fn test_covariance_is_symmetric() {
        let observations = vec![
            BucketMap::new(0.01, -0.02, 0.05),
            BucketMap::new(-0.03, 0.01, 0.02),
            BucketMap::new(0.02, 0.03, -0.04),
        ];
        let estimate = estimate_window(&observations);

        for i in 0..Bucket::COUNT {
            for j in 0..Bucket::COUNT {
                assert!((estimate.covariance[i][j] - estimate.covariance[j][i]).abs() < 1e-15);
            }
        }
    }
}
