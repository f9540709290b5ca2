//! Constrained maximum-Sharpe weight solve over the closed bucket set.
//!
//! The unconstrained tangency portfolio has a closed form,
//! `w ∝ Σ⁻¹(μ − r_f·1)`, computed here with the exact 3x3 inverse. When that
//! solution violates the box constraints, the solve falls back to projected
//! gradient ascent on the Sharpe objective, projecting each step onto
//! `{ w : 0 <= w_i <= ub_i, Σ w_i = 1 }`.

use crate::error::SolveError;
use crate::model::{Bucket, BucketMap, TargetWeights, WEIGHT_TOLERANCE};
use crate::optimization::estimate::{CovMatrix, WindowEstimate};

const N: usize = Bucket::COUNT;

/// Ridge added to the covariance diagonal before inversion.
pub const COVARIANCE_RIDGE: f64 = 1e-10;

const GRADIENT_ITERATIONS: usize = 200;
const GRADIENT_STEP: f64 = 0.01;
const PROJECTION_ITERATIONS: usize = 64;

/// Solve the constrained maximum-Sharpe allocation.
///
/// `bounds` are per-bucket upper weight limits; the lower bound is 0 for
/// every bucket. A bound set summing below 1 has no feasible solution and is
/// reported as [`SolveError::InfeasibleBounds`].
pub fn max_sharpe(
    estimate: &WindowEstimate,
    risk_free_rate: f64,
    bounds: &BucketMap<f64>,
) -> Result<TargetWeights, SolveError> {
    let bound_sum = bounds.total();
    if bound_sum < 1.0 - WEIGHT_TOLERANCE {
        return Err(SolveError::InfeasibleBounds { bound_sum });
    }

    let sigma = regularized(&estimate.covariance);
    let sigma_inv = invert3(&sigma).ok_or(SolveError::SingularCovariance)?;
    let mu = estimate.mean_returns.to_array();
    let ub = bounds.to_array();

    let excess = [
        mu[0] - risk_free_rate,
        mu[1] - risk_free_rate,
        mu[2] - risk_free_rate,
    ];
    let raw = mat_vec(&sigma_inv, &excess);
    let normalizer: f64 = raw.iter().sum();

    let candidate = if normalizer.abs() > 1e-12 {
        [
            raw[0] / normalizer,
            raw[1] / normalizer,
            raw[2] / normalizer,
        ]
    } else {
        // Excess returns wash out of the tangency formula; fall back to the
        // minimum-variance point.
        min_variance(&sigma_inv)?
    };

    let weights = if within_bounds(&candidate, &ub) {
        candidate
    } else {
        gradient_max_sharpe(&sigma, &mu, risk_free_rate, &ub, candidate)
    };

    if weights.iter().any(|w| !w.is_finite()) {
        return Err(SolveError::NonFinite);
    }
    TargetWeights::new(BucketMap::new(weights[0], weights[1], weights[2]))
        .map_err(|_| SolveError::NonFinite)
}

/// Unconstrained minimum-variance weights, `Σ⁻¹·1 / (1ᵀΣ⁻¹·1)`.
fn min_variance(sigma_inv: &CovMatrix) -> Result<[f64; N], SolveError> {
    let ones = [1.0; N];
    let raw = mat_vec(sigma_inv, &ones);
    let normalizer: f64 = raw.iter().sum();
    if normalizer.abs() < 1e-300 {
        return Err(SolveError::SingularCovariance);
    }
    Ok([
        raw[0] / normalizer,
        raw[1] / normalizer,
        raw[2] / normalizer,
    ])
}

/// Projected gradient ascent on the Sharpe objective, keeping the best
/// feasible iterate.
fn gradient_max_sharpe(
    sigma: &CovMatrix,
    mu: &[f64; N],
    risk_free_rate: f64,
    bounds: &[f64; N],
    start: [f64; N],
) -> [f64; N] {
    let mut w = start;
    project_onto_bounds(&mut w, bounds);

    let mut best = w;
    let mut best_sharpe = sharpe(&w, mu, risk_free_rate, sigma);

    for _ in 0..GRADIENT_ITERATIONS {
        let sigma_w = mat_vec(sigma, &w);
        let risk = dot(&w, &sigma_w).max(0.0).sqrt();
        if risk <= 0.0 {
            break;
        }
        let excess = dot(&w, mu) - risk_free_rate;
        let risk_cubed = risk * risk * risk;

        // dS/dw_i = (mu_i - rf)/sigma_p - excess * (Sigma w)_i / sigma_p^3
        let mut next = w;
        for i in 0..N {
            let grad = (mu[i] - risk_free_rate) / risk - excess * sigma_w[i] / risk_cubed;
            next[i] += GRADIENT_STEP * grad;
        }
        project_onto_bounds(&mut next, bounds);
        w = next;

        let s = sharpe(&w, mu, risk_free_rate, sigma);
        if s > best_sharpe {
            best_sharpe = s;
            best = w;
        }
    }

    best
}

fn sharpe(w: &[f64; N], mu: &[f64; N], risk_free_rate: f64, sigma: &CovMatrix) -> f64 {
    let risk = dot(w, &mat_vec(sigma, w)).max(0.0).sqrt();
    if risk > 0.0 {
        (dot(w, mu) - risk_free_rate) / risk
    } else {
        f64::NEG_INFINITY
    }
}

/// Project onto `{ w : 0 <= w_i <= ub_i, Σ w_i = 1 }` by clamping and
/// redistributing the residual across coordinates that can still move.
fn project_onto_bounds(w: &mut [f64; N], bounds: &[f64; N]) {
    for i in 0..N {
        w[i] = w[i].clamp(0.0, bounds[i]);
    }
    for _ in 0..PROJECTION_ITERATIONS {
        let deficit = 1.0 - w.iter().sum::<f64>();
        if deficit.abs() <= 1e-12 {
            break;
        }
        let movable = (0..N)
            .filter(|&i| {
                if deficit > 0.0 {
                    w[i] < bounds[i]
                } else {
                    w[i] > 0.0
                }
            })
            .count();
        if movable == 0 {
            break;
        }
        let share = deficit / movable as f64;
        for i in 0..N {
            let can_move = if deficit > 0.0 {
                w[i] < bounds[i]
            } else {
                w[i] > 0.0
            };
            if can_move {
                w[i] = (w[i] + share).clamp(0.0, bounds[i]);
            }
        }
    }
}

fn within_bounds(w: &[f64; N], bounds: &[f64; N]) -> bool {
    w.iter()
        .zip(bounds.iter())
        .all(|(&wi, &ub)| wi >= -WEIGHT_TOLERANCE && wi <= ub + WEIGHT_TOLERANCE)
}

fn regularized(covariance: &CovMatrix) -> CovMatrix {
    let mut sigma = *covariance;
    for (i, row) in sigma.iter_mut().enumerate() {
        row[i] += COVARIANCE_RIDGE;
    }
    sigma
}

fn dot(a: &[f64; N], b: &[f64; N]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn mat_vec(m: &CovMatrix, v: &[f64; N]) -> [f64; N] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Exact 3x3 inverse by cofactor expansion. `None` when the determinant is
/// effectively zero or the entries are non-finite.
fn invert3(m: &CovMatrix) -> Option<CovMatrix> {
    let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
    let c01 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
    let c02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];

    let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02;
    if !det.is_finite() || det.abs() < 1e-300 {
        return None;
    }

    let inv = [
        [
            c00 / det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
        ],
        [
            c01 / det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
        ],
        [
            c02 / det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
        ],
    ];
    if inv.iter().flatten().any(|v| !v.is_finite()) {
        return None;
    }
    Some(inv)
}
