//! Pooled risk statistics over a Monte Carlo run.

use crate::config::SimulationConfig;
use crate::model::RiskSummary;

/// Percentile by linear interpolation between order statistics.
///
/// `sorted` must be ascending and non-empty; `q` is a fraction in [0, 1].
#[must_use]
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Derive the [`RiskSummary`] from pooled trial outputs.
///
/// The Sharpe ratio uses the excess-return series pooled over every period
/// of every trial, with the population standard deviation; a zero-variance
/// series yields `None` rather than a numeric sentinel.
pub(crate) fn summarize(
    config: &SimulationConfig,
    terminal_values: &[f64],
    period_returns: &[f64],
    max_drawdowns: &[f64],
) -> RiskSummary {
    let horizon = config.horizon_years as f64;
    let mean_terminal_value = mean(terminal_values);
    let cagr = (mean_terminal_value / config.initial_corpus).powf(1.0 / horizon) - 1.0;

    let target_value = config.initial_corpus * (1.0 + config.target_return).powf(horizon)
        / (1.0 + config.inflation_rate).powf(horizon);
    let hits = terminal_values
        .iter()
        .filter(|&&v| v >= target_value)
        .count();
    let probability_above_target = hits as f64 / terminal_values.len() as f64;

    let excess: Vec<f64> = period_returns
        .iter()
        .map(|r| r - config.risk_free_rate)
        .collect();
    let excess_mean = mean(&excess);
    let excess_std = population_std(&excess, excess_mean);
    let sharpe_ratio = if excess_std > 0.0 {
        Some(excess_mean / excess_std)
    } else {
        None
    };

    let mut sorted = terminal_values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    RiskSummary {
        mean_terminal_value,
        cagr,
        percentile_5: percentile(&sorted, 0.05),
        percentile_95: percentile(&sorted, 0.95),
        sharpe_ratio,
        mean_max_drawdown: mean(max_drawdowns),
        target_value,
        probability_above_target,
        num_trials: terminal_values.len(),
    }
}
