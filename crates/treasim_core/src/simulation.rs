//! Monte Carlo path simulation over the bucket ladder.

use rand::SeedableRng;
use rand::distr::Distribution;
use rand::rngs::SmallRng;
use rand_distr::Normal;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::model::{Allocation, Bucket, BucketMap, MonteCarloResult, SimulationPath};
use crate::summary::summarize;

/// Derive the seed for one trial from the run seed and trial index.
///
/// SplitMix64 finalizer over the combined value. A pure function of
/// `(run_seed, index)`: sample streams do not depend on execution order or
/// worker count, and consecutive trials never share a stream.
fn trial_seed(run_seed: u64, index: u64) -> u64 {
    let mut z = run_seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Maximum peak-to-trough relative decline over a value path.
#[must_use]
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            // A value below zero caps at a full 100% decline.
            worst = worst.max(((peak - value) / peak).min(1.0));
        }
    }
    worst
}

/// Simulate one multi-period trajectory.
///
/// Buckets are grown independently each period; the blended period return is
/// weighted by each bucket's share of the post-growth total. With rebalancing
/// enabled, bucket values reset to the target split before the next period.
pub fn simulate_path(
    config: &SimulationConfig,
    initial: &Allocation,
    samplers: &BucketMap<Normal<f64>>,
    rng: &mut SmallRng,
) -> SimulationPath {
    let mut bucket_values = *initial.values();
    let mut values = Vec::with_capacity(config.horizon_years);
    let mut period_returns = Vec::with_capacity(config.horizon_years);

    for _ in 0..config.horizon_years {
        let draws = BucketMap::from_fn(|b| samplers[b].sample(rng));

        for b in Bucket::ALL {
            bucket_values[b] *= 1.0 + draws[b];
        }

        let total = bucket_values.total();
        let blended = if total > 0.0 {
            Bucket::ALL
                .iter()
                .map(|&b| draws[b] * bucket_values[b] / total)
                .sum()
        } else {
            0.0
        };

        values.push(total);
        period_returns.push(blended);

        if config.rebalance_annually {
            for b in Bucket::ALL {
                bucket_values[b] = config.target_weights.get(b) * total;
            }
        }
    }

    let max_drawdown = max_drawdown(&values);
    let deflator = (1.0 + config.inflation_rate).powi(config.horizon_years as i32);
    let real_terminal_value = values.last().copied().unwrap_or_else(|| initial.total()) / deflator;

    SimulationPath {
        values,
        period_returns,
        max_drawdown,
        real_terminal_value,
    }
}

/// Run the full Monte Carlo aggregation: `n_simulations` independent trials
/// pooled into a [`MonteCarloResult`].
///
/// Validation happens before any sampling. Trials are embarrassingly
/// parallel; results are collected in trial order so the pooled arrays are
/// identical for any worker count.
pub fn monte_carlo_simulate(config: &SimulationConfig) -> Result<MonteCarloResult, ConfigError> {
    config.validate()?;

    let samplers = BucketMap {
        short_term: config.profiles.short_term.distribution(Bucket::ShortTerm)?,
        medium_term: config.profiles.medium_term.distribution(Bucket::MediumTerm)?,
        long_term: config.profiles.long_term.distribution(Bucket::LongTerm)?,
    };
    let initial = Allocation::from_weights(config.initial_corpus, &config.target_weights)?;

    let paths = run_trials(config, &initial, &samplers);

    let mut terminal_values = Vec::with_capacity(paths.len());
    let mut period_returns = Vec::with_capacity(paths.len() * config.horizon_years);
    let mut max_drawdowns = Vec::with_capacity(paths.len());
    for path in &paths {
        terminal_values.push(path.real_terminal_value);
        period_returns.extend_from_slice(&path.period_returns);
        max_drawdowns.push(path.max_drawdown);
    }

    let summary = summarize(config, &terminal_values, &period_returns, &max_drawdowns);

    Ok(MonteCarloResult {
        terminal_values,
        period_returns,
        max_drawdowns,
        summary,
    })
}

#[cfg(feature = "parallel")]
fn run_trials(
    config: &SimulationConfig,
    initial: &Allocation,
    samplers: &BucketMap<Normal<f64>>,
) -> Vec<SimulationPath> {
    (0..config.n_simulations)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(trial_seed(config.seed, i as u64));
            simulate_path(config, initial, samplers, &mut rng)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_trials(
    config: &SimulationConfig,
    initial: &Allocation,
    samplers: &BucketMap<Normal<f64>>,
) -> Vec<SimulationPath> {
    (0..config.n_simulations)
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(trial_seed(config.seed, i as u64));
            simulate_path(config, initial, samplers, &mut rng)
        })
        .collect()
}
