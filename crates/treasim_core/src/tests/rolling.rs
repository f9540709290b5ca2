//! Tests for walk-forward optimization: windowing, look-ahead, skips

use jiff::ToSpan;
use jiff::civil::{Date, date};

use crate::error::SkipReason;
use crate::model::{Bucket, BucketMap, ReturnHistory, WindowOutcome};
use crate::optimization::{estimate_window, max_sharpe};
use crate::rolling::{RollingConfig, optimize_rolling};

/// Bi-weekly history starting 2025-01-03.
fn make_history(observations: Vec<BucketMap<f64>>) -> ReturnHistory {
    let mut dates: Vec<Date> = Vec::with_capacity(observations.len());
    let mut current = date(2025, 1, 3);
    for _ in 0..observations.len() {
        dates.push(current);
        current = current.checked_add(14.days()).unwrap();
    }
    ReturnHistory::new(dates, observations).unwrap()
}

/// A mildly varying history with independent per-bucket patterns, so window
/// covariance matrices stay well-conditioned.
fn varied_observations(len: usize) -> Vec<BucketMap<f64>> {
    (0..len)
        .map(|i| {
            let a = if i % 2 == 0 { 1.0 } else { -1.0 };
            let b = if i % 3 == 0 { 1.0 } else { -0.5 };
            let c = if i % 4 < 2 { 1.0 } else { -1.0 };
            BucketMap::new(0.002 + 0.0005 * a, 0.003 + 0.0008 * b, 0.004 + 0.003 * c)
        })
        .collect()
}

fn loose_config(window_len: usize) -> RollingConfig {
    RollingConfig {
        window_len,
        bounds: BucketMap::splat(1.0),
        risk_free_rate: 0.0,
        initial_value: 2000.0,
    }
}

#[test]
fn test_windows_partition_without_overlap() {
    let history = make_history(varied_observations(20));
    let run = optimize_rolling(&history, &loose_config(4)).unwrap();

    // Starts 0, 4, 8, 12; start 16 has no full window after it.
    assert_eq!(run.windows.len(), 4);
    for (k, window) in run.windows.iter().enumerate() {
        assert_eq!(window.fit_start, k * 4);
        assert_eq!(window.fit_end, k * 4 + 4);
        assert_eq!(window.start_date, history.dates()[window.fit_start]);
        assert_eq!(window.end_date, history.dates()[window.fit_start + 7]);
    }
}

#[test]
fn test_stops_when_no_full_window_remains() {
    // 11 observations with window 4: only start 0 has a full follow-up.
    let history = make_history(varied_observations(11));
    let run = optimize_rolling(&history, &loose_config(4)).unwrap();

    assert_eq!(run.windows.len(), 1);
}

#[test]
fn test_too_short_history_yields_empty_run() {
    let history = make_history(varied_observations(7));
    let run = optimize_rolling(&history, &loose_config(4)).unwrap();

    assert!(run.windows.is_empty());
    assert_eq!(run.final_value, 2000.0);
}

/// The weights recorded for each window must be exactly the weights fitted
/// from that window's own observations.
#[test]
fn test_weights_come_from_fit_window_only() {
    let history = make_history(varied_observations(24));
    let config = loose_config(6);
    let run = optimize_rolling(&history, &config).unwrap();

    for window in &run.windows {
        let WindowOutcome::Allocated { weights, .. } = &window.outcome else {
            panic!("expected an allocated window");
        };
        let fit = &history.observations()[window.fit_start..window.fit_end];
        let refit = max_sharpe(
            &estimate_window(fit),
            config.risk_free_rate,
            &config.bounds,
        )
        .unwrap();
        assert_eq!(*weights, refit);
    }
}

/// Changing data after the fit window must not change the fitted weights,
/// only the realized return.
#[test]
fn test_no_look_ahead_into_holding_window() {
    let base = varied_observations(12);
    let mut shifted = base.clone();
    // Perturb only the holding window of the first (and only) fit window.
    // Every bucket rises, so any weight vector realizes a higher return.
    for obs in shifted.iter_mut().skip(6) {
        obs.short_term += 0.05;
        obs.medium_term += 0.05;
        obs.long_term += 0.05;
    }

    let config = loose_config(6);
    let base_run = optimize_rolling(&make_history(base), &config).unwrap();
    let shifted_run = optimize_rolling(&make_history(shifted), &config).unwrap();

    let weights_of = |run: &crate::model::OptimizerRun| match &run.windows[0].outcome {
        WindowOutcome::Allocated {
            weights,
            realized_return,
        } => (*weights, *realized_return),
        WindowOutcome::Infeasible { .. } => panic!("expected an allocated window"),
    };

    let (base_weights, base_return) = weights_of(&base_run);
    let (shifted_weights, shifted_return) = weights_of(&shifted_run);

    assert_eq!(base_weights, shifted_weights);
    assert!(shifted_return > base_return);
}

/// The rolled value advances by each allocated window's realized return and
/// ends at `final_value`.
#[test]
fn test_portfolio_value_rolls_forward() {
    let history = make_history(varied_observations(30));
    let run = optimize_rolling(&history, &loose_config(5)).unwrap();

    let mut value = 2000.0;
    for window in &run.windows {
        if let WindowOutcome::Allocated {
            realized_return, ..
        } = window.outcome
        {
            value *= 1.0 + realized_return;
        }
        assert_eq!(window.portfolio_value, value);
    }
    assert_eq!(run.final_value, value);
}

/// A window whose moments cannot be estimated is surfaced as an explicit
/// skip, with the portfolio value carried forward unchanged.
#[test]
fn test_degenerate_window_skipped_explicitly() {
    let mut observations = varied_observations(9);
    // Corrupt the first fit window; the later windows stay clean.
    observations[1].medium_term = f64::NAN;

    let history = make_history(observations);
    let run = optimize_rolling(&history, &loose_config(3)).unwrap();

    assert_eq!(run.windows.len(), 2);
    assert_eq!(
        run.windows[0].outcome,
        WindowOutcome::Infeasible {
            reason: SkipReason::SingularCovariance
        }
    );
    assert_eq!(run.windows[0].portfolio_value, 2000.0);
    assert!(matches!(
        run.windows[1].outcome,
        WindowOutcome::Allocated { .. }
    ));
}

/// Bounds of 70/15/15 saturate exactly when the unconstrained optimum wants
/// more long-term exposure than allowed.
#[test]
fn test_saturating_bounds_pin_weights() {
    let observations: Vec<BucketMap<f64>> = (0..16)
        .map(|i| {
            let wiggle = if i % 2 == 0 { 0.0005 } else { -0.0005 };
            // Long-term dominates on return with modest variance.
            BucketMap::new(0.0005 + wiggle, 0.001 - wiggle, 0.02 + wiggle)
        })
        .collect();
    let history = make_history(observations);
    let config = RollingConfig {
        window_len: 8,
        bounds: BucketMap::new(0.70, 0.15, 0.15),
        risk_free_rate: 0.0,
        initial_value: 2000.0,
    };

    let run = optimize_rolling(&history, &config).unwrap();
    assert_eq!(run.windows.len(), 1);
    let WindowOutcome::Allocated { weights, .. } = &run.windows[0].outcome else {
        panic!("expected an allocated window");
    };

    assert!((weights.get(Bucket::ShortTerm) - 0.70).abs() < 1e-9);
    assert!((weights.get(Bucket::MediumTerm) - 0.15).abs() < 1e-9);
    assert!((weights.get(Bucket::LongTerm) - 0.15).abs() < 1e-9);
}
