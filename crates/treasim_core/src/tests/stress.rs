//! Tests for the stress scenario evaluator

use crate::error::ConfigError;
use crate::model::{BucketMap, TargetWeights};
use crate::stress::{ShockScenario, evaluate_scenarios, standard_catalogue};

fn baseline_weights() -> TargetWeights {
    TargetWeights::new(BucketMap::new(0.70, 0.15, 0.15)).unwrap()
}

#[test]
fn test_standard_catalogue_values() {
    let report = evaluate_scenarios(&baseline_weights(), 2100.0, &standard_catalogue()).unwrap();
    assert_eq!(report.outcomes.len(), 3);

    // Rate spike: (0.70 + 0.15) * -0.03 = -2.55% of the base value.
    let rate_spike = &report.outcomes[0];
    assert_eq!(rate_spike.name, "Interest Rate Spike");
    assert!((rate_spike.stressed_value - 2100.0 * 0.9745).abs() < 1e-9);

    // Equity drawdown: 0.15 * -0.10 = -1.5%.
    let equity = &report.outcomes[1];
    assert!((equity.stressed_value - 2100.0 * 0.985).abs() < 1e-9);

    // Inflation shock hits every bucket: a flat -2%.
    let inflation = &report.outcomes[2];
    assert!((inflation.stressed_value - 2100.0 * 0.98).abs() < 1e-9);
}

/// A shock that only touches a zero-weight bucket leaves the value unchanged.
#[test]
fn test_shock_on_zero_weight_bucket_is_noop() {
    let weights = TargetWeights::new(BucketMap::new(0.85, 0.15, 0.0)).unwrap();
    let catalogue = [ShockScenario::new(
        "Equity Drawdown",
        BucketMap::new(0.0, 0.0, -0.10),
    )];

    let report = evaluate_scenarios(&weights, 2000.0, &catalogue).unwrap();

    assert_eq!(report.outcomes[0].stressed_value, 2000.0);
    assert_eq!(report.outcomes[0].value_change, 0.0);
}

/// Scenarios do not compose: each outcome is relative to the same base value.
#[test]
fn test_scenarios_evaluated_independently() {
    let catalogue = [
        ShockScenario::new("First", BucketMap::splat(-0.50)),
        ShockScenario::new("Second", BucketMap::splat(-0.10)),
    ];
    let report = evaluate_scenarios(&baseline_weights(), 1000.0, &catalogue).unwrap();

    assert!((report.outcomes[0].stressed_value - 500.0).abs() < 1e-9);
    assert!((report.outcomes[1].stressed_value - 900.0).abs() < 1e-9);
}

/// Pure function: evaluating twice yields identical reports.
#[test]
fn test_evaluation_is_idempotent() {
    let weights = baseline_weights();
    let catalogue = standard_catalogue();

    let first = evaluate_scenarios(&weights, 2185.0, &catalogue).unwrap();
    let second = evaluate_scenarios(&weights, 2185.0, &catalogue).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_malformed_weights_rejected() {
    // Bypass the validating constructor the way a deserialized value could.
    let malformed = TargetWeights {
        fractions: BucketMap::new(0.5, 0.2, 0.2),
    };
    let err = evaluate_scenarios(&malformed, 2000.0, &standard_catalogue()).unwrap_err();

    assert!(matches!(err, ConfigError::WeightSumMismatch { .. }));
}

#[test]
fn test_non_positive_base_value_rejected() {
    let err = evaluate_scenarios(&baseline_weights(), 0.0, &standard_catalogue()).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidCorpus(_)));
}
