//! Discrete shock scenarios applied to an allocation snapshot.
//!
//! A stateless lookup: each scenario is evaluated independently against the
//! same base value, and scenarios never compose.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{BucketMap, ScenarioOutcome, StressReport, TargetWeights};

/// A named shock: the return impact applied to each bucket's weight share.
///
/// Buckets a scenario does not affect carry a zero impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShockScenario {
    pub name: String,
    pub impacts: BucketMap<f64>,
}

impl ShockScenario {
    pub fn new(name: impl Into<String>, impacts: BucketMap<f64>) -> Self {
        Self {
            name: name.into(),
            impacts,
        }
    }
}

/// The built-in catalogue of adverse market scenarios.
#[must_use]
pub fn standard_catalogue() -> Vec<ShockScenario> {
    vec![
        ShockScenario::new("Interest Rate Spike", BucketMap::new(-0.03, -0.03, 0.0)),
        ShockScenario::new("Equity Drawdown", BucketMap::new(0.0, 0.0, -0.10)),
        ShockScenario::new("Inflation Shock", BucketMap::splat(-0.02)),
    ]
}

/// Apply every scenario in the catalogue to a weights-only allocation view.
///
/// Each scenario reports `value * (1 + Σ weight_b * impact_b)`. Pure
/// function: identical inputs always produce identical reports.
pub fn evaluate_scenarios(
    weights: &TargetWeights,
    base_value: f64,
    catalogue: &[ShockScenario],
) -> Result<StressReport, ConfigError> {
    if !base_value.is_finite() || base_value <= 0.0 {
        return Err(ConfigError::InvalidCorpus(base_value));
    }
    weights.validate()?;

    let outcomes = catalogue
        .iter()
        .map(|scenario| {
            let shock = weights.fractions().dot(&scenario.impacts);
            let stressed_value = base_value * (1.0 + shock);
            ScenarioOutcome {
                name: scenario.name.clone(),
                stressed_value,
                value_change: stressed_value - base_value,
            }
        })
        .collect();

    Ok(StressReport {
        base_value,
        outcomes,
    })
}
