//! Immutable result snapshots handed back to callers.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::SkipReason;
use crate::model::TargetWeights;

/// One simulated multi-period value trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPath {
    /// Nominal portfolio total after each period's growth.
    pub values: Vec<f64>,
    /// Blended return per period, weighted by post-growth bucket shares.
    pub period_returns: Vec<f64>,
    /// Maximum peak-to-trough relative decline over the path.
    pub max_drawdown: f64,
    /// Terminal value deflated to real terms.
    pub real_terminal_value: f64,
}

/// Pooled outputs of a full Monte Carlo run.
///
/// Individual paths are discarded after aggregation; only the statistics
/// they contribute are retained. Arrays are in trial order regardless of
/// worker count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Real (inflation-adjusted) terminal value per trial.
    pub terminal_values: Vec<f64>,
    /// Blended period returns pooled across all trials.
    pub period_returns: Vec<f64>,
    /// Maximum drawdown per trial.
    pub max_drawdowns: Vec<f64>,
    pub summary: RiskSummary,
}

/// Summary risk metrics derived from a Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub mean_terminal_value: f64,
    /// Compound annual growth rate implied by the mean terminal value.
    pub cagr: f64,
    /// 5th percentile of the terminal-value distribution.
    pub percentile_5: f64,
    /// 95th percentile of the terminal-value distribution.
    pub percentile_95: f64,
    /// Mean excess period return over its standard deviation, pooled across
    /// all trials. `None` when the excess-return series has zero variance.
    pub sharpe_ratio: Option<f64>,
    pub mean_max_drawdown: f64,
    /// Real target value implied by the configured nominal target return.
    pub target_value: f64,
    /// Fraction of trials whose terminal value met or exceeded the target.
    pub probability_above_target: f64,
    pub num_trials: usize,
}

/// What happened to one rolling window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowOutcome {
    /// Weights were fitted on this window and held through the next one.
    Allocated {
        weights: TargetWeights,
        /// Compounded return realized over the following window.
        realized_return: f64,
    },
    /// The constraint set had no solution; the portfolio value carried
    /// forward unchanged.
    Infeasible { reason: SkipReason },
}

/// One step of the walk-forward optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationWindow {
    /// Index range of the fitting window within the history.
    pub fit_start: usize,
    pub fit_end: usize,
    /// First date of the fitting window.
    pub start_date: Date,
    /// Last date of the holding window that follows it.
    pub end_date: Date,
    pub outcome: WindowOutcome,
    /// Rolled portfolio value after the holding window.
    pub portfolio_value: f64,
}

/// The full walk-forward sequence and its final rolled value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerRun {
    pub windows: Vec<OptimizationWindow>,
    pub final_value: f64,
}

impl OptimizerRun {
    /// Windows that produced an allocation.
    pub fn allocated(&self) -> impl Iterator<Item = &OptimizationWindow> {
        self.windows
            .iter()
            .filter(|w| matches!(w.outcome, WindowOutcome::Allocated { .. }))
    }

    /// Windows skipped as infeasible.
    pub fn skipped(&self) -> impl Iterator<Item = &OptimizationWindow> {
        self.windows
            .iter()
            .filter(|w| matches!(w.outcome, WindowOutcome::Infeasible { .. }))
    }
}

/// Post-shock value for one stress scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub stressed_value: f64,
    /// Signed change from the base value.
    pub value_change: f64,
}

/// Stressed values for every scenario in a catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReport {
    pub base_value: f64,
    pub outcomes: Vec<ScenarioOutcome>,
}
