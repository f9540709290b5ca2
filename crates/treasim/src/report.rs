//! Plain-text rendering of engine results.

use tabled::{Table, builder::Builder};

use treasim_core::model::{Bucket, OptimizerRun, RiskSummary, StressReport, WindowOutcome};

/// Risk summary as a two-column table.
pub fn print_summary(summary: &RiskSummary) {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    builder.push_record([
        "Mean final value (real)",
        &format!("{:.2}", summary.mean_terminal_value),
    ]);
    builder.push_record(["Expected CAGR (real)", &format_pct(summary.cagr)]);
    builder.push_record(["5th percentile", &format!("{:.2}", summary.percentile_5)]);
    builder.push_record(["95th percentile", &format!("{:.2}", summary.percentile_95)]);
    builder.push_record([
        "Sharpe ratio",
        &summary
            .sharpe_ratio
            .map_or_else(|| "undefined".to_string(), |s| format!("{s:.2}")),
    ]);
    builder.push_record([
        "Mean max drawdown",
        &format_pct(summary.mean_max_drawdown),
    ]);
    builder.push_record(["Target value (real)", &format!("{:.2}", summary.target_value)]);
    builder.push_record([
        "P(>= target)",
        &format_pct(summary.probability_above_target),
    ]);
    builder.push_record(["Trials", &summary.num_trials.to_string()]);

    println!("{}", Table::from(builder));
}

/// Window-by-window allocation table plus the final rolled value.
pub fn print_optimizer_run(run: &OptimizerRun) {
    let mut builder = Builder::default();
    builder.push_record([
        "Start", "End", "Short", "Medium", "Long", "Return", "Value",
    ]);

    for window in &run.windows {
        match &window.outcome {
            WindowOutcome::Allocated {
                weights,
                realized_return,
            } => {
                builder.push_record([
                    window.start_date.to_string(),
                    window.end_date.to_string(),
                    format_pct(weights.get(Bucket::ShortTerm)),
                    format_pct(weights.get(Bucket::MediumTerm)),
                    format_pct(weights.get(Bucket::LongTerm)),
                    format_pct(*realized_return),
                    format!("{:.2}", window.portfolio_value),
                ]);
            }
            WindowOutcome::Infeasible { reason } => {
                builder.push_record([
                    window.start_date.to_string(),
                    window.end_date.to_string(),
                    format!("skipped: {reason}"),
                    String::new(),
                    String::new(),
                    String::new(),
                    format!("{:.2}", window.portfolio_value),
                ]);
            }
        }
    }

    println!("{}", Table::from(builder));

    let skipped = run.skipped().count();
    if skipped > 0 {
        println!("{skipped} window(s) skipped as infeasible");
    }
    println!("Final portfolio value: {:.2}", run.final_value);
}

/// Stressed values per scenario.
pub fn print_stress_report(report: &StressReport) {
    let mut builder = Builder::default();
    builder.push_record(["Scenario", "Value after shock", "Change"]);
    for outcome in &report.outcomes {
        builder.push_record([
            outcome.name.clone(),
            format!("{:.2}", outcome.stressed_value),
            format!("{:+.2}", outcome.value_change),
        ]);
    }

    println!("Base value: {:.2}", report.base_value);
    println!("{}", Table::from(builder));
}

fn format_pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
