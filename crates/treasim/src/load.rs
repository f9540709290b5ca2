//! Loading scenario files and return histories for the engine.

use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use jiff::civil::Date;
use serde::Deserialize;

use treasim_core::config::SimulationConfig;
use treasim_core::model::{BucketMap, ReturnHistory};
use treasim_core::rolling::RollingConfig;

/// Load a YAML Monte Carlo scenario; omitted fields use the reference
/// defaults.
pub fn load_scenario(path: &Path) -> color_eyre::Result<SimulationConfig> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read scenario file {}", path.display()))?;
    let config: SimulationConfig = serde_saphyr::from_str(&content)
        .map_err(|e| eyre!("failed to parse scenario file {}: {e}", path.display()))?;
    Ok(config)
}

/// Load a YAML rolling-optimizer configuration.
pub fn load_rolling_config(path: &Path) -> color_eyre::Result<RollingConfig> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
    let config: RollingConfig = serde_saphyr::from_str(&content)
        .map_err(|e| eyre!("failed to parse config file {}: {e}", path.display()))?;
    Ok(config)
}

/// One row of the return-history CSV.
#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(rename = "Date")]
    date: String,
    short_term: f64,
    medium_term: f64,
    long_term: f64,
}

/// Load a CSV return history with columns
/// `Date,short_term,medium_term,long_term`, one row per trading period,
/// sorted ascending by date.
pub fn load_history(path: &Path) -> color_eyre::Result<ReturnHistory> {
    let mut reader = csv::Reader::from_path(path)
        .wrap_err_with(|| format!("failed to open history file {}", path.display()))?;

    let mut dates = Vec::new();
    let mut observations = Vec::new();
    for (index, record) in reader.deserialize::<HistoryRow>().enumerate() {
        let row = record.wrap_err_with(|| format!("bad history row {}", index + 1))?;
        let date: Date = row
            .date
            .parse()
            .wrap_err_with(|| format!("bad date {:?} in history row {}", row.date, index + 1))?;
        dates.push(date);
        observations.push(BucketMap::new(
            row.short_term,
            row.medium_term,
            row.long_term,
        ));
    }

    ReturnHistory::new(dates, observations).map_err(Into::into)
}
