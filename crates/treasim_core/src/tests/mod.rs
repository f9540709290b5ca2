//! Integration tests for the treasury simulation engine
//!
//! Tests are organized by topic:
//! - `simulation` - Path mechanics, rebalancing, drawdown, determinism
//! - `aggregation` - Pooled risk metrics and their edge cases
//! - `rolling` - Walk-forward optimization and look-ahead guarantees
//! - `stress` - Shock scenario evaluation

mod rolling;
mod stress;
