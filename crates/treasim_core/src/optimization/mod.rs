//! Window moment estimation and the constrained weight solve.

mod estimate;
mod solver;

pub use estimate::{CovMatrix, WindowEstimate, estimate_window};
pub use solver::{COVARIANCE_RIDGE, max_sharpe};
