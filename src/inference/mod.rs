//! Statistical inference (critical values and interval bounds).

mod critical;
mod prediction;

pub use critical::critical_value;
pub use prediction::compute_intervals;
