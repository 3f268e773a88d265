pub mod stats;
pub mod vector;

pub use stats::RunningStats;
pub use vector::{angle_between, vector_from_points};
