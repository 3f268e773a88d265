//! Joint-angle inference core for driving a humanoid robot's arms from 3D
//! skeleton keypoints.
//!
//! Frames of landmarks go through the lateral normalizer and then through one
//! shoulder or elbow formula per joint group. Every computation is pure and
//! local to a single frame.

pub mod engine;
pub mod kinematics;
pub mod math;
pub mod prelude;
pub mod skeleton;
pub mod telemetry;

pub use engine::{AngleEngine, FrameReport, GroupOutcome};
pub use prelude::{AngleError, AngleResult, EngineConfig, Point3, Vector3};
