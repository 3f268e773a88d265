use serde::{Deserialize, Serialize};

use crate::kinematics::JointGroup;
use crate::skeleton::Landmark;

/// Landmark position in the camera/world frame of the producer.
pub type Point3 = nalgebra::Point3<f64>;

/// Bone or axis vector between two landmarks.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Engine configuration shared by every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Swap left/right arm landmarks before the formulas run.
    pub normalize_sides: bool,
    pub groups: Vec<JointGroup>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalize_sides: true,
            groups: JointGroup::ALL.to_vec(),
        }
    }
}

/// Common error type for angle inference.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AngleError {
    #[error("{group}: landmark {landmark} missing from frame")]
    MissingLandmark {
        group: JointGroup,
        landmark: Landmark,
    },
    #[error("{group}: degenerate geometry while computing {angle}")]
    DegenerateGeometry {
        group: JointGroup,
        angle: &'static str,
    },
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

pub type AngleResult<T> = Result<T, AngleError>;
