//! Shoulder and elbow angle formulas.
//!
//! Each joint group builds a local frame from bone vectors and reads two
//! angles off it. The same formula serves both arms; [`Side`] selects the
//! axis orientation and sign conventions.

pub mod elbow;
pub mod shoulder;

pub use elbow::{elbow_angles, elbow_roll};
pub use shoulder::shoulder_angles;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prelude::{AngleResult, Point3};
use crate::skeleton::Landmark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sign applied to the Neck→Shoulder vector when it enters an X-axis
    /// cross product, so both arms get mirrored local frames.
    pub fn orientation(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Joint {
    Shoulder,
    Elbow,
}

/// A pair of robot joints computed together from one landmark set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JointGroup {
    LeftShoulder,
    LeftElbow,
    RightShoulder,
    RightElbow,
}

impl JointGroup {
    pub const ALL: [JointGroup; 4] = [
        JointGroup::LeftShoulder,
        JointGroup::LeftElbow,
        JointGroup::RightShoulder,
        JointGroup::RightElbow,
    ];

    pub fn new(side: Side, joint: Joint) -> Self {
        match (side, joint) {
            (Side::Left, Joint::Shoulder) => JointGroup::LeftShoulder,
            (Side::Left, Joint::Elbow) => JointGroup::LeftElbow,
            (Side::Right, Joint::Shoulder) => JointGroup::RightShoulder,
            (Side::Right, Joint::Elbow) => JointGroup::RightElbow,
        }
    }

    pub fn side(self) -> Side {
        match self {
            JointGroup::LeftShoulder | JointGroup::LeftElbow => Side::Left,
            JointGroup::RightShoulder | JointGroup::RightElbow => Side::Right,
        }
    }

    pub fn joint(self) -> Joint {
        match self {
            JointGroup::LeftShoulder | JointGroup::RightShoulder => Joint::Shoulder,
            JointGroup::LeftElbow | JointGroup::RightElbow => Joint::Elbow,
        }
    }

    /// Landmarks the formula consumes, in argument order.
    pub fn landmarks(self) -> [Landmark; 4] {
        use Landmark::*;
        match self {
            JointGroup::LeftShoulder => [Neck, LShoulder, LElbow, MidHip],
            JointGroup::LeftElbow => [Neck, LShoulder, LElbow, LWrist],
            JointGroup::RightShoulder => [Neck, RShoulder, RElbow, MidHip],
            JointGroup::RightElbow => [Neck, RShoulder, RElbow, RWrist],
        }
    }

    /// Robot joint names of the two output angles.
    pub fn angle_names(self) -> [&'static str; 2] {
        match self {
            JointGroup::LeftShoulder => ["LShoulderPitch", "LShoulderRoll"],
            JointGroup::LeftElbow => ["LElbowYaw", "LElbowRoll"],
            JointGroup::RightShoulder => ["RShoulderPitch", "RShoulderRoll"],
            JointGroup::RightElbow => ["RElbowYaw", "RElbowRoll"],
        }
    }

    /// Runs this group's formula on points ordered as [`JointGroup::landmarks`].
    pub fn solve(self, points: &[Point3; 4]) -> AngleResult<JointAngles> {
        let [neck, shoulder, elbow, last] = points;
        match self.joint() {
            Joint::Shoulder => shoulder_angles(self.side(), neck, shoulder, elbow, last),
            Joint::Elbow => elbow_angles(self.side(), neck, shoulder, elbow, last),
        }
    }
}

impl fmt::Display for JointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JointGroup::LeftShoulder => "LeftShoulder",
            JointGroup::LeftElbow => "LeftElbow",
            JointGroup::RightShoulder => "RightShoulder",
            JointGroup::RightElbow => "RightElbow",
        };
        f.write_str(name)
    }
}

/// Two angles in radians: pitch/roll for shoulders, yaw/roll for elbows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub group: JointGroup,
    pub values: [f64; 2],
}

impl JointAngles {
    pub fn new(group: JointGroup, first: f64, second: f64) -> Self {
        Self {
            group,
            values: [first, second],
        }
    }

    pub fn first(&self) -> f64 {
        self.values[0]
    }

    pub fn second(&self) -> f64 {
        self.values[1]
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    pub fn named(&self) -> [(&'static str, f64); 2] {
        let [first, second] = self.group.angle_names();
        [(first, self.values[0]), (second, self.values[1])]
    }

    pub fn to_degrees(&self) -> Self {
        Self {
            group: self.group,
            values: self.values.map(f64::to_degrees),
        }
    }
}
