use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anatomical keypoints consumed by the angle formulas, numbered as the
/// upstream pose estimator numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Landmark {
    Nose = 0,
    Neck = 1,
    RShoulder = 2,
    RElbow = 3,
    RWrist = 4,
    LShoulder = 5,
    LElbow = 6,
    LWrist = 7,
    MidHip = 8,
}

impl Landmark {
    pub const ALL: [Landmark; 9] = [
        Landmark::Nose,
        Landmark::Neck,
        Landmark::RShoulder,
        Landmark::RElbow,
        Landmark::RWrist,
        Landmark::LShoulder,
        Landmark::LElbow,
        Landmark::LWrist,
        Landmark::MidHip,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Landmark::Nose => "Nose",
            Landmark::Neck => "Neck",
            Landmark::RShoulder => "RShoulder",
            Landmark::RElbow => "RElbow",
            Landmark::RWrist => "RWrist",
            Landmark::LShoulder => "LShoulder",
            Landmark::LElbow => "LElbow",
            Landmark::LWrist => "LWrist",
            Landmark::MidHip => "MidHip",
        }
    }

    /// Same joint on the other arm. Torso landmarks map to themselves.
    pub fn mirrored(self) -> Self {
        match self {
            Landmark::RShoulder => Landmark::LShoulder,
            Landmark::RElbow => Landmark::LElbow,
            Landmark::RWrist => Landmark::LWrist,
            Landmark::LShoulder => Landmark::RShoulder,
            Landmark::LElbow => Landmark::RElbow,
            Landmark::LWrist => Landmark::RWrist,
            other => other,
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a landmark key could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandmarkKeyError {
    /// Numeric id outside the landmark table, e.g. the feet of a 25-point model.
    Untracked(u32),
    Unknown(String),
}

impl FromStr for Landmark {
    type Err = LandmarkKeyError;

    /// Accepts either the numeric id (`"5"`) or the landmark name (`"LShoulder"`).
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let key = key.trim();
        if let Ok(id) = key.parse::<u32>() {
            return u8::try_from(id)
                .ok()
                .and_then(Landmark::from_id)
                .ok_or(LandmarkKeyError::Untracked(id));
        }
        Landmark::ALL
            .iter()
            .copied()
            .find(|landmark| landmark.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| LandmarkKeyError::Unknown(key.to_string()))
    }
}
