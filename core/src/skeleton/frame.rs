use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::prelude::{AngleError, AngleResult, Point3};
use crate::skeleton::landmark::{Landmark, LandmarkKeyError};

/// Keypoints of a single time instant. A landmark is either present with a
/// finite position or absent altogether.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, [f64; 3]>", into = "BTreeMap<String, [f64; 3]>")]
pub struct Frame {
    points: BTreeMap<Landmark, Point3>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points<I>(points: I) -> AngleResult<Self>
    where
        I: IntoIterator<Item = (Landmark, Point3)>,
    {
        let mut frame = Self::new();
        for (landmark, point) in points {
            frame.insert(landmark, point)?;
        }
        Ok(frame)
    }

    /// Parses the keypoint dictionary format: `{"1": [x, y, z], ...}`.
    pub fn from_json(json: impl AsRef<[u8]>) -> AngleResult<Self> {
        serde_json::from_slice(json.as_ref()).map_err(|err| AngleError::InvalidFrame(err.to_string()))
    }

    /// Stores `point` for `landmark`, returning the position it replaced.
    pub fn insert(&mut self, landmark: Landmark, point: Point3) -> AngleResult<Option<Point3>> {
        if !point.coords.iter().all(|c| c.is_finite()) {
            return Err(AngleError::InvalidFrame(format!(
                "non-finite position for {}",
                landmark
            )));
        }
        Ok(self.points.insert(landmark, point))
    }

    pub fn remove(&mut self, landmark: Landmark) -> Option<Point3> {
        self.points.remove(&landmark)
    }

    pub fn get(&self, landmark: Landmark) -> Option<&Point3> {
        self.points.get(&landmark)
    }

    pub fn contains(&self, landmark: Landmark) -> bool {
        self.points.contains_key(&landmark)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Landmark, &Point3)> {
        self.points.iter().map(|(landmark, point)| (*landmark, point))
    }

    /// Collects the positions of `landmarks` in order, or reports the first
    /// one that is absent.
    pub fn gather<const N: usize>(&self, landmarks: &[Landmark; N]) -> Result<[Point3; N], Landmark> {
        let mut gathered = [Point3::origin(); N];
        for (slot, landmark) in gathered.iter_mut().zip(landmarks) {
            *slot = *self.get(*landmark).ok_or(*landmark)?;
        }
        Ok(gathered)
    }
}

/// Swaps the right-arm and left-arm landmarks pairwise (2↔5, 3↔6, 4↔7).
///
/// The pose estimator labels the subject's anatomical sides, while the angle
/// formulas expect viewer-relative sides. Each landmark moves independently,
/// so a missing member of one pair never blocks the others. Applying the
/// swap twice yields the original frame.
pub fn normalize_sides(frame: &Frame) -> Frame {
    Frame {
        points: frame
            .points
            .iter()
            .map(|(landmark, point)| (landmark.mirrored(), *point))
            .collect(),
    }
}

impl TryFrom<BTreeMap<String, [f64; 3]>> for Frame {
    type Error = AngleError;

    fn try_from(raw: BTreeMap<String, [f64; 3]>) -> Result<Self, Self::Error> {
        let mut frame = Frame::new();
        for (key, [x, y, z]) in raw {
            match key.parse::<Landmark>() {
                Ok(landmark) => {
                    if frame.insert(landmark, Point3::new(x, y, z))?.is_some() {
                        return Err(AngleError::InvalidFrame(format!(
                            "landmark {} given twice (key {:?})",
                            landmark, key
                        )));
                    }
                }
                Err(LandmarkKeyError::Untracked(id)) => {
                    debug!("ignoring untracked keypoint id {}", id);
                }
                Err(LandmarkKeyError::Unknown(name)) => {
                    return Err(AngleError::InvalidFrame(format!(
                        "unknown landmark key {:?}",
                        name
                    )));
                }
            }
        }
        Ok(frame)
    }
}

impl From<Frame> for BTreeMap<String, [f64; 3]> {
    fn from(frame: Frame) -> Self {
        frame
            .points
            .into_iter()
            .map(|(landmark, p)| (landmark.id().to_string(), [p.x, p.y, p.z]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_frame() -> Frame {
        Frame::from_points(
            Landmark::ALL
                .iter()
                .map(|&l| (l, Point3::new(l.id() as f64, -(l.id() as f64), 0.5))),
        )
        .unwrap()
    }

    #[test]
    fn normalize_sides_swaps_arm_pairs() {
        let frame = full_frame();
        let swapped = normalize_sides(&frame);
        assert_eq!(swapped.get(Landmark::LShoulder), frame.get(Landmark::RShoulder));
        assert_eq!(swapped.get(Landmark::RWrist), frame.get(Landmark::LWrist));
        assert_eq!(swapped.get(Landmark::Neck), frame.get(Landmark::Neck));
        assert_eq!(swapped.get(Landmark::Nose), frame.get(Landmark::Nose));
        assert_eq!(swapped.get(Landmark::MidHip), frame.get(Landmark::MidHip));
    }

    #[test]
    fn normalize_sides_keeps_unpaired_landmarks_apart() {
        let mut frame = full_frame();
        frame.remove(Landmark::LElbow);
        frame.remove(Landmark::RWrist);
        let swapped = normalize_sides(&frame);
        assert_eq!(swapped.len(), frame.len());
        assert!(!swapped.contains(Landmark::RElbow));
        assert_eq!(swapped.get(Landmark::LElbow), frame.get(Landmark::RElbow));
        assert!(!swapped.contains(Landmark::LWrist));
        assert_eq!(swapped.get(Landmark::RWrist), frame.get(Landmark::LWrist));
    }

    #[test]
    fn normalize_sides_is_an_involution() {
        let mut frame = full_frame();
        assert_eq!(normalize_sides(&normalize_sides(&frame)), frame);

        for landmark in [Landmark::RShoulder, Landmark::LWrist, Landmark::MidHip] {
            frame.remove(landmark);
            assert_eq!(normalize_sides(&normalize_sides(&frame)), frame);
        }
        assert_eq!(normalize_sides(&Frame::new()), Frame::new());
    }

    #[test]
    fn gather_reports_first_missing_landmark() {
        let mut frame = full_frame();
        frame.remove(Landmark::LElbow);
        frame.remove(Landmark::MidHip);
        let required = [Landmark::Neck, Landmark::LShoulder, Landmark::LElbow, Landmark::MidHip];
        assert_eq!(frame.gather(&required), Err(Landmark::LElbow));

        let [neck, hip] = full_frame().gather(&[Landmark::Neck, Landmark::MidHip]).unwrap();
        assert_eq!(neck, Point3::new(1.0, -1.0, 0.5));
        assert_eq!(hip, Point3::new(8.0, -8.0, 0.5));
    }

    #[test]
    fn insert_rejects_non_finite_points() {
        let mut frame = Frame::new();
        let err = frame
            .insert(Landmark::Neck, Point3::new(0.0, f64::NAN, 0.0))
            .unwrap_err();
        assert!(matches!(err, AngleError::InvalidFrame(_)));
        assert!(frame.is_empty());
    }

    #[test]
    fn json_frames_use_keypoint_ids() {
        let frame = Frame::from_json(r#"{"1": [0.0, 0.0, 0.0], "8": [0.0, -1.0, 0.0], "24": [1.0, 1.0, 1.0]}"#)
            .unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(Landmark::MidHip), Some(&Point3::new(0.0, -1.0, 0.0)));

        let encoded = serde_json::to_string(&frame).unwrap();
        assert_eq!(encoded, r#"{"1":[0.0,0.0,0.0],"8":[0.0,-1.0,0.0]}"#);

        assert!(Frame::from_json(r#"{"elbow": [0.0, 0.0, 0.0]}"#).is_err());
    }

    #[test]
    fn json_frames_reject_aliased_landmark_keys() {
        for json in [
            r#"{"1": [0.0, 0.0, 0.0], "Neck": [1.0, 0.0, 0.0]}"#,
            r#"{"1": [0.0, 0.0, 0.0], "01": [1.0, 0.0, 0.0]}"#,
        ] {
            let err = Frame::from_json(json).unwrap_err();
            assert!(matches!(err, AngleError::InvalidFrame(ref msg) if msg.contains("Neck")));
        }
    }
}
