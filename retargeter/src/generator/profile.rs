use anyhow::Context;
use jointcore::prelude::{Point3, Vector3};
use jointcore::skeleton::{normalize_sides, Frame, Landmark};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Configuration for generating synthetic skeleton frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub frames: usize,
    pub seed: u64,
    /// Uniform jitter added to every coordinate.
    pub noise: f64,
    /// Probability that any single arm landmark goes undetected.
    pub dropout: f64,
    pub shoulder_width: f64,
    pub torso_length: f64,
    pub upper_arm_length: f64,
    pub forearm_length: f64,
    /// Largest angle a bone may swing away from hanging straight down.
    pub max_raise_deg: f64,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            seed: 0,
            noise: 0.005,
            dropout: 0.05,
            shoulder_width: 0.38,
            torso_length: 0.55,
            upper_arm_length: 0.3,
            forearm_length: 0.27,
            max_raise_deg: 150.0,
            scenario: None,
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.dropout) {
            anyhow::bail!("dropout must be within [0, 1], got {}", self.dropout);
        }
        if !(self.noise >= 0.0 && self.noise.is_finite()) {
            anyhow::bail!("noise must be a finite non-negative value, got {}", self.noise);
        }
        let lengths = [
            self.shoulder_width,
            self.torso_length,
            self.upper_arm_length,
            self.forearm_length,
        ];
        if lengths.iter().any(|&length| !(length > 0.0 && length.is_finite())) {
            anyhow::bail!("segment lengths must be positive");
        }
        Ok(())
    }
}

/// Unit vector `polar` radians away from straight down, turned by `azimuth`
/// about the vertical axis.
fn swing(polar: f64, azimuth: f64) -> Vector3 {
    Vector3::new(
        polar.sin() * azimuth.cos(),
        -polar.cos(),
        polar.sin() * azimuth.sin(),
    )
}

fn build_frame(config: &GeneratorConfig, rng: &mut StdRng) -> anyhow::Result<Frame> {
    let max_raise = config.max_raise_deg.to_radians().clamp(0.0, std::f64::consts::PI);
    let neck = Point3::new(0.0, 0.4, 2.0);
    let half_width = config.shoulder_width / 2.0;

    let mut points = vec![
        (Landmark::Neck, neck),
        (Landmark::Nose, neck + Vector3::new(0.0, 0.2, -0.05)),
        (Landmark::MidHip, neck - Vector3::new(0.0, config.torso_length, 0.0)),
    ];

    let arms = [
        (-half_width, [Landmark::LShoulder, Landmark::LElbow, Landmark::LWrist]),
        (half_width, [Landmark::RShoulder, Landmark::RElbow, Landmark::RWrist]),
    ];
    for (offset, [shoulder_id, elbow_id, wrist_id]) in arms {
        let shoulder = neck + Vector3::new(offset, 0.0, 0.0);
        let upper = swing(rng.gen_range(0.0..=max_raise), rng.gen_range(0.0..TAU));
        let elbow = shoulder + upper * config.upper_arm_length;
        let lower = swing(rng.gen_range(0.0..=max_raise), rng.gen_range(0.0..TAU));
        let wrist = elbow + lower * config.forearm_length;

        for (landmark, point) in [(shoulder_id, shoulder), (elbow_id, elbow), (wrist_id, wrist)] {
            if !rng.gen_bool(config.dropout) {
                points.push((landmark, point));
            }
        }
    }

    if config.noise > 0.0 {
        for (_, point) in points.iter_mut() {
            for coord in point.coords.iter_mut() {
                *coord += rng.gen_range(-config.noise..config.noise);
            }
        }
    }

    let viewer_frame = Frame::from_points(points).context("assembling synthetic frame")?;
    // The pose estimator reports the subject's own sides.
    Ok(normalize_sides(&viewer_frame))
}

pub fn build_frames(config: &GeneratorConfig) -> anyhow::Result<Vec<Frame>> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.frames)
        .map(|index| {
            build_frame(config, &mut rng).with_context(|| format!("generating frame {}", index))
        })
        .collect()
}

pub fn build_frame_from_config(config: &GeneratorConfig) -> anyhow::Result<Frame> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    build_frame(config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_expected_frame_count() {
        let config = GeneratorConfig {
            frames: 16,
            ..Default::default()
        };
        assert_eq!(build_frames(&config).unwrap().len(), 16);
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let config = GeneratorConfig {
            frames: 4,
            seed: 13,
            ..Default::default()
        };
        assert_eq!(build_frames(&config).unwrap(), build_frames(&config).unwrap());
    }

    #[test]
    fn generator_keeps_bone_lengths_without_noise() {
        let config = GeneratorConfig {
            noise: 0.0,
            dropout: 0.0,
            seed: 7,
            ..Default::default()
        };
        let frame = build_frame_from_config(&config).unwrap();
        assert_eq!(frame.len(), Landmark::ALL.len());

        let [shoulder, elbow, wrist] = frame
            .gather(&[Landmark::RShoulder, Landmark::RElbow, Landmark::RWrist])
            .unwrap();
        assert!(((elbow - shoulder).norm() - config.upper_arm_length).abs() < 1e-9);
        assert!(((wrist - elbow).norm() - config.forearm_length).abs() < 1e-9);
    }

    #[test]
    fn generator_labels_arms_as_the_subject_sees_them() {
        let config = GeneratorConfig {
            noise: 0.0,
            dropout: 0.0,
            ..Default::default()
        };
        let frame = build_frame_from_config(&config).unwrap();
        let neck = frame.get(Landmark::Neck).unwrap();
        // Viewer-left shoulder carries the subject's right label.
        assert!(frame.get(Landmark::RShoulder).unwrap().x < neck.x);
        assert!(frame.get(Landmark::LShoulder).unwrap().x > neck.x);
    }

    #[test]
    fn full_dropout_leaves_only_torso() {
        let config = GeneratorConfig {
            dropout: 1.0,
            ..Default::default()
        };
        let frame = build_frame_from_config(&config).unwrap();
        assert_eq!(frame.len(), 3);
        assert!(frame.contains(Landmark::MidHip));
    }

    #[test]
    fn shipped_generator_config_parses() {
        let yaml = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/generator.yaml"));
        let config: GeneratorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.frames, 300);
        assert_eq!(config.scenario.as_deref(), Some("occluded arms"));
        assert_eq!(config.torso_length, GeneratorConfig::default().torso_length);
    }

    #[test]
    fn generator_rejects_invalid_probabilities() {
        let config = GeneratorConfig {
            dropout: 1.5,
            ..Default::default()
        };
        assert!(build_frames(&config).is_err());
    }
}
