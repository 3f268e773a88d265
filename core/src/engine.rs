//! Per-frame dispatch: lateral normalization followed by one formula per
//! configured joint group.

use serde::Serialize;

use crate::kinematics::{JointAngles, JointGroup};
use crate::prelude::{AngleError, EngineConfig};
use crate::skeleton::{normalize_sides, Frame, Landmark};
use crate::telemetry::LogManager;

/// What happened to one joint group in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    Computed(JointAngles),
    /// A required landmark was absent. Normal operation, not an error.
    Skipped { missing: Landmark },
    Failed {
        #[serde(serialize_with = "serialize_error")]
        error: AngleError,
    },
}

fn serialize_error<S: serde::Serializer>(err: &AngleError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub outcomes: Vec<(JointGroup, GroupOutcome)>,
}

impl FrameReport {
    pub fn outcome(&self, group: JointGroup) -> Option<&GroupOutcome> {
        self.outcomes
            .iter()
            .find(|(candidate, _)| *candidate == group)
            .map(|(_, outcome)| outcome)
    }

    pub fn angles(&self, group: JointGroup) -> Option<&JointAngles> {
        match self.outcome(group)? {
            GroupOutcome::Computed(angles) => Some(angles),
            _ => None,
        }
    }

    pub fn computed(&self) -> impl Iterator<Item = &JointAngles> {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            GroupOutcome::Computed(angles) => Some(angles),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &AngleError> {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            GroupOutcome::Failed { error } => Some(error),
            _ => None,
        })
    }
}

/// Stateless angle engine; every call to [`AngleEngine::process`] depends on
/// its frame alone.
pub struct AngleEngine {
    config: EngineConfig,
    logger: LogManager,
}

impl AngleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("engine"),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn process(&self, frame: &Frame) -> FrameReport {
        let normalized;
        let frame = if self.config.normalize_sides {
            normalized = normalize_sides(frame);
            &normalized
        } else {
            frame
        };

        let outcomes = self
            .config
            .groups
            .iter()
            .map(|&group| (group, self.solve_group(group, frame)))
            .collect();
        FrameReport { outcomes }
    }

    fn solve_group(&self, group: JointGroup, frame: &Frame) -> GroupOutcome {
        let points = match frame.gather(&group.landmarks()) {
            Ok(points) => points,
            Err(missing) => {
                self.logger
                    .detail(&format!("{} skipped, {} not detected", group, missing));
                return GroupOutcome::Skipped { missing };
            }
        };

        match group.solve(&points) {
            Ok(angles) => GroupOutcome::Computed(angles),
            Err(error) => {
                self.logger.fault(&error.to_string());
                GroupOutcome::Failed { error }
            }
        }
    }
}

impl Default for AngleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
