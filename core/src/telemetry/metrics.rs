use serde::Serialize;
use std::sync::Mutex;

use crate::engine::{FrameReport, GroupOutcome};

/// Running counters over every processed frame.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub frames: usize,
    pub computed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Frames that could not be decoded and never reached the engine.
    pub rejected: usize,
}

impl MetricsSnapshot {
    /// Counts accumulated since `earlier` was taken.
    pub fn since(&self, earlier: &MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            frames: self.frames.saturating_sub(earlier.frames),
            computed: self.computed.saturating_sub(earlier.computed),
            skipped: self.skipped.saturating_sub(earlier.skipped),
            failed: self.failed.saturating_sub(earlier.failed),
            rejected: self.rejected.saturating_sub(earlier.rejected),
        }
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_report(&self, report: &FrameReport) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames += 1;
            for (_, outcome) in &report.outcomes {
                match outcome {
                    GroupOutcome::Computed(_) => metrics.computed += 1,
                    GroupOutcome::Skipped { .. } => metrics.skipped += 1,
                    GroupOutcome::Failed { .. } => metrics.failed += 1,
                }
            }
        }
    }

    /// Counts a frame that never reached the engine, e.g. one that failed to parse.
    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::{JointAngles, JointGroup};
    use crate::prelude::AngleError;
    use crate::skeleton::Landmark;

    #[test]
    fn counts_each_outcome_kind() {
        let recorder = MetricsRecorder::new();
        let report = FrameReport {
            outcomes: vec![
                (
                    JointGroup::LeftShoulder,
                    GroupOutcome::Computed(JointAngles::new(JointGroup::LeftShoulder, 0.1, 0.2)),
                ),
                (
                    JointGroup::LeftElbow,
                    GroupOutcome::Skipped {
                        missing: Landmark::LWrist,
                    },
                ),
                (
                    JointGroup::RightElbow,
                    GroupOutcome::Failed {
                        error: AngleError::DegenerateGeometry {
                            group: JointGroup::RightElbow,
                            angle: "RElbowYaw",
                        },
                    },
                ),
            ],
        };

        recorder.record_report(&report);
        recorder.record_rejected();
        assert_eq!(
            recorder.snapshot(),
            MetricsSnapshot {
                frames: 1,
                computed: 1,
                skipped: 1,
                failed: 1,
                rejected: 1,
            }
        );
    }

    #[test]
    fn snapshot_difference_covers_later_frames_only() {
        let recorder = MetricsRecorder::new();
        recorder.record_report(&FrameReport::default());
        recorder.record_rejected();
        let before = recorder.snapshot();
        recorder.record_report(&FrameReport::default());
        assert_eq!(
            recorder.snapshot().since(&before),
            MetricsSnapshot {
                frames: 1,
                ..Default::default()
            }
        );
    }
}
