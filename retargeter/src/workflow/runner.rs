use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use jointcore::engine::{AngleEngine, FrameReport};
use jointcore::math::RunningStats;
use jointcore::skeleton::Frame;
use jointcore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Angles of one frame keyed by robot joint name, in the configured unit.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub joints: BTreeMap<&'static str, f64>,
    pub report: FrameReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub metrics: MetricsSnapshot,
    pub joints: BTreeMap<&'static str, RunningStats>,
    pub last: Option<WorkflowResult>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    engine: Arc<AngleEngine>,
    metrics: Arc<MetricsRecorder>,
    logger: Arc<LogManager>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        let engine = AngleEngine::new(config.to_engine_config());
        Self {
            config,
            engine: Arc::new(engine),
            metrics: Arc::new(MetricsRecorder::new()),
            logger: Arc::new(LogManager::new("runner")),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn execute(&self, frame: &Frame) -> WorkflowResult {
        let report = self.engine.process(frame);
        self.metrics.record_report(&report);

        let mut joints = BTreeMap::new();
        for angles in report.computed() {
            let angles = if self.config.degrees {
                angles.to_degrees()
            } else {
                *angles
            };
            let [(first_name, first), (second_name, second)] = angles.named();
            self.logger.record(&format!(
                "{}={:.4} {}={:.4}",
                first_name, first, second_name, second
            ));
            joints.insert(first_name, first);
            joints.insert(second_name, second);
        }

        WorkflowResult { joints, report }
    }

    /// Parses one keypoint dictionary and processes it. Undecodable frames
    /// are counted as rejected.
    pub fn execute_json(&self, json: impl AsRef<[u8]>) -> anyhow::Result<WorkflowResult> {
        match Frame::from_json(json) {
            Ok(frame) => Ok(self.execute(&frame)),
            Err(err) => {
                self.metrics.record_rejected();
                Err(err).context("decoding keypoint frame")
            }
        }
    }

    /// Processes every frame in order and folds the joint values into
    /// per-joint statistics. The summary's metrics cover this run only.
    pub fn run<I>(&self, frames: I) -> anyhow::Result<RunSummary>
    where
        I: IntoIterator<Item = anyhow::Result<Frame>>,
    {
        let before = self.metrics.snapshot();
        let mut joints: BTreeMap<&'static str, RunningStats> = BTreeMap::new();
        let mut last = None;
        for (index, frame) in frames.into_iter().enumerate() {
            let frame = frame.with_context(|| format!("reading frame {}", index))?;
            let result = self.execute(&frame);
            for (&name, &value) in &result.joints {
                joints.entry(name).or_default().push(value);
            }
            last = Some(result);
        }

        Ok(RunSummary {
            metrics: self.metrics.snapshot().since(&before),
            joints,
            last,
        })
    }
}
