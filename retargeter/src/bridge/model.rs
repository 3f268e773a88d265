use crate::workflow::runner::WorkflowResult;
use jointcore::engine::FrameReport;
use jointcore::telemetry::MetricsSnapshot;
use serde::Serialize;
use std::collections::BTreeMap;

/// Latest angles served to robot-side consumers.
#[derive(Debug, Clone, Serialize, Default)]
pub struct AnglesModel {
    pub joints: BTreeMap<&'static str, f64>,
    pub report: Option<FrameReport>,
    pub metrics: MetricsSnapshot,
}

impl AnglesModel {
    pub fn from_result(result: &WorkflowResult, metrics: MetricsSnapshot) -> Self {
        Self {
            joints: result.joints.clone(),
            report: Some(result.report.clone()),
            metrics,
        }
    }
}
