use anyhow::Context;
use jointcore::kinematics::JointGroup;
use jointcore::prelude::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Swap arm landmarks from the estimator's subject-relative labels.
    pub normalize_sides: bool,
    pub groups: Vec<JointGroup>,
    /// Report angles in degrees instead of radians.
    pub degrees: bool,
    pub bind: SocketAddr,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            normalize_sides: true,
            groups: JointGroup::ALL.to_vec(),
            degrees: false,
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        if config.groups.is_empty() {
            anyhow::bail!("workflow config {} enables no joint groups", path_ref.display());
        }
        Ok(config)
    }

    pub fn from_args(keep_sides: bool, degrees: bool, bind: SocketAddr) -> Self {
        Self {
            normalize_sides: !keep_sides,
            degrees,
            bind,
            ..Default::default()
        }
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            normalize_sides: self.normalize_sides,
            groups: self.groups.clone(),
        }
    }
}
