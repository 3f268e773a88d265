use crate::bridge::model::AnglesModel;
use crate::generator::profile::{build_frame_from_config, GeneratorConfig};
use crate::workflow::runner::Runner;
use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{mpsc, Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{hyper::body::Bytes, http::StatusCode, Filter};

type SharedModel = Arc<RwLock<AnglesModel>>;

#[derive(Debug)]
struct IngestError;

impl warp::reject::Reject for IngestError {}

fn store(state: &SharedModel, model: AnglesModel) {
    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    *guard = model;
}

/// Decodes one keypoint dictionary from a request body and runs it. Frames
/// that fail to decode are counted by the runner and leave the served angles
/// untouched.
fn ingest_frame(
    runner: &Runner,
    state: &SharedModel,
    body: &[u8],
) -> (serde_json::Value, StatusCode) {
    match runner.execute_json(body) {
        Ok(result) => {
            let reply = json!({"status": "ok", "joints": result.joints});
            store(state, AnglesModel::from_result(&result, runner.metrics()));
            (reply, StatusCode::OK)
        }
        Err(err) => {
            warn!("ingest error: {:#}", err);
            (
                json!({"status": "rejected", "error": format!("{:#}", err)}),
                StatusCode::BAD_REQUEST,
            )
        }
    }
}

/// HTTP endpoint that accepts keypoint frames and serves the latest angles.
pub struct AngleBridge {
    state: SharedModel,
    local_addr: Option<SocketAddr>,
}

impl AngleBridge {
    /// Builds the shared state without binding a socket.
    pub fn detached() -> Self {
        Self {
            state: Arc::new(RwLock::new(AnglesModel::default())),
            local_addr: None,
        }
    }

    /// Serves `GET /angles`, `POST /ingest` and `POST /ingest-config` on a
    /// background thread. Returns once the socket is bound, or with the bind
    /// error.
    pub fn spawn(runner: Arc<Runner>, bind: SocketAddr) -> Result<Self> {
        let mut bridge = Self::detached();
        let state_for_filter = bridge.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("angles")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&*guard)
            });

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::bytes())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .map(|body: Bytes, state: SharedModel, runner: Arc<Runner>| {
                let (reply, status) = ingest_frame(&runner, &state, &body);
                warp::reply::with_status(warp::reply::json(&reply), status)
            });

        let generator_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: GeneratorConfig, state: SharedModel, runner: Arc<Runner>| async move {
                    match build_frame_from_config(&config) {
                        Ok(frame) => {
                            let result = runner.execute(&frame);
                            if let Some(name) = config.scenario.as_ref() {
                                info!("scenario {} -> {} joints", name, result.joints.len());
                            }
                            let reply = json!({"status": "ok", "joints": result.joints});
                            store(&state, AnglesModel::from_result(&result, runner.metrics()));
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&reply),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            warn!("ingest-config error: {:#}", err);
                            Err(warp::reject::custom(IngestError))
                        }
                    }
                },
            );

        let (ready_tx, ready_rx) = mpsc::channel::<Result<SocketAddr>>();
        thread::spawn(move || {
            let routes = get_route.or(ingest_route).or(generator_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ready_tx.send(Err(err).context("building bridge runtime"));
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(routes).try_bind_ephemeral(bind) {
                    Ok((addr, server)) => {
                        let _ = ready_tx.send(Ok(addr));
                        server.await;
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err.into()));
                    }
                }
            });
        });

        let local_addr = ready_rx
            .recv()
            .context("bridge thread exited before binding")?
            .with_context(|| format!("binding HTTP bridge to {}", bind))?;
        bridge.local_addr = Some(local_addr);
        Ok(bridge)
    }

    /// Address the HTTP server listens on, if one was spawned.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn publish(&self, model: AnglesModel) -> Result<()> {
        info!(
            "publishing {} joints after {} frames",
            model.joints.len(),
            model.metrics.frames
        );
        store(&self.state, model);
        Ok(())
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> AnglesModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;

    #[test]
    fn bridge_updates_state() {
        let runner = Runner::new(WorkflowConfig::default());
        let bridge = AngleBridge::detached();
        let frame = build_frame_from_config(&GeneratorConfig {
            dropout: 0.0,
            ..Default::default()
        })
        .unwrap();
        let result = runner.execute(&frame);
        bridge
            .publish(AnglesModel::from_result(&result, runner.metrics()))
            .unwrap();

        let snapshot = bridge.snapshot();
        assert_eq!(snapshot.joints, result.joints);
        assert_eq!(snapshot.metrics.frames, 1);
        assert!(snapshot.report.is_some());
    }

    #[test]
    fn ingest_counts_undecodable_frames() {
        let runner = Runner::new(WorkflowConfig::default());
        let state: SharedModel = Arc::new(RwLock::new(AnglesModel::default()));

        let (reply, status) = ingest_frame(&runner, &state, br#"{"1": "not a point"}"#);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["status"], "rejected");
        assert_eq!(runner.metrics().rejected, 1);
        assert!(state.read().unwrap().report.is_none());

        let body = br#"{
            "1": [0.0, 0.0, 0.0], "8": [0.0, -1.0, 0.0],
            "2": [-0.2, 0.0, 0.0], "3": [-0.2, -0.5, 0.0],
            "5": [0.2, 0.0, 0.0], "6": [0.2, -0.5, 0.0]
        }"#;
        let (reply, status) = ingest_frame(&runner, &state, body);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["joints"].as_object().map(|joints| joints.len()), Some(4));
        assert_eq!(state.read().unwrap().metrics.frames, 1);
    }

    #[test]
    fn spawn_reports_bind_failure() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = occupied.local_addr().unwrap();
        let runner = Arc::new(Runner::new(WorkflowConfig::default()));
        let err = AngleBridge::spawn(runner, addr).err().unwrap();
        assert!(format!("{:#}", err).contains("binding HTTP bridge"));
    }

    #[test]
    fn spawn_binds_requested_interface() {
        let runner = Arc::new(Runner::new(WorkflowConfig::default()));
        let bridge =
            AngleBridge::spawn(runner, SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
        let addr = bridge.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }
}
