use anyhow::Context;
use bridge::bridge::AngleBridge;
use bridge::model::AnglesModel;
use clap::Parser;
use generator::profile::{build_frames, GeneratorConfig};
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::replay::{open_frames, read_frames};
use workflow::runner::{RunSummary, Runner};

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Skeleton keypoints to humanoid arm joint angles")]
struct Args {
    /// Process a batch of synthetic skeleton frames and log a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Load the synthetic generator config from YAML
    #[arg(long)]
    generator: Option<PathBuf>,
    /// Replay frames from a JSON-lines file (`-` for stdin)
    #[arg(long)]
    frames: Option<PathBuf>,
    /// Keep the estimator's left/right labels as they arrive
    #[arg(long, default_value_t = false)]
    keep_sides: bool,
    /// Report angles in degrees
    #[arg(long, default_value_t = false)]
    degrees: bool,
    #[arg(long, default_value_t = 120)]
    frame_count: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
    /// Keep the HTTP bridge alive for incoming keypoint frames
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn load_generator_config(args: &Args) -> anyhow::Result<GeneratorConfig> {
    match &args.generator {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading generator config {}", path.display()))?;
            serde_yaml::from_str(&contents)
                .with_context(|| format!("parsing generator config {}", path.display()))
        }
        None => Ok(GeneratorConfig {
            frames: args.frame_count,
            seed: args.seed,
            ..Default::default()
        }),
    }
}

fn print_summary(label: &str, summary: &RunSummary) {
    println!(
        "{} -> frames {}, computed {}, skipped {}, failed {}, rejected {}",
        label,
        summary.metrics.frames,
        summary.metrics.computed,
        summary.metrics.skipped,
        summary.metrics.failed,
        summary.metrics.rejected
    );
    for (joint, stats) in &summary.joints {
        if let Some((min, max)) = stats.range() {
            println!(
                "  {:<15} mean {:>9.4}  range [{:.4}, {:.4}]  samples {}",
                joint, stats.mean, min, max, stats.count
            );
        }
    }
}

fn publish_last(bridge: &AngleBridge, runner: &Runner, summary: &RunSummary) -> anyhow::Result<()> {
    match &summary.last {
        Some(result) => bridge.publish(AnglesModel::from_result(result, runner.metrics())),
        None => Ok(()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.keep_sides, args.degrees, args.bind)
    };

    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let bridge = if args.serve {
        AngleBridge::spawn(runner.clone(), workflow_config.bind)?
    } else {
        AngleBridge::detached()
    };

    if args.offline {
        let generator_config = load_generator_config(&args)?;
        let frames = build_frames(&generator_config)?;
        let summary = runner.run(frames.into_iter().map(Ok))?;
        print_summary("Offline run", &summary);
        publish_last(&bridge, &runner, &summary)?;

        let report = format!(
            "frames={} computed={} skipped={} failed={} seed={}\n",
            summary.metrics.frames,
            summary.metrics.computed,
            summary.metrics.skipped,
            summary.metrics.failed,
            generator_config.seed
        );
        let report_path = PathBuf::from("tools/data/offline_angles.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        file.write_all(report.as_bytes())?;
    }

    if let Some(path) = &args.frames {
        let summary = runner.run(read_frames(open_frames(path)?))?;
        print_summary(&format!("Replay {}", path.display()), &summary);
        publish_last(&bridge, &runner, &summary)?;
    }

    if args.serve {
        let addr = bridge.local_addr().unwrap_or(workflow_config.bind);
        info!("HTTP bridge on {} (Ctrl+C to stop)", addr);
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
