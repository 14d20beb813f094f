//! PoseCast Simulator CLI
//!
//! Scores pose prediction against synthetic ground truth, or replays a
//! recorded pose log through the tracking pipeline.

use std::path::{Path, PathBuf};

use clap::Parser;
use posecast_core::{TrackingConfig, TrackingTransformer, UpdateOutcome};
use posecast_sim::{
    evaluate, record_pose_log, MotionOracle, PredictionReport, ReplaySource, SimError,
};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// PoseCast prediction simulator
#[derive(Parser, Debug)]
#[command(name = "posecast-sim")]
#[command(about = "Measure and replay 6-DoF pose prediction", long_about = None)]
struct Args {
    /// Master seed for the synthetic motion (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Simulated duration in seconds
    #[arg(short, long, default_value = "10")]
    duration: f64,

    /// Pose sample rate in Hz
    #[arg(short, long, default_value = "200")]
    rate_hz: f64,

    /// Look-ahead in milliseconds (overrides the config; 20 when no config is given)
    #[arg(short, long)]
    prediction_ms: Option<f64>,

    /// Position noise standard deviation in meters
    #[arg(long, default_value = "0")]
    position_noise: f64,

    /// Angular velocity noise standard deviation in rad/s
    #[arg(long, default_value = "0")]
    angular_noise: f64,

    /// Tracking config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay a JSON-lines pose log instead of simulating
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Write the simulated samples to a JSON-lines pose log
    #[arg(long, conflicts_with = "replay")]
    record: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<TrackingConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => TrackingConfig::load(path)?,
        None => TrackingConfig::default(),
    };
    if let Some(ms) = args.prediction_ms {
        config.prediction_time = ms / 1000.0;
    } else if args.config.is_none() {
        config.prediction_time = 0.02;
    }
    config.validate()?;
    Ok(config)
}

fn run_replay(path: &Path, config: TrackingConfig, json: bool) -> Result<(), SimError> {
    let mut source = ReplaySource::open(path)?;
    let mut transformer = TrackingTransformer::new(config)?;

    info!(
        "Replaying {} poses from {} (min confidence {})",
        source.remaining(),
        path.display(),
        transformer.config().min_confidence
    );

    let mut applied = 0usize;
    let mut skipped = 0usize;
    let mut filtered = 0usize;
    loop {
        match transformer.update(&mut source) {
            UpdateOutcome::NoPose => break,
            UpdateOutcome::OtherSource(_) => filtered += 1,
            UpdateOutcome::BelowConfidence(_) => skipped += 1,
            UpdateOutcome::Applied(render) => {
                applied += 1;
                if json {
                    println!("{}", serde_json::to_string(&render)?);
                } else {
                    let p = render.position;
                    let q = render.rotation;
                    info!(
                        "pos=({:+.4}, {:+.4}, {:+.4}) rot=({:+.4}, {:+.4}, {:+.4}, {:+.4})",
                        p.x, p.y, p.z, q.i, q.j, q.k, q.w
                    );
                }
            }
        }
    }

    info!(
        "Applied {} poses, skipped {} below confidence, {} from other devices",
        applied, skipped, filtered
    );
    Ok(())
}

fn run_simulation(
    args: &Args,
    config: &TrackingConfig,
    seed: u64,
) -> Result<PredictionReport, SimError> {
    let mut oracle = MotionOracle::new(seed);
    oracle.set_noise(args.position_noise, args.angular_noise)?;

    if let Some(path) = &args.record {
        let ticks = (args.duration * args.rate_hz).max(0.0) as u64;
        let mut recorder = MotionOracle::new(seed);
        recorder.set_noise(args.position_noise, args.angular_noise)?;
        let samples: Vec<_> = (0..ticks)
            .map(|tick| recorder.sample_at(tick as f64 / args.rate_hz))
            .collect();
        let written = record_pose_log(path, &samples)?;
        info!("Recorded {} poses to {}", written, path.display());
    }

    let predictor = config.predictor();
    debug!("Motion profile: {:?}", oracle.profile());
    debug!(
        "Prediction time {:.1}ms (horizon {:.1}ms)",
        predictor.prediction_time() * 1000.0,
        predictor.horizon() * 1000.0
    );
    Ok(evaluate(&mut oracle, &predictor, args.rate_hz, args.duration))
}

fn print_report(report: &PredictionReport, json: bool) -> Result<(), SimError> {
    if json {
        let summary = serde_json::json!({
            "seed": report.seed,
            "samples": report.samples,
            "horizon_ms": report.horizon * 1000.0,
            "position_rms_mm": report.position.rms() * 1000.0,
            "position_max_mm": report.position.max * 1000.0,
            "angular_rms_deg": report.angular.rms().to_degrees(),
            "angular_max_deg": report.angular.max.to_degrees(),
            "baseline_position_rms_mm": report.baseline_position.rms() * 1000.0,
            "baseline_angular_rms_deg": report.baseline_angular.rms().to_degrees(),
            "improves_on_baseline": report.improves_on_baseline(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    info!(
        "Seed {} | {} samples | horizon {:.1}ms",
        report.seed,
        report.samples,
        report.horizon * 1000.0
    );
    info!(
        "  position: rms {:.3}mm max {:.3}mm (raw rms {:.3}mm)",
        report.position.rms() * 1000.0,
        report.position.max * 1000.0,
        report.baseline_position.rms() * 1000.0
    );
    info!(
        "  rotation: rms {:.4}° max {:.4}° (raw rms {:.4}°)",
        report.angular.rms().to_degrees(),
        report.angular.max.to_degrees(),
        report.baseline_angular.rms().to_degrees()
    );
    if report.improves_on_baseline() {
        info!("✓ prediction beats the raw pose");
    } else {
        error!("✗ prediction is worse than the raw pose");
    }
    Ok(())
}

fn run(args: Args) -> Result<(), SimError> {
    let config = load_config(&args)?;

    if let Some(path) = &args.replay {
        return run_replay(path, config, args.json);
    }

    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };

    let report = run_simulation(&args, &config, seed)?;
    print_report(&report, args.json)
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_conflicts_with_replay() {
        let result = Args::try_parse_from([
            "posecast-sim",
            "--replay",
            "in.jsonl",
            "--record",
            "out.jsonl",
        ]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_record_alone_accepted() {
        let args = Args::try_parse_from(["posecast-sim", "--record", "out.jsonl"]).unwrap();
        assert_eq!(args.record, Some(PathBuf::from("out.jsonl")));
        assert!(args.replay.is_none());
    }
}
