use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pivot_config::{AppConfig, LabelStyle};
use pivot_motion::replay::ReplaySource;
use pivot_motion::simulator::SpinSimulator;
use pivot_motion::types::RotationSummary;
use pivot_motion::TrackerClient;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Count full turns about gravity from device motion.
#[derive(Parser, Debug)]
#[command(name = "pivot", version)]
struct Args {
    /// Rotation count rendering: "full" or "leading-digit"
    #[arg(long, global = true)]
    label_style: Option<LabelStyle>,

    /// Milliseconds between samples (overrides config)
    #[arg(long, global = true)]
    tick_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Track a synthetic device spinning in place
    Simulate {
        /// Turn rate in degrees per second, positive is clockwise
        #[arg(long, allow_hyphen_values = true)]
        yaw_rate_dps: Option<f32>,

        /// Initial screen tilt from flat, in degrees
        #[arg(long, allow_hyphen_values = true)]
        tilt_deg: Option<f32>,

        /// Tilt change in degrees per second
        #[arg(long, allow_hyphen_values = true)]
        tilt_rate_dps: Option<f32>,

        /// How long to run
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,
    },
    /// Track a recorded session (12 values per line: m11..m33 gx gy gz)
    Replay {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pivot=info,pivot_motion=info,pivot_config=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = pivot_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    // Write out defaults on first run so they can be edited.
    if matches!(pivot_config::config_path(), Ok(path) if !path.exists()) {
        if let Err(e) = pivot_config::save_config(&config) {
            warn!(?e, "Failed to save default config");
        }
    }
    if let Some(style) = args.label_style {
        config.display.label_style = style;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tracker.tick_interval_ms = tick_ms;
    }

    let tick_interval = Duration::from_millis(config.tracker.tick_interval_ms.max(1));
    info!(?tick_interval, label_style = %config.display.label_style, "Config loaded");

    let client = match args.command {
        Command::Simulate {
            yaw_rate_dps,
            tilt_deg,
            tilt_rate_dps,
            seconds,
        } => {
            let mut sim = config.simulator.clone();
            sim.yaw_rate_dps = yaw_rate_dps.unwrap_or(sim.yaw_rate_dps);
            sim.tilt_deg = tilt_deg.unwrap_or(sim.tilt_deg);
            sim.tilt_rate_dps = tilt_rate_dps.unwrap_or(sim.tilt_rate_dps);

            let samples = (f64::from(seconds.max(0.0)) / tick_interval.as_secs_f64()).ceil() as u64;
            info!(?sim, samples, "Simulating device motion");
            let source = SpinSimulator::new(&sim, tick_interval.as_secs_f32()).with_max_samples(samples);
            TrackerClient::spawn(source, tick_interval)
        }
        Command::Replay { file } => {
            let reader = std::fs::File::open(&file)
                .with_context(|| format!("Could not open recording {}", file.display()))?;
            let source = ReplaySource::from_reader(BufReader::new(reader))
                .with_context(|| format!("Could not parse recording {}", file.display()))?;
            info!(?file, samples = source.len(), "Replaying recording");
            TrackerClient::spawn(source, tick_interval)
        }
    };

    let style = config.display.label_style;
    let mut updates = client.subscribe();
    let mut last_label = RotationSummary::default().label(style);
    println!("{last_label}");
    info!("Press Enter to reset the rotation count");

    let mut resets = spawn_reset_reader();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let label = updates.borrow_and_update().label(style);
                if label != last_label {
                    println!("{label}");
                    last_label = label;
                }
            }
            reset = resets.recv(), if stdin_open => {
                match reset {
                    Some(()) => client.reset(),
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    let summary = client.summary();
    info!(
        total = summary.total,
        degrees = summary.total.to_degrees(),
        "Tracking finished"
    );
    println!("{}", summary.label(style));

    Ok(())
}

/// Forward each line typed on stdin as a reset request.
///
/// The read blocks on a plain OS thread that is never joined, so a pending
/// read does not keep the process alive once tracking has finished.
fn spawn_reset_reader() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = std::thread::Builder::new()
        .name("stdin-reset".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if let Err(e) = line {
                    warn!(?e, "Failed to read stdin, reset disabled");
                    break;
                }
                if tx.send(()).is_err() {
                    break;
                }
            }
            debug!("Stdin closed");
        });
    if let Err(e) = spawned {
        warn!(?e, "Could not start stdin reader, reset disabled");
    }
    rx
}
