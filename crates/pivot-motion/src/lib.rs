pub mod geometry;
pub mod replay;
pub mod simulator;
pub mod tracker;
pub mod types;

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracker::RotationTracker;
use types::{MotionSample, RotationSummary};

/// Anything that can hand out the latest motion sample once per tick.
pub trait MotionSource: Send {
    /// Latest sample, or `None` when nothing is available this tick.
    fn next_sample(&mut self) -> Option<MotionSample>;

    /// Whether the source will never produce another sample.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Commands sent to the tracking task.
enum TrackerCommand {
    Reset,
}

/// Runs a [`RotationTracker`] against a [`MotionSource`] at a fixed cadence.
///
/// The tracker lives on a single background task; ticks and reset requests
/// are handled in one loop, so they never interleave.
pub struct TrackerClient {
    summary_rx: watch::Receiver<RotationSummary>,
    command_tx: mpsc::UnboundedSender<TrackerCommand>,
    task: tokio::task::JoinHandle<()>,
}

impl TrackerClient {
    /// Start polling `source` every `tick_interval`.
    pub fn spawn(source: impl MotionSource + 'static, tick_interval: Duration) -> Self {
        let (summary_tx, summary_rx) = watch::channel(RotationSummary::default());
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        tracing::info!(?tick_interval, "Starting rotation tracking");
        let task = tokio::spawn(tracking_loop(source, summary_tx, command_rx, tick_interval));

        Self {
            summary_rx,
            command_tx,
            task,
        }
    }

    /// Latest rotation summary (non-blocking).
    pub fn summary(&self) -> RotationSummary {
        *self.summary_rx.borrow()
    }

    /// Receiver that is notified on every published summary.
    pub fn subscribe(&self) -> watch::Receiver<RotationSummary> {
        self.summary_rx.clone()
    }

    /// Zero the accumulated rotation.
    pub fn reset(&self) {
        let _ = self.command_tx.send(TrackerCommand::Reset);
    }

    /// Wait until the source is exhausted and return the final summary.
    pub async fn finished(self) -> RotationSummary {
        if let Err(e) = self.task.await {
            tracing::error!(?e, "Tracking task failed");
        }
        *self.summary_rx.borrow()
    }
}

/// Background task: poll the source, update the tracker, publish summaries.
async fn tracking_loop(
    mut source: impl MotionSource,
    summary_tx: watch::Sender<RotationSummary>,
    mut command_rx: mpsc::UnboundedReceiver<TrackerCommand>,
    tick_interval: Duration,
) {
    let mut tracker = RotationTracker::new();
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sample_count: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if source.is_exhausted() {
                    tracing::info!(sample_count, total = tracker.total(), "Motion source exhausted");
                    break;
                }

                let Some(sample) = source.next_sample() else {
                    continue;
                };

                let rotations_before = tracker.summary().rotations;
                tracker.update(sample);
                let summary = tracker.summary();
                if summary.rotations != rotations_before {
                    tracing::info!(
                        rotations = summary.rotations,
                        direction = %summary.direction,
                        "Revolution count changed"
                    );
                }
                if summary_tx.send(summary).is_err() {
                    tracing::debug!("Tracker client dropped, stopping");
                    break;
                }

                sample_count += 1;
                if sample_count % 1000 == 0 {
                    tracing::debug!(sample_count, "Motion samples processed");
                }
            }
            Some(cmd) = command_rx.recv() => {
                match cmd {
                    TrackerCommand::Reset => {
                        tracker.reset();
                        let _ = summary_tx.send(tracker.summary());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;
    use pivot_config::SimulatorConfig;
    use simulator::SpinSimulator;

    fn one_turn_per_second() -> SimulatorConfig {
        SimulatorConfig {
            yaw_rate_dps: 360.0,
            tilt_deg: 20.0,
            tilt_rate_dps: 0.0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn finished_reports_accumulated_turns() {
        // 2.5 s of a 360°/s turn at 10 ms ticks.
        let source = SpinSimulator::new(&one_turn_per_second(), 0.01).with_max_samples(251);
        let client = TrackerClient::spawn(source, Duration::from_millis(10));

        let summary = client.finished().await;
        assert_eq!(summary.rotations, 2);
        assert!((summary.total - 2.5 * std::f64::consts::TAU).abs() < 1e-2);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_zeroes_published_total() {
        let source = SpinSimulator::new(&one_turn_per_second(), 0.01);
        let client = TrackerClient::spawn(source, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(1205)).await;
        assert_eq!(client.summary().rotations, 1);

        let mut updates = client.subscribe();
        updates.borrow_and_update();
        client.reset();
        updates.changed().await.unwrap();
        assert!(updates.borrow().total.abs() < 0.1);
    }

    struct Silent;

    impl MotionSource for Silent {
        fn next_sample(&mut self) -> Option<MotionSample> {
            None
        }
    }

    #[tokio::test(start_paused = true)]
    async fn missing_samples_leave_summary_untouched() {
        let client = TrackerClient::spawn(Silent, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(client.summary(), RotationSummary::default());
    }

    struct Still(u32);

    impl MotionSource for Still {
        fn next_sample(&mut self) -> Option<MotionSample> {
            self.0 = self.0.checked_sub(1)?;
            Some(MotionSample::from_device_attitude(Mat3::IDENTITY))
        }

        fn is_exhausted(&self) -> bool {
            self.0 == 0
        }
    }

    #[tokio::test(start_paused = true)]
    async fn still_device_stays_balanced() {
        let client = TrackerClient::spawn(Still(50), Duration::from_millis(10));
        let summary = client.finished().await;
        assert_eq!(summary.total, 0.0);
    }
}
