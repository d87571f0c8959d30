//! The theremin itself: ties tracking, mapping and synthesis together.

use crate::audio::AudioHandle;
use crate::config::{HandControl, ThereminConfig};
use crate::mapping;
use crate::snapshot::SnapshotRenderer;
use crate::synth::{SharedParams, Waveform};
use crate::tracking::HandTracker;
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How long `stop` waits for the processing thread before giving up on it.
const JOIN_TIMEOUT: Duration = Duration::from_secs(2);

pub type TrackerFactory = Box<dyn Fn() -> Result<Box<dyn HandTracker>> + Send + Sync>;

/// Point-in-time view of the engine, served by `/api/status`.
#[derive(Debug, Clone, Serialize)]
pub struct ThereminStatus {
    pub is_running: bool,
    pub frequency: f32,
    pub volume: f32,
    pub wave_type: Waveform,
    pub left_hand_detected: bool,
    pub right_hand_detected: bool,
    pub left_hand_controls: HandControl,
    pub right_hand_controls: HandControl,
}

pub struct Theremin {
    config: ThereminConfig,
    params: Arc<SharedParams>,
    audio: AudioHandle,
    tracker_factory: TrackerFactory,
    running: Arc<AtomicBool>,
    left_detected: Arc<AtomicBool>,
    right_detected: Arc<AtomicBool>,
    latest_frame: Arc<Mutex<Option<String>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Theremin {
    /// Build the engine around an already-spawned audio thread and a tracker
    /// factory. The factory runs on each `start`, so a stopped engine can be
    /// restarted with a fresh tracker.
    pub fn new(
        config: ThereminConfig,
        params: Arc<SharedParams>,
        audio: AudioHandle,
        tracker_factory: TrackerFactory,
    ) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        info!(
            left = ?config.left_hand_controls,
            right = ?config.right_hand_controls,
            "theremin initialized"
        );
        Ok(Self {
            config,
            params,
            audio,
            tracker_factory,
            running: Arc::new(AtomicBool::new(false)),
            left_detected: Arc::new(AtomicBool::new(false)),
            right_detected: Arc::new(AtomicBool::new(false)),
            latest_frame: Arc::new(Mutex::new(None)),
            worker: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ThereminConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Start tracking and sound. Idempotent; a second call while running is
    /// a no-op. The tracker is acquired before the audio device so a failed
    /// setup leaves nothing behind.
    pub fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let tracker = match (self.tracker_factory)() {
            Ok(tracker) => tracker,
            Err(err) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(err.context("acquiring hand tracker"));
            }
        };
        if let Err(err) = self.audio.start() {
            self.running.store(false, Ordering::SeqCst);
            return Err(err.context("starting audio"));
        }

        let handle = self.spawn_worker(tracker);
        *self.worker.lock().unwrap() = Some(handle);
        info!("theremin started");
        Ok(())
    }

    /// Stop sound and tracking. Joins the processing thread with a bounded
    /// timeout; the audio stream is stopped regardless.
    pub fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let stop_result = self.audio.stop();

        if let Some(handle) = self.worker.lock().unwrap().take() {
            let deadline = Instant::now() + JOIN_TIMEOUT;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                warn!("processing thread did not stop in time; detaching");
            }
        }

        info!("theremin stopped");
        stop_result
    }

    pub fn set_wave_type(&self, waveform: Waveform) {
        self.params.set_waveform(waveform);
        info!(%waveform, "waveform changed");
    }

    /// Latest rendered preview frame as base64 JPEG, if any.
    pub fn latest_frame(&self) -> Option<String> {
        self.latest_frame.lock().unwrap().clone()
    }

    pub fn status(&self) -> ThereminStatus {
        ThereminStatus {
            is_running: self.is_running(),
            frequency: self.params.frequency(),
            volume: self.params.volume(),
            wave_type: self.params.waveform(),
            left_hand_detected: self.left_detected.load(Ordering::Relaxed),
            right_hand_detected: self.right_detected.load(Ordering::Relaxed),
            left_hand_controls: self.config.left_hand_controls,
            right_hand_controls: self.config.right_hand_controls,
        }
    }

    fn spawn_worker(&self, mut tracker: Box<dyn HandTracker>) -> JoinHandle<()> {
        let config = self.config.clone();
        let params = Arc::clone(&self.params);
        let running = Arc::clone(&self.running);
        let left_detected = Arc::clone(&self.left_detected);
        let right_detected = Arc::clone(&self.right_detected);
        let latest_frame = Arc::clone(&self.latest_frame);
        let renderer = SnapshotRenderer::new(
            config.preview_width,
            config.preview_height,
            config.frame_width,
            config.frame_height,
        );
        let poll_interval = Duration::from_millis(config.poll_interval_ms);

        thread::Builder::new()
            .name("tracking".into())
            .spawn(move || {
                info!("processing loop started");
                while running.load(Ordering::Relaxed) {
                    match tracker.poll() {
                        Ok(hands) => {
                            let mapped = mapping::map_hands(&config, &hands);
                            params.set_frequency(mapped.frequency);
                            params.set_volume(mapped.volume);
                            left_detected.store(hands.left.is_some(), Ordering::Relaxed);
                            right_detected.store(hands.right.is_some(), Ordering::Relaxed);

                            match renderer.render(&hands) {
                                Ok(frame) => {
                                    *latest_frame.lock().unwrap() = Some(frame);
                                }
                                Err(err) => warn!(%err, "preview render failed"),
                            }
                        }
                        Err(err) => {
                            warn!(%err, "tracking poll failed; skipping frame");
                        }
                    }
                    thread::sleep(poll_interval);
                }
                // Leave silence behind, whatever the last frame said.
                params.set_volume(0.0);
                info!("processing loop finished");
            })
            .expect("spawning tracking thread")
    }
}

impl Drop for Theremin {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(%err, "stopping theremin on drop");
        }
    }
}
