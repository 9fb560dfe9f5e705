//! Background worker that keeps re-rendering a map and publishes the latest
//! grid for readers on other threads.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{RenderSettings, WorkerConfig};
use crate::instance::MapInstance;
use crate::map::{Map, RenderError};

/// Per-frame render parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub seed: u64,
    pub settings: RenderSettings,
}

impl Status {
    pub fn new(seed: u64, settings: RenderSettings) -> Self {
        Self { seed, settings }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    pub seed: u64,
    pub duration_ms: f64,
    pub status_changed: bool,
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("worker thread panicked")]
    Panicked,
}

/// Everything readers and the worker exchange, behind one lock.
struct Slots {
    current: MapInstance,
    status: Status,
    pending: Option<Status>,
    frames: u64,
    history: VecDeque<FrameStats>,
}

struct Shared {
    slots: Mutex<Slots>,
    running: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the pending status if any, else keep rendering the previous one.
    fn take_status(&self) -> (Status, bool) {
        let mut slots = self.lock();
        match slots.pending.take() {
            Some(status) => (status, true),
            None => (slots.status, false),
        }
    }

    fn publish(&self, instance: MapInstance, status: Status, stats: FrameStats, limit: usize) {
        let mut slots = self.lock();
        slots.current = instance;
        slots.status = status;
        slots.frames = stats.frame;
        slots.history.push_back(stats);
        while slots.history.len() > limit {
            slots.history.pop_front();
        }
    }
}

pub struct Worker {
    map: Arc<Map>,
    config: WorkerConfig,
    shared: Arc<Shared>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    /// Renders `status` once up front so a snapshot is always available.
    pub fn new(map: Map, status: Status, config: WorkerConfig) -> Result<Self, WorkerError> {
        let current = map.render(&status.settings, status.seed)?;
        let shared = Shared {
            slots: Mutex::new(Slots {
                current,
                status,
                pending: None,
                frames: 0,
                history: VecDeque::with_capacity(config.stats_history),
            }),
            running: AtomicBool::new(false),
        };
        Ok(Self {
            map: Arc::new(map),
            config,
            shared: Arc::new(shared),
            handle: Mutex::new(None),
        })
    }

    pub fn start(&self) -> Result<(), WorkerError> {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if handle.is_some() {
            return Err(WorkerError::AlreadyRunning);
        }
        self.shared.running.store(true, Ordering::SeqCst);

        let map = Arc::clone(&self.map);
        let shared = Arc::clone(&self.shared);
        let config = self.config;
        let spawned = thread::Builder::new()
            .name("worldbuilder-worker".into())
            .spawn(move || run_loop(&map, &shared, config));
        match spawned {
            Ok(join) => {
                *handle = Some(join);
                info!(min_frame_ms = config.min_frame_ms, "worker started");
                Ok(())
            }
            Err(err) => {
                self.shared.running.store(false, Ordering::SeqCst);
                Err(WorkerError::Spawn(err))
            }
        }
    }

    /// Ask the loop to exit and wait for the iteration in flight to finish.
    pub fn stop(&self) -> Result<(), WorkerError> {
        self.shared.running.store(false, Ordering::SeqCst);
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(join) = handle {
            join.join().map_err(|_| WorkerError::Panicked)?;
            info!(frames = self.frame_count(), "worker stopped");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Deposit a status for the next frame. An unconsumed status is replaced.
    pub fn set_new_status(&self, status: Status) -> Result<(), WorkerError> {
        if let Err(err) = status.settings.validate() {
            warn!(%err, "rejected worker status");
            return Err(err.into());
        }
        let mut slots = self.shared.lock();
        if slots.pending.replace(status).is_some() {
            info!(seed = status.seed, "replaced pending status before it was consumed");
        } else {
            info!(seed = status.seed, "queued new status");
        }
        Ok(())
    }

    pub fn get_current_snapshot(&self) -> MapInstance {
        self.shared.lock().current.clone()
    }

    /// The status the current snapshot was rendered with.
    pub fn current_status(&self) -> Status {
        self.shared.lock().status
    }

    pub fn frame_count(&self) -> u64 {
        self.shared.lock().frames
    }

    pub fn recent_stats(&self) -> Vec<FrameStats> {
        self.shared.lock().history.iter().cloned().collect()
    }

    pub fn average_render_ms(&self) -> Option<f64> {
        let slots = self.shared.lock();
        if slots.history.is_empty() {
            return None;
        }
        let total: f64 = slots.history.iter().map(|s| s.duration_ms).sum();
        Some(total / slots.history.len() as f64)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            error!(%err, "worker did not shut down cleanly");
        }
    }
}

fn run_loop(map: &Map, shared: &Shared, config: WorkerConfig) {
    let budget = Duration::from_millis(config.min_frame_ms);
    let mut frame = shared.lock().frames;

    while shared.running.load(Ordering::SeqCst) {
        let start = Instant::now();
        let (status, changed) = shared.take_status();
        if changed {
            info!(seed = status.seed, "worker picked up new status");
        }

        match map.render(&status.settings, status.seed) {
            Ok(instance) => {
                frame += 1;
                let stats = FrameStats {
                    frame,
                    seed: status.seed,
                    duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
                    status_changed: changed,
                };
                shared.publish(instance, status, stats, config.stats_history);
            }
            Err(err) => error!(%err, seed = status.seed, "render failed, keeping previous frame"),
        }

        let elapsed = start.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
    }
}
