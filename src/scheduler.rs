//! Background tick scheduler.
//!
//! Wakes on a fixed interval that is much shorter than the per-match tick,
//! resolves every match whose tick has come due, and runs eviction. A due
//! tick is therefore honored within one wake interval.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::game::now_millis;
use crate::registry::MatchRegistry;

/// Handle to the running scheduler thread. Dropping it stops the loop.
pub struct Scheduler {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Starts the scheduling loop for `registry` on a dedicated thread.
    pub fn spawn(registry: Arc<MatchRegistry>) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("tick-scheduler".to_string())
            .spawn(move || run(&registry, &flag))?;
        Ok(Scheduler {
            stop,
            handle: Some(handle),
        })
    }

    /// Stops the loop after its current wake and waits for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("tick scheduler thread panicked");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn run(registry: &MatchRegistry, stop: &AtomicBool) {
    let wake = registry.config().scheduler_wake;
    info!(wake_ms = wake.as_millis() as u64, "tick scheduler started");

    while !stop.load(Ordering::Relaxed) {
        let started = Instant::now();
        let report = registry.run_due(now_millis());
        if report.resolved > 0 || report.failed > 0 || !report.evicted.is_empty() {
            debug!(
                resolved = report.resolved,
                failed = report.failed,
                evicted = report.evicted.len(),
                active = registry.count_active(),
                "scheduler wake"
            );
        }
        thread::sleep(wake.saturating_sub(started.elapsed()));
    }

    info!("tick scheduler stopped");
}
