//! hexfront -- a two-player hex territory game engine.
//!
//! This binary reads console commands from stdin and writes JSON responses
//! to stdout. Match events are written to stdout as they happen, one JSON
//! object per line, interleaved with responses. Logs go to stderr.

use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use hexfront::config::EngineConfig;
use hexfront::engine::{write_event, Engine, Flow};
use hexfront::registry::MatchRegistry;
use hexfront::scheduler::Scheduler;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        tick_ms = config.tick_interval.as_millis() as u64,
        idle_ticks = config.idle_tick_limit,
        "starting hexfront"
    );

    let (registry, events) = MatchRegistry::new(config);
    let registry = Arc::new(registry);

    let printer = thread::spawn(move || {
        for event in events {
            if let Err(err) = write_event(&event, &mut io::stdout().lock()) {
                error!(error = %err, "failed to write event");
                break;
            }
        }
    });

    let scheduler = match Scheduler::spawn(Arc::clone(&registry)) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            error!(error = %err, "failed to start tick scheduler");
            return ExitCode::FAILURE;
        }
    };

    let engine = Engine::new(registry);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        match engine.handle_line(&line, &mut io::stdout().lock()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => {
                error!(error = %err, "failed to write response");
                break;
            }
        }
    }

    // The event channel closes once the last registry handle is gone.
    scheduler.shutdown();
    drop(engine);
    if printer.join().is_err() {
        error!("event printer panicked");
    }
    info!("shutdown complete");
    ExitCode::SUCCESS
}
