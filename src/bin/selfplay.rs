//! Self-play game generation CLI.
//!
//! Plays random-policy games and outputs the records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --max-ticks N   Ticks before a game is abandoned (default: 500)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress and summary logging

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use hexfront::selfplay::{self, SelfPlayConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let parsed = match flag {
            "--games" => value(&args, &mut i).map(|v| config.num_games = v),
            "--threads" => value(&args, &mut i).map(|v| config.threads = v),
            "--seed" => value(&args, &mut i).map(|v| config.seed = v),
            "--max-ticks" => value(&args, &mut i).map(|v| config.max_ticks = v),
            "--output" => value(&args, &mut i).map(|v| output_path = Some(v)),
            "--quiet" => {
                config.quiet = true;
                Ok(())
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => Err(format!("unknown argument: {}", other)),
        };
        if let Err(msg) = parsed {
            error!("{}", msg);
            print_usage();
            return ExitCode::FAILURE;
        }
        i += 1;
    }

    if !config.quiet {
        info!(
            games = config.num_games,
            threads = config.threads,
            seed = config.seed,
            max_ticks = config.max_ticks,
            "starting self-play"
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config);
    let elapsed = start.elapsed();

    if !config.quiet {
        let summary = selfplay::summarize(&games);
        info!(
            games = summary.games,
            host_wins = summary.host_wins,
            challenger_wins = summary.challenger_wins,
            unfinished = summary.unfinished,
            avg_ticks = format!("{:.1}", summary.avg_ticks),
            elapsed_s = format!("{:.1}", elapsed.as_secs_f64()),
            "self-play complete"
        );
    }

    let written = match &output_path {
        Some(path) => File::create(path)
            .and_then(|file| selfplay::write_jsonl(&games, &mut BufWriter::new(file))),
        None => selfplay::write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    if let Err(err) = written {
        error!(error = %err, "failed to write output");
        return ExitCode::FAILURE;
    }
    if let (Some(path), false) = (&output_path, config.quiet) {
        info!(path = %path, games = games.len(), "wrote games");
    }
    ExitCode::SUCCESS
}

/// Consumes the value following the flag at `args[*i]`.
fn value<T: FromStr>(args: &[String], i: &mut usize) -> Result<T, String> {
    let flag = &args[*i];
    *i += 1;
    let raw = args
        .get(*i)
        .ok_or_else(|| format!("missing value for {}", flag))?;
    raw.parse()
        .map_err(|_| format!("invalid {} value: {}", flag, raw))
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --max-ticks N    Ticks before a game is abandoned (default: 500)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary logging");
    eprintln!("  --help           Show this help");
}
