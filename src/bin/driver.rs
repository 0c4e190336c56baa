//! Measurement driver: replays a binary trace against one heap variant
//! and prints the average microseconds per iteration.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use heap_bench::trace::{replay_file, ReplayConfig};
use heap_bench::variant::VariantKind;

/// Replays a recorded operation trace against a chosen heap variant.
#[derive(Parser, Debug)]
#[command(name = "driver")]
struct Args {
    /// Path to a binary trace file.
    trace_file: PathBuf,

    /// Heap variant to benchmark.
    #[arg(long, value_parser = clap::value_parser!(VariantKind))]
    variant: VariantKind,

    /// Minimum total microseconds to spend looping the trace.
    #[arg(long)]
    min_usec: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = match args.min_usec {
        Some(min_usec) => ReplayConfig { min_usec },
        None => ReplayConfig::default(),
    };

    match replay_file(&args.trace_file, args.variant, &config) {
        Ok(summary) => {
            println!("{}", summary.avg_usec.round() as u64);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("replay failed: {err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
