//! Headless viewer binary.
//!
//! Usage:
//!   cargo run -p engine_viewer -- [--config viewer.json] [--frames 600] [--fps 60]
//!                                 [--width 1280] [--height 720]
//!
//! Runs the demo scene for the configured number of frames against the
//! recording backend and logs frame statistics. `RUST_LOG` overrides the
//! configured log filter.

use std::env;

use anyhow::Context;
use engine_viewer::cli::parse_args;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cfg = parse_args(env::args().skip(1)).context("parsing arguments")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cfg.log_filter.as_str().into()),
        )
        .init();

    info!(
        frames = cfg.frame_count(),
        fps = cfg.target_fps,
        width = cfg.window.width,
        height = cfg.window.height,
        "Starting viewer"
    );

    let summary = engine_viewer::run(&cfg)?;
    info!(
        frames = summary.frames,
        draw_calls = summary.draw_calls,
        simulated_seconds = summary.simulated_seconds,
        "Done"
    );
    Ok(())
}
