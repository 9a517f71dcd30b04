//! Headless driver: runs the simulation frame by frame without a window and
//! logs density and speed statistics.
//!
//! Usage: `sph-headless [--config <file.json>] [--frames <n>]`

use std::time::Instant;

use anyhow::{bail, Context, Result};
use sph_core::{Simulation, SimulationConfig};

struct Args {
    config_path: Option<String>,
    frames: u64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config_path: None,
        frames: 600,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                args.config_path = Some(it.next().context("--config needs a path")?);
            }
            "--frames" => {
                let value = it.next().context("--frames needs a number")?;
                args.frames = value
                    .parse()
                    .with_context(|| format!("invalid frame count {value:?}"))?;
            }
            other => bail!("unknown argument {other:?}"),
        }
    }
    Ok(args)
}

/// Mean density and the fastest particle's speed.
fn frame_stats(sim: &Simulation) -> (f32, f32) {
    let densities = sim.densities();
    let mean_density = if densities.is_empty() {
        0.0
    } else {
        densities.iter().sum::<f32>() / densities.len() as f32
    };
    let max_speed = sim
        .particles()
        .iter()
        .map(|p| p.velocity.length())
        .fold(0.0_f32, f32::max);
    (mean_density, max_speed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let args = parse_args()?;
    let config = match &args.config_path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => SimulationConfig::default(),
    };
    tracing::info!(?config, "configuration loaded");

    let mut sim = Simulation::new(config)?;
    let ticks_per_frame = sim.config().ticks_per_frame;
    let report_every = u64::from(sim.config().frames_per_second.max(1));

    let start = Instant::now();
    for frame in 1..=args.frames {
        sim.advance(ticks_per_frame);

        if frame % report_every == 0 || frame == args.frames {
            let (mean_density, max_speed) = frame_stats(&sim);
            tracing::info!(
                frame,
                ticks = sim.tick_count(),
                mean_density,
                max_speed,
                "frame"
            );
        }
    }

    let elapsed = start.elapsed();
    tracing::info!(
        ticks = sim.tick_count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "run stopped"
    );
    Ok(())
}
