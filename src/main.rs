//! Breadboard - sandbox circuit simulator CLI
//!
//! Loads a layout file, steps the transient simulation, and prints the
//! resulting per-element readings.
//!
//! # Usage
//!
//! ```bash
//! breadboard circuit.bb --frames 200
//! ```

use std::path::PathBuf;

use clap::Parser;
use breadboard_core::{
    circuit::layout,
    error::Result,
    solver::{DriverState, TransientDriver, DEFAULT_TIME_STEP},
    Scene,
};

/// Sandbox circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the layout file (.bb)
    #[arg(value_name = "LAYOUT_FILE")]
    layout_file: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 200)]
    frames: u64,

    /// Time step in seconds (0 solves the DC steady state)
    #[arg(short, long, default_value_t = DEFAULT_TIME_STEP)]
    dt: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut scene = layout::load_file(&args.layout_file)?;

    let mut driver = TransientDriver::with_time_step(args.dt);
    driver.start();

    let mut settled_at = None;
    for frame in 0..args.frames {
        let Some(outcome) = driver.on_frame(&mut scene) else {
            break;
        };
        if !outcome.changed && settled_at.is_none() {
            settled_at = Some(frame);
        } else if outcome.changed {
            settled_at = None;
        }
    }
    driver.stop();
    debug_assert_eq!(driver.state(), DriverState::Idle);

    match settled_at {
        Some(frame) => println!(
            "settled after {frame} of {} frames (dt = {} s)",
            args.frames, args.dt
        ),
        None => println!(
            "still changing after {} frames (dt = {} s)",
            args.frames, args.dt
        ),
    }
    print_readings(&scene);

    Ok(())
}

fn print_readings(scene: &Scene) {
    println!(
        "{:<4} {:<10} {:>12} {:>12} {:>10} {:>10}",
        "id", "kind", "current A", "drop V", "V(p1)", "V(p2)"
    );
    for element in scene.elements() {
        let s = &element.state;
        println!(
            "{:<4} {:<10} {:>12.6} {:>12.4} {:>10.4} {:>10.4}",
            element.id.to_string(),
            element.kind.name(),
            s.current,
            s.voltage_drop,
            s.p1_potential,
            s.p2_potential
        );
    }
}
