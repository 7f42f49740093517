//! # Breadboard Core
//!
//! An interactive sandbox circuit simulator.
//!
//! This library provides:
//! - An editable scene of two-terminal elements (wires, resistors, bulbs,
//!   batteries, switches, meters, capacitors, inductors) placed by
//!   coordinates
//! - Modified Nodal Analysis (MNA) based circuit solving, with node
//!   topology inferred from terminal positions
//! - A fixed-step transient driver that feeds each solve's output back as
//!   Backward-Euler history for the next tick
//!
//! ## Architecture
//!
//! - [`circuit`] - Element kinds, the scene arena, and the CLI layout format
//! - [`solver`] - Topology resolution, MNA assembly, Gaussian elimination,
//!   result extraction, and the transient driver
//!
//! ## Simulation Method
//!
//! Once per tick (fixed dt = 0.05 s):
//!
//! 1. Cluster terminal points within snap distance into electrical nodes
//! 2. Reduce each element to a Norton equivalent (conductance + parallel
//!    current source); capacitors and inductors use Backward-Euler
//!    companion models fed by the previous tick's state
//! 3. Assemble and solve Ax = z for node voltages and battery currents
//! 4. Write per-element currents, voltage drops, and terminal potentials
//!    back into the scene as both output and next-tick history
//!
//! The solver never rejects a circuit: degenerate or singular networks
//! resolve to zero-valued results so the scene stays editable while it is
//! being built.
//!
//! ```
//! use breadboard_core::{ElementKind, Scene, TransientDriver};
//!
//! let mut scene = Scene::new();
//! scene.add(ElementKind::battery(), (0.0, 0.0), (200.0, 0.0));
//! scene.add(ElementKind::resistor(), (200.0, 0.0), (0.0, 0.0));
//!
//! let mut driver = TransientDriver::new();
//! driver.start();
//! let outcome = driver.on_frame(&mut scene).unwrap();
//! assert!(outcome.changed);
//! ```

pub mod circuit;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Element, ElementId, ElementKind, ElementState, Scene, Terminal, TerminalId};
pub use error::{BreadboardError, Result};
pub use solver::{solve_network, NetworkSolution, TransientDriver, DEFAULT_TIME_STEP};
