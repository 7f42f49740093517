//! The circuit-equilibrium solver and its transient-stepping driver.
//!
//! Each tick runs a fixed pipeline over the scene's element list:
//!
//! 1. [`topology`] clusters terminal points into electrical nodes by
//!    spatial proximity (node 0 is the ground reference).
//! 2. [`model`] reduces each element to a Norton equivalent — a
//!    conductance plus an optional parallel current source — using
//!    Backward-Euler companion models for capacitors and inductors.
//! 3. [`mna`] assembles the Modified Nodal Analysis system Ax = z, with one
//!    unknown per non-ground node voltage and one per battery branch
//!    current, and solves it by Gaussian elimination with partial pivoting.
//! 4. [`extract`] maps the solved unknowns back to per-terminal potentials
//!    and per-element currents.
//! 5. [`driver`] commits outputs and `prev_*` history into the scene and
//!    reports whether anything moved.
//!
//! The whole pipeline is infallible: empty, disconnected, or singular
//! circuits degrade to zero-valued results instead of erroring, so the
//! scene stays editable mid-construction.

pub mod driver;
pub mod extract;
pub mod mna;
pub mod model;
pub mod topology;

pub use driver::{
    solve_network, DriverState, TickOutcome, TransientDriver, COMMIT_THRESHOLD, DEFAULT_TIME_STEP,
};
pub use extract::{ElementReading, NetworkSolution};
pub use mna::{Assembly, MnaMatrix, PIVOT_TOLERANCE};
pub use model::{NortonEquivalent, CONTACT_RESISTANCE, OPEN_RESISTANCE};
pub use topology::{resolve_nodes, Topology, SNAP_DISTANCE};
