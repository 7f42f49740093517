//! The transient driver: fixed-step simulation loop over the scene.

use tracing::{debug, trace};

use crate::circuit::{Element, Scene};

use super::extract::{extract, NetworkSolution};
use super::mna::assemble;
use super::topology::resolve_nodes;

/// Fixed logical time step per tick (seconds).
pub const DEFAULT_TIME_STEP: f64 = 0.05;

/// A tick reports `changed = false` when no element's current or voltage
/// drop moved by more than this, letting downstream consumers skip work on
/// a settled circuit.
pub const COMMIT_THRESHOLD: f64 = 1e-4;

/// Run one full solve over the given elements: resolve nodes, assemble the
/// nodal system, eliminate, and extract readings.
///
/// This is a pure function of the element list (geometry, configuration,
/// and `prev_*` history) and `dt`; identical inputs produce identical
/// output. It never fails: an empty, disconnected, or singular network
/// degrades to zero-valued readings.
pub fn solve_network(elements: &[Element], dt: f64) -> NetworkSolution {
    if elements.is_empty() {
        return NetworkSolution::empty();
    }

    let topology = resolve_nodes(elements);
    let assembly = assemble(elements, &topology, dt);
    let x = assembly.matrix.solve();
    extract(elements, &topology, &assembly, &x, dt)
}

/// Whether the driver currently advances on frame callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// No tick is scheduled.
    #[default]
    Idle,
    /// A tick runs on every frame callback.
    Stepping,
}

/// The outcome of one tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// True when at least one element's current or voltage drop moved by
    /// more than [`COMMIT_THRESHOLD`] — the signal to re-render or
    /// re-publish downstream.
    pub changed: bool,
    /// The full solve output for this tick.
    pub solution: NetworkSolution,
}

/// Fixed-step simulation driver.
///
/// The driver owns no timer: whatever periodic callback the host has (a
/// frame loop, a test loop) calls [`on_frame`](Self::on_frame) and the
/// driver advances one tick while in [`DriverState::Stepping`]. Each tick
/// solves the network at the fixed time step, writes the solver-owned
/// outputs back into the scene, and records the same values as the `prev_*`
/// history the next tick's Backward-Euler companions read. Dropping the
/// driver (or calling [`stop`](Self::stop)) simply ends scheduling; no tick
/// is ever in flight between calls.
#[derive(Debug)]
pub struct TransientDriver {
    dt: f64,
    state: DriverState,
    ticks: u64,
}

impl Default for TransientDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TransientDriver {
    /// Create an idle driver with the default time step.
    pub fn new() -> Self {
        Self {
            dt: DEFAULT_TIME_STEP,
            state: DriverState::Idle,
            ticks: 0,
        }
    }

    /// Create an idle driver with a custom time step. `dt = 0` solves the
    /// DC steady state on every tick.
    pub fn with_time_step(dt: f64) -> Self {
        Self {
            dt,
            state: DriverState::Idle,
            ticks: 0,
        }
    }

    /// The fixed time step (seconds).
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Current scheduling state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Begin stepping: subsequent frame callbacks advance the simulation.
    pub fn start(&mut self) {
        self.state = DriverState::Stepping;
    }

    /// Stop stepping: frame callbacks become no-ops.
    pub fn stop(&mut self) {
        self.state = DriverState::Idle;
    }

    /// Frame callback: advance one tick if stepping, otherwise do nothing.
    pub fn on_frame(&mut self, scene: &mut Scene) -> Option<TickOutcome> {
        match self.state {
            DriverState::Idle => None,
            DriverState::Stepping => Some(self.tick(scene)),
        }
    }

    /// Advance the simulation by exactly one tick.
    pub fn tick(&mut self, scene: &mut Scene) -> TickOutcome {
        let solution = solve_network(scene.elements(), self.dt);
        self.ticks += 1;

        let mut changed = false;
        for (element, reading) in scene.elements_mut().iter_mut().zip(&solution.readings) {
            debug_assert_eq!(element.id, reading.id);

            if (reading.current - element.state.current).abs() > COMMIT_THRESHOLD
                || (reading.voltage_drop - element.state.voltage_drop).abs() > COMMIT_THRESHOLD
            {
                changed = true;
            }

            let state = &mut element.state;
            state.current = reading.current;
            state.voltage_drop = reading.voltage_drop;
            state.p1_potential = reading.p1_potential;
            state.p2_potential = reading.p2_potential;
            state.prev_current = reading.current;
            state.prev_p1_potential = reading.p1_potential;
            state.prev_p2_potential = reading.p2_potential;
        }

        trace!(tick = self.ticks, changed, "tick complete");
        if changed {
            debug!(tick = self.ticks, "network state committed");
        }

        TickOutcome { changed, solution }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ElementId, ElementKind, Scene};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// battery → a → b → back to battery, as a triangle of three elements.
    fn loop3(a: ElementKind, b: ElementKind) -> (Scene, ElementId, ElementId, ElementId) {
        let mut scene = Scene::new();
        let bat = scene.add(ElementKind::Battery { voltage: 9.0 }, (0.0, 0.0), (200.0, 0.0));
        let ea = scene.add(a, (200.0, 0.0), (100.0, 200.0));
        let eb = scene.add(b, (100.0, 200.0), (0.0, 0.0));
        (scene, bat, ea, eb)
    }

    /// battery → a → b → c → back to battery, as a square of four elements.
    fn loop4(
        a: ElementKind,
        b: ElementKind,
        c: ElementKind,
    ) -> (Scene, ElementId, ElementId, ElementId, ElementId) {
        let mut scene = Scene::new();
        let bat = scene.add(ElementKind::Battery { voltage: 9.0 }, (0.0, 0.0), (0.0, 200.0));
        let ea = scene.add(a, (0.0, 200.0), (200.0, 200.0));
        let eb = scene.add(b, (200.0, 200.0), (200.0, 0.0));
        let ec = scene.add(c, (200.0, 0.0), (0.0, 0.0));
        (scene, bat, ea, eb, ec)
    }

    #[test]
    fn empty_scene_ticks_without_panic() {
        let mut scene = Scene::new();
        let mut driver = TransientDriver::new();
        let outcome = driver.tick(&mut scene);
        assert!(!outcome.changed);
        assert!(outcome.solution.readings.is_empty());
    }

    #[test]
    fn idle_driver_ignores_frames() {
        let mut scene = Scene::new();
        scene.add(ElementKind::battery(), (0.0, 0.0), (100.0, 0.0));
        let mut driver = TransientDriver::new();

        assert!(driver.on_frame(&mut scene).is_none());
        driver.start();
        assert!(driver.on_frame(&mut scene).is_some());
        driver.stop();
        assert!(driver.on_frame(&mut scene).is_none());
        assert_eq!(driver.ticks(), 1);
    }

    #[test]
    fn closed_loop_carries_v_over_r() {
        // 9 V across a closed switch and a 10 Ω resistor: I = 0.9 A, both at
        // DC (dt = 0) and at the stock transient step.
        for dt in [0.0, DEFAULT_TIME_STEP] {
            let (mut scene, _, sw, res) =
                loop3(ElementKind::Switch { closed: true }, ElementKind::Resistor {
                    resistance: 10.0,
                });
            let mut driver = TransientDriver::with_time_step(dt);
            driver.tick(&mut scene);

            let i = scene.element(res).unwrap().state.current;
            assert_relative_eq!(i.abs(), 0.9, max_relative = 1e-5);
            // The switch sees essentially no voltage.
            let sw_drop = scene.element(sw).unwrap().state.voltage_drop;
            assert_abs_diff_eq!(sw_drop, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn open_switch_blocks_the_loop() {
        let (mut scene, bat, _, res) =
            loop3(ElementKind::Switch { closed: false }, ElementKind::Resistor {
                resistance: 10.0,
            });
        let mut driver = TransientDriver::new();
        driver.tick(&mut scene);

        // Leakage through the 1e9 Ω surrogate stays below V/K.
        assert!(scene.element(res).unwrap().state.current.abs() < 1e-8);
        assert!(scene.element(bat).unwrap().state.current.abs() < 1e-8);
    }

    #[test]
    fn series_and_parallel_equivalents_agree() {
        // Two 10 Ω in series vs. two 40 Ω in parallel: both total 20 Ω.
        let (mut series, s_bat, _, _) = loop3(
            ElementKind::Resistor { resistance: 10.0 },
            ElementKind::Resistor { resistance: 10.0 },
        );

        let mut parallel = Scene::new();
        let p_bat = parallel.add(
            ElementKind::Battery { voltage: 9.0 },
            (0.0, 0.0),
            (200.0, 0.0),
        );
        parallel.add(
            ElementKind::Resistor { resistance: 40.0 },
            (200.0, 0.0),
            (0.0, 0.0),
        );
        parallel.add(
            ElementKind::Resistor { resistance: 40.0 },
            (200.0, 0.0),
            (0.0, 0.0),
        );

        let mut driver = TransientDriver::new();
        driver.tick(&mut series);
        driver.tick(&mut parallel);

        let i_series = series.element(s_bat).unwrap().state.current;
        let i_parallel = parallel.element(p_bat).unwrap().state.current;
        assert_relative_eq!(i_series, i_parallel, max_relative = 1e-6);
        assert_relative_eq!(i_series.abs(), 9.0 / 20.0, max_relative = 1e-5);
    }

    #[test]
    fn rc_charging_follows_the_time_constant() {
        // 9 V, 100 Ω, 0.1 F: τ = RC = 10 s, i.e. 200 ticks at 0.05 s.
        let (mut scene, _, _, cap, _) = loop4(
            ElementKind::Resistor { resistance: 100.0 },
            ElementKind::Capacitor { capacitance: 0.1 },
            ElementKind::Switch { closed: true },
        );
        let mut driver = TransientDriver::new();

        let mut prev_vc = 0.0;
        for _ in 0..200 {
            driver.tick(&mut scene);
            let vc = scene.element(cap).unwrap().state.voltage_drop.abs();
            assert!(vc >= prev_vc - 1e-12, "charging must be monotonic");
            prev_vc = vc;
        }

        // Vc(τ) = V (1 − e⁻¹)
        let expected = 9.0 * (1.0 - (-1.0f64).exp());
        assert_relative_eq!(prev_vc, expected, max_relative = 0.02);

        // Long after τ the capacitor sits at the full supply voltage.
        for _ in 0..2000 {
            driver.tick(&mut scene);
        }
        let vc = scene.element(cap).unwrap().state.voltage_drop.abs();
        assert_relative_eq!(vc, 9.0, max_relative = 1e-3);
    }

    #[test]
    fn rl_energizing_follows_the_time_constant() {
        // 9 V, 10 Ω, 10 H: τ = L/R = 1 s, i.e. 20 ticks at 0.05 s.
        let (mut scene, _, _, ind, _) = loop4(
            ElementKind::Resistor { resistance: 10.0 },
            ElementKind::Inductor { inductance: 10.0 },
            ElementKind::Switch { closed: true },
        );
        let mut driver = TransientDriver::new();

        for _ in 0..20 {
            driver.tick(&mut scene);
        }
        // I(τ) = (V/R)(1 − e⁻¹); Backward Euler at dt/τ = 0.05 lands within
        // a couple of percent.
        let expected = 0.9 * (1.0 - (-1.0f64).exp());
        let i = scene.element(ind).unwrap().state.current.abs();
        assert_relative_eq!(i, expected, max_relative = 0.03);

        for _ in 0..400 {
            driver.tick(&mut scene);
        }
        let i = scene.element(ind).unwrap().state.current.abs();
        assert_relative_eq!(i, 0.9, max_relative = 1e-3);
    }

    #[test]
    fn solve_network_is_idempotent() {
        // Mid-transient history, same inputs: bit-for-bit identical output.
        let (mut scene, _, _, _, _) = loop4(
            ElementKind::Resistor { resistance: 100.0 },
            ElementKind::Capacitor { capacitance: 0.1 },
            ElementKind::Inductor { inductance: 10.0 },
        );
        let mut driver = TransientDriver::new();
        for _ in 0..7 {
            driver.tick(&mut scene);
        }

        let first = solve_network(scene.elements(), DEFAULT_TIME_STEP);
        let second = solve_network(scene.elements(), DEFAULT_TIME_STEP);
        assert_eq!(first, second);
    }

    #[test]
    fn settled_circuit_suppresses_commits() {
        let (mut scene, _, _, _) = loop3(
            ElementKind::Switch { closed: true },
            ElementKind::Resistor { resistance: 10.0 },
        );
        let mut driver = TransientDriver::new();

        let first = driver.tick(&mut scene);
        assert!(first.changed);
        let second = driver.tick(&mut scene);
        assert!(!second.changed);
        let third = driver.tick(&mut scene);
        assert!(!third.changed);
    }

    #[test]
    fn editing_between_ticks_retriggers_commits() {
        let (mut scene, _, sw, _) = loop3(
            ElementKind::Switch { closed: true },
            ElementKind::Resistor { resistance: 10.0 },
        );
        let mut driver = TransientDriver::new();
        driver.tick(&mut scene);
        driver.tick(&mut scene);

        scene.toggle_switch(sw);
        let outcome = driver.tick(&mut scene);
        assert!(outcome.changed);
    }
}
