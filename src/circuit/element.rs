//! Element kinds, terminals, and solver-owned element state.

use super::types::{ElementId, TerminalId};

/// Default resistance for resistive elements (ohms).
pub const DEFAULT_RESISTANCE: f64 = 10.0;
/// Default battery voltage (volts).
pub const DEFAULT_VOLTAGE: f64 = 9.0;
/// Default capacitance (farads).
pub const DEFAULT_CAPACITANCE: f64 = 1e-4;
/// Default inductance (henries).
pub const DEFAULT_INDUCTANCE: f64 = 1.0;

/// The kind of a two-terminal element, with its configuration.
///
/// Each variant carries only the fields its electrical model needs, so the
/// solver never has to fall back to a default at point of use. Defaults are
/// applied once, when an element is created without explicit values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    /// An ideal connecting wire (modeled as a tiny contact resistance).
    Wire,
    /// A resistor with a configured resistance in ohms.
    Resistor { resistance: f64 },
    /// An ideal voltage source.
    Battery { voltage: f64 },
    /// A lightbulb, electrically a resistor.
    Lightbulb { resistance: f64 },
    /// A switch: near-short when closed, near-open otherwise.
    Switch { closed: bool },
    /// An ideal voltmeter (near-infinite resistance).
    Voltmeter,
    /// An ideal ammeter (near-zero resistance).
    Ammeter,
    /// A capacitor with a configured capacitance in farads.
    Capacitor { capacitance: f64 },
    /// An inductor with a configured inductance in henries.
    Inductor { inductance: f64 },
}

impl ElementKind {
    /// A resistor with the default resistance.
    pub fn resistor() -> Self {
        ElementKind::Resistor {
            resistance: DEFAULT_RESISTANCE,
        }
    }

    /// A battery with the default voltage.
    pub fn battery() -> Self {
        ElementKind::Battery {
            voltage: DEFAULT_VOLTAGE,
        }
    }

    /// A lightbulb with the default resistance.
    pub fn lightbulb() -> Self {
        ElementKind::Lightbulb {
            resistance: DEFAULT_RESISTANCE,
        }
    }

    /// A closed switch.
    pub fn switch() -> Self {
        ElementKind::Switch { closed: true }
    }

    /// A capacitor with the default capacitance.
    pub fn capacitor() -> Self {
        ElementKind::Capacitor {
            capacitance: DEFAULT_CAPACITANCE,
        }
    }

    /// An inductor with the default inductance.
    pub fn inductor() -> Self {
        ElementKind::Inductor {
            inductance: DEFAULT_INDUCTANCE,
        }
    }

    /// Short lowercase name, used by the layout format and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Wire => "wire",
            ElementKind::Resistor { .. } => "resistor",
            ElementKind::Battery { .. } => "battery",
            ElementKind::Lightbulb { .. } => "lightbulb",
            ElementKind::Switch { .. } => "switch",
            ElementKind::Voltmeter => "voltmeter",
            ElementKind::Ammeter => "ammeter",
            ElementKind::Capacitor { .. } => "capacitor",
            ElementKind::Inductor { .. } => "inductor",
        }
    }
}

/// One end of an element: a stable id plus a mutable position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Terminal {
    pub id: TerminalId,
    pub x: f64,
    pub y: f64,
}

impl Terminal {
    /// Create a terminal at the given position.
    pub fn new(id: TerminalId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Euclidean distance to another terminal.
    pub fn distance_to(&self, other: &Terminal) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Solver-owned outputs and transient history for one element.
///
/// `current`, `voltage_drop`, and the terminal potentials are overwritten
/// every tick. The `prev_*` fields are the Backward-Euler history: read at
/// the start of a tick as the previous converged state and overwritten at
/// the end. There is no other memory of earlier steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementState {
    /// Current through the element, positive from p1 to p2 (amperes).
    pub current: f64,
    /// Potential difference p1 − p2 (volts).
    pub voltage_drop: f64,
    /// Potential at the p1 terminal (volts).
    pub p1_potential: f64,
    /// Potential at the p2 terminal (volts).
    pub p2_potential: f64,
    /// Current from the previous tick.
    pub prev_current: f64,
    /// p1 potential from the previous tick.
    pub prev_p1_potential: f64,
    /// p2 potential from the previous tick.
    pub prev_p2_potential: f64,
}

impl ElementState {
    /// Voltage across the element at the previous tick (p1 − p2).
    pub fn prev_voltage(&self) -> f64 {
        self.prev_p1_potential - self.prev_p2_potential
    }
}

/// A two-terminal element placed in the scene.
///
/// Ownership rule: the editor mutates `kind` and the terminal positions; the
/// solver mutates only `state`. Nothing else touches either side.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub p1: Terminal,
    pub p2: Terminal,
    pub state: ElementState,
}

impl Element {
    /// Create an element with zeroed solver state.
    pub fn new(id: ElementId, kind: ElementKind, p1: Terminal, p2: Terminal) -> Self {
        Self {
            id,
            kind,
            p1,
            p2,
            state: ElementState::default(),
        }
    }

    /// Whether this element contributes a branch-current unknown to the
    /// system (ideal voltage sources do).
    pub fn is_voltage_source(&self) -> bool {
        matches!(self.kind, ElementKind::Battery { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_constructors_carry_documented_values() {
        assert_eq!(
            ElementKind::resistor(),
            ElementKind::Resistor { resistance: 10.0 }
        );
        assert_eq!(ElementKind::battery(), ElementKind::Battery { voltage: 9.0 });
        assert_eq!(ElementKind::switch(), ElementKind::Switch { closed: true });
        assert_eq!(
            ElementKind::capacitor(),
            ElementKind::Capacitor { capacitance: 1e-4 }
        );
        assert_eq!(
            ElementKind::inductor(),
            ElementKind::Inductor { inductance: 1.0 }
        );
    }

    #[test]
    fn terminal_distance() {
        let a = Terminal::new(TerminalId(0), 0.0, 0.0);
        let b = Terminal::new(TerminalId(1), 3.0, 4.0);
        assert_relative_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn prev_voltage_is_history_difference() {
        let state = ElementState {
            prev_p1_potential: 5.0,
            prev_p2_potential: 2.0,
            ..ElementState::default()
        };
        assert_relative_eq!(state.prev_voltage(), 3.0);
    }
}
