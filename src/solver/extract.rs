//! Mapping solved unknowns back to per-terminal potentials and per-element
//! currents.

use std::collections::HashMap;

use crate::circuit::{Element, ElementId, ElementKind, TerminalId};

use super::mna::Assembly;
use super::model::{effective_resistance, CONTACT_RESISTANCE};
use super::topology::Topology;

/// Solved electrical quantities for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementReading {
    pub id: ElementId,
    /// Current through the element, positive from p1 to p2 (amperes).
    pub current: f64,
    /// Potential difference p1 − p2 (volts).
    pub voltage_drop: f64,
    pub p1_potential: f64,
    pub p2_potential: f64,
}

/// The full output of one solve: a reading per element and a potential per
/// terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSolution {
    pub readings: Vec<ElementReading>,
    pub terminal_potentials: HashMap<TerminalId, f64>,
}

impl NetworkSolution {
    /// An empty solution (no elements).
    pub fn empty() -> Self {
        Self {
            readings: Vec::new(),
            terminal_potentials: HashMap::new(),
        }
    }

    /// The reading for an element, if present.
    pub fn reading(&self, id: ElementId) -> Option<&ElementReading> {
        self.readings.iter().find(|r| r.id == id)
    }

    /// The resolved potential of a terminal (0 for unknown terminals).
    pub fn terminal_potential(&self, id: TerminalId) -> f64 {
        self.terminal_potentials.get(&id).copied().unwrap_or(0.0)
    }
}

/// Potential of a terminal from the solved vector: ground and unresolved
/// terminals sit at 0, node k reads unknown k − 1.
fn potential(topology: &Topology, x: &[f64], terminal: TerminalId) -> f64 {
    match topology.unknown_index(terminal) {
        Some(idx) => x.get(idx).copied().unwrap_or(0.0),
        None => 0.0,
    }
}

/// Derive every element's reading and every terminal's potential from the
/// solved unknowns.
pub fn extract(
    elements: &[Element],
    topology: &Topology,
    assembly: &Assembly,
    x: &[f64],
    dt: f64,
) -> NetworkSolution {
    let mut readings = Vec::with_capacity(elements.len());
    let mut terminal_potentials = HashMap::with_capacity(elements.len() * 2);

    for element in elements {
        let v1 = potential(topology, x, element.p1.id);
        let v2 = potential(topology, x, element.p2.id);
        terminal_potentials.insert(element.p1.id, v1);
        terminal_potentials.insert(element.p2.id, v2);

        let drop = v1 - v2;
        let current = match element.kind {
            ElementKind::Battery { .. } => assembly
                .source_row(element.id)
                .and_then(|row| x.get(row))
                .copied()
                .unwrap_or(0.0),
            ElementKind::Capacitor { capacitance } => {
                if dt > 0.0 {
                    (capacitance / dt) * (drop - element.state.prev_voltage())
                } else {
                    0.0
                }
            }
            ElementKind::Inductor { inductance } => {
                if dt > 0.0 {
                    element.state.prev_current + drop * (dt / inductance)
                } else {
                    drop / CONTACT_RESISTANCE
                }
            }
            ref kind => {
                // Resistive kinds read back through the stamped resistance.
                match effective_resistance(kind) {
                    Some(r) => drop / r,
                    None => 0.0,
                }
            }
        };

        readings.push(ElementReading {
            id: element.id,
            current,
            voltage_drop: drop,
            p1_potential: v1,
            p2_potential: v2,
        });
    }

    NetworkSolution {
        readings,
        terminal_potentials,
    }
}
