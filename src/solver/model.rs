//! Norton-equivalent models for each element kind.
//!
//! Every element except the battery reduces, for the purposes of one solve,
//! to a conductance between its two nodes plus an optional parallel current
//! source. Energy-storage elements get Backward-Euler companion models that
//! fold their history into the current source; at Δt = 0 they collapse to
//! their DC limits (capacitor → open circuit, inductor → short circuit).
//! Batteries are ideal voltage sources and are stamped by the assembler
//! directly.

use crate::circuit::{Element, ElementKind};

/// Surrogate resistance for "zero-resistance" elements (ohms).
/// A literal zero would make the node equations singular.
pub const CONTACT_RESISTANCE: f64 = 1e-6;

/// Surrogate resistance for "infinite-resistance" elements (ohms).
pub const OPEN_RESISTANCE: f64 = 1e9;

/// A conductance in parallel with a signed current source.
///
/// The source current is defined positive from p1 to p2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NortonEquivalent {
    pub conductance: f64,
    pub source_current: f64,
}

impl NortonEquivalent {
    /// A plain conductance with no source term.
    fn resistive(g: f64) -> Self {
        Self {
            conductance: g,
            source_current: 0.0,
        }
    }
}

/// The Norton equivalent of an element for one solve, or `None` for a
/// battery (which contributes a voltage-source row instead).
///
/// `dt` is the tick length in seconds; `dt == 0` requests the DC steady
/// state. History for the companion models comes from the element's
/// `prev_*` state.
pub fn norton_equivalent(element: &Element, dt: f64) -> Option<NortonEquivalent> {
    let equivalent = match element.kind {
        ElementKind::Wire | ElementKind::Ammeter => {
            NortonEquivalent::resistive(1.0 / CONTACT_RESISTANCE)
        }
        ElementKind::Resistor { resistance } | ElementKind::Lightbulb { resistance } => {
            NortonEquivalent::resistive(1.0 / resistance)
        }
        ElementKind::Switch { closed } => NortonEquivalent::resistive(if closed {
            1.0 / CONTACT_RESISTANCE
        } else {
            1.0 / OPEN_RESISTANCE
        }),
        ElementKind::Voltmeter => NortonEquivalent::resistive(1.0 / OPEN_RESISTANCE),
        ElementKind::Capacitor { capacitance } => {
            if dt > 0.0 {
                // Backward Euler for i = C dv/dt:
                //   i(n) = (C/dt) v(n) − (C/dt) v(n−1)
                let g = capacitance / dt;
                NortonEquivalent {
                    conductance: g,
                    source_current: -g * element.state.prev_voltage(),
                }
            } else {
                // DC: a capacitor is an open circuit.
                NortonEquivalent::resistive(1.0 / OPEN_RESISTANCE)
            }
        }
        ElementKind::Inductor { inductance } => {
            if dt > 0.0 {
                // Backward Euler for v = L di/dt:
                //   i(n) = (dt/L) v(n) + i(n−1)
                NortonEquivalent {
                    conductance: dt / inductance,
                    source_current: element.state.prev_current,
                }
            } else {
                // DC: an inductor is a short circuit.
                NortonEquivalent::resistive(1.0 / CONTACT_RESISTANCE)
            }
        }
        ElementKind::Battery { .. } => return None,
    };
    Some(equivalent)
}

/// The resistance used when reading an element's current back from its
/// terminal voltages. Matches the resistance used for stamping; capacitors,
/// inductors, and batteries have their own readback formulas and do not go
/// through this.
pub fn effective_resistance(kind: &ElementKind) -> Option<f64> {
    match *kind {
        ElementKind::Wire | ElementKind::Ammeter => Some(CONTACT_RESISTANCE),
        ElementKind::Resistor { resistance } | ElementKind::Lightbulb { resistance } => {
            Some(resistance)
        }
        ElementKind::Switch { closed } => Some(if closed {
            CONTACT_RESISTANCE
        } else {
            OPEN_RESISTANCE
        }),
        ElementKind::Voltmeter => Some(OPEN_RESISTANCE),
        ElementKind::Capacitor { .. }
        | ElementKind::Inductor { .. }
        | ElementKind::Battery { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ElementId, Terminal, TerminalId};
    use approx::assert_relative_eq;

    fn element(kind: ElementKind) -> Element {
        Element::new(
            ElementId(0),
            kind,
            Terminal::new(TerminalId(0), 0.0, 0.0),
            Terminal::new(TerminalId(1), 100.0, 0.0),
        )
    }

    #[test]
    fn resistive_kinds() {
        let r = norton_equivalent(&element(ElementKind::Resistor { resistance: 50.0 }), 0.05)
            .unwrap();
        assert_relative_eq!(r.conductance, 0.02);
        assert_relative_eq!(r.source_current, 0.0);

        let w = norton_equivalent(&element(ElementKind::Wire), 0.05).unwrap();
        assert_relative_eq!(w.conductance, 1e6);

        let v = norton_equivalent(&element(ElementKind::Voltmeter), 0.05).unwrap();
        assert_relative_eq!(v.conductance, 1e-9);
    }

    #[test]
    fn switch_follows_its_state() {
        let open = norton_equivalent(&element(ElementKind::Switch { closed: false }), 0.05)
            .unwrap();
        let closed = norton_equivalent(&element(ElementKind::Switch { closed: true }), 0.05)
            .unwrap();
        assert_relative_eq!(open.conductance, 1e-9);
        assert_relative_eq!(closed.conductance, 1e6);
    }

    #[test]
    fn capacitor_companion_folds_history() {
        let mut el = element(ElementKind::Capacitor { capacitance: 1e-3 });
        el.state.prev_p1_potential = 4.0;
        el.state.prev_p2_potential = 1.0;

        let eq = norton_equivalent(&el, 0.05).unwrap();
        assert_relative_eq!(eq.conductance, 0.02);
        assert_relative_eq!(eq.source_current, -0.02 * 3.0);

        // DC limit: open circuit, no source.
        let dc = norton_equivalent(&el, 0.0).unwrap();
        assert_relative_eq!(dc.conductance, 1e-9);
        assert_relative_eq!(dc.source_current, 0.0);
    }

    #[test]
    fn inductor_companion_carries_current() {
        let mut el = element(ElementKind::Inductor { inductance: 2.0 });
        el.state.prev_current = 0.5;

        let eq = norton_equivalent(&el, 0.05).unwrap();
        assert_relative_eq!(eq.conductance, 0.025);
        assert_relative_eq!(eq.source_current, 0.5);

        // DC limit: short circuit.
        let dc = norton_equivalent(&el, 0.0).unwrap();
        assert_relative_eq!(dc.conductance, 1e6);
        assert_relative_eq!(dc.source_current, 0.0);
    }

    #[test]
    fn battery_has_no_norton_form() {
        assert!(norton_equivalent(&element(ElementKind::battery()), 0.05).is_none());
        assert_eq!(effective_resistance(&ElementKind::battery()), None);
    }
}
