//! The editable scene: an arena of elements keyed by id.

use super::element::{Element, ElementKind, Terminal};
use super::types::{ElementId, TerminalId};

/// Which end of an element a terminal operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEnd {
    P1,
    P2,
}

/// The full set of elements under edit and simulation.
///
/// The scene is the single shared resource between the editor and the
/// transient driver: the editor adds, removes, and moves elements between
/// ticks; the driver rewrites each element's solver-owned state once per
/// tick. Element and terminal ids are never reused within a scene.
#[derive(Debug, Default)]
pub struct Scene {
    elements: Vec<Element>,
    next_element: usize,
    next_terminal: usize,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element of the given kind with terminals at the two positions.
    /// Returns the new element's id.
    pub fn add(&mut self, kind: ElementKind, p1: (f64, f64), p2: (f64, f64)) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;

        let t1 = Terminal::new(TerminalId(self.next_terminal), p1.0, p1.1);
        let t2 = Terminal::new(TerminalId(self.next_terminal + 1), p2.0, p2.1);
        self.next_terminal += 2;

        self.elements.push(Element::new(id, kind, t1, t2));
        id
    }

    /// Remove an element. Returns it if it existed.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(idx))
    }

    /// Look up an element by id.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Look up an element by id, mutably.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Move one terminal of an element to a new position.
    pub fn move_terminal(&mut self, id: ElementId, end: TerminalEnd, x: f64, y: f64) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        let terminal = match end {
            TerminalEnd::P1 => &mut element.p1,
            TerminalEnd::P2 => &mut element.p2,
        };
        terminal.x = x;
        terminal.y = y;
        true
    }

    /// Toggle a switch element (the click interaction). Returns the new
    /// closed state, or `None` if the element is not a switch.
    pub fn toggle_switch(&mut self, id: ElementId) -> Option<bool> {
        match self.element_mut(id)?.kind {
            ElementKind::Switch { ref mut closed } => {
                *closed = !*closed;
                Some(*closed)
            }
            _ => None,
        }
    }

    /// All elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// All elements in insertion order, mutably.
    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Number of elements in the scene.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
