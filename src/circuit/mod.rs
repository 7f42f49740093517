//! Circuit representation: elements, terminals, the editable scene, and the
//! CLI layout loader.

mod element;
pub mod layout;
mod scene;
mod types;

pub use element::{
    Element, ElementKind, ElementState, Terminal, DEFAULT_CAPACITANCE, DEFAULT_INDUCTANCE,
    DEFAULT_RESISTANCE, DEFAULT_VOLTAGE,
};
pub use scene::{Scene, TerminalEnd};
pub use types::{ElementId, NodeId, TerminalId};
