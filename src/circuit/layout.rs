//! Text layout format for the CLI.
//!
//! One element per line:
//!
//! ```text
//! # battery on the left edge, 9 volts
//! battery   0 0    0 100   voltage=9
//! resistor  0 100  120 100 resistance=47
//! switch    120 100 120 0  open
//! wire      120 0  0 0
//! ```
//!
//! The first token names the element kind, the next four are the two
//! terminal positions, and the rest are `key=value` settings (or the bare
//! word `open`/`closed` for switches). Omitted settings take the stock
//! defaults. `#` starts a comment.

use std::fs;
use std::path::Path;

use crate::error::{BreadboardError, Result};

use super::element::ElementKind;
use super::scene::Scene;

/// Parse a layout file into a scene.
pub fn load_file(path: &Path) -> Result<Scene> {
    let text = fs::read_to_string(path).map_err(|source| BreadboardError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}

/// Parse layout text into a scene.
pub fn parse(text: &str) -> Result<Scene> {
    let mut scene = Scene::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let mut tokens = line.split_whitespace();
        let Some(kind_word) = tokens.next() else {
            continue;
        };

        let coords = parse_coords(line_no, &mut tokens)?;
        let settings: Vec<&str> = tokens.collect();
        let kind = parse_kind(line_no, kind_word, &settings)?;

        scene.add(kind, (coords[0], coords[1]), (coords[2], coords[3]));
    }

    Ok(scene)
}

fn parse_coords<'a>(
    line: usize,
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<[f64; 4]> {
    let mut coords = [0.0; 4];
    for slot in coords.iter_mut() {
        let token = tokens
            .next()
            .ok_or_else(|| BreadboardError::layout(line, "expected four terminal coordinates"))?;
        *slot = token
            .parse()
            .map_err(|_| BreadboardError::invalid_value(line, "coordinate", token))?;
    }
    Ok(coords)
}

fn parse_kind(line: usize, word: &str, settings: &[&str]) -> Result<ElementKind> {
    let kind = match word {
        "wire" => ElementKind::Wire,
        "resistor" => ElementKind::Resistor {
            resistance: setting(line, settings, "resistance")?
                .unwrap_or(super::element::DEFAULT_RESISTANCE),
        },
        "battery" => ElementKind::Battery {
            voltage: setting(line, settings, "voltage")?
                .unwrap_or(super::element::DEFAULT_VOLTAGE),
        },
        "lightbulb" => ElementKind::Lightbulb {
            resistance: setting(line, settings, "resistance")?
                .unwrap_or(super::element::DEFAULT_RESISTANCE),
        },
        "switch" => ElementKind::Switch {
            closed: !settings.iter().any(|s| *s == "open"),
        },
        "voltmeter" => ElementKind::Voltmeter,
        "ammeter" => ElementKind::Ammeter,
        "capacitor" => ElementKind::Capacitor {
            capacitance: setting(line, settings, "capacitance")?
                .unwrap_or(super::element::DEFAULT_CAPACITANCE),
        },
        "inductor" => ElementKind::Inductor {
            inductance: setting(line, settings, "inductance")?
                .unwrap_or(super::element::DEFAULT_INDUCTANCE),
        },
        other => {
            return Err(BreadboardError::UnknownElementKind {
                kind: other.to_string(),
                line,
            })
        }
    };
    Ok(kind)
}

/// Find `key=value` among the settings and parse the value.
fn setting(line: usize, settings: &[&str], key: &str) -> Result<Option<f64>> {
    for token in settings {
        if let Some(value) = token.strip_prefix(key).and_then(|r| r.strip_prefix('=')) {
            let parsed = value
                .parse()
                .map_err(|_| BreadboardError::invalid_value(line, key, value))?;
            return Ok(Some(parsed));
        }
    }
    Ok(None)
}
