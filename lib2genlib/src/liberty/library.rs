// SPDX-License-Identifier: Apache-2.0

//! Typed, read-only view of the cells in a parsed Liberty library.
//!
//! Only the attributes needed to classify and translate cells are extracted.
//! Every attribute is optional: `None` means the library did not say, which
//! is kept distinct from an explicit value such as `dont_use : false`.

use super::liberty_parser::{Block, Value};

/// Groups whose presence inside a cell marks it as holding state.
const STATE_GROUPS: &[&str] = &["ff", "latch", "ff_bank", "latch_bank", "statetable"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinDirection {
    Input,
    Output,
    Inout,
    Internal,
}

impl PinDirection {
    fn from_liberty(s: &str) -> Option<Self> {
        match s {
            "input" => Some(PinDirection::Input),
            "output" => Some(PinDirection::Output),
            "inout" => Some(PinDirection::Inout),
            "internal" => Some(PinDirection::Internal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingArc {
    pub related_pin: Option<String>,
    /// Raw `timing_sense` token, e.g. `positive_unate`.
    pub timing_sense: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pin {
    pub name: String,
    pub direction: Option<PinDirection>,
    pub clock: Option<bool>,
    pub clock_gate_out_pin: Option<bool>,
    pub function: Option<String>,
    pub timing_arcs: Vec<TimingArc>,
}

impl Pin {
    pub fn is_output(&self) -> bool {
        self.direction == Some(PinDirection::Output)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub name: String,
    pub area: Option<f64>,
    pub dont_use: Option<bool>,
    pub pins: Vec<Pin>,
    /// Set when the cell contains an `ff`, `latch` or similar state group.
    pub has_state: bool,
}

impl Cell {
    pub fn output_pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.is_output())
    }

    pub fn is_dont_use(&self) -> bool {
        self.dont_use == Some(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    pub name: Option<String>,
    pub cells: Vec<Cell>,
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) | Value::Identifier(s) => Some(s.clone()),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) | Value::Identifier(s) => s.trim().parse::<f64>().ok(),
        Value::Tuple(_) => None,
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    let text = match value {
        Value::Identifier(s) | Value::String(s) => s.trim(),
        _ => return None,
    };
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Reads a boolean attribute, warning when it is present but unreadable.
fn bool_attr(block: &Block, attr_name: &str, owner: &str) -> Option<bool> {
    let value = block.get_attr(attr_name)?;
    let parsed = value_as_bool(value);
    if parsed.is_none() {
        log::warn!(
            "Ignoring non-boolean {} value {:?} on {}",
            attr_name,
            value.to_text(),
            owner
        );
    }
    parsed
}

fn timing_arc_from_block(block: &Block) -> TimingArc {
    TimingArc {
        related_pin: block.get_attr("related_pin").and_then(value_as_string),
        timing_sense: block.get_attr("timing_sense").and_then(value_as_string),
    }
}

fn pin_from_block(block: &Block, cell_name: &str) -> Pin {
    let name = block.name().unwrap_or_default();
    let owner = format!("{}.{}", cell_name, name);
    let direction = block.get_attr("direction").and_then(|v| {
        let parsed = value_as_string(v).and_then(|s| PinDirection::from_liberty(&s));
        if parsed.is_none() {
            log::warn!("Unrecognized direction {:?} on {}", v.to_text(), owner);
        }
        parsed
    });
    Pin {
        direction,
        clock: bool_attr(block, "clock", &owner),
        clock_gate_out_pin: bool_attr(block, "clock_gate_out_pin", &owner),
        function: block.get_attr("function").and_then(value_as_string),
        timing_arcs: block
            .subblocks_of_type("timing")
            .map(timing_arc_from_block)
            .collect(),
        name,
    }
}

/// Collects pins in source order, descending into `bus` and `bundle` groups.
fn collect_pins(block: &Block, cell_name: &str, pins: &mut Vec<Pin>) {
    for sub_block in block.subblocks() {
        match sub_block.block_type.as_str() {
            "pin" => pins.push(pin_from_block(sub_block, cell_name)),
            "bus" | "bundle" => collect_pins(sub_block, cell_name, pins),
            _ => {}
        }
    }
}

fn cell_from_block(block: &Block) -> Cell {
    let name = block.name().unwrap_or_default();
    let area = block.get_attr("area").and_then(|v| {
        let parsed = value_as_f64(v);
        if parsed.is_none() {
            log::warn!("Ignoring non-numeric area {:?} on {}", v.to_text(), name);
        }
        parsed
    });
    let dont_use = bool_attr(block, "dont_use", &name);
    let has_state = block
        .subblocks()
        .any(|b| STATE_GROUPS.contains(&b.block_type.as_str()));
    let mut pins = Vec::new();
    collect_pins(block, &name, &mut pins);
    Cell {
        name,
        area,
        dont_use,
        pins,
        has_state,
    }
}

impl Library {
    /// Builds the typed view from the top-level `library` group.
    pub fn from_block(block: &Block) -> Self {
        let cells: Vec<Cell> = block
            .subblocks_of_type("cell")
            .map(cell_from_block)
            .collect();
        log::debug!("Extracted {} cells from library", cells.len());
        Library {
            name: block.name(),
            cells,
        }
    }
}
