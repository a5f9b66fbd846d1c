// SPDX-License-Identifier: Apache-2.0

//! Decides whether a Liberty cell can be expressed as a Genlib gate.
//!
//! Genlib gates are combinational, have exactly one output and a single
//! input phase shared by all inputs. Checks run in a fixed order and the first
//! failing one determines the rejection:
//!
//! 1. `dont_use`, unless the selection policy allows the cell,
//! 2. output arity,
//! 3. timing-sense resolution (tie cells pass with no phase),
//! 4. sequential markers on any pin or a state group in the cell,
//! 5. translation of the output function.

use std::fmt;

use super::function::translate;
use super::selection::SelectionPolicy;
use crate::liberty::{Cell, Pin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimingCategory {
    /// No arcs seen, or only arcs without a unate sense.
    None,
    PositiveUnate,
    NegativeUnate,
    /// Arcs disagree, i.e. the function is binate in some input.
    Unknown,
}

impl TimingCategory {
    /// Maps a raw Liberty `timing_sense` token. Anything other than the two
    /// unate senses carries no polarity information.
    pub fn from_timing_sense(raw: Option<&str>) -> Self {
        match raw {
            Some("positive_unate") => TimingCategory::PositiveUnate,
            Some("negative_unate") => TimingCategory::NegativeUnate,
            _ => TimingCategory::None,
        }
    }
}

/// Resolves the polarity of an output pin from its timing arcs, in source
/// order. The first arc sets the baseline; any later arc that maps to a
/// different category makes the result `Unknown`.
pub fn resolve_timing_sense(pin: &Pin) -> TimingCategory {
    let mut baseline: Option<TimingCategory> = None;
    for arc in &pin.timing_arcs {
        let sense = TimingCategory::from_timing_sense(arc.timing_sense.as_deref());
        match baseline {
            None => baseline = Some(sense),
            Some(category) if category != sense => return TimingCategory::Unknown,
            Some(_) => {}
        }
    }
    baseline.unwrap_or(TimingCategory::None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    DontUse,
    MultiOutput { outputs: usize },
    NonUnate,
    Sequential,
    UnsupportedOperator,
}

impl Rejection {
    /// Stable short name, used for summary counts.
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::DontUse => "dont_use",
            Rejection::MultiOutput { .. } => "multi_output",
            Rejection::NonUnate => "non_unate",
            Rejection::Sequential => "sequential",
            Rejection::UnsupportedOperator => "unsupported_operator",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::DontUse => write!(f, "marked dont_use"),
            Rejection::MultiOutput { outputs } => {
                write!(f, "has {} output pins, expected exactly 1", outputs)
            }
            Rejection::NonUnate => write!(f, "non-unate output"),
            Rejection::Sequential => write!(f, "sequential cell"),
            Rejection::UnsupportedOperator => write!(f, "unsupported operator in function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept {
        output_pin: String,
        function: String,
        category: TimingCategory,
        is_tie: bool,
    },
    Reject(Rejection),
}

/// Structural problems that make the whole conversion meaningless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    MissingFunction { cell: String, pin: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::MissingFunction { cell, pin } => write!(
                f,
                "output pin '{}' of cell '{}' has no function attribute",
                pin, cell
            ),
        }
    }
}

impl std::error::Error for ConvertError {}

fn is_sequential(cell: &Cell) -> bool {
    cell.has_state
        || cell
            .pins
            .iter()
            .any(|p| p.clock == Some(true) || p.clock_gate_out_pin == Some(true))
}

pub fn classify(cell: &Cell, policy: &SelectionPolicy) -> Result<Verdict, ConvertError> {
    if cell.is_dont_use() && !policy.is_allowed(&cell.name) {
        return Ok(Verdict::Reject(Rejection::DontUse));
    }

    let outputs: Vec<&Pin> = cell.output_pins().collect();
    let [output] = outputs.as_slice() else {
        return Ok(Verdict::Reject(Rejection::MultiOutput {
            outputs: outputs.len(),
        }));
    };

    let category = resolve_timing_sense(output);
    let is_tie = category == TimingCategory::None && output.timing_arcs.is_empty();
    match category {
        TimingCategory::Unknown => return Ok(Verdict::Reject(Rejection::NonUnate)),
        TimingCategory::None if !is_tie => return Ok(Verdict::Reject(Rejection::NonUnate)),
        _ => {}
    }

    if is_sequential(cell) {
        return Ok(Verdict::Reject(Rejection::Sequential));
    }

    let raw_function = output
        .function
        .as_deref()
        .ok_or_else(|| ConvertError::MissingFunction {
            cell: cell.name.clone(),
            pin: output.name.clone(),
        })?;
    let function = match translate(raw_function) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("{}: {}", cell.name, e);
            return Ok(Verdict::Reject(Rejection::UnsupportedOperator));
        }
    };

    Ok(Verdict::Accept {
        output_pin: output.name.clone(),
        function,
        category,
        is_tie,
    })
}
