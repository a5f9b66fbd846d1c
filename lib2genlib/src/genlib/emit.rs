// SPDX-License-Identifier: Apache-2.0

//! Formatting of accepted cells as Genlib records.

use serde::Deserialize;
use std::fmt;

use super::classify::{TimingCategory, Verdict};
use crate::liberty::Cell;

/// Numeric fields of the Genlib `PIN` line. No timing analysis is done, so
/// these are placeholders applied uniformly to every gate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinParams {
    pub input_load: f64,
    pub max_load: f64,
    pub rise_block_delay: f64,
    pub rise_fanout_delay: f64,
    pub fall_block_delay: f64,
    pub fall_fanout_delay: f64,
}

impl Default for PinParams {
    fn default() -> Self {
        PinParams {
            input_load: 1.0,
            max_load: 999.0,
            rise_block_delay: 1.0,
            rise_fanout_delay: 0.2,
            fall_block_delay: 1.0,
            fall_fanout_delay: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Inv,
    NonInv,
}

impl Phase {
    pub fn from_category(category: TimingCategory) -> Option<Self> {
        match category {
            TimingCategory::PositiveUnate => Some(Phase::NonInv),
            TimingCategory::NegativeUnate => Some(Phase::Inv),
            TimingCategory::None | TimingCategory::Unknown => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Inv => write!(f, "INV"),
            Phase::NonInv => write!(f, "NONINV"),
        }
    }
}

/// One Genlib gate. `pin` is `None` for tie cells, which get no `PIN` line.
#[derive(Debug, Clone, PartialEq)]
pub struct GenlibRecord {
    pub name: String,
    pub area: f64,
    pub output_pin: String,
    pub function: String,
    pub pin: Option<(Phase, PinParams)>,
}

impl fmt::Display for GenlibRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` keeps the fractional part, e.g. `2.0` rather than `2`.
        writeln!(
            f,
            "GATE {}  {:?}  {}={};",
            self.name, self.area, self.output_pin, self.function
        )?;
        if let Some((phase, p)) = &self.pin {
            writeln!(
                f,
                "PIN * {} {} {} {} {} {} {}",
                phase,
                p.input_load,
                p.max_load,
                p.rise_block_delay,
                p.rise_fanout_delay,
                p.fall_block_delay,
                p.fall_fanout_delay
            )?;
        }
        writeln!(f)
    }
}

/// Builds the record for an accepted cell. Rejected cells produce nothing but
/// an `info` diagnostic.
pub fn emit(cell: &Cell, verdict: &Verdict, params: &PinParams) -> Option<GenlibRecord> {
    let (output_pin, function, category, is_tie) = match verdict {
        Verdict::Reject(rejection) => {
            log::info!("Skipping cell {}: {}", cell.name, rejection);
            return None;
        }
        Verdict::Accept {
            output_pin,
            function,
            category,
            is_tie,
        } => (output_pin, function, *category, *is_tie),
    };
    let area = cell.area.unwrap_or_else(|| {
        log::warn!("Cell {} has no area; emitting 0.0", cell.name);
        0.0
    });
    let pin = if is_tie {
        None
    } else {
        match Phase::from_category(category) {
            Some(phase) => Some((phase, *params)),
            None => {
                // Only tie cells may be accepted without a unate phase.
                log::error!(
                    "Cell {} accepted with timing category {:?}; skipping",
                    cell.name,
                    category
                );
                return None;
            }
        }
    };
    Some(GenlibRecord {
        name: cell.name.clone(),
        area,
        output_pin: output_pin.clone(),
        function: function.clone(),
        pin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genlib::classify::Rejection;
    use pretty_assertions::assert_eq;

    fn cell_x(area: Option<f64>) -> Cell {
        Cell {
            name: "X".to_string(),
            area,
            ..Default::default()
        }
    }

    fn accept(function: &str, category: TimingCategory, is_tie: bool) -> Verdict {
        Verdict::Accept {
            output_pin: "Y".to_string(),
            function: function.to_string(),
            category,
            is_tie,
        }
    }

    #[test]
    fn test_noninv_record() {
        let record = emit(
            &cell_x(Some(2.0)),
            &accept("A*B", TimingCategory::PositiveUnate, false),
            &PinParams::default(),
        )
        .unwrap();
        assert_eq!(
            record.to_string(),
            "GATE X  2.0  Y=A*B;\nPIN * NONINV 1 999 1 0.2 1 0.2\n\n"
        );
    }

    #[test]
    fn test_inv_record_with_custom_params() {
        let params = PinParams {
            input_load: 2.5,
            max_load: 100.0,
            ..Default::default()
        };
        let record = emit(
            &cell_x(Some(0.75)),
            &accept("!(A*B)", TimingCategory::NegativeUnate, false),
            &params,
        )
        .unwrap();
        assert_eq!(
            record.to_string(),
            "GATE X  0.75  Y=!(A*B);\nPIN * INV 2.5 100 1 0.2 1 0.2\n\n"
        );
    }

    #[test]
    fn test_tie_record_has_no_pin_line() {
        let record = emit(
            &cell_x(Some(2.0)),
            &accept("CONST0", TimingCategory::None, true),
            &PinParams::default(),
        )
        .unwrap();
        assert_eq!(record.pin, None);
        assert_eq!(record.to_string(), "GATE X  2.0  Y=CONST0;\n\n");
    }

    #[test]
    fn test_missing_area_renders_zero() {
        let record = emit(
            &cell_x(None),
            &accept("A", TimingCategory::PositiveUnate, false),
            &PinParams::default(),
        )
        .unwrap();
        assert_eq!(record.area, 0.0);
        assert!(record.to_string().starts_with("GATE X  0.0  Y=A;\n"));
    }

    #[test]
    fn test_rejections_emit_nothing() {
        for rejection in [
            Rejection::DontUse,
            Rejection::MultiOutput { outputs: 2 },
            Rejection::NonUnate,
            Rejection::Sequential,
            Rejection::UnsupportedOperator,
        ] {
            assert_eq!(
                emit(
                    &cell_x(Some(1.0)),
                    &Verdict::Reject(rejection),
                    &PinParams::default()
                ),
                None
            );
        }
    }

    #[test]
    fn test_phase_mapping() {
        assert_eq!(
            Phase::from_category(TimingCategory::PositiveUnate),
            Some(Phase::NonInv)
        );
        assert_eq!(
            Phase::from_category(TimingCategory::NegativeUnate),
            Some(Phase::Inv)
        );
        assert_eq!(Phase::from_category(TimingCategory::Unknown), None);
        assert_eq!(Phase::from_category(TimingCategory::None), None);
    }
}
