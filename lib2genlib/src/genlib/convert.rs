// SPDX-License-Identifier: Apache-2.0

//! Single pass over a library: classify each cell, emit accepted ones.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Write;

use super::classify::{classify, Verdict};
use super::emit::{emit, GenlibRecord, PinParams};
use super::selection::SelectionPolicy;
use crate::liberty::Library;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub emitted: usize,
    /// Rejected cell count keyed by `Rejection::kind()`.
    pub rejected: BTreeMap<&'static str, usize>,
}

impl ConversionSummary {
    pub fn total_rejected(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Classifies every cell of `library` and builds the records of the eligible
/// ones, in library order. Any structural error aborts before a record is
/// returned.
pub fn convert_library(
    library: &Library,
    policy: &SelectionPolicy,
    params: &PinParams,
) -> Result<(Vec<GenlibRecord>, ConversionSummary)> {
    let mut summary = ConversionSummary::default();
    let mut records = Vec::new();
    for cell in &library.cells {
        let verdict = classify(cell, policy)?;
        if let Verdict::Reject(rejection) = &verdict {
            *summary.rejected.entry(rejection.kind()).or_insert(0) += 1;
        }
        if let Some(record) = emit(cell, &verdict, params) {
            records.push(record);
            summary.emitted += 1;
        }
    }
    Ok((records, summary))
}

/// Writes the Genlib records for every eligible cell of `library` to `out`.
/// Nothing is written unless the whole library converts.
pub fn write_genlib<W: Write>(
    library: &Library,
    policy: &SelectionPolicy,
    params: &PinParams,
    out: &mut W,
) -> Result<ConversionSummary> {
    let (records, summary) = convert_library(library, policy, params)?;
    for record in &records {
        write!(out, "{}", record)
            .with_context(|| format!("writing Genlib record for {}", record.name))?;
    }
    out.flush().context("flushing Genlib output")?;
    log::info!(
        "Emitted {} of {} cells; rejected {:?}",
        summary.emitted,
        library.cells.len(),
        summary.rejected
    );
    Ok(summary)
}

/// Convenience wrapper that returns the Genlib text as a string.
pub fn genlib_string(
    library: &Library,
    policy: &SelectionPolicy,
    params: &PinParams,
) -> Result<String> {
    let mut buf = Vec::new();
    write_genlib(library, policy, params, &mut buf)?;
    String::from_utf8(buf).context("Genlib output is not UTF-8")
}
