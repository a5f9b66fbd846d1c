// SPDX-License-Identifier: Apache-2.0

//! Liberty to Genlib translation.

pub mod classify;
pub mod convert;
pub mod emit;
pub mod function;
pub mod selection;

pub use classify::{
    classify, resolve_timing_sense, ConvertError, Rejection, TimingCategory, Verdict,
};
pub use convert::{convert_library, genlib_string, write_genlib, ConversionSummary};
pub use emit::{emit, GenlibRecord, Phase, PinParams};
pub use function::{translate, UnsupportedOperator};
pub use selection::SelectionPolicy;
