// SPDX-License-Identifier: Apache-2.0

//! Liberty reading: byte stream, group AST, and the typed cell view consumed
//! by the Genlib conversion.

mod ascii_stream;
pub mod liberty_parser;
pub mod library;
pub mod load;

pub use library::{Cell, Library, Pin, PinDirection, TimingArc};
pub use liberty_parser::{CharReader, LibertyParser};
pub use load::load_library;
