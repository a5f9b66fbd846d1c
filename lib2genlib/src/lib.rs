// SPDX-License-Identifier: Apache-2.0

//! Converts Liberty standard-cell libraries into Genlib gate libraries.
//!
//! Only combinational, single-output, unate cells are emitted. Pin timing is
//! not modeled; every gate gets the same placeholder `PIN` parameters.
//!
//! ```
//! use lib2genlib::genlib::{genlib_string, PinParams, SelectionPolicy};
//! use lib2genlib::liberty::{Library, LibertyParser};
//!
//! let text = r#"
//! library (demo) {
//!     cell (INV) {
//!         area : 1.0;
//!         pin (A) { direction : input; }
//!         pin (Y) {
//!             direction : output;
//!             function : "!A";
//!             timing () { related_pin : "A"; timing_sense : negative_unate; }
//!         }
//!     }
//! }
//! "#;
//! let block = LibertyParser::new(text).parse().unwrap();
//! let library = Library::from_block(&block);
//! let genlib =
//!     genlib_string(&library, &SelectionPolicy::default(), &PinParams::default()).unwrap();
//! assert_eq!(genlib, "GATE INV  1.0  Y=!A;\nPIN * INV 1 999 1 0.2 1 0.2\n\n");
//! ```

pub mod genlib;
pub mod liberty;
