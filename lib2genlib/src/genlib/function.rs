// SPDX-License-Identifier: Apache-2.0

//! Rewrites Liberty `function` strings into Genlib expression syntax.
//!
//! The rewrite is purely character-level: `&` becomes `*`, `|` becomes `+`,
//! double quotes and whitespace are dropped, and everything else (pin names,
//! parentheses, `!` and postfix `'` inversions, constants) is copied through.
//! XOR is not representable for our purposes and is rejected outright, even
//! when the timing arcs claim the cell is unate.

use std::fmt;

pub const XOR_OPERATOR: char = '^';
pub const CONST0: &str = "CONST0";
pub const CONST1: &str = "CONST1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedOperator {
    pub operator: char,
    pub function: String,
}

impl fmt::Display for UnsupportedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported operator '{}' in function {:?}",
            self.operator, self.function
        )
    }
}

impl std::error::Error for UnsupportedOperator {}

pub fn translate(raw: &str) -> Result<String, UnsupportedOperator> {
    if raw.contains(XOR_OPERATOR) {
        return Err(UnsupportedOperator {
            operator: XOR_OPERATOR,
            function: raw.to_string(),
        });
    }
    let rewritten: String = raw
        .chars()
        .filter_map(|c| match c {
            '&' => Some('*'),
            '|' => Some('+'),
            '"' => None,
            c if c.is_whitespace() => None,
            c => Some(c),
        })
        .collect();
    // Constants are only recognized after the rewrite, so `" 0 "` is a tie
    // cell but `A0` is an ordinary pin name.
    Ok(match rewritten.as_str() {
        "0" => CONST0.to_string(),
        "1" => CONST1.to_string(),
        _ => rewritten,
    })
}
