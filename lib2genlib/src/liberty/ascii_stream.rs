// SPDX-License-Identifier: Apache-2.0

//! Lookahead byte stream used by the Liberty parser.
//!
//! Bytes are pulled lazily from the underlying iterator into a window that is
//! compacted once enough of it has been consumed, so arbitrarily large
//! libraries can be read without holding the whole text in memory.

const COMPACT_THRESHOLD: usize = 64 * 1024;

pub struct AsciiStream<I: Iterator<Item = u8>> {
    iter: I,
    buffer: Vec<u8>,
    raw_pos: usize,
    lineno: usize,
    colno: usize,
}

/// Bytes that may appear in a bare (unquoted) Liberty word, e.g. cell names
/// like `sky130_fd_sc_hd__nand2_1` or bus members like `A[3]`.
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'[' | b']' | b'$')
}

impl<I: Iterator<Item = u8>> AsciiStream<I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            buffer: Vec::new(),
            raw_pos: 0,
            lineno: 0,
            colno: 0,
        }
    }

    pub fn into_inner(self) -> I {
        self.iter
    }

    fn get_pos(&self) -> (usize, usize) {
        (self.lineno, self.colno)
    }

    pub fn human_pos(&self) -> String {
        // Since lineno and colno are zero-based.
        format!("{}:{}", self.lineno + 1, self.colno + 1)
    }

    fn ensure_buffer(&mut self, n: usize) {
        while self.buffer.len().saturating_sub(self.raw_pos) < n {
            match self.iter.next() {
                Some(b) => self.buffer.push(b),
                None => break,
            }
        }
    }

    fn consume(&mut self, n: usize) {
        assert!(self.raw_pos + n <= self.buffer.len());
        for &b in &self.buffer[self.raw_pos..self.raw_pos + n] {
            if b == b'\n' {
                self.lineno += 1;
                self.colno = 0;
            } else {
                self.colno += 1;
            }
        }
        self.raw_pos += n;
        if self.raw_pos > COMPACT_THRESHOLD {
            self.buffer.drain(0..self.raw_pos);
            self.raw_pos = 0;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.ensure_buffer(1);
        self.buffer.get(self.raw_pos).copied()
    }

    fn peek_ahead(&mut self, n: usize) -> Option<u8> {
        self.ensure_buffer(n + 1);
        self.buffer.get(self.raw_pos + n).copied()
    }

    pub fn at_eof(&mut self) -> Result<bool, String> {
        self.skip_whitespace_and_comments()?;
        Ok(self.peek().is_none())
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.consume(1);
        }
    }

    fn skip_comment(&mut self) -> Result<(), String> {
        if !self.peek_is_noskip(b"/*") {
            return Ok(());
        }
        let start = self.human_pos();
        self.consume(2);
        loop {
            if self.peek_is_noskip(b"*/") {
                self.consume(2);
                return Ok(());
            }
            if self.peek().is_none() {
                return Err(format!("Unterminated comment starting @ {}", start));
            }
            self.consume(1);
        }
    }

    fn skip_line_continuation(&mut self) {
        if self.peek_is_noskip(b"\\") {
            self.consume(1);
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), String> {
        loop {
            let start_pos = self.get_pos();
            self.skip_whitespace();
            self.skip_comment()?;
            self.skip_line_continuation();
            if self.get_pos() == start_pos {
                return Ok(());
            }
        }
    }

    fn peek_is_noskip(&mut self, expected: &[u8]) -> bool {
        self.ensure_buffer(expected.len());
        expected
            .iter()
            .enumerate()
            .all(|(i, &want)| self.buffer.get(self.raw_pos + i) == Some(&want))
    }

    pub fn peek_is(&mut self, expected: &[u8]) -> Result<bool, String> {
        self.skip_whitespace_and_comments()?;
        Ok(self.peek_is_noskip(expected))
    }

    pub fn try_pop(&mut self, expected: &[u8]) -> Result<bool, String> {
        if self.peek_is(expected)? {
            self.consume(expected.len());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn pop_or_error(&mut self, expected: &[u8], context: &str) -> Result<(), String> {
        if self.try_pop(expected)? {
            Ok(())
        } else {
            Err(format!(
                "Expected {:?} in {} @ {} rest: {:?}",
                String::from_utf8_lossy(expected),
                context,
                self.human_pos(),
                self.peek_line()
            ))
        }
    }

    /// Simple attributes are usually terminated by `;` but some libraries
    /// rely on the newline alone.
    pub fn pop_semi_or_newline(&mut self, context: &str) -> Result<(), String> {
        loop {
            match self.peek() {
                Some(b';') | Some(b'\n') => {
                    self.consume(1);
                    return Ok(());
                }
                Some(b' ') | Some(b'\t') | Some(b'\r') => self.consume(1),
                Some(b'/') if self.peek_is_noskip(b"/*") => self.skip_comment()?,
                // A closing brace on the same line also ends the attribute.
                Some(b'}') | None => return Ok(()),
                Some(_) => break,
            }
        }
        Err(format!(
            "Expected `;` or newline in {} @ {} rest: {:?}",
            context,
            self.human_pos(),
            self.peek_line()
        ))
    }

    /// Returns the remainder of the current line in the lookahead window, for
    /// error messages.
    pub fn peek_line(&mut self) -> String {
        self.ensure_buffer(80);
        let slice = &self.buffer[self.raw_pos..];
        let end = slice
            .iter()
            .position(|&b| b == b'\n')
            .unwrap_or(slice.len());
        String::from_utf8_lossy(&slice[..end]).into_owned()
    }

    pub fn pop_identifier_or_error(&mut self, context: &str) -> Result<String, String> {
        self.skip_whitespace_and_comments()?;
        let mut ident = Vec::new();
        while let Some(b) = self.peek() {
            if !is_word_byte(b) {
                break;
            }
            ident.push(b);
            self.consume(1);
        }
        if ident.is_empty() {
            Err(format!(
                "Expected identifier in {} @ {} rest: {:?}",
                context,
                self.human_pos(),
                self.peek_line()
            ))
        } else {
            Ok(String::from_utf8_lossy(&ident).into_owned())
        }
    }

    /// Pops the unquoted text of a simple attribute value up to, but not
    /// including, the `;`, newline, `}` or comment that ends it. Values such
    /// as `0.3 * VDD` or `1.0.1` come back verbatim, trimmed.
    pub fn pop_bare_value(&mut self, context: &str) -> Result<String, String> {
        self.skip_whitespace_and_comments()?;
        let mut bytes = Vec::new();
        while let Some(b) = self.peek() {
            match b {
                b';' | b'\n' | b'}' => break,
                b'/' if self.peek_is_noskip(b"/*") => break,
                b'\\' if self.peek_ahead(1) == Some(b'\n') => {
                    self.consume(2);
                    bytes.push(b' ');
                }
                _ => {
                    bytes.push(b);
                    self.consume(1);
                }
            }
        }
        let text = String::from_utf8_lossy(&bytes).trim().to_string();
        if text.is_empty() {
            return Err(format!(
                "Expected value in {} @ {} rest: {:?}",
                context,
                self.human_pos(),
                self.peek_line()
            ));
        }
        Ok(text)
    }

    /// True if the next token starts like a number: a digit, or a sign or dot
    /// followed by a digit.
    pub fn peek_is_numeric(&mut self) -> Result<bool, String> {
        self.skip_whitespace_and_comments()?;
        let Some(b) = self.peek() else {
            return Ok(false);
        };
        if b.is_ascii_digit() {
            return Ok(true);
        }
        let next_is_digit =
            |s: &mut Self, n: usize| s.peek_ahead(n).map(|x| x.is_ascii_digit()).unwrap_or(false);
        Ok(match b {
            b'.' => next_is_digit(self, 1),
            b'-' | b'+' => {
                next_is_digit(self, 1)
                    || (self.peek_ahead(1) == Some(b'.') && next_is_digit(self, 2))
            }
            _ => false,
        })
    }

    pub fn pop_number(&mut self) -> Result<f64, String> {
        self.skip_whitespace_and_comments()?;
        let start = self.human_pos();
        let mut num_str = String::new();
        let mut saw_dot = false;
        let mut saw_e = false;
        while let Some(b) = self.peek() {
            if num_str.is_empty() && (b == b'-' || b == b'+') {
                num_str.push(b as char);
            } else if b.is_ascii_digit() {
                num_str.push(b as char);
            } else if b == b'.' && !saw_e {
                if saw_dot {
                    return Err(format!("Multiple dots in number @ {}", start));
                }
                saw_dot = true;
                num_str.push('.');
            } else if b == b'e' || b == b'E' {
                if saw_e {
                    return Err(format!("Multiple exponents in number @ {}", start));
                }
                saw_e = true;
                num_str.push('e');
                self.consume(1);
                // The exponent may carry its own sign.
                if let Some(sign @ (b'-' | b'+')) = self.peek() {
                    num_str.push(sign as char);
                    self.consume(1);
                }
                continue;
            } else {
                break;
            }
            self.consume(1);
        }
        num_str
            .parse::<f64>()
            .map_err(|e| format!("Failed to parse number {:?} @ {}: {}", num_str, start, e))
    }

    /// Pops a double-quoted string. Backslash-newline sequences inside the
    /// string are dropped; `\"` yields a literal quote.
    pub fn pop_string(&mut self) -> Result<String, String> {
        self.skip_whitespace_and_comments()?;
        let start = self.human_pos();
        self.pop_or_error(b"\"", "string value start")?;
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None => return Err(format!("Unterminated string starting @ {}", start)),
                Some(b'"') => {
                    self.consume(1);
                    break;
                }
                Some(b'\\') => {
                    self.consume(1);
                    match self.peek() {
                        Some(b'\n') => self.consume(1),
                        Some(b'\r') if self.peek_ahead(1) == Some(b'\n') => self.consume(2),
                        Some(b'"') => {
                            bytes.push(b'"');
                            self.consume(1);
                        }
                        _ => bytes.push(b'\\'),
                    }
                }
                Some(b) => {
                    bytes.push(b);
                    self.consume(1);
                }
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
