// SPDX-License-Identifier: Apache-2.0

//! Streaming parser for the Liberty group/attribute grammar.
//!
//! The parser only understands the generic structure of a Liberty file:
//! groups (`cell (NAND2) { ... }`), simple attributes (`area : 1.0;`) and
//! complex attributes (`capacitive_load_unit (1, pf);`). Interpreting what the
//! groups mean is left to [`crate::liberty::library`].

use std::io::{BufReader, Read};

use super::ascii_stream::AsciiStream;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Identifier(String),
    Tuple(Vec<Value>),
}

impl Value {
    /// Textual form of a scalar value; numbers are rendered with `Display`.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) | Value::Identifier(s) => s.clone(),
            Value::Number(n) => format!("{n}"),
            Value::Tuple(xs) => {
                let parts: Vec<String> = xs.iter().map(Value::to_text).collect();
                format!("({})", parts.join(","))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockAttr {
    pub attr_name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockMember {
    BlockAttr(BlockAttr),
    SubBlock(Box<Block>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub block_type: String,
    // Note: groups can be unnamed, e.g. `timing() { ... }`, or carry several
    // qualifiers, e.g. `ff (IQ, IQN) { ... }`.
    pub qualifiers: Vec<Value>,
    pub members: Vec<BlockMember>,
}

impl Block {
    /// The first qualifier as text; this is the group name for `cell`, `pin`
    /// and similar groups.
    pub fn name(&self) -> Option<String> {
        match self.qualifiers.first()? {
            Value::String(s) | Value::Identifier(s) => Some(s.clone()),
            Value::Number(n) => Some(format!("{n}")),
            Value::Tuple(_) => None,
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = &BlockAttr> {
        self.members.iter().filter_map(|m| match m {
            BlockMember::BlockAttr(attr) => Some(attr),
            BlockMember::SubBlock(_) => None,
        })
    }

    pub fn subblocks(&self) -> impl Iterator<Item = &Block> {
        self.members.iter().filter_map(|m| match m {
            BlockMember::SubBlock(sb) => Some(sb.as_ref()),
            BlockMember::BlockAttr(_) => None,
        })
    }

    pub fn subblocks_of_type<'a>(&'a self, block_type: &'a str) -> impl Iterator<Item = &'a Block> {
        self.subblocks().filter(move |b| b.block_type == block_type)
    }

    /// Looks up a simple or complex attribute by name. If an attribute is
    /// repeated, the last occurrence wins.
    pub fn get_attr(&self, attr_name: &str) -> Option<&Value> {
        self.attrs()
            .filter(|a| a.attr_name == attr_name)
            .last()
            .map(|a| &a.value)
    }
}

/// Byte iterator over any reader. The first I/O error ends the iteration and
/// is kept for the caller to retrieve via [`CharReader::take_error`].
pub struct CharReader<R: Read> {
    bytes: std::io::Bytes<BufReader<R>>,
    error: Option<std::io::Error>,
}

impl<R: Read> CharReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::with_capacity(256 * 1024, reader).bytes(),
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }
}

impl<R: Read> Iterator for CharReader<R> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.error.is_some() {
            return None;
        }
        match self.bytes.next()? {
            Ok(b) => Some(b),
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

/// Interprets unquoted simple-attribute text. Anything that is not a single
/// number, e.g. `0.3 * VDD`, is kept verbatim as an identifier.
fn bare_value(text: String) -> Value {
    let looks_numeric = text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    match text.parse::<f64>() {
        Ok(n) if looks_numeric => Value::Number(n),
        _ => Value::Identifier(text),
    }
}

pub struct LibertyParser<I: Iterator<Item = u8>> {
    stream: AsciiStream<I>,
}

impl<'a> LibertyParser<std::str::Bytes<'a>> {
    pub fn new(text: &'a str) -> Self {
        Self::new_from_iter(text.bytes())
    }
}

impl<I: Iterator<Item = u8>> LibertyParser<I> {
    pub fn new_from_iter(iter: I) -> Self {
        Self {
            stream: AsciiStream::new(iter),
        }
    }

    /// Gives back the underlying byte source, e.g. to check a [`CharReader`]
    /// for an I/O error after parsing.
    pub fn into_source(self) -> I {
        self.stream.into_inner()
    }

    fn pop_value(&mut self, context: &str) -> Result<Value, String> {
        if self.stream.peek_is(b"\"")? {
            Ok(Value::String(self.stream.pop_string()?))
        } else if self.stream.peek_is_numeric()? {
            Ok(Value::Number(self.stream.pop_number()?))
        } else {
            Ok(Value::Identifier(
                self.stream.pop_identifier_or_error(context)?,
            ))
        }
    }

    /// Pops a parenthesized, comma-separated value list; the opening paren
    /// has already been consumed.
    fn pop_qualifiers(&mut self, context: &str) -> Result<Vec<Value>, String> {
        let mut values = Vec::new();
        if self.stream.try_pop(b")")? {
            return Ok(values);
        }
        loop {
            values.push(self.pop_value(context)?);
            if self.stream.try_pop(b")")? {
                return Ok(values);
            }
            self.stream.pop_or_error(b",", context)?;
        }
    }

    fn parse_block_member(&mut self) -> Result<BlockMember, String> {
        let attr_name = self.stream.pop_identifier_or_error("attribute name")?;
        if self.stream.try_pop(b":")? {
            let value = if self.stream.peek_is(b"\"")? {
                Value::String(self.stream.pop_string()?)
            } else {
                bare_value(self.stream.pop_bare_value("attribute value")?)
            };
            log::trace!("simple attribute {} = {:?}", attr_name, value);
            self.stream.pop_semi_or_newline("simple attribute")?;
            return Ok(BlockMember::BlockAttr(BlockAttr { attr_name, value }));
        }

        self.stream
            .pop_or_error(b"(", "group or complex attribute start")?;
        let qualifiers = self.pop_qualifiers("group qualifiers")?;
        if self.stream.peek_is(b"{")? {
            log::trace!("group {} {:?}", attr_name, qualifiers);
            let block = self.parse_block_body(attr_name, qualifiers)?;
            return Ok(BlockMember::SubBlock(Box::new(block)));
        }

        // Complex attribute; a single value is stored unwrapped.
        self.stream.pop_semi_or_newline("complex attribute")?;
        let value = match <[Value; 1]>::try_from(qualifiers) {
            Ok([single]) => single,
            Err(qualifiers) => Value::Tuple(qualifiers),
        };
        log::trace!("complex attribute {} = {:?}", attr_name, value);
        Ok(BlockMember::BlockAttr(BlockAttr { attr_name, value }))
    }

    fn parse_block_body(
        &mut self,
        block_type: String,
        qualifiers: Vec<Value>,
    ) -> Result<Block, String> {
        self.stream.pop_or_error(b"{", "group body start")?;
        let mut members = Vec::new();
        while !self.stream.try_pop(b"}")? {
            if self.stream.at_eof()? {
                return Err(format!(
                    "Unexpected end of input inside {} group @ {}",
                    block_type,
                    self.stream.human_pos()
                ));
            }
            // Stray semicolons after a closing brace are tolerated.
            if self.stream.try_pop(b";")? {
                continue;
            }
            members.push(self.parse_block_member()?);
        }
        Ok(Block {
            block_type,
            qualifiers,
            members,
        })
    }

    /// Parses the top-level group (normally `library (...) { ... }`).
    pub fn parse(&mut self) -> Result<Block, String> {
        let block_type = self.stream.pop_identifier_or_error("top-level group type")?;
        self.stream.pop_or_error(b"(", "top-level group name start")?;
        let qualifiers = self.pop_qualifiers("top-level group name")?;
        let block = self.parse_block_body(block_type, qualifiers)?;
        if !self.stream.at_eof()? {
            return Err(format!(
                "Trailing content after top-level group @ {} rest: {:?}",
                self.stream.human_pos(),
                self.stream.peek_line()
            ));
        }
        Ok(block)
    }
}
