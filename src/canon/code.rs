// SPDX-License-Identifier: Apache-2.0

//! Packed canonical codes and their textual form.
//!
//! An edge element packs `(parent, child)` local ids as `parent << 32 |
//! child`. A label element has every bit of the upper half set, which no edge
//! can reach because local ids stay below 2^31. Text form prints edges as
//! `(p,c)` and labels by their symbol, e.g. `(0,1)(0,2)+(1,2)(1,3)*`.

use serde::{Deserialize, Serialize};

use crate::graph::Label;

pub const LABEL_TAG: u64 = 0xFFFF_FFFF_0000_0000;

#[inline]
pub fn encode_edge(parent: u32, child: u32) -> u64 {
    debug_assert!(parent < (1 << 31) && child < (1 << 31));
    ((parent as u64) << 32) | child as u64
}

#[inline]
pub fn encode_label(label: Label) -> u64 {
    LABEL_TAG | label.index()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeElement {
    Edge { parent: u32, child: u32 },
    Label(Label),
}

impl CodeElement {
    pub fn decode(value: u64) -> Option<CodeElement> {
        if value & LABEL_TAG == LABEL_TAG {
            Label::from_index(value & !LABEL_TAG).map(CodeElement::Label)
        } else {
            Some(CodeElement::Edge {
                parent: (value >> 32) as u32,
                child: value as u32,
            })
        }
    }

    pub fn encode(self) -> u64 {
        match self {
            CodeElement::Edge { parent, child } => encode_edge(parent, child),
            CodeElement::Label(label) => encode_label(label),
        }
    }
}

/// Isomorphism-invariant code of an occurrence; equal codes mean equal
/// patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalCode(pub Vec<u64>);

impl CanonicalCode {
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn elements(&self) -> impl Iterator<Item = CodeElement> + '_ {
        self.0.iter().filter_map(|&v| CodeElement::decode(v))
    }

    /// Number of occurrence vertices described by the code.
    pub fn internal_count(&self) -> usize {
        self.0.iter().filter(|&&v| v & LABEL_TAG == LABEL_TAG).count()
    }

    pub fn edge_count(&self) -> usize {
        self.0.len() - self.internal_count()
    }
}

impl std::fmt::Display for CanonicalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for element in self.elements() {
            match element {
                CodeElement::Edge { parent, child } => write!(f, "({},{})", parent, child)?,
                CodeElement::Label(label) => write!(f, "{}", label.symbol())?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeParseError {
    msg: String,
}

impl CodeParseError {
    fn at(msg: &str, input: &str, pos: usize) -> Self {
        let col = input[..pos].chars().count() + 1;
        CodeParseError {
            msg: format!("{} at column {}", msg, col),
        }
    }
}

impl std::fmt::Display for CodeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CodeParseError: {}", self.msg)
    }
}

impl std::error::Error for CodeParseError {}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn err(&self, msg: &str) -> CodeParseError {
        CodeParseError::at(msg, self.input, self.pos)
    }

    fn expect(&mut self, c: char) -> Result<(), CodeParseError> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.err(&format!("expected '{}'", c)))
        }
    }

    fn parse_id(&mut self) -> Result<u32, CodeParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let value: u32 = self.input[start..self.pos]
            .parse()
            .map_err(|_| CodeParseError::at("expected a local id", self.input, start))?;
        if value >= (1 << 31) {
            return Err(CodeParseError::at("local id out of range", self.input, start));
        }
        Ok(value)
    }

    fn parse(mut self) -> Result<CanonicalCode, CodeParseError> {
        let mut values = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
                continue;
            }
            if c == '(' {
                self.pos += 1;
                let parent = self.parse_id()?;
                self.expect(',')?;
                let child = self.parse_id()?;
                self.expect(')')?;
                values.push(CodeElement::Edge { parent, child }.encode());
            } else if let Some(label) = Label::from_symbol(c) {
                self.pos += c.len_utf8();
                values.push(CodeElement::Label(label).encode());
            } else {
                return Err(self.err(&format!("unexpected character '{}'", c)));
            }
        }
        Ok(CanonicalCode(values))
    }
}

impl std::str::FromStr for CanonicalCode {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser { input: s, pos: 0 }.parse()
    }
}
