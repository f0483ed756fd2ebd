use std::fmt;
use std::str::FromStr;

use crate::error::SequenceError;

/// Tag of a `named-token` opcode: which human name the token is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `N`: preset name.
    Name,
    /// `B`: bank.
    Bank,
    /// `D`: designer.
    Designer,
    /// `T`: free text.
    Text,
    /// `V`: firmware/format version.
    Version,
}

impl Tag {
    /// Map a sequence letter to its tag.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'N' => Some(Tag::Name),
            'B' => Some(Tag::Bank),
            'D' => Some(Tag::Designer),
            'T' => Some(Tag::Text),
            'V' => Some(Tag::Version),
            _ => None,
        }
    }

    /// The sequence letter for this tag.
    pub fn letter(self) -> char {
        match self {
            Tag::Name => 'N',
            Tag::Bank => 'B',
            Tag::Designer => 'D',
            Tag::Text => 'T',
            Tag::Version => 'V',
        }
    }

    /// Metadata key the token is stored under.
    pub fn field_name(self) -> &'static str {
        match self {
            Tag::Name => "Name",
            Tag::Bank => "Bank",
            Tag::Designer => "Designer",
            Tag::Text => "Text",
            Tag::Version => "Version",
        }
    }
}

/// One instruction of a command sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// `_`: read one token and discard it.
    ExactToken,
    /// `<n>`: skip `n` separator-delimited words.
    SkipWords(usize),
    /// `#*<n>D`: collect key/value pairs up to the next run of `n` numeric words.
    CollectUntilDigitRun(usize),
    /// `#`: read one key token and one value token.
    SingleKv,
    /// A tag letter: read one token and store it under the tag's field name.
    Named(Tag),
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::ExactToken => write!(f, "_"),
            Opcode::SkipWords(n) => write!(f, "{n}"),
            Opcode::CollectUntilDigitRun(n) => write!(f, "#*{n}D"),
            Opcode::SingleKv => write!(f, "#"),
            Opcode::Named(tag) => write!(f, "{}", tag.letter()),
        }
    }
}

impl FromStr for Opcode {
    type Err = SequenceError;

    fn from_str(word: &str) -> Result<Self, Self::Err> {
        if word == "_" {
            return Ok(Opcode::ExactToken);
        }
        if word == "#" {
            return Ok(Opcode::SingleKv);
        }
        if let Some(count) = word.strip_prefix("#*") {
            let digits = count
                .strip_suffix('D')
                .ok_or_else(|| SequenceError::UnknownOpcode(word.to_string()))?;
            return parse_count(digits)
                .map(Opcode::CollectUntilDigitRun)
                .ok_or_else(|| SequenceError::InvalidCount(word.to_string()));
        }
        if word.bytes().all(|b| b.is_ascii_digit()) && !word.is_empty() {
            return parse_count(word)
                .map(Opcode::SkipWords)
                .ok_or_else(|| SequenceError::InvalidCount(word.to_string()));
        }

        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Tag::from_letter(c)
                .map(Opcode::Named)
                .ok_or_else(|| SequenceError::UnknownOpcode(word.to_string())),
            _ => Err(SequenceError::UnknownOpcode(word.to_string())),
        }
    }
}

fn parse_count(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// An ordered list of opcodes, parsed from whitespace-separated text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSequence {
    ops: Vec<Opcode>,
}

impl CommandSequence {
    /// Build a sequence from opcodes.
    pub fn new(ops: Vec<Opcode>) -> Self {
        Self { ops }
    }

    /// The opcodes in evaluation order.
    pub fn ops(&self) -> &[Opcode] {
        &self.ops
    }

    /// Number of opcodes.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the sequence has no opcodes.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl FromStr for CommandSequence {
    type Err = SequenceError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

impl fmt::Display for CommandSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
