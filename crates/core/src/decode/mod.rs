//! Preset dump decoding.
//!
//! A dump is a header of length-prefixed tokens and whitespace-separated
//! words, followed by a free-form parameter block of `<len> <key> <value>`
//! triples that ends at a terminator byte. A [`CommandSequence`] describes how
//! to walk the header; [`decode_preset`] runs it and then extracts the
//! parameter block.
//!
//! Every step is a pure function of `(bytes, cursor)` returning its result and
//! the next cursor, so no file handle is involved.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DecodeConfig;
use crate::error::DecodeError;

/// Key/value pair collection from raw token pairs.
pub mod hash;
/// Command sequence execution.
pub mod interpreter;
/// Word skipping and digit-run location.
pub mod scan;
/// Command sequence grammar.
pub mod sequence;
/// Length-prefixed token reading.
pub mod token;
/// Trailing parameter block extraction.
pub mod trailing;

pub use interpreter::{Interpretation, interpret};
pub use sequence::{CommandSequence, Opcode, Tag};

/// Header metadata harvested by the interpreter.
pub type Metadata = BTreeMap<String, String>;

/// Parameter key → raw value text.
pub type RawParams = BTreeMap<String, String>;

/// Everything decoded from one preset dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedPreset {
    /// Header metadata.
    pub metadata: Metadata,
    /// Offset where the trailing parameter text begins.
    pub body_offset: usize,
    /// Raw parameter values from the trailing text.
    pub params: RawParams,
}

/// Decode a preset dump.
///
/// Runs `sequence` over the header, skips one byte past the interpreter's
/// final cursor, and extracts parameters from the text up to the terminator.
pub fn decode_preset(
    bytes: &[u8],
    sequence: &CommandSequence,
    config: &DecodeConfig,
) -> Result<DecodedPreset, DecodeError> {
    let Interpretation {
        metadata,
        cursor,
        stopped_early,
    } = interpret(bytes, sequence, config)?;

    let body_offset = cursor.saturating_add(1).min(bytes.len());
    let text = trailing::read_until_terminator(bytes, body_offset, config.terminator);
    let params = trailing::extract_params(&text);

    tracing::debug!(
        len = bytes.len(),
        cursor,
        stopped_early,
        metadata = metadata.len(),
        params = params.len(),
        "decoded preset"
    );

    Ok(DecodedPreset {
        metadata,
        body_offset,
        params,
    })
}
