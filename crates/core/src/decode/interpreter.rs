use super::Metadata;
use super::hash::collect_pairs;
use super::scan::{find_digit_run, skip_words};
use super::sequence::{CommandSequence, Opcode};
use super::token::read_token;
use crate::config::DecodeConfig;
use crate::error::DecodeError;

/// Result of running a command sequence over a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// Metadata harvested by the opcodes.
    pub metadata: Metadata,
    /// Cursor where interpretation stopped.
    pub cursor: usize,
    /// Whether a `#*<n>D` opcode found no digit run and ended the run early.
    pub stopped_early: bool,
}

/// Interpreter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// About to execute `ops[index]` at `cursor`.
    Running { cursor: usize, index: usize },
    /// Finished; `early` is set when a digit run was not found.
    Done { cursor: usize, early: bool },
}

/// Execute `sequence` against `bytes` from offset zero.
///
/// Opcodes run strictly left to right. Execution stops when the cursor reaches
/// the end of the stream, the opcodes are exhausted, or a `#*<n>D` opcode finds
/// no run of `n` numeric words. A malformed token aborts with an error.
pub fn interpret(
    bytes: &[u8],
    sequence: &CommandSequence,
    config: &DecodeConfig,
) -> Result<Interpretation, DecodeError> {
    let ops = sequence.ops();
    let mut metadata = Metadata::new();
    let mut state = State::Running {
        cursor: 0,
        index: 0,
    };

    loop {
        state = match state {
            State::Running { cursor, index } if cursor < bytes.len() && index < ops.len() => {
                step(bytes, ops[index], cursor, index, config, &mut metadata)?
            }
            State::Running { cursor, .. } => State::Done {
                cursor,
                early: false,
            },
            State::Done { cursor, early } => {
                return Ok(Interpretation {
                    metadata,
                    cursor,
                    stopped_early: early,
                });
            }
        };
    }
}

fn step(
    bytes: &[u8],
    op: Opcode,
    cursor: usize,
    index: usize,
    config: &DecodeConfig,
    metadata: &mut Metadata,
) -> Result<State, DecodeError> {
    let next = |cursor| State::Running {
        cursor,
        index: index + 1,
    };

    let state = match op {
        Opcode::ExactToken => next(read_token(bytes, cursor, config)?.end),
        Opcode::SkipWords(n) => next(skip_words(bytes, cursor, n, config.separator)),
        Opcode::CollectUntilDigitRun(n) => {
            match find_digit_run(bytes, cursor, n, config.separator) {
                Some(run) => {
                    let stored = collect_pairs(bytes, cursor, run.start, config, metadata);
                    tracing::debug!(op = %op, stored, run_start = run.start, run_end = run.end, "collected pairs");
                    next(run.end)
                }
                None => {
                    tracing::debug!(op = %op, cursor, "no digit run; stopping");
                    State::Done {
                        cursor,
                        early: true,
                    }
                }
            }
        }
        Opcode::SingleKv => {
            let key = read_token(bytes, cursor, config)?;
            let value = read_token(bytes, key.end, config)?;
            let end = value.end;
            metadata.insert(key.text, value.text);
            next(end)
        }
        Opcode::Named(tag) => {
            let token = read_token(bytes, cursor, config)?;
            metadata.insert(tag.field_name().to_string(), token.text);
            next(token.end)
        }
    };

    if let State::Running { cursor: to, .. } = state {
        tracing::trace!(op = %op, from = cursor, to, "opcode");
    }
    Ok(state)
}
