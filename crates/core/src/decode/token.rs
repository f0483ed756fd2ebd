use crate::config::DecodeConfig;
use crate::error::{DecodeError, TokenFault};

/// A decoded length-prefixed token.
///
/// `start` is where the length prefix begins; `end` is the cursor after the
/// payload and its optional trailing separator, i.e. where the next read starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Payload decoded as UTF-8, with invalid sequences dropped.
    pub text: String,
    /// Byte offset of the first length digit.
    pub start: usize,
    /// Byte offset one past the token (and its trailing separator, if any).
    pub end: usize,
}

/// Read one `"<len><sep><payload>[<sep>]"` token starting at `start`.
///
/// The separator must appear within `config.lookahead` bytes. A payload that
/// runs past the end of the stream is truncated at the end.
pub fn read_token(bytes: &[u8], start: usize, config: &DecodeConfig) -> Result<Token, DecodeError> {
    let window_end = start.saturating_add(config.lookahead).min(bytes.len());
    let window = bytes.get(start..window_end).unwrap_or_default();

    let sep = window
        .iter()
        .position(|&b| b == config.separator)
        .ok_or(DecodeError::MalformedToken {
            offset: start,
            fault: TokenFault::MissingSeparator,
        })?;
    let len = parse_length(&window[..sep]).ok_or_else(|| DecodeError::MalformedToken {
        offset: start,
        fault: TokenFault::InvalidLength(decode_permissive(&window[..sep])),
    })?;

    let payload_start = start + sep + 1;
    let payload_end = payload_start.saturating_add(len).min(bytes.len());
    let text = decode_permissive(&bytes[payload_start..payload_end]);

    let mut end = payload_end;
    if bytes.get(end) == Some(&config.separator) {
        end += 1;
    }

    Ok(Token { text, start, end })
}

/// Parse an ASCII decimal length, tolerating surrounding ASCII whitespace.
fn parse_length(field: &[u8]) -> Option<usize> {
    let digits = field.trim_ascii();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_permissive(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}
