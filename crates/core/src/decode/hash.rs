use super::Metadata;
use super::token::read_token;
use crate::config::DecodeConfig;

/// Harvest key/value token pairs from `[start, end)` into `metadata`.
///
/// Stops at the first pair where a read fails, a token is empty, or a read
/// would leave the cursor at or beyond `end`; that pair is not stored. Later
/// keys overwrite earlier ones. Returns the number of pairs stored.
pub fn collect_pairs(
    bytes: &[u8],
    start: usize,
    end: usize,
    config: &DecodeConfig,
    metadata: &mut Metadata,
) -> usize {
    let mut cursor = start;
    let mut stored = 0;

    while cursor < end {
        let Ok(key) = read_token(bytes, cursor, config) else {
            break;
        };
        if key.end >= end || key.text.is_empty() {
            break;
        }
        let Ok(value) = read_token(bytes, key.end, config) else {
            break;
        };
        if value.end >= end || value.text.is_empty() {
            break;
        }
        metadata.insert(key.text, value.text);
        cursor = value.end;
        stored += 1;
    }

    stored
}
