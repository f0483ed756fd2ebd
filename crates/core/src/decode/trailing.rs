use std::sync::LazyLock;

use regex::Regex;

use super::RawParams;
use super::token::decode_permissive;

/// `<decimal-length> <identifier> <non-space-value>`
static PAIR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) (\w+) ([^ ]+)").expect("parameter pair pattern is valid")
});

/// Read from `offset` up to (not including) the first `terminator` byte or the
/// end of the stream, decoding permissively as UTF-8.
pub fn read_until_terminator(bytes: &[u8], offset: usize, terminator: u8) -> String {
    let tail = bytes.get(offset..).unwrap_or_default();
    let end = tail
        .iter()
        .position(|&b| b == terminator)
        .unwrap_or(tail.len());
    decode_permissive(&tail[..end])
}

/// Extract `<len> <key> <value>` triples from free text.
///
/// A match is accepted only when `len` equals the character count of `key`,
/// which filters accidental matches inside free text. Later matches overwrite
/// earlier ones for the same key.
pub fn extract_params(text: &str) -> RawParams {
    let mut params = RawParams::new();
    for caps in PAIR_PATTERN.captures_iter(text) {
        let (_, [len, key, value]) = caps.extract();
        let Ok(len) = len.parse::<usize>() else {
            continue;
        };
        if key.chars().count() == len {
            params.insert(key.to_string(), value.to_string());
        }
    }
    params
}
