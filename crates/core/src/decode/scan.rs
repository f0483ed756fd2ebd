//! Separator-delimited word scanning: the word skipper and the digit-run
//! locator.
//!
//! Both share one boundary rule: a word ends when a separator byte follows a
//! non-separator byte, so runs of consecutive separators never produce empty
//! words. A word at end of stream with no separator after it is never counted.

/// Byte range of a run of consecutive all-digit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitRun {
    /// Offset of the first digit of the run's first word.
    pub start: usize,
    /// Offset of the separator terminating the run's last word.
    pub end: usize,
}

/// Advance past `count` words starting at `start`, then past any separators
/// that immediately follow. Returns the new cursor (at most `bytes.len()`).
pub fn skip_words(bytes: &[u8], start: usize, count: usize, separator: u8) -> usize {
    let mut pos = start.min(bytes.len());
    let mut remaining = count;
    let mut in_word = false;

    while remaining > 0 && pos < bytes.len() {
        let b = bytes[pos];
        pos += 1;
        if b == separator {
            if in_word {
                remaining -= 1;
            }
            in_word = false;
        } else {
            in_word = true;
        }
    }

    while pos < bytes.len() && bytes[pos] == separator {
        pos += 1;
    }
    pos
}

/// Find the first run of `count` consecutive all-digit words at or after
/// `start`.
///
/// A word containing any non-ASCII-digit byte resets the run. Returns `None`
/// when the stream ends first, or when `count` is zero.
pub fn find_digit_run(bytes: &[u8], start: usize, count: usize, separator: u8) -> Option<DigitRun> {
    if count == 0 {
        return None;
    }

    let mut run_len = 0usize;
    let mut run_start = 0usize;
    let mut word_start: Option<usize> = None;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if b != separator {
            word_start.get_or_insert(i);
            continue;
        }
        let Some(ws) = word_start.take() else {
            continue;
        };
        if bytes[ws..i].iter().all(u8::is_ascii_digit) {
            run_len += 1;
            if run_len == 1 {
                run_start = ws;
            }
            if run_len == count {
                return Some(DigitRun {
                    start: run_start,
                    end: i,
                });
            }
        } else {
            run_len = 0;
        }
    }
    None
}
