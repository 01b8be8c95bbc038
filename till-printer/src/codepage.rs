//! Code page utilities for Western thermal printers
//!
//! Receipt text is laid out in UTF-8 and sent in WPC1252, a single-byte code
//! page, so every `char` occupies one printer column. This module provides:
//! - Column widths and truncation by `char`
//! - Converting UTF-8 to WPC1252 while preserving ESC/POS commands

use tracing::instrument;

/// ESC t 16 - select WPC1252 character table
const SELECT_WPC1252: [u8; 3] = [0x1B, 0x74, 16];

/// Printer column width of a string
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to at most `max_width` columns
pub fn truncate_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to WPC1252
///
/// ASCII bytes (0x00-0x7F) are copied as is, which keeps ESC/POS commands
/// intact. Runs of bytes >= 0x80 are decoded as UTF-8 and re-encoded;
/// characters outside the code page print as `?`.
///
/// Every INIT (ESC @) resets the character table, so the WPC1252 selection
/// is re-issued right after it.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() + SELECT_WPC1252.len());
    let mut pending = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == 0x1B && bytes.get(i + 1) == Some(&0x40) {
            flush_pending(&mut pending, &mut result);
            result.extend_from_slice(&[0x1B, 0x40]);
            result.extend_from_slice(&SELECT_WPC1252);
            i += 2;
            continue;
        }

        if b < 0x80 {
            flush_pending(&mut pending, &mut result);
            result.push(b);
        } else {
            pending.push(b);
        }
        i += 1;
    }

    flush_pending(&mut pending, &mut result);
    result
}

/// Re-encode a buffered non-ASCII run
fn flush_pending(pending: &mut Vec<u8>, result: &mut Vec<u8>) {
    if pending.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(pending);
    let mut utf8 = [0u8; 4];
    for c in text.chars() {
        let (encoded, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut utf8));
        if had_errors {
            result.push(b'?');
        } else {
            result.extend_from_slice(&encoded);
        }
    }
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_counts_chars() {
        assert_eq!(text_width("hello"), 5);
        assert_eq!(text_width("£3.50"), 5);
        assert_eq!(text_width("2 × £1.00"), 9);
    }

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("hello world", 5), "hello");
        assert_eq!(truncate_width("£££", 2), "££");
        assert_eq!(truncate_width("hi", 5), "hi");
    }

    #[test]
    fn test_ascii_and_commands_pass_through() {
        let input = [0x1B, 0x45, 0x01, b'A', 0x1D, 0x21, 0x11, b'\n'];
        assert_eq!(convert_to_cp1252(&input), input.to_vec());
    }

    #[test]
    fn test_init_reselects_code_page() {
        let out = convert_to_cp1252(&[0x1B, 0x40, b'x']);
        assert_eq!(out, vec![0x1B, 0x40, 0x1B, 0x74, 16, b'x']);
    }

    #[test]
    fn test_non_ascii_is_reencoded() {
        let out = convert_to_cp1252("£2 × 3".as_bytes());
        assert_eq!(out, vec![0xA3, b'2', b' ', 0xD7, b' ', b'3']);
    }

    #[test]
    fn test_unmappable_becomes_question_mark() {
        let out = convert_to_cp1252("a你b".as_bytes());
        assert_eq!(out, b"a?b".to_vec());
    }
}
