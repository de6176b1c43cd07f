use encoding_rs::UTF_8;
use std::borrow::Cow;

/// Decode one raw log line.
///
/// A trailing `\r` is dropped so CRLF logs look the same as LF logs. Invalid
/// UTF-8 sequences are replaced with U+FFFD instead of failing the line.
pub fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    let (text, _had_errors) = UTF_8.decode_without_bom_handling(bytes);
    text
}
