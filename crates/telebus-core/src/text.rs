//! UTF-16 span helpers.
//!
//! Telegram reports entity `offset` and `length` in UTF-16 code units. Rust
//! strings are UTF-8, so every span must be translated to byte indices before
//! slicing. Characters outside the Basic Multilingual Plane (most emoji) take
//! two UTF-16 units but four UTF-8 bytes, which is exactly where naive byte or
//! `char` slicing goes wrong.

/// Returns the length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Converts a UTF-16 offset into a byte index into `text`.
///
/// Returns `None` when the offset lies past the end of the text or points
/// into the middle of a surrogate pair.
pub fn utf16_to_byte_index(text: &str, utf16_offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte_index, ch) in text.char_indices() {
        if units == utf16_offset {
            return Some(byte_index);
        }
        if units > utf16_offset {
            return None;
        }
        units += ch.len_utf16();
    }
    (units == utf16_offset).then_some(text.len())
}

/// Slices `text` using a UTF-16 `offset` and `length`.
///
/// Returns `None` if either end of the span does not land on a character
/// boundary of `text`.
pub fn utf16_slice(text: &str, offset: usize, length: usize) -> Option<&str> {
    let start = utf16_to_byte_index(text, offset)?;
    let end = utf16_to_byte_index(text, offset.checked_add(length)?)?;
    text.get(start..end)
}
