//! Numeric picture (`PIC'...'`) decoding.
//!
//! Picture fields store one EBCDIC display character per digit. The `V` in
//! the picture is an implied decimal point and occupies no storage; the
//! point is inserted at decode time, `scale` characters from the right.

use crate::ebcdic::CodePage;

/// Decode a picture field and insert its implied decimal point.
pub fn decode_picture(bytes: &[u8], scale: usize, code_page: &CodePage) -> String {
    insert_implied_point(&code_page.decode_escaped(bytes), scale)
}

/// Insert `.` `scale` characters from the end of `text`.
///
/// Returns the text unchanged when `scale` is 0 or longer than the text.
pub fn insert_implied_point(text: &str, scale: usize) -> String {
    let length = text.chars().count();
    if scale == 0 || scale > length {
        return text.to_string();
    }
    let split = text
        .char_indices()
        .nth(length - scale)
        .map_or(text.len(), |(i, _)| i);
    format!("{}.{}", &text[..split], &text[split..])
}
