//! Packed decimal (`FIXED DEC`) display decoding.
//!
//! Each byte holds two nibbles, high nibble first. The low nibble of the
//! last byte is the sign position: `0xD` marks a negative value. Any other
//! value in that position is rendered like a digit nibble, so a positive
//! `0xC` or unsigned `0xF` sign shows up as a trailing `12` or `15`. The
//! legacy converters produced the same output and downstream consumers
//! depend on it.
//!
//! Example: `FIXED DEC(3,1)` holding -12.3
//! - Binary: `0x12 0x3D`
//! - Display: `-12.3`

/// Sign nibble that marks a negative packed value.
pub const NEGATIVE_SIGN_NIBBLE: u8 = 0x0D;

/// Render packed decimal bytes as a display string.
///
/// A decimal point is emitted once `digits - scale` characters have been
/// produced, when `scale > 0`.
pub fn packed_to_display(bytes: &[u8], digits: usize, scale: usize) -> String {
    let mut display = String::with_capacity(bytes.len() * 2 + 2);
    let point_at = if scale > 0 {
        digits.checked_sub(scale)
    } else {
        None
    };
    let last = bytes.len().saturating_sub(1);

    for (i, &byte) in bytes.iter().enumerate() {
        let high = (byte >> 4) & 0x0F;
        let low = byte & 0x0F;

        if i == last && low == NEGATIVE_SIGN_NIBBLE {
            display.push_str(&high.to_string());
            display.insert(0, '-');
        } else {
            display.push_str(&high.to_string());
            place_point(&mut display, point_at);
            display.push_str(&low.to_string());
            place_point(&mut display, point_at);
        }
    }
    display
}

fn place_point(display: &mut String, point_at: Option<usize>) {
    if point_at == Some(display.len()) {
        display.push('.');
    }
}
