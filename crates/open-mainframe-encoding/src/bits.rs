//! `BIT(n)` field extraction.
//!
//! Bits are numbered globally across the slice, most significant bit of the
//! first byte first. The result is a string of `'0'` / `'1'` characters.

/// Extract `count` bits starting at global bit `start`.
///
/// Extraction stops once `count` bits are collected. If the slice runs out
/// first, only the bits that were available are returned (no padding).
pub fn extract_bits(bytes: &[u8], start: usize, count: usize) -> String {
    let mut bits = String::with_capacity(count);
    if count == 0 {
        return bits;
    }
    let end = start.saturating_add(count);

    'bytes: for (i, &byte) in bytes.iter().enumerate() {
        for j in (0..8).rev() {
            let position = i * 8 + (7 - j);
            if (start..end).contains(&position) {
                bits.push(if (byte >> j) & 1 == 1 { '1' } else { '0' });
            }
            if bits.len() == count {
                break 'bytes;
            }
        }
    }
    bits
}
