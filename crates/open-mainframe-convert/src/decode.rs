//! Field decoding: one display string per typed leaf.

use open_mainframe_encoding::{
    decode_fixed_binary, decode_picture, extract_bits, packed_to_display, CP1047,
};
use open_mainframe_layout::{DataType, FieldDescriptor};

use crate::Result;

/// Decodes the bytes of one leaf field.
///
/// Returns `None` for descriptors without a data type.
pub fn decode_field(bytes: &[u8], field: &FieldDescriptor) -> Result<Option<String>> {
    let Some(data_type) = field.data_type else {
        return Ok(None);
    };
    let text = match data_type {
        DataType::Bit => extract_bits(bytes, field.bit_offset, field.bit_count),
        DataType::Char => CP1047.decode_escaped(bytes),
        DataType::PackedDecimal => packed_to_display(bytes, field.digits, field.scale),
        DataType::BinaryInteger => decode_fixed_binary(bytes, field.digits, field.signed)?,
        DataType::NumericPic => decode_picture(bytes, field.scale, &CP1047),
    };
    Ok(Some(text))
}
