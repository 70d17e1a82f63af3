//! Field and record layout types.
//!
//! A [`FieldDescriptor`] is either a typed leaf (it has a [`DataType`]) or a
//! group (it has children, or a repeat expression resolved at decode time).

use serde::{Deserialize, Serialize};

/// Header name marking the record header of a segmented layout.
pub const SKIP_MARKER: &str = "SKIP";

/// Field names that are decoded but never emitted.
pub const FILLER_NAMES: [&str; 2] = ["FILL1", "FILL2"];

/// Storage type of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// `BIT(n)`: n bits rendered as a `0`/`1` string.
    Bit,
    /// `CHAR(n)`: n EBCDIC characters.
    Char,
    /// `FIXED(p,s)` / `FIXED DEC(p,s)`: packed decimal.
    PackedDecimal,
    /// `FIXED BIN(n)`: big-endian binary integer.
    BinaryInteger,
    /// `PIC'...'`: zoned display digits with an implied point.
    NumericPic,
}

impl DataType {
    /// Bytes occupied by a field of this type with the given digit count.
    ///
    /// For [`DataType::Bit`] and [`DataType::BinaryInteger`] `digits` is the
    /// bit count.
    pub fn storage_length(self, digits: usize) -> usize {
        match self {
            DataType::Char | DataType::NumericPic => digits,
            DataType::Bit | DataType::BinaryInteger => digits.div_ceil(8),
            DataType::PackedDecimal => digits.div_ceil(2),
        }
    }
}

/// One node of a record layout tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, possibly carrying an array index such as `ITEM(2)`.
    pub name: String,
    /// Level number from the layout line; the root has level 0.
    pub level: u32,
    /// Storage type; `None` for groups and roots.
    pub data_type: Option<DataType>,
    /// Storage length in bytes.
    pub length: usize,
    /// Declared precision (bits for `BIT` and `FIXED BIN`).
    pub digits: usize,
    /// Digits after the implied decimal point.
    pub scale: usize,
    /// Bit offset within the first byte (always 0 for parsed layouts).
    pub bit_offset: usize,
    /// Number of bits for [`DataType::Bit`] fields.
    pub bit_count: usize,
    /// Whether a binary integer carries a sign flag.
    pub signed: bool,
    /// First static array dimension, 0 when not an array.
    pub array_dim1: usize,
    /// Second static array dimension, 0 when not a 2-D array.
    pub array_dim2: usize,
    /// Dynamic repeat count: a literal or the name of an earlier field.
    pub repeat_expr: Option<String>,
    /// Child fields in declaration order.
    pub children: Vec<FieldDescriptor>,
    /// Set on the `ROOT` descriptor that names the output wrapper.
    pub is_root: bool,
    /// Set when the field is the `SKIP` header of a segmented layout.
    pub is_segment_skip: bool,
}

impl FieldDescriptor {
    /// Creates a typed leaf field.
    pub fn leaf(name: impl Into<String>, level: u32, data_type: DataType, digits: usize) -> Self {
        Self {
            name: name.into(),
            level,
            data_type: Some(data_type),
            length: data_type.storage_length(digits),
            digits,
            bit_count: if data_type == DataType::Bit { digits } else { 0 },
            ..Default::default()
        }
    }

    /// Creates a group field.
    pub fn group(name: impl Into<String>, level: u32) -> Self {
        let name = name.into();
        let is_segment_skip = name == SKIP_MARKER;
        Self {
            name,
            level,
            is_segment_skip,
            ..Default::default()
        }
    }

    /// Creates the root descriptor naming the output wrapper.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_root: true,
            ..Default::default()
        }
    }

    /// Sets the scale.
    pub fn with_scale(mut self, scale: usize) -> Self {
        self.scale = scale;
        self
    }

    /// Returns a copy of this field under another name with array dimensions cleared.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            array_dim1: 0,
            array_dim2: 0,
            ..self.clone()
        }
    }

    /// Whether the field has children.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether the field is a static array awaiting expansion.
    pub fn is_array(&self) -> bool {
        self.array_dim1 > 0
    }

    /// Total storage of this field and all descendants.
    pub fn fixed_length(&self) -> usize {
        self.length + fixed_length(&self.children)
    }

    /// Name with any `(i)` or `(i,j)` suffix removed.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Integer inside the name's parentheses, if any.
    pub fn array_index(&self) -> Option<usize> {
        array_index(&self.name)
    }
}

/// Total storage of a field list, including nested children.
pub fn fixed_length(fields: &[FieldDescriptor]) -> usize {
    fields.iter().map(FieldDescriptor::fixed_length).sum()
}

/// Strips a trailing index suffix: `ITEM(2)` and `ITEM(1,3)` both become `ITEM`.
pub fn base_name(name: &str) -> &str {
    match name.find('(') {
        Some(open) if open > 0 => &name[..open],
        _ => name,
    }
}

/// Parses the integer between the first `(` and the following `)`.
///
/// Returns `None` for names without parentheses and for 2-D indexes such as
/// `ITEM(1,2)`.
pub fn array_index(name: &str) -> Option<usize> {
    let open = name.find('(')?;
    let close = open + name[open..].find(')')?;
    name[open + 1..close].parse().ok()
}

/// Record framing declared in a layout header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// Records of exactly the layout's fixed length.
    FixedLength,
    /// Records prefixed by a 4-byte record descriptor word.
    VariableLength,
}

/// One parsed record layout: a header plus its field tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLayoutSet {
    /// Framing of records using this layout.
    pub record_type: RecordType,
    /// Duplication count from the header's first `(n)`, 1 by default.
    pub count: usize,
    /// Top-level fields, usually a single level-1 group.
    pub fields: Vec<FieldDescriptor>,
}

impl RecordLayoutSet {
    /// First top-level field.
    pub fn head(&self) -> Option<&FieldDescriptor> {
        self.fields.first()
    }

    /// Whether this layout only carries the `ROOT` wrapper name.
    pub fn is_root(&self) -> bool {
        self.head().is_some_and(|head| head.is_root)
    }

    /// Whether this layout is the `SKIP` segment header.
    pub fn is_segment_skip(&self) -> bool {
        self.head().is_some_and(|head| head.is_segment_skip)
    }

    /// Total storage of all fields.
    pub fn fixed_length(&self) -> usize {
        fixed_length(&self.fields)
    }
}
