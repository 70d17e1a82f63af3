//! Structure walking: binding record bytes to a field tree.
//!
//! A [`StructureRecord`] pairs the bytes of one record (or of an assembled
//! segment group) with the field descriptors describing them. Decoding walks
//! the descriptors depth-first with a single byte cursor and produces an
//! ordered [`FieldMap`].
//!
//! Every decode works on its own copy of the descriptors, because `OCCURS`
//! groups are materialized in place while walking.

use std::collections::HashMap;

use open_mainframe_layout::{array_index, base_name, fixed_length, FieldDescriptor};
use tracing::trace;

use crate::decode::decode_field;
use crate::error::ConvertError;
use crate::options::Mode;
use crate::value::{FieldMap, Value};
use crate::Result;

/// Record bytes bound to the descriptors that describe them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureRecord {
    bytes: Vec<u8>,
    fields: Vec<FieldDescriptor>,
}

impl StructureRecord {
    /// Creates a record from raw bytes and a field list.
    pub fn new(bytes: Vec<u8>, fields: Vec<FieldDescriptor>) -> Self {
        Self { bytes, fields }
    }

    /// Concatenates several records into one.
    ///
    /// Each member's bytes are truncated or zero-padded to the fixed length
    /// of its own fields before concatenation, so the combined field list
    /// lines up with the combined bytes.
    pub fn combine(records: &[StructureRecord]) -> Self {
        let total: usize = records.iter().map(StructureRecord::fixed_length).sum();
        let mut bytes = Vec::with_capacity(total);
        let mut fields = Vec::new();
        for record in records {
            let mut part = record.bytes.clone();
            part.resize(record.fixed_length(), 0);
            bytes.extend_from_slice(&part);
            fields.extend(record.fields.iter().cloned());
        }
        Self { bytes, fields }
    }

    /// Raw record bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Field descriptors as declared, before any runtime expansion.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Storage declared by the field list.
    pub fn fixed_length(&self) -> usize {
        fixed_length(&self.fields)
    }

    /// Decodes the record into an ordered name-to-value map.
    pub fn decode(&self, mode: Mode) -> Result<FieldMap> {
        let mut walker = Walker {
            bytes: &self.bytes,
            position: 0,
            mode,
            decoded: HashMap::new(),
        };
        walker.process_list(self.fields.clone(), None)
    }
}

/// Cursor state for one decode pass.
struct Walker<'a> {
    bytes: &'a [u8],
    position: usize,
    mode: Mode,
    /// Every leaf value decoded so far, by name; source of `OCCURS` counts.
    decoded: HashMap<String, Value>,
}

impl Walker<'_> {
    fn grouping(&self) -> bool {
        self.mode == Mode::WithArrayGrouping
    }

    fn process_list(
        &mut self,
        mut list: Vec<FieldDescriptor>,
        parent_index: Option<usize>,
    ) -> Result<FieldMap> {
        let mut result = FieldMap::new();
        let mut i = 0;

        while i < list.len() {
            if !list[i].is_group() {
                self.read_leaf(&list[i], &mut result)?;
                i += 1;
                continue;
            }

            if list[i].repeat_expr.is_some() && !self.expand_repeats(&mut list, i, parent_index)? {
                i += 1;
                continue;
            }

            let children = std::mem::take(&mut list[i].children);
            let nested = self.process_list(children, list[i].array_index())?;
            let key = if self.grouping() {
                base_name(&list[i].name).to_string()
            } else {
                list[i].name.clone()
            };
            add_group(&mut result, key, nested);
            i += 1;
        }

        for filler in open_mainframe_layout::FILLER_NAMES {
            result.shift_remove(filler);
        }
        Ok(result)
    }

    fn read_leaf(&mut self, field: &FieldDescriptor, result: &mut FieldMap) -> Result<()> {
        let start = self.position.min(self.bytes.len());
        let end = (self.position + field.length).min(self.bytes.len());
        let Some(text) = decode_field(&self.bytes[start..end], field)? else {
            trace!(field = %field.name, "typeless field skipped");
            return Ok(());
        };
        self.position += field.length;

        let base = base_name(&field.name);
        if self.grouping() && base.len() < field.name.len() {
            let first = field.array_index() == Some(1);
            let collected = self
                .decoded
                .entry(base.to_string())
                .or_insert_with(|| Value::List(Vec::new()));
            match collected {
                Value::List(items) if !first => items.push(Value::Text(text.clone())),
                other => *other = Value::List(vec![Value::Text(text.clone())]),
            }

            match result.get_mut(base) {
                Some(Value::List(items)) if !first => items.push(Value::Text(text)),
                _ => {
                    let values = self.decoded[base].clone();
                    result.insert(base.to_string(), values);
                }
            }
        } else {
            self.decoded
                .insert(field.name.clone(), Value::Text(text.clone()));
            result.insert(field.name.clone(), Value::Text(text));
        }
        Ok(())
    }

    /// Materializes the `OCCURS` group at `index` as `NAME(1)..NAME(count)`.
    ///
    /// Returns `false` when the count is zero and the group is to be skipped.
    fn expand_repeats(
        &self,
        list: &mut Vec<FieldDescriptor>,
        index: usize,
        parent_index: Option<usize>,
    ) -> Result<bool> {
        let Some(mut expr) = list[index].repeat_expr.clone() else {
            return Ok(true);
        };
        if let Some(parent) = parent_index.filter(|&p| p != 0) {
            expr = substitute_index(&expr, parent);
        }

        let resolved = self.resolve(&expr);
        let count: usize = resolved
            .as_deref()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| ConvertError::InvalidRepeatCount {
                field: list[index].name.clone(),
                value: resolved.clone().unwrap_or(expr.clone()),
            })?;
        if count == 0 {
            trace!(field = %list[index].name, "repeat count is zero");
            return Ok(false);
        }

        let template = FieldDescriptor {
            repeat_expr: None,
            ..list[index].clone()
        };
        let tail = list.split_off(index + 1);
        list.pop();
        list.extend((1..=count).map(|n| FieldDescriptor {
            name: format!("{}({n})", template.name),
            ..template.clone()
        }));
        list.extend(tail);
        Ok(true)
    }

    /// Resolves a repeat expression to text: a decoded field value or the literal.
    fn resolve(&self, expr: &str) -> Option<String> {
        let base = base_name(expr);
        if self.grouping() && base.len() < expr.len() {
            let position = array_index(expr)?.checked_sub(1)?;
            return match self.decoded.get(base)? {
                Value::List(items) => items.get(position)?.as_text().map(str::to_string),
                _ => None,
            };
        }
        match self.decoded.get(expr) {
            Some(Value::Text(text)) => Some(text.clone()),
            Some(_) => None,
            None => Some(expr.to_string()),
        }
    }
}

/// Replaces the contents of the first `(...)` with the parent's index.
fn substitute_index(expr: &str, index: usize) -> String {
    let Some(open) = expr.find('(') else {
        return expr.to_string();
    };
    match expr[open..].find(')') {
        Some(len) => format!("{}{}{}", &expr[..=open], index, &expr[open + len..]),
        None => expr.to_string(),
    }
}

/// Stores a group result, turning a repeated key into a list.
fn add_group(result: &mut FieldMap, key: String, nested: FieldMap) {
    match result.get_mut(&key) {
        Some(Value::List(items)) => items.push(Value::Map(nested)),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::List(Vec::new()));
            *existing = Value::List(vec![first, Value::Map(nested)]);
        }
        None => {
            result.insert(key, Value::Map(nested));
        }
    }
}
