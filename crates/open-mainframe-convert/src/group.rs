//! Output groups: the records forming one emitted object.

use crate::options::Mode;
use crate::record::StructureRecord;
use crate::value::{FieldMap, Value};
use crate::Result;

/// Records assembled into one logical output object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputGroup {
    records: Vec<StructureRecord>,
}

impl OutputGroup {
    /// Creates a group from its member records.
    pub fn new(records: Vec<StructureRecord>) -> Self {
        Self { records }
    }

    /// Member records in input order.
    pub fn records(&self) -> &[StructureRecord] {
        &self.records
    }

    /// Number of member records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decodes every member and merges them into one map.
    ///
    /// A single member is returned as decoded. Several members are merged
    /// key by key with [`merge_entry`]. When `root` is given the result is
    /// wrapped as `{ root: map }`.
    pub fn resolve(&self, mode: Mode, root: Option<&str>) -> Result<FieldMap> {
        let mut maps = self
            .records
            .iter()
            .map(|record| record.decode(mode))
            .collect::<Result<Vec<_>>>()?;

        let merged = if maps.len() == 1 {
            maps.pop().unwrap_or_default()
        } else {
            let mut merged = FieldMap::new();
            for map in maps {
                for (key, value) in map {
                    merge_entry(mode, key, value, &mut merged);
                }
            }
            merged
        };

        Ok(match root {
            Some(root) => {
                let mut wrapped = FieldMap::new();
                wrapped.insert(root.to_string(), Value::Map(merged));
                wrapped
            }
            None => merged,
        })
    }
}

/// Inserts one entry, folding a key that is already present.
///
/// With [`Mode::WithArrayGrouping`] the values of a repeated key are collected
/// into a list. With [`Mode::WithoutArrayGrouping`] the repeat is stored under
/// the first free `KEY(n)` name, starting at `KEY(2)`.
pub fn merge_entry(mode: Mode, key: String, value: Value, result: &mut FieldMap) {
    let Some(existing) = result.get_mut(&key) else {
        result.insert(key, value);
        return;
    };

    match mode {
        Mode::WithArrayGrouping => match existing {
            Value::List(items) => items.push(value),
            other => {
                let first = std::mem::replace(other, Value::List(Vec::new()));
                *other = Value::List(vec![first, value]);
            }
        },
        Mode::WithoutArrayGrouping => {
            let mut index = 2;
            while result.contains_key(&format!("{key}({index})")) {
                index += 1;
            }
            result.insert(format!("{key}({index})"), value);
        }
    }
}
