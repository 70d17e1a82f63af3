//! `|`-separated output with a header row of dotted field paths.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::group::OutputGroup;
use crate::options::Mode;
use crate::value::{FieldMap, Value};
use crate::writer::RecordWriter;
use crate::Result;

/// Column separator.
pub const DELIMITER: u8 = b'|';

/// Writes one row per group, every field quoted.
pub struct CsvWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> CsvWriter<W> {
    /// Creates a writer over `out`.
    pub fn new(out: W) -> Self {
        let inner = WriterBuilder::new()
            .delimiter(DELIMITER)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(out);
        Self { inner }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}

impl<W: Write> RecordWriter for CsvWriter<W> {
    fn write_start_array(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_header(&mut self, group: &OutputGroup, mode: Mode, root: Option<&str>) -> Result<()> {
        let map = group.resolve(mode, root)?;
        let mut columns = Vec::new();
        flatten(&map, "", &mut columns);
        self.inner.write_record(columns.iter().map(|(path, _)| path.as_str()))?;
        Ok(())
    }

    fn write_object(&mut self, group: &OutputGroup, mode: Mode, root: Option<&str>) -> Result<()> {
        let map = group.resolve(mode, root)?;
        let mut columns = Vec::new();
        flatten(&map, "", &mut columns);
        self.inner.write_record(columns.iter().map(|(_, value)| *value))?;
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Flattens a map into `(path, value)` columns.
///
/// Nested maps contribute `parent.child` paths and empty maps contribute
/// nothing. A list of maps is flattened element by element under the same
/// path. Lists of text are not representable as columns and are skipped.
pub fn flatten<'a>(map: &'a FieldMap, path: &str, out: &mut Vec<(String, &'a str)>) {
    for (key, value) in map {
        let full = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        match value {
            Value::Text(text) => out.push((full, text)),
            Value::Map(nested) => flatten(nested, &full, out),
            Value::List(items) => {
                if matches!(items.first(), Some(Value::Map(_))) {
                    for item in items {
                        if let Value::Map(nested) = item {
                            flatten(nested, &full, out);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StructureRecord;
    use open_mainframe_encoding::CP1047;
    use open_mainframe_layout::parse_layout;

    const LAYOUT: &str = "DCL 1 R,\n 3 ID CHAR(2),\n 3 TAG(2) CHAR(1),\n 3 LINE(2),\n  5 SKU CHAR(1);";

    fn group(text: &str) -> OutputGroup {
        let fields = parse_layout(LAYOUT).remove(0).fields;
        OutputGroup::new(vec![StructureRecord::new(CP1047.encode(text).unwrap(), fields)])
    }

    #[test]
    fn test_header_and_rows() {
        let mut writer = CsvWriter::new(Vec::new());
        let first = group("01abXY");
        writer.write_start_array().unwrap();
        writer.write_header(&first, Mode::WithArrayGrouping, None).unwrap();
        writer.write_object(&first, Mode::WithArrayGrouping, None).unwrap();
        writer.write_object(&group("02cdZW"), Mode::WithArrayGrouping, None).unwrap();
        writer.write_end_array().unwrap();
        writer.finish().unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "\"R.ID\"|\"R.LINE.SKU\"|\"R.LINE.SKU\"\n\"01\"|\"X\"|\"Y\"\n\"02\"|\"Z\"|\"W\"\n"
        );
    }

    #[test]
    fn test_without_grouping_keeps_every_column() {
        let mut writer = CsvWriter::new(Vec::new());
        let g = group("01abXY");
        writer.write_header(&g, Mode::WithoutArrayGrouping, Some("ALL")).unwrap();
        writer.finish().unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            out.trim_end(),
            "\"ALL.R.ID\"|\"ALL.R.TAG(1)\"|\"ALL.R.TAG(2)\"|\"ALL.R.LINE(1).SKU\"|\"ALL.R.LINE(2).SKU\""
        );
    }

    #[test]
    fn test_flatten_skips_empty_maps() {
        let mut map = FieldMap::new();
        map.insert("EMPTY".into(), Value::Map(FieldMap::new()));
        map.insert("V".into(), "1".into());
        let mut out = Vec::new();
        flatten(&map, "", &mut out);
        assert_eq!(out, vec![("V".to_string(), "1")]);
    }
}
