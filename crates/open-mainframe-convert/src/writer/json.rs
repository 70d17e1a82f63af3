//! JSON array output.

use std::io::Write;

use crate::group::OutputGroup;
use crate::options::Mode;
use crate::writer::RecordWriter;
use crate::Result;

/// Writes groups as a JSON array of objects.
pub struct JsonWriter<W: Write> {
    out: W,
    pretty: bool,
    objects: usize,
}

impl<W: Write> JsonWriter<W> {
    /// Indented output, one object member per line.
    pub fn pretty(out: W) -> Self {
        Self {
            out,
            pretty: true,
            objects: 0,
        }
    }

    /// Output without whitespace.
    pub fn compact(out: W) -> Self {
        Self {
            out,
            pretty: false,
            objects: 0,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordWriter for JsonWriter<W> {
    fn write_start_array(&mut self) -> Result<()> {
        self.out.write_all(b"[")?;
        Ok(())
    }

    fn write_header(&mut self, _group: &OutputGroup, _mode: Mode, _root: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn write_object(&mut self, group: &OutputGroup, mode: Mode, root: Option<&str>) -> Result<()> {
        let map = group.resolve(mode, root)?;
        if self.objects > 0 {
            self.out.write_all(b",")?;
        }
        if self.pretty {
            let text = serde_json::to_string_pretty(&map)?;
            for line in text.lines() {
                self.out.write_all(b"\n  ")?;
                self.out.write_all(line.as_bytes())?;
            }
        } else {
            serde_json::to_writer(&mut self.out, &map)?;
        }
        self.objects += 1;
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<()> {
        if self.pretty && self.objects > 0 {
            self.out.write_all(b"\n")?;
        }
        self.out.write_all(b"]\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
