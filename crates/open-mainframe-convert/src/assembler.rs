//! Record group assembly: from a record stream to emitted groups.
//!
//! The first data layout decides how the stream is processed:
//!
//! - **Positional**: layouts apply to records in round-robin order and a
//!   group is emitted after each full cycle.
//! - **Segmented**: the first layout is a `SKIP` header. Each record starts
//!   with a 6-byte filler and an 8-byte segment name that selects its layout.
//!   A layout whose head is level 1 starts a new group; the members of a
//!   group are concatenated and decoded as one record.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use open_mainframe_layout::{
    read_layout_file, DataType, FieldDescriptor, RecordLayoutSet, RecordType,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ConvertError;
use crate::framer::RecordFramer;
use crate::group::OutputGroup;
use crate::options::{ConvertOptions, Mode};
use crate::record::StructureRecord;
use crate::writer::{create_writer, RecordWriter};
use crate::Result;

/// Name of the segment name field in a segmented record header.
pub const SEGMENT_NAME_FIELD: &str = "SEGNAME";

/// Fields of the header that prefixes every segmented record.
pub fn segment_header_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::leaf("FILL1", 1, DataType::Char, 6),
        FieldDescriptor::leaf(SEGMENT_NAME_FIELD, 1, DataType::Char, 8),
    ]
}

/// Counters reported after a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertSummary {
    /// Records read from the input.
    pub records: u64,
    /// Groups handed to the writer.
    pub groups: u64,
    /// Records consumed by a `SKIP` layout.
    pub skipped: u64,
}

/// Drives framing, decoding and grouping for one input.
pub struct RecordGroupAssembler<'a> {
    root_name: Option<&'a str>,
    layouts: Vec<&'a RecordLayoutSet>,
    mode: Mode,
    segmented: bool,
}

impl<'a> RecordGroupAssembler<'a> {
    /// Prepares assembly over parsed layouts.
    ///
    /// The `ROOT` layout, if any, only names the output wrapper. Layouts
    /// without fields are ignored.
    pub fn new(layouts: &'a [RecordLayoutSet], mode: Mode) -> Result<Self> {
        let root_name = layouts
            .iter()
            .find(|layout| layout.is_root())
            .and_then(RecordLayoutSet::head)
            .map(|head| head.name.as_str());
        let data: Vec<_> = layouts
            .iter()
            .filter(|layout| layout.head().is_some() && !layout.is_root())
            .collect();
        let Some(first) = data.first() else {
            return Err(ConvertError::NoDataLayouts);
        };
        let segmented = first.is_segment_skip();

        Ok(Self {
            root_name,
            layouts: data,
            mode,
            segmented,
        })
    }

    /// Output wrapper name from the `ROOT` layout.
    pub fn root_name(&self) -> Option<&'a str> {
        self.root_name
    }

    /// Whether records are dispatched by segment name.
    pub fn is_segmented(&self) -> bool {
        self.segmented
    }

    /// Record length for framing; 0 selects RDW framing.
    pub fn fixed_length(&self) -> usize {
        let first = self.layouts[0];
        match first.record_type {
            RecordType::FixedLength => first.fixed_length(),
            RecordType::VariableLength => 0,
        }
    }

    /// Converts every record from `framer` and writes the groups.
    pub fn run<R: BufRead>(
        &self,
        framer: &mut RecordFramer<R>,
        writer: &mut dyn RecordWriter,
    ) -> Result<ConvertSummary> {
        framer.set_fixed_length(self.fixed_length());
        info!(
            layouts = self.layouts.len(),
            fixed_length = self.fixed_length(),
            segmented = self.segmented,
            root = self.root_name.unwrap_or(""),
            "converting records"
        );

        writer.write_start_array()?;
        let mut summary = ConvertSummary::default();
        let mut pending: Vec<StructureRecord> = Vec::new();
        let mut index = 0usize;

        for bytes in framer.by_ref() {
            let bytes = bytes?;
            summary.records += 1;

            let layout = self.select_layout(index, &bytes)?;
            let Some(head) = layout.head() else {
                index += 1;
                continue;
            };
            if head.is_segment_skip {
                summary.skipped += 1;
                index += 1;
                continue;
            }

            let starts_group = head.level == 1;
            let record = StructureRecord::new(bytes, layout.fields.clone());
            if self.segmented {
                if starts_group && !pending.is_empty() {
                    self.flush_combined(&mut pending, &mut summary, writer)?;
                }
                pending.push(record);
            } else {
                pending.push(record);
                if (index + 1) % self.layouts.len() == 0 {
                    let group = OutputGroup::new(std::mem::take(&mut pending));
                    self.emit(&group, &mut summary, writer)?;
                }
            }
            index += 1;
        }

        if !pending.is_empty() {
            self.flush_combined(&mut pending, &mut summary, writer)?;
        }
        writer.write_end_array()?;
        writer.finish()?;

        info!(
            records = summary.records,
            groups = summary.groups,
            skipped = summary.skipped,
            "conversion finished"
        );
        Ok(summary)
    }

    fn select_layout(&self, index: usize, bytes: &[u8]) -> Result<&'a RecordLayoutSet> {
        let positional = self.layouts[index % self.layouts.len()];
        if !self.segmented {
            return Ok(positional);
        }

        let header_length = bytes.len().min(14);
        let header = StructureRecord::new(bytes[..header_length].to_vec(), segment_header_fields());
        let decoded = header.decode(Mode::WithoutArrayGrouping)?;
        let segment = decoded
            .get(SEGMENT_NAME_FIELD)
            .and_then(|value| value.as_text())
            .map(|name| name.trim_end_matches(' '))
            .unwrap_or("");

        let found = self
            .layouts
            .iter()
            .copied()
            .find(|layout| layout.head().is_some_and(|head| head.name == segment));
        match found {
            Some(layout) => {
                debug!(record = index, segment, "segment layout selected");
                Ok(layout)
            }
            None => {
                warn!(
                    record = index,
                    segment,
                    position = index % self.layouts.len(),
                    "no layout named after segment, using positional layout"
                );
                Ok(positional)
            }
        }
    }

    fn flush_combined(
        &self,
        pending: &mut Vec<StructureRecord>,
        summary: &mut ConvertSummary,
        writer: &mut dyn RecordWriter,
    ) -> Result<()> {
        let combined = StructureRecord::combine(pending);
        pending.clear();
        self.emit(&OutputGroup::new(vec![combined]), summary, writer)
    }

    fn emit(
        &self,
        group: &OutputGroup,
        summary: &mut ConvertSummary,
        writer: &mut dyn RecordWriter,
    ) -> Result<()> {
        if summary.groups == 0 {
            writer.write_header(group, self.mode, self.root_name)?;
        }
        writer.write_object(group, self.mode, self.root_name)?;
        debug!(
            group = summary.groups,
            members = group.len(),
            bytes = group.records().iter().map(|r| r.bytes().len()).sum::<usize>(),
            "group written"
        );
        summary.groups += 1;
        Ok(())
    }
}

/// Converts a record stream to `output` using parsed layouts.
pub fn convert<R: Read, W: Write>(
    input: R,
    layouts: &[RecordLayoutSet],
    options: &ConvertOptions,
    output: W,
) -> Result<ConvertSummary> {
    let assembler = RecordGroupAssembler::new(layouts, options.mode)?;
    let reader = BufReader::with_capacity(options.buffer.capacity(), input);
    let mut framer = RecordFramer::new(reader);
    let mut writer = create_writer(options.format, output);
    assembler.run(&mut framer, writer.as_mut())
}

/// Loads the layout file at `layout` and converts `input` with it.
pub fn convert_with_layout_file<R: Read, W: Write>(
    layout: impl AsRef<Path>,
    input: R,
    options: &ConvertOptions,
    output: W,
) -> Result<ConvertSummary> {
    let layouts = read_layout_file(layout)?;
    convert(input, &layouts, options, output)
}
