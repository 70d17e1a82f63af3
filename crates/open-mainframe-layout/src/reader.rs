//! Layout loading: text or file to [`RecordLayoutSet`]s.

use std::path::Path;

use tracing::{debug, trace};

use crate::error::LayoutError;
use crate::row::parse_row;
use crate::source::{is_header_line, normalize_line, prepare_lines, split_records};
use crate::tree::{build_tree, expand_arrays};
use crate::types::{RecordLayoutSet, RecordType};
use crate::Result;

/// Header marker selecting fixed-length framing.
const FIXED_FORMAT_MARKER: &str = "FB";

/// Parses layout text into record layouts, in declaration order.
///
/// A header with a duplication count such as `DCL(3)` contributes that many
/// identical layouts. Unrecognized lines are skipped.
pub fn parse_layout(text: &str) -> Vec<RecordLayoutSet> {
    let lines = prepare_lines(text);
    let mut layouts = Vec::new();
    for record in split_records(&lines) {
        process_record(&record, &mut layouts);
    }
    debug!(layouts = layouts.len(), "parsed record layouts");
    layouts
}

fn process_record(lines: &[String], out: &mut Vec<RecordLayoutSet>) {
    let Some(header) = lines.first() else {
        return;
    };
    let record_type = if header.contains(FIXED_FORMAT_MARKER) {
        RecordType::FixedLength
    } else {
        RecordType::VariableLength
    };
    let count = first_parenthesized_number(header).unwrap_or(1);

    let mut flat = Vec::new();
    for line in lines {
        let normalized = normalize_line(line);
        let fields = parse_row(&normalized, is_header_line(&normalized));
        if fields.is_empty() {
            trace!(line = %normalized, "layout line skipped");
        }
        flat.extend(fields);
    }
    let fields = build_tree(expand_arrays(&flat));

    let layout = RecordLayoutSet {
        record_type,
        count,
        fields,
    };
    debug!(
        head = layout.head().map(|h| h.name.as_str()).unwrap_or(""),
        ?record_type,
        count,
        length = layout.fixed_length(),
        "record layout"
    );
    out.extend(std::iter::repeat(layout).take(count));
}

fn first_parenthesized_number(line: &str) -> Option<usize> {
    line.match_indices('(').find_map(|(at, _)| {
        let rest = &line[at + 1..];
        let end = rest.find(|c: char| !c.is_ascii_digit())?;
        if end == 0 || !rest[end..].starts_with(')') {
            return None;
        }
        rest[..end].parse().ok()
    })
}

/// Reads and parses a layout file.
///
/// Fails when the file cannot be read or declares no data-bearing record.
pub fn read_layout_file(path: impl AsRef<Path>) -> Result<Vec<RecordLayoutSet>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| LayoutError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let layouts = parse_layout(&text);
    if !layouts.iter().any(|l| l.head().is_some() && !l.is_root()) {
        return Err(LayoutError::Empty {
            path: path.display().to_string(),
        });
    }
    Ok(layouts)
}
