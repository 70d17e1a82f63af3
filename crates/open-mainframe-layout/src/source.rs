//! Layout source preparation.
//!
//! Turns raw layout text into trimmed, comment-free lines grouped by record
//! header. Only columns 1-72 of each line are significant.

/// Significant columns per layout line.
pub const MAX_LINE_LENGTH: usize = 72;

/// Keywords that start a new record layout.
const HEADER_KEYWORDS: [&str; 4] = ["ROOT", "0DCL", "DCL", "DECLARE"];

/// Splits layout text into lines, dropping blank lines.
///
/// A block comment spanning several lines is first folded onto one line as
/// `/* inner text */`.
pub fn prepare_lines(text: &str) -> Vec<String> {
    collapse_block_comments(text)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Rewrites every `/* ... */` comment so that it holds no line breaks.
pub fn collapse_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("/*") {
        let Some(len) = rest[open + 2..].find("*/") else {
            break;
        };
        let close = open + 2 + len;
        out.push_str(&rest[..open]);

        let inner = rest[open + 2..close]
            .split(['\n', '\r'])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .replace("/*", "");
        out.push_str("/* ");
        out.push_str(inner.trim());
        out.push_str(" */");

        rest = &rest[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Normalizes one layout line.
///
/// Truncates to [`MAX_LINE_LENGTH`] characters, removes inline comments,
/// collapses whitespace runs and trims.
pub fn normalize_line(line: &str) -> String {
    let significant: String = line.chars().take(MAX_LINE_LENGTH).collect();
    strip_comments(&significant)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find("/*") {
        let Some(len) = rest[open + 2..].find("*/") else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + 2 + len + 2..];
    }
    out.push_str(rest);
    out
}

/// Whether a trimmed line starts a record layout.
pub fn is_header_line(line: &str) -> bool {
    HEADER_KEYWORDS.iter().any(|keyword| {
        line.strip_prefix(keyword)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_'))
    })
}

/// Groups lines into per-record chunks, each starting at a header line.
///
/// Lines before the first header are discarded. Without any header the whole
/// input forms one chunk.
pub fn split_records(lines: &[String]) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut seen_header = false;

    for line in lines {
        let line = line.trim();
        if is_header_line(line) {
            if seen_header && !current.is_empty() {
                records.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            seen_header = true;
        }
        current.push(line.to_string());
    }

    if !current.is_empty() {
        records.push(current);
    }
    records
}
