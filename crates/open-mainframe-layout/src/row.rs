//! Single-line layout grammar.
//!
//! Each normalized line yields zero or more flat [`FieldDescriptor`]s. Type
//! clauses are searched in a fixed order and the first hit wins:
//!
//! | Clause | Type | Storage |
//! |--------|------|---------|
//! | `BIT(n)` | [`DataType::Bit`] | ceil(n/8) |
//! | `CHAR(n)` | [`DataType::Char`] | n |
//! | `FIXED(p[,s])`, `FIXED DEC(p[,s])` | [`DataType::PackedDecimal`] | ceil(p/2) |
//! | `FIXED BIN(n)`, `BINARY FIXED` | [`DataType::BinaryInteger`] | ceil(n/8) |
//! | `PIC'...'` | [`DataType::NumericPic`] | digit count |
//!
//! A named line without a type clause is a group. `OCCURS:expr,` gives the
//! group a dynamic repeat count. A `ROOT name,` line names the output wrapper.

use crate::types::{DataType, FieldDescriptor};

/// Precision assumed for `BINARY FIXED` without an explicit width.
pub const DEFAULT_BINARY_PRECISION: usize = 15;

/// Level number, name and optional dimensions at the start of a field line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NameClause<'a> {
    level: u32,
    name: &'a str,
    single: Option<usize>,
    pair: Option<(usize, usize)>,
}

/// Parses one normalized line into flat field descriptors.
///
/// `header` tells whether the line is a record header, where a `(n)` after
/// the name is a duplication count instead of an array dimension.
pub fn parse_row(line: &str, header: bool) -> Vec<FieldDescriptor> {
    let Some(clause) = find_name_clause(line) else {
        return find_root_name(line)
            .map(|name| vec![FieldDescriptor::root(name)])
            .unwrap_or_default();
    };

    let quantity = clause.single.unwrap_or(1);
    let (array_dim1, array_dim2) = match (clause.single, clause.pair) {
        (Some(n), _) if !header => (n, 0),
        (_, Some((m1, m2))) => (m1, m2),
        _ => (0, 0),
    };

    // Typed lines repeat by renaming; only groups keep dimensions for expansion.
    if let Some(mut template) = find_type_clause(line) {
        template.level = clause.level;
        if quantity > 1 {
            return (1..=quantity)
                .map(|i| FieldDescriptor {
                    name: format!("{}({})", clause.name, i),
                    ..template.clone()
                })
                .collect();
        }
        template.name = clause.name.to_string();
        return vec![template];
    }

    let mut group = FieldDescriptor::group(clause.name, clause.level);
    group.array_dim1 = array_dim1;
    group.array_dim2 = array_dim2;
    group.repeat_expr = find_repeat_expr(line);
    vec![group]
}

// ---------------------------------------------------------------------------
// Name clause
// ---------------------------------------------------------------------------

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'$' | b'_' | b'#')
}

fn scan(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| !pred(b))
        .map_or(bytes.len(), |n| from + n)
}

/// Finds the first `<digits><whitespace><name>` sequence in the line.
fn find_name_clause(line: &str) -> Option<NameClause<'_>> {
    let bytes = line.as_bytes();
    for start in 0..bytes.len() {
        if !bytes[start].is_ascii_digit() {
            continue;
        }
        let digits_end = scan(bytes, start, |b| b.is_ascii_digit());
        let space_end = scan(bytes, digits_end, |b| b.is_ascii_whitespace());
        if space_end == digits_end {
            continue;
        }
        let name_end = scan(bytes, space_end, is_name_byte);
        if name_end == space_end {
            continue;
        }
        let Ok(level) = line[start..digits_end].parse() else {
            continue;
        };

        let mut pos = name_end;
        let single = parse_single(&line[pos..]).map(|(n, used)| {
            pos += used;
            n
        });
        let pair = parse_pair(&line[pos..]).map(|(pair, _)| pair);

        return Some(NameClause {
            level,
            name: &line[space_end..name_end],
            single,
            pair,
        });
    }
    None
}

/// Parses a leading run of ASCII digits, returning the value and bytes used.
fn parse_number(text: &str) -> Option<(usize, usize)> {
    let end = text.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    text[..end].parse().ok().map(|n| (n, end))
}

/// Parses `(n)` at the start of `text`.
fn parse_single(text: &str) -> Option<(usize, usize)> {
    let rest = text.strip_prefix('(')?;
    let (n, used) = parse_number(rest)?;
    rest[used..].starts_with(')').then_some((n, used + 2))
}

/// Parses `(n,m)` at the start of `text`.
fn parse_pair(text: &str) -> Option<((usize, usize), usize)> {
    let rest = text.strip_prefix('(')?;
    let (first, a) = parse_number(rest)?;
    let rest = rest[a..].strip_prefix(',')?;
    let (second, b) = parse_number(rest)?;
    rest[b..]
        .starts_with(')')
        .then_some(((first, second), a + b + 3))
}

// ---------------------------------------------------------------------------
// Type clauses
// ---------------------------------------------------------------------------

/// Returns the first match of `parse` applied after any occurrence of `prefix`.
fn find_after<'a, T>(
    line: &'a str,
    prefix: &str,
    parse: impl Fn(&'a str) -> Option<T>,
) -> Option<T> {
    line.match_indices(prefix)
        .find_map(|(at, _)| parse(&line[at + prefix.len()..]))
}

/// Parses `n)` following an already-consumed `(`.
fn closed_number(text: &str) -> Option<usize> {
    let (n, used) = parse_number(text)?;
    text[used..].starts_with(')').then_some(n)
}

/// Parses `p)`, `p,)` or `p,s)` following an already-consumed `(`.
fn precision_scale(text: &str) -> Option<(usize, usize)> {
    let (precision, used) = parse_number(text)?;
    let rest = &text[used..];
    let rest = rest.strip_prefix(',').unwrap_or(rest);
    match parse_number(rest) {
        Some((scale, n)) => rest[n..].starts_with(')').then_some((precision, scale)),
        None => rest.starts_with(')').then_some((precision, 0)),
    }
}

fn find_type_clause(line: &str) -> Option<FieldDescriptor> {
    if let Some(bits) = find_after(line, "BIT(", closed_number) {
        return Some(FieldDescriptor::leaf("", 0, DataType::Bit, bits));
    }
    if let Some(chars) = find_after(line, "CHAR(", closed_number) {
        return Some(FieldDescriptor::leaf("", 0, DataType::Char, chars));
    }
    if let Some((digits, scale)) = find_after(line, "FIXED(", precision_scale)
        .or_else(|| find_after(line, "FIXED DEC(", precision_scale))
    {
        return Some(FieldDescriptor::leaf("", 0, DataType::PackedDecimal, digits).with_scale(scale));
    }
    if let Some(bits) = find_fixed_binary(line) {
        let mut field = FieldDescriptor::leaf("", 0, DataType::BinaryInteger, bits);
        field.signed = has_keyword(line, "SIGNED");
        return Some(field);
    }
    if let Some(picture) = find_after(line, "PIC'", picture_pattern) {
        let normalized = expand_picture(picture);
        let digits = normalized.chars().filter(|&c| c != 'V').count();
        let scale = normalized
            .find('V')
            .map_or(0, |v| normalized.len() - v - 1);
        return Some(FieldDescriptor::leaf("", 0, DataType::NumericPic, digits).with_scale(scale));
    }
    None
}

/// `FIXED BIN(n)` with any whitespace between the words, or `BINARY FIXED`.
fn find_fixed_binary(line: &str) -> Option<usize> {
    let spaced_bin = |text: &str| {
        let trimmed = text.trim_start();
        if trimmed.len() == text.len() {
            return None;
        }
        closed_number(trimmed.strip_prefix("BIN(")?)
    };
    find_after(line, "FIXED", spaced_bin)
        .or_else(|| line.contains("BINARY FIXED").then_some(DEFAULT_BINARY_PRECISION))
}

/// Picture characters up to the closing quote.
fn picture_pattern(text: &str) -> Option<&str> {
    let end = text.find('\'')?;
    let pattern = &text[..end];
    let valid = !pattern.is_empty()
        && pattern
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '(' | ')' | 'V'));
    valid.then_some(pattern)
}

/// Expands `(n)9` repetition factors into `n` nines.
pub fn expand_picture(picture: &str) -> String {
    let mut out = String::with_capacity(picture.len());
    let mut i = 0;
    while i < picture.len() {
        let rest = &picture[i..];
        if rest.starts_with('(') {
            if let Some(close) = rest.find(')') {
                if rest[close + 1..].starts_with('9') {
                    match rest[1..close].parse::<usize>() {
                        Ok(n) => out.extend(std::iter::repeat('9').take(n)),
                        Err(_) => out.push_str(&rest[..close + 2]),
                    }
                    i += close + 2;
                    continue;
                }
            }
        }
        // Picture characters are ASCII so byte stepping stays on boundaries.
        out.push_str(&rest[..1]);
        i += 1;
    }
    out
}

/// Whether `word` occurs bounded by non-word characters.
fn has_keyword(line: &str, word: &str) -> bool {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    line.match_indices(word).any(|(at, _)| {
        let before_ok = !line[..at].ends_with(is_word);
        let after_ok = !line[at + word.len()..].starts_with(is_word);
        before_ok && after_ok
    })
}

// ---------------------------------------------------------------------------
// Group and root clauses
// ---------------------------------------------------------------------------

/// Text between `marker` and the next comma; at least one character.
fn up_to_comma(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    let comma = text[first.len_utf8()..].find(',')? + first.len_utf8();
    Some(&text[..comma])
}

fn find_repeat_expr(line: &str) -> Option<String> {
    find_after(line, "OCCURS:", up_to_comma).map(|expr| expr.trim().to_string())
}

fn find_root_name(line: &str) -> Option<&str> {
    find_after(line, "ROOT", |text| {
        let trimmed = text.trim_start();
        if trimmed.len() == text.len() {
            return None;
        }
        up_to_comma(trimmed)
    })
}
