//! End-to-end tests for the layout, framing, decoding and output pipeline.

use std::path::PathBuf;

use open_mainframe_convert::{convert, ConvertOptions, ConvertSummary, Mode, OutputFormat};
use open_mainframe_encoding::CP1047;
use open_mainframe_layout::{parse_layout, read_layout_file, RecordLayoutSet};
use serde_json::Value as Json;

/// Helper to get fixture path.
fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn ebcdic(text: &str) -> Vec<u8> {
    CP1047.encode(text).unwrap()
}

fn rdw(body: &[u8]) -> Vec<u8> {
    let mut out = ((body.len() + 4) as u16).to_be_bytes().to_vec();
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(body);
    out
}

/// One 300-byte ACCOUNT record matching `account.pli`.
fn account_record(id: &str) -> Vec<u8> {
    let mut record = ebcdic(&format!("{id:<10}{:<40}", "JANE DOE"));
    record.extend_from_slice(&[0x00, 0x12, 0x34, 0x56, 0x7D]);
    record.extend_from_slice(&256u32.to_be_bytes());
    record.extend(ebcdic("01250"));
    record.push(0b1010_0000);
    record.extend(ebcdic("     "));
    for (sku, qty) in [("WIDGET", 2u16), ("GADGET", 40), ("", 0)] {
        record.extend(ebcdic(&format!("{sku:<10}")));
        record.extend_from_slice(&qty.to_be_bytes());
    }
    record.extend(ebcdic(&format!("{:<194}", "PREFERRED")));
    assert_eq!(record.len(), 300);
    record
}

fn run(layouts: &[RecordLayoutSet], input: &[u8], options: &ConvertOptions) -> (Vec<u8>, ConvertSummary) {
    let mut out = Vec::new();
    let summary = convert(input, layouts, options, &mut out).unwrap();
    (out, summary)
}

// ============================================================================
// Fixed-length records
// ============================================================================

#[test]
fn test_fixed_record_end_to_end() {
    let layouts = read_layout_file(fixture("account.pli")).unwrap();
    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0].fixed_length(), 300);

    let (out, summary) = run(&layouts, &account_record("A-0001"), &ConvertOptions::default());
    assert_eq!(summary.records, 1);
    assert_eq!(summary.groups, 1);

    let json: Json = serde_json::from_slice(&out).unwrap();
    let objects = json.as_array().unwrap();
    assert_eq!(objects.len(), 1);

    let account = objects[0]["ACCOUNT"].as_object().unwrap();
    let keys: Vec<_> = account.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["ACCT_ID", "NAME", "BALANCE", "TXN_COUNT", "RATE", "FLAGS", "ITEMS", "REMARKS"]
    );
    assert_eq!(account["ACCT_ID"], "A-0001    ");
    assert_eq!(account["NAME"].as_str().unwrap().trim_end(), "JANE DOE");
    assert_eq!(account["BALANCE"], "-0012345.67");
    assert_eq!(account["TXN_COUNT"], "256");
    assert_eq!(account["RATE"], "012.50");
    assert_eq!(account["FLAGS"], "10100000");
    assert_eq!(account["REMARKS"].as_str().unwrap().len(), 194);

    let items = account["ITEMS"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["SKU"], "WIDGET    ");
    assert_eq!(items[1]["QTY"], "40");
    assert_eq!(items[2]["QTY"], "0");
}

#[test]
fn test_pipeline_is_deterministic() {
    let layouts = read_layout_file(fixture("account.pli")).unwrap();
    let mut input = account_record("A-0001");
    input.extend(account_record("A-0002"));

    for format in [OutputFormat::Json, OutputFormat::JsonCompact, OutputFormat::Csv] {
        let options = ConvertOptions {
            format,
            ..Default::default()
        };
        let (first, _) = run(&layouts, &input, &options);
        let (second, _) = run(&layouts, &input, &options);
        assert_eq!(first, second, "{format:?} output differs between runs");
    }
}

#[test]
fn test_fixed_record_without_grouping() {
    let layouts = read_layout_file(fixture("account.pli")).unwrap();
    let options = ConvertOptions {
        format: OutputFormat::JsonCompact,
        mode: Mode::WithoutArrayGrouping,
        ..Default::default()
    };
    let (out, _) = run(&layouts, &account_record("A-0001"), &options);

    let json: Json = serde_json::from_slice(&out).unwrap();
    let account = json[0]["ACCOUNT"].as_object().unwrap();
    assert_eq!(account["ITEMS(1)"]["SKU"], "WIDGET    ");
    assert_eq!(account["ITEMS(3)"]["QTY"], "0");
    assert!(!account.contains_key("ITEMS"));
}

#[test]
fn test_fixed_record_to_csv() {
    let layouts = read_layout_file(fixture("account.pli")).unwrap();
    let mut input = account_record("A-0001");
    input.extend(account_record("A-0002"));
    let options = ConvertOptions {
        format: OutputFormat::Csv,
        ..Default::default()
    };
    let (out, _) = run(&layouts, &input, &options);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("\"ACCOUNT.ACCT_ID\"|\"ACCOUNT.NAME\"|\"ACCOUNT.BALANCE\""));
    assert_eq!(lines[0].matches("\"ACCOUNT.ITEMS.SKU\"").count(), 3);
    assert!(lines[2].starts_with("\"A-0002    \"|"));
}

// ============================================================================
// Variable-length framing
// ============================================================================

fn compact_options() -> ConvertOptions {
    ConvertOptions {
        format: OutputFormat::JsonCompact,
        ..Default::default()
    }
}

#[test]
fn test_empty_rdw_record_keeps_stream_going() {
    let layouts = parse_layout("DCL 1 R VB,\n 3 A CHAR(3);");
    let mut input = rdw(&ebcdic("ONE"));
    input.extend(rdw(&[]));
    input.extend(rdw(&ebcdic("TWO")));
    input.extend(rdw(&ebcdic("SIX")));

    let (out, summary) = run(&layouts, &input, &compact_options());
    assert_eq!(summary.records, 4);
    assert_eq!(summary.groups, 4);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "[{\"R\":{\"A\":\"ONE\"}},{\"R\":{\"A\":\"\"}},{\"R\":{\"A\":\"TWO\"}},{\"R\":{\"A\":\"SIX\"}}]\n"
    );
}

#[test]
fn test_truncated_rdw_tail_is_dropped() {
    let layouts = parse_layout("DCL 1 R VB,\n 3 A CHAR(3);");
    let mut input = rdw(&ebcdic("ONE"));
    input.extend(rdw(&ebcdic("TWO")));
    input.extend_from_slice(&[0x00, 0x07, 0x00, 0x00, 0xE2]);

    let (out, summary) = run(&layouts, &input, &compact_options());
    assert_eq!(summary.records, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "[{\"R\":{\"A\":\"ONE\"}},{\"R\":{\"A\":\"TWO\"}}]\n"
    );
}

#[test]
fn test_short_fixed_tail_is_dropped() {
    let layouts = read_layout_file(fixture("account.pli")).unwrap();
    let mut input = account_record("A-0001");
    input.extend_from_slice(&account_record("A-0002")[..120]);

    let (out, summary) = run(&layouts, &input, &compact_options());
    assert_eq!(summary.records, 1);
    let json: Json = serde_json::from_slice(&out).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
}

// ============================================================================
// Segmented records
// ============================================================================

fn segment(name: &str, body: &[u8]) -> Vec<u8> {
    let mut bytes = ebcdic(&format!("{:6}{:8}", "", name));
    bytes.extend_from_slice(body);
    rdw(&bytes)
}

fn line(sku: &str, qty: u16) -> Vec<u8> {
    let mut body = ebcdic(sku);
    body.extend_from_slice(&qty.to_be_bytes());
    segment("LINE", &body)
}

#[test]
fn test_segmented_orders() {
    let layouts = read_layout_file(fixture("orders.pli")).unwrap();

    let mut input = segment("SKIP", &[]);
    input.extend(segment("ORDER", &ebcdic("A00102")));
    input.extend(line("ABC", 5));
    input.extend(line("XYZ", 12));
    input.extend(segment("ORDER", &ebcdic("A00200")));

    let options = ConvertOptions {
        format: OutputFormat::JsonCompact,
        ..Default::default()
    };
    let (out, summary) = run(&layouts, &input, &options);
    assert_eq!(summary.records, 5);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.groups, 2);

    assert_eq!(
        String::from_utf8(out).unwrap(),
        concat!(
            "[{\"ORDERS\":{\"ORDER\":{\"SEGNAME\":\"ORDER   \",\"ORDER_NO\":\"A001\",\"LINE_COUNT\":\"02\"},",
            "\"LINE\":[{\"SEGNAME\":\"LINE    \",\"SKU\":\"ABC\",\"QTY\":\"5\"},",
            "{\"SEGNAME\":\"LINE    \",\"SKU\":\"XYZ\",\"QTY\":\"12\"}]}},",
            "{\"ORDERS\":{\"ORDER\":{\"SEGNAME\":\"ORDER   \",\"ORDER_NO\":\"A002\",\"LINE_COUNT\":\"00\"}}}]\n"
        )
    );
}

#[test]
fn test_segmented_repeats_without_grouping() {
    let layouts = read_layout_file(fixture("orders.pli")).unwrap();

    let mut input = segment("ORDER", &ebcdic("A00102"));
    input.extend(line("ABC", 5));
    input.extend(line("XYZ", 12));

    let options = ConvertOptions {
        format: OutputFormat::JsonCompact,
        mode: Mode::WithoutArrayGrouping,
        ..Default::default()
    };
    let (out, _) = run(&layouts, &input, &options);

    let json: Json = serde_json::from_slice(&out).unwrap();
    let orders = json[0]["ORDERS"].as_object().unwrap();
    let keys: Vec<_> = orders.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["ORDER", "LINE"]);
    assert_eq!(orders["LINE"][1]["SKU"], "XYZ");
}
