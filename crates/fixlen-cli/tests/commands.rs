//! End-to-end runs of the subcommands against files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use fixlen_cli::cli::{CheckArgs, DecodeArgs, EncodeArgs, RecordFormatArg, ToleranceArgs};
use fixlen_cli::commands::{run_check, run_decode, run_encode};
use fixlen_cli::summary::{diagnostics_table, schema_table};
use fixlen_codec::DefectKind;
use tempfile::TempDir;

const SCHEMA: &str = r#"{"columns": [
  {"name": "City", "length": 5},
  {"name": "Street", "length": 4},
  {"name": "Number", "length": 4},
  {"name": "Main", "length": 1}
]}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn trimming() -> ToleranceArgs {
    ToleranceArgs {
        ignore_empty_columns: true,
        trim: true,
        ..ToleranceArgs::default()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}

#[test]
fn decode_writes_json_objects_in_column_order() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", SCHEMA);
    let input = write(&dir, "in.txt", "city1str15   T\ncity6    5   T\n");
    let output = dir.path().join("out.json");

    let outcome = run_decode(&DecodeArgs {
        schema,
        input,
        output: Some(output.clone()),
        format: RecordFormatArg::Json,
        tolerance: trimming(),
    })
    .unwrap();

    assert_eq!(outcome.records, 2);
    assert!(outcome.halted.is_none());
    assert_eq!(outcome.diagnostics.len(), 1);
    insta::assert_snapshot!(read(&output), @r#"
    [
      {
        "City": "city1",
        "Street": "str1",
        "Number": "5",
        "Main": "T"
      },
      {
        "City": "city6",
        "Street": "",
        "Number": "5",
        "Main": "T"
      }
    ]
    "#);
}

#[test]
fn decode_keeps_records_before_a_fatal_defect() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", SCHEMA);
    let input = write(&dir, "in.txt", "city1str15   T\ncity2str24537TX\ncity3str3 24 F\n");
    let output = dir.path().join("out.jsonl");

    let outcome = run_decode(&DecodeArgs {
        schema,
        input,
        output: Some(output.clone()),
        format: RecordFormatArg::Jsonl,
        tolerance: ToleranceArgs::default(),
    })
    .unwrap();

    let halted = outcome.halted.expect("long line halts");
    assert_eq!(halted.line_number, 2);
    assert_eq!(halted.kind, DefectKind::LineTooLong);
    assert_eq!(outcome.records, 1);
    assert_eq!(
        read(&output),
        "{\"City\":\"city1\",\"Street\":\"str1\",\"Number\":\"5   \",\"Main\":\"T\"}\n"
    );
}

#[test]
fn check_reports_tolerated_defects() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", SCHEMA);
    let input = write(&dir, "in.txt", "city1str15   TXX\ncity2\n");

    let outcome = run_check(&CheckArgs {
        schema,
        input,
        tolerance: ToleranceArgs {
            lenient: true,
            trim: true,
            ..ToleranceArgs::default()
        },
    })
    .unwrap();

    assert!(!outcome.is_clean());
    assert!(outcome.halted.is_none());
    assert_eq!(outcome.records, 2);
    let kinds: Vec<_> = outcome.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DefectKind::LineTooLong,
            DefectKind::LineTooShort,
            DefectKind::EmptyColumn,
            DefectKind::EmptyColumn,
            DefectKind::EmptyColumn,
        ]
    );

    let mut table = diagnostics_table(&outcome.diagnostics);
    table.force_no_tty();
    let rendered = table.to_string();
    assert!(rendered.contains("line is too long"));
    assert!(rendered.contains("Street"));
}

#[test]
fn check_reads_options_file() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", SCHEMA);
    let input = write(&dir, "in.txt", "city1str15   T\ncity6    5   T\n");
    let options = write(&dir, "options.json", r#"{"ignore_empty_columns": true}"#);

    let outcome = run_check(&CheckArgs {
        schema,
        input,
        tolerance: ToleranceArgs {
            trim: true,
            options: Some(options),
            ..ToleranceArgs::default()
        },
    })
    .unwrap();

    assert!(outcome.halted.is_none());
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].column.as_deref(), Some("Street"));
}

#[test]
fn encode_writes_fixed_width_lines() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", SCHEMA);
    let input = write(
        &dir,
        "in.jsonl",
        "{\"City\":\"city3\",\"Street\":\"str3\",\"Number\":24,\"Main\":false}\n\n[\"a\",\"b\"]\n",
    );
    let output = dir.path().join("out.txt");

    let outcome = run_encode(&EncodeArgs {
        schema,
        input,
        output: Some(output.clone()),
        pad_char: ' ',
        crlf: false,
    })
    .unwrap();

    assert_eq!(outcome.lines_written, 2);
    assert_eq!(read(&output), "city3str324  f\na    b        \n");
}

#[test]
fn encode_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.json", SCHEMA);
    let input = write(&dir, "in.jsonl", "{\"City\": \"x\"}\nnot json\n");

    let err = run_encode(&EncodeArgs {
        schema,
        input,
        output: Some(dir.path().join("out.txt")),
        pad_char: '_',
        crlf: true,
    })
    .unwrap_err();

    assert_eq!(err.to_string(), "line 2: invalid JSON");
}

#[test]
fn schema_table_lists_offsets_and_total() {
    let schema = fixlen_model::Schema::from_json_str(SCHEMA).unwrap();
    let mut table = schema_table(&schema);
    table.force_no_tty();
    let rendered = table.to_string();
    assert!(rendered.contains("Number"));
    assert!(rendered.contains("TOTAL"));
    assert!(rendered.contains("14"));
}
