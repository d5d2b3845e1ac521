//! End-to-end conversion tests over real files.

use std::path::PathBuf;

use mifgen_core::{convert, ConvertConfig, ConvertError, ConvertOptions, LoadError};

fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn options(input: PathBuf, output: PathBuf) -> ConvertOptions {
    ConvertOptions {
        input,
        output,
        config: ConvertConfig::default(),
    }
}

fn hex(bytes: impl IntoIterator<Item = u8>) -> String {
    bytes.into_iter().map(|b| format!("{b:02X}")).collect()
}

#[test]
fn converts_the_worked_example() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        &dir,
        "prices.csv",
        "Date,Close\n2023-01-03,150.25\n2023-01-04,NaN\n2023-01-05,152.80\n",
    );
    let output = dir.path().join("prices.mif");

    let summary = convert(&options(input, output.clone())).unwrap();

    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_dropped, 1);
    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.width_bits, 64);

    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let close_1 = hex((152.80f32).to_be_bytes());
    assert_eq!(
        lines,
        vec![
            "WIDTH=64;".to_string(),
            "DEPTH=2;".to_string(),
            "ADDRESS_RADIX=UNS;".to_string(),
            "DATA_RADIX=HEX;".to_string(),
            "CONTENT BEGIN".to_string(),
            "    0 : 07E7010343164000;".to_string(),
            format!("    1 : 07E70105{close_1};"),
            "END;".to_string(),
        ]
    );
}

#[test]
fn conversion_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        &dir,
        "prices.csv",
        "Date,Close\n2023-01-03,150.25\n2023-01-05,152.80\n",
    );
    let out_a = dir.path().join("a.mif");
    let out_b = dir.path().join("b.mif");

    let summary_a = convert(&options(input.clone(), out_a.clone())).unwrap();
    let summary_b = convert(&options(input, out_b.clone())).unwrap();

    assert_eq!(summary_a.content_hash, summary_b.content_hash);
    assert_eq!(
        std::fs::read(&out_a).unwrap(),
        std::fs::read(&out_b).unwrap()
    );
}

#[test]
fn content_hash_covers_the_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "prices.csv", "Date,Close\n2023-01-03,150.25\n");
    let output = dir.path().join("prices.mif");

    let summary = convert(&options(input, output.clone())).unwrap();

    let on_disk = std::fs::read(&output).unwrap();
    assert_eq!(
        summary.content_hash,
        blake3::hash(&on_disk).to_hex().to_string()
    );
}

#[test]
fn depth_counts_only_surviving_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        &dir,
        "prices.csv",
        "Date,Close\n2023-01-03,150.25\n,151.00\n2023-01-05,\n2023-01-06,152.00\n",
    );
    let output = dir.path().join("prices.mif");

    let summary = convert(&options(input, output.clone())).unwrap();
    assert_eq!(summary.records_written, 2);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("DEPTH=2;"));
    let record_lines = text.lines().filter(|l| l.starts_with("    ")).count();
    assert_eq!(record_lines, 2);
}

#[test]
fn empty_source_produces_a_valid_empty_mif() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "prices.csv", "Date,Close\n");
    let output = dir.path().join("prices.mif");

    let summary = convert(&options(input, output.clone())).unwrap();
    assert_eq!(summary.records_written, 0);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("DEPTH=0;"));
    assert!(text.ends_with("END;\n"));
}

#[test]
fn missing_input_fails_with_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("prices.mif");

    let err = convert(&options(dir.path().join("absent.csv"), output.clone())).unwrap_err();

    assert!(matches!(err, ConvertError::Load(LoadError::Read { .. })));
    assert!(!output.exists());
}

#[test]
fn bad_date_fails_before_output_creation() {
    // Loading happens before the output file is opened, so a bad date
    // leaves no output behind.
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "prices.csv", "Date,Close\ngarbage,150.25\n");
    let output = dir.path().join("prices.mif");

    let err = convert(&options(input, output.clone())).unwrap_err();

    assert!(matches!(
        err,
        ConvertError::Load(LoadError::DateParse { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn renamed_columns_work_through_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        &dir,
        "prices.csv",
        "day,settlement,volume\n2023-01-03,150.25,9000\n",
    );
    let output = dir.path().join("prices.mif");

    let opts = ConvertOptions {
        input,
        output: output.clone(),
        config: ConvertConfig {
            date_column: "day".into(),
            close_column: "settlement".into(),
        },
    };

    let summary = convert(&opts).unwrap();
    assert_eq!(summary.records_written, 1);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("    0 : 07E7010343164000;"));
}

#[test]
fn extra_columns_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        &dir,
        "prices.csv",
        "Date,Open,High,Low,Close,Volume\n2023-01-03,148.0,151.0,147.5,150.25,1000000\n",
    );
    let output = dir.path().join("prices.mif");

    let summary = convert(&options(input, output.clone())).unwrap();
    assert_eq!(summary.records_written, 1);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("    0 : 07E7010343164000;"));
}
