use std::fs;

use ewbg_scan::io::{fmt_value, read_input, OutputWriter};

#[test]
fn reads_legend_and_rows_with_line_numbers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("points.tsv");
    fs::write(&path, "d\te\tlambda\tt0\n0.37 0.075 0.1 92.0\n\n0.4 0.05 0.1 100.0\n")
        .expect("write input");

    let input = read_input(&path).expect("read");
    assert_eq!(input.legend_fields(), vec!["d", "e", "lambda", "t0"]);
    assert_eq!(input.rows.len(), 2);
    assert_eq!(input.rows[0].line_number, 2);
    // Blank lines are skipped but keep their line numbers.
    assert_eq!(input.rows[1].line_number, 4);
    assert_eq!(input.row(2).expect("row 2").fields()[1], "0.075");
    assert_eq!(input.rows_in(2, 4).len(), 2);
}

#[test]
fn missing_row_is_an_input_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("points.tsv");
    fs::write(&path, "legend\n1.0 2.0\n").expect("write input");

    let input = read_input(&path).expect("read");
    let err = input.row(9).expect_err("row 9 does not exist");
    assert_eq!(err.info().code, "input_line_missing");
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = read_input(&dir.path().join("nope.tsv")).expect_err("missing file");
    assert_eq!(err.info().code, "input_missing");
}

#[test]
fn empty_file_is_an_input_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.tsv");
    fs::write(&path, "").expect("write input");
    let err = read_input(&path).expect_err("empty file");
    assert_eq!(err.info().code, "input_empty");
}

#[test]
fn output_writer_appends_tab_separated_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.tsv");
    {
        let mut out = OutputWriter::create(&path).expect("create");
        out.write_record(&["a".into(), "b".into()]).expect("legend");
        out.write_record(&["1".into(), fmt_value(2.5)]).expect("row");
        out.flush().expect("flush");
    }
    let written = fs::read_to_string(&path).expect("read back");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "a\tb");
    assert!(lines[1].starts_with("1\t2.5"));
}

#[test]
fn nan_renders_as_nan() {
    assert_eq!(fmt_value(f64::NAN), "nan");
    assert!(fmt_value(1.0).contains('e'));
}
