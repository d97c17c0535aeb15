use std::fs;

use ewbg_models::ModelId;
use ewbg_scan::batch::{output_legend, run_batch};
use ewbg_scan::config::RunConfig;
use ewbg_scan::io::{read_input, OutputWriter};

/// Three quartic rows: a strong transition, a malformed row and a point
/// whose transition sits above the scan range.
const INPUT: &str = "d e lambda t0\n\
                     0.37 0.075 0.1 92.0\n\
                     0.37 banana 0.1 92.0\n\
                     0.37 0.075 0.1 350.0\n";

#[test]
fn one_bad_row_never_takes_down_the_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input_path = dir.path().join("points.tsv");
    let output_path = dir.path().join("out.tsv");
    fs::write(&input_path, INPUT).expect("write input");

    let input = read_input(&input_path).expect("read");
    let cfg = RunConfig {
        jobs: 2,
        ..RunConfig::default()
    };
    let mut out = OutputWriter::create(&output_path).expect("create output");
    let written =
        run_batch(ModelId::Quartic, &input, 2, 4, false, &cfg, &mut out).expect("batch");
    assert_eq!(written, 3);

    let content = fs::read_to_string(&output_path).expect("read output");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4, "legend plus one record per row");

    let legend: Vec<&str> = lines[0].split('\t').collect();
    let status_col = legend
        .iter()
        .position(|field| *field == "status")
        .expect("status column");
    let eta_col = legend.len() - 1;
    assert_eq!(legend[eta_col], "eta");

    let statuses: Vec<&str> = lines[1..]
        .iter()
        .map(|line| line.split('\t').nth(status_col).expect("status field"))
        .collect();
    assert_eq!(statuses, vec!["found", "input-error", "not-found"]);

    // The good row carries a finite eta, the others NaN placeholders.
    let eta_of = |line: &str| -> String {
        line.split('\t').nth(eta_col).expect("eta field").to_string()
    };
    let good_eta: f64 = eta_of(lines[1]).parse().expect("numeric eta");
    assert!(good_eta.is_finite() && good_eta != 0.0);
    assert_eq!(eta_of(lines[2]), "nan");
    assert_eq!(eta_of(lines[3]), "nan");
}

#[test]
fn legend_shape_matches_records() {
    let legend = output_legend(&["a".into(), "b".into()], ModelId::Quartic);
    // echo + 3 transition columns + 1 vev + status + vw + L_W + 6 phases + eta.
    assert_eq!(legend.len(), 2 + 3 + 1 + 3 + 6 + 1);
    assert_eq!(legend[2], "T_c");
    assert_eq!(legend.last().map(String::as_str), Some("eta"));
}

#[test]
fn first_line_below_two_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input_path = dir.path().join("points.tsv");
    fs::write(&input_path, "legend\n0.37 0.075 0.1 92.0\n").expect("write input");
    let input = read_input(&input_path).expect("read");

    let output_path = dir.path().join("out.tsv");
    let mut out = OutputWriter::create(&output_path).expect("create output");
    let err = run_batch(
        ModelId::Quartic,
        &input,
        1,
        2,
        false,
        &RunConfig::default(),
        &mut out,
    )
    .expect_err("legend line is not data");
    assert_eq!(err.info().code, "input_line_range");
}
