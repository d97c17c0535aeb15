//! The parallel point loop: one worker per input row, serialized output.

use rayon::prelude::*;

use ewbg_baryo::{calc_eta, EtaResult, EtaStatus};
use ewbg_core::{derive_substream_seed, ErrorInfo, EwbgError};
use ewbg_models::{build_model, ModelId};
use ewbg_pt::{find_transition, PhaseTransitionPoint, TransitionStatus};

use crate::config::RunConfig;
use crate::io::{fmt_value, InputFile, InputRow, OutputWriter};

/// Fixed order of the CP-phase diagnostic columns.
const PHASE_COLUMNS: [&str; 6] = [
    "top_sym_phase",
    "top_brk_phase",
    "bot_sym_phase",
    "bot_brk_phase",
    "tau_sym_phase",
    "tau_brk_phase",
];

/// Finished output record for one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    /// 1-based input line number, used to restore file order after the
    /// parallel section.
    pub line_number: usize,
    /// Output record: echoed input fields plus the appended columns.
    pub record: Vec<String>,
}

/// Output legend: echoed input legend plus the appended column labels.
pub fn output_legend(input_legend: &[String], model: ModelId) -> Vec<String> {
    let mut legend: Vec<String> = input_legend.to_vec();
    legend.push("T_c".into());
    legend.push("v_c".into());
    legend.push("omega_c/T_c".into());
    legend.extend(model.vev_legend());
    legend.push("status".into());
    legend.push("vw".into());
    legend.push("L_W".into());
    legend.extend(PHASE_COLUMNS.iter().map(|s| s.to_string()));
    legend.push("eta".into());
    legend
}

/// Processes one input row through the full pipeline.
///
/// Never fails: malformed rows, failed scans and failed transport solves
/// all collapse into status/NaN columns so the batch always emits exactly
/// one record per requested row.
pub fn process_row(
    model_id: ModelId,
    row: &InputRow,
    use_index_col: bool,
    cfg: &RunConfig,
) -> RowOutcome {
    let mut record = row.fields();
    let n_vev = model_id.vev_legend().len();

    let mut scan_opts = cfg.scan.clone();
    scan_opts.minimize.seed = derive_substream_seed(cfg.seed, row.line_number as u64);

    let model = match build_model(model_id, &row.raw, use_index_col, &cfg.transport.sm) {
        Ok(model) => model,
        Err(_err) => {
            push_failure(&mut record, n_vev, "input-error", cfg.vw);
            return RowOutcome {
                line_number: row.line_number,
                record,
            };
        }
    };

    let report = match find_transition(model.as_ref(), &scan_opts) {
        Ok(report) => report,
        Err(_err) => {
            push_failure(
                &mut record,
                n_vev,
                TransitionStatus::NumericalFailure.as_str(),
                cfg.vw,
            );
            return RowOutcome {
                line_number: row.line_number,
                record,
            };
        }
    };

    let point = &report.point;
    if !point.is_found() {
        push_failure(&mut record, n_vev, point.status.as_str(), cfg.vw);
        return RowOutcome {
            line_number: row.line_number,
            record,
        };
    }

    let eta = calc_eta(
        cfg.vw,
        &point.broken_vev,
        &point.symmetric_vev,
        point.tc,
        model.as_ref(),
        &cfg.transport,
    )
    .unwrap_or_else(|err| EtaResult {
        eta: f64::NAN,
        wall_width: f64::NAN,
        phases: PHASE_COLUMNS
            .iter()
            .map(|key| (key.to_string(), f64::NAN))
            .collect(),
        status: EtaStatus::Failed,
        failure: Some(err.info().clone()),
    });

    push_transition(&mut record, point);
    record.push(point.status.as_str().to_string());
    record.push(fmt_value(cfg.vw));
    record.push(fmt_value(eta.wall_width));
    for key in PHASE_COLUMNS {
        record.push(fmt_value(eta.phases.get(key).copied().unwrap_or(f64::NAN)));
    }
    record.push(fmt_value(eta.eta));

    RowOutcome {
        line_number: row.line_number,
        record,
    }
}

fn push_transition(record: &mut Vec<String>, point: &PhaseTransitionPoint) {
    record.push(fmt_value(point.tc));
    record.push(fmt_value(point.vc));
    record.push(fmt_value(point.vc / point.tc));
    for coord in point.broken_vev.coords() {
        record.push(fmt_value(*coord));
    }
}

fn push_failure(record: &mut Vec<String>, n_vev: usize, status: &str, vw: f64) {
    for _ in 0..3 + n_vev {
        record.push("nan".into());
    }
    record.push(status.to_string());
    record.push(fmt_value(vw));
    // L_W, six phases, eta.
    for _ in 0..8 {
        record.push("nan".into());
    }
}

/// Runs the batch over an inclusive 1-based line range, in parallel, and
/// writes the legend plus one record per row in file order.
pub fn run_batch(
    model_id: ModelId,
    input: &InputFile,
    first_line: usize,
    last_line: usize,
    use_index_col: bool,
    cfg: &RunConfig,
    out: &mut OutputWriter,
) -> Result<usize, EwbgError> {
    if first_line < 2 {
        return Err(EwbgError::Input(
            ErrorInfo::new("input_line_range", "data rows start at line 2")
                .with_context("first_line", first_line.to_string())
                .with_hint("line 1 is the legend"),
        ));
    }
    let rows = input.rows_in(first_line, last_line);
    if rows.is_empty() {
        return Err(EwbgError::Input(
            ErrorInfo::new("input_range_empty", "no data rows in the requested range")
                .with_context("first_line", first_line.to_string())
                .with_context("last_line", last_line.to_string()),
        ));
    }

    out.write_record(&output_legend(&input.legend_fields(), model_id))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.jobs.max(1))
        .build()
        .map_err(|err| {
            EwbgError::Config(
                ErrorInfo::new("thread_pool", "cannot build worker pool")
                    .with_context("cause", err.to_string()),
            )
        })?;

    let mut outcomes: Vec<RowOutcome> = pool.install(|| {
        rows.par_iter()
            .map(|&row| process_row(model_id, row, use_index_col, cfg))
            .collect()
    });
    outcomes.sort_by_key(|outcome| outcome.line_number);

    let count = outcomes.len();
    for outcome in &outcomes {
        out.write_record(&outcome.record)?;
    }
    out.flush()?;
    Ok(count)
}
