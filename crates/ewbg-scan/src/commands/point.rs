use std::path::Path;

use ewbg_baryo::calc_eta;
use ewbg_core::{derive_substream_seed, ErrorInfo, EwbgError};
use ewbg_models::{DarkPortalModel, ModelId, PortalParams};
use ewbg_pt::find_transition;
use ewbg_scan::config::RunConfig;
use ewbg_scan::io::{fmt_value, read_input, OutputWriter};

const PHASE_COLUMNS: [&str; 6] = [
    "top_sym_phase",
    "top_brk_phase",
    "bot_sym_phase",
    "bot_brk_phase",
    "tau_sym_phase",
    "tau_brk_phase",
];

/// Recomputes one parameter row while varying the renormalization scale
/// from 0.5 to 1.5 times the electroweak vev.
///
/// Scale points without a first-order transition are skipped, matching the
/// original single-point workflow; the returned count is the number of
/// scale points written.
#[allow(clippy::too_many_arguments)]
pub fn run(
    model: ModelId,
    input_path: &Path,
    output_path: &Path,
    line: usize,
    steps: usize,
    index_col: bool,
    cfg: &RunConfig,
) -> Result<usize, EwbgError> {
    if model != ModelId::DarkPortal {
        return Err(EwbgError::Config(
            ErrorInfo::new(
                "point_model",
                "scale variation requires a loop-corrected model",
            )
            .with_context("model", model.as_str())
            .with_hint("use --model dark-portal"),
        ));
    }
    if line < 2 {
        return Err(EwbgError::Input(
            ErrorInfo::new("input_line_range", "data rows start at line 2")
                .with_context("line", line.to_string())
                .with_hint("line 1 is the legend"),
        ));
    }
    if steps == 0 {
        return Err(EwbgError::Config(ErrorInfo::new(
            "point_steps",
            "the number of scale steps must be non-zero",
        )));
    }

    let input = read_input(input_path)?;
    let row = input.row(line)?;
    let params = PortalParams::from_line(&row.raw, index_col)?;
    let base = DarkPortalModel::new(params, cfg.transport.sm.clone())?;
    let base_scale = cfg.transport.sm.vev0;

    let mut out = OutputWriter::create(output_path)?;
    let mut legend = input.legend_fields();
    legend.push("mu_factor".into());
    legend.push("mu".into());
    legend.push("T_c".into());
    legend.push("v_c".into());
    legend.push("omega_c/T_c".into());
    legend.extend(model.vev_legend());
    legend.push("status".into());
    legend.push("vw".into());
    legend.push("L_W".into());
    legend.extend(PHASE_COLUMNS.iter().map(|s| s.to_string()));
    legend.push("eta".into());
    out.write_record(&legend)?;

    let mut scan_opts = cfg.scan.clone();
    scan_opts.minimize.seed = derive_substream_seed(cfg.seed, line as u64);

    let mut written = 0usize;
    for step in 0..steps {
        let mu_factor = 0.5 + step as f64 / steps as f64;
        let rescaled = base.with_scale(mu_factor * base_scale)?;
        let report = find_transition(&rescaled, &scan_opts)?;
        let point = &report.point;
        if !point.is_found() {
            continue;
        }

        let eta = calc_eta(
            cfg.vw,
            &point.broken_vev,
            &point.symmetric_vev,
            point.tc,
            &rescaled,
            &cfg.transport,
        )?;

        let mut record = row.fields();
        record.push(fmt_value(mu_factor));
        record.push(fmt_value(mu_factor * base_scale));
        record.push(fmt_value(point.tc));
        record.push(fmt_value(point.vc));
        record.push(fmt_value(point.vc / point.tc));
        for coord in point.broken_vev.coords() {
            record.push(fmt_value(*coord));
        }
        record.push(point.status.as_str().to_string());
        record.push(fmt_value(cfg.vw));
        record.push(fmt_value(eta.wall_width));
        for key in PHASE_COLUMNS {
            record.push(fmt_value(eta.phases.get(key).copied().unwrap_or(f64::NAN)));
        }
        record.push(fmt_value(eta.eta));
        out.write_record(&record)?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
