use std::path::Path;

use ewbg_core::EwbgError;
use ewbg_models::ModelId;
use ewbg_scan::batch::run_batch;
use ewbg_scan::config::RunConfig;
use ewbg_scan::io::{read_input, OutputWriter};

/// Executes the batch scan command.
#[allow(clippy::too_many_arguments)]
pub fn run(
    model: ModelId,
    input_path: &Path,
    output_path: &Path,
    first_line: usize,
    last_line: Option<usize>,
    index_col: bool,
    cfg: &RunConfig,
) -> Result<usize, EwbgError> {
    let input = read_input(input_path)?;
    let last = last_line.unwrap_or_else(|| {
        input
            .rows
            .last()
            .map(|row| row.line_number)
            .unwrap_or(first_line)
    });
    let mut out = OutputWriter::create(output_path)?;
    run_batch(model, &input, first_line, last, index_col, cfg, &mut out)
}
