//! Delimited input/output handling: legend-first input files and
//! tab-separated output rows that echo the input columns.

use std::fs::{self, File};
use std::path::Path;

use csv::WriterBuilder;

use ewbg_core::{ErrorInfo, EwbgError};

/// One data row of the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    /// 1-based line number in the file; the legend is line 1.
    pub line_number: usize,
    /// Raw row content.
    pub raw: String,
}

impl InputRow {
    /// Whitespace-delimited fields of the row.
    pub fn fields(&self) -> Vec<String> {
        self.raw.split_whitespace().map(String::from).collect()
    }
}

/// A parsed input file: the legend plus every non-empty data row.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFile {
    /// First line of the file.
    pub legend: String,
    /// Data rows in file order.
    pub rows: Vec<InputRow>,
}

impl InputFile {
    /// Legend column labels.
    pub fn legend_fields(&self) -> Vec<String> {
        self.legend.split_whitespace().map(String::from).collect()
    }

    /// Returns the row with the given 1-based line number.
    pub fn row(&self, line_number: usize) -> Result<&InputRow, EwbgError> {
        self.rows
            .iter()
            .find(|row| row.line_number == line_number)
            .ok_or_else(|| {
                EwbgError::Input(
                    ErrorInfo::new("input_line_missing", "requested line is not in the file")
                        .with_context("line", line_number.to_string())
                        .with_hint("line counting starts at 1 and line 1 is the legend"),
                )
            })
    }

    /// Rows within an inclusive 1-based line range.
    pub fn rows_in(&self, first: usize, last: usize) -> Vec<&InputRow> {
        self.rows
            .iter()
            .filter(|row| row.line_number >= first && row.line_number <= last)
            .collect()
    }
}

/// Reads a legend-first delimited input file.
pub fn read_input(path: &Path) -> Result<InputFile, EwbgError> {
    let raw = fs::read_to_string(path).map_err(|err| {
        EwbgError::Input(
            ErrorInfo::new("input_missing", "cannot read input file")
                .with_context("path", path.display().to_string())
                .with_context("cause", err.to_string()),
        )
    })?;
    let mut lines = raw.lines();
    let legend = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or_else(|| {
            EwbgError::Input(
                ErrorInfo::new("input_empty", "input file has no legend row")
                    .with_context("path", path.display().to_string()),
            )
        })?
        .to_string();

    let rows = lines
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| InputRow {
            // Legend is line 1, so data starts at 2.
            line_number: idx + 2,
            raw: line.to_string(),
        })
        .collect();
    Ok(InputFile { legend, rows })
}

/// Tab-separated output writer.
pub struct OutputWriter {
    inner: csv::Writer<File>,
}

impl OutputWriter {
    /// Creates the output file, truncating any existing content.
    pub fn create(path: &Path) -> Result<Self, EwbgError> {
        let file = File::create(path).map_err(|err| {
            EwbgError::Input(
                ErrorInfo::new("output_create", "cannot create output file")
                    .with_context("path", path.display().to_string())
                    .with_context("cause", err.to_string()),
            )
        })?;
        let inner = WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_writer(file);
        Ok(Self { inner })
    }

    /// Writes one record.
    pub fn write_record(&mut self, fields: &[String]) -> Result<(), EwbgError> {
        self.inner.write_record(fields).map_err(|err| {
            EwbgError::Input(
                ErrorInfo::new("output_write", "cannot write output record")
                    .with_context("cause", err.to_string()),
            )
        })
    }

    /// Flushes buffered records to disk.
    pub fn flush(&mut self) -> Result<(), EwbgError> {
        self.inner.flush().map_err(|err| {
            EwbgError::Input(
                ErrorInfo::new("output_flush", "cannot flush output file")
                    .with_context("cause", err.to_string()),
            )
        })
    }
}

/// Canonical numeric formatting of output columns; NaN renders as `nan`.
pub fn fmt_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.8e}")
    }
}
