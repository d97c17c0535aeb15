#![deny(missing_docs)]
#![doc = "Batch driver for the EWBG pipeline: delimited input handling, run configuration and the rayon-parallel point loop shared by the CLI commands."]

pub mod batch;
pub mod config;
pub mod io;

pub use batch::{process_row, run_batch, RowOutcome};
pub use config::RunConfig;
pub use io::{read_input, InputFile, InputRow, OutputWriter};
