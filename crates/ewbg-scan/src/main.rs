use std::error::Error;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use ewbg_models::ModelId;
use ewbg_scan::config::RunConfig;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "ewbg-scan", about = "Electroweak phase transition and baryogenesis scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a range of parameter rows for a first-order transition and the
    /// resulting baryon asymmetry.
    Scan(ScanArgs),
    /// Recompute one parameter row while varying the renormalization scale.
    Point(PointArgs),
}

#[derive(ClapArgs, Debug)]
struct ScanArgs {
    /// Model receiving the parameter rows.
    #[arg(long)]
    model: String,
    /// Input file; first line is a legend, data starts at line 2.
    #[arg(long)]
    input: PathBuf,
    /// Output file; input columns are echoed with results appended.
    #[arg(long)]
    output: PathBuf,
    /// First data line to process (1-based, legend is line 1).
    #[arg(long, default_value_t = 2)]
    first_line: usize,
    /// Last data line to process; defaults to the end of the file.
    #[arg(long)]
    last_line: Option<usize>,
    /// YAML run configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Wall velocity override.
    #[arg(long)]
    vw: Option<f64>,
    /// Worker thread override.
    #[arg(long)]
    jobs: Option<usize>,
    /// Master seed override.
    #[arg(long)]
    seed: Option<u64>,
    /// Treat the first input column as a row index.
    #[arg(long, default_value_t = false)]
    index_col: bool,
}

#[derive(ClapArgs, Debug)]
struct PointArgs {
    /// Model receiving the parameter row; scale variation needs the
    /// loop-corrected portal model.
    #[arg(long)]
    model: String,
    /// Input file; first line is a legend, data starts at line 2.
    #[arg(long)]
    input: PathBuf,
    /// Output file.
    #[arg(long)]
    output: PathBuf,
    /// Data line to process (1-based, legend is line 1).
    #[arg(long)]
    line: usize,
    /// Number of scale steps across `[0.5, 1.5) x vev`.
    #[arg(long, default_value_t = 10)]
    steps: usize,
    /// YAML run configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Wall velocity override.
    #[arg(long)]
    vw: Option<f64>,
    /// Master seed override.
    #[arg(long)]
    seed: Option<u64>,
    /// Treat the first input column as a row index.
    #[arg(long, default_value_t = false)]
    index_col: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Scan(args) => {
            let model: ModelId = args.model.parse()?;
            let mut cfg = RunConfig::load_or_default(args.config.as_deref())?;
            if let Some(vw) = args.vw {
                cfg.vw = vw;
            }
            if let Some(jobs) = args.jobs {
                cfg.jobs = jobs;
            }
            if let Some(seed) = args.seed {
                cfg.seed = seed;
            }
            let written = commands::scan::run(
                model,
                &args.input,
                &args.output,
                args.first_line,
                args.last_line,
                args.index_col,
                &cfg,
            )?;
            println!("wrote {written} rows to {}", args.output.display());
        }
        Command::Point(args) => {
            let model: ModelId = args.model.parse()?;
            let mut cfg = RunConfig::load_or_default(args.config.as_deref())?;
            if let Some(vw) = args.vw {
                cfg.vw = vw;
            }
            if let Some(seed) = args.seed {
                cfg.seed = seed;
            }
            let written = commands::point::run(
                model,
                &args.input,
                &args.output,
                args.line,
                args.steps,
                args.index_col,
                &cfg,
            )?;
            println!(
                "wrote {written} scale points to {}",
                args.output.display()
            );
        }
    }
    Ok(())
}
