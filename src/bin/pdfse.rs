//! pdfse - Separate spot colors of a PDF into their own files
//!
//! Usage:
//!   pdfse input.pdf [-d|--debug] <colorant> [<colorant> ...]
//!
//! Writes `input.<colorant>.pdf` for every colorant found in the document
//! and `input.remaining.pdf` with those colorants removed.

use clap::{ArgAction, CommandFactory, Parser};
use pdf_spots::{ExtractorConfig, SpotExtractor};
use std::path::PathBuf;
use std::process::ExitCode;

/// Separate spot colors (Separation colorants) of a PDF into their own files.
#[derive(Parser, Debug)]
#[command(name = "pdfse")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PDF file
    input: Option<PathBuf>,

    /// Colorant names to extract, e.g. "PANTONE 123 C" (case-insensitive)
    colorants: Vec<String>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Write output files to this directory instead of beside the input
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Keep the names of unwanted Separation colorants
    #[arg(long = "no-neutralize", action = ArgAction::SetTrue)]
    no_neutralize: bool,

    /// Write uncompressed streams
    #[arg(long = "no-compress", action = ArgAction::SetTrue)]
    no_compress: bool,

    /// Rewrite pages one at a time
    #[arg(long, action = ArgAction::SetTrue)]
    sequential: bool,
}

impl Args {
    fn config(&self) -> ExtractorConfig {
        let mut config = ExtractorConfig::new()
            .with_neutralize_separations(!self.no_neutralize)
            .with_compress(!self.no_compress)
            .with_parallel(!self.sequential);
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        config
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let input = match &args.input {
        Some(input) if !args.colorants.is_empty() => input,
        _ => {
            // Nothing to separate
            let _ = Args::command().print_help();
            return ExitCode::SUCCESS;
        },
    };

    let extractor = SpotExtractor::new(args.config());
    match extractor.run(input, &args.colorants) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
