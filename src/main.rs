//! Main binary entry point for sbom-normalizer.

use clap::Parser;
use sbom_normalizer::Config;
use sbom_normalizer::errors::ConverterError;
use sbom_normalizer::formats::Format;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Output file (defaults to stdout)"
    )]
    output: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_enum,
        help = "Input syntax (detected from content and extension when omitted)"
    )]
    format: Option<Format>,

    #[arg(
        long,
        help = "Empty hashes, external references, evidence and properties of each component"
    )]
    trim: bool,

    #[arg(long, help = "Write the list of component purls instead of the BOM")]
    purls: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter_level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter(None, filter_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_app() -> Result<(), ConverterError> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = Config {
        input_file: cli.input,
        output_file: cli.output,
        input_format: cli.format,
        trim: cli.trim,
        purls_only: cli.purls,
    };

    sbom_normalizer::run(config)
}

fn main() -> ExitCode {
    match run_app() {
        Ok(_) => {
            log::info!("Normalization completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("A fatal error occurred:");
            log::error!("{}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(s) = source {
                log::error!("  Caused by: {}", s);
                source = std::error::Error::source(s);
            }
            ExitCode::FAILURE
        }
    }
}
