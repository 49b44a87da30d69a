use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gemspatch::Format;
use tracing_subscriber::EnvFilter;

mod patch;
use patch::{
    convert as patch_convert, formats as patch_formats, info as patch_info, read_input,
    test_roundtrip as patch_test_roundtrip,
};

/// gemspatch command line tools
#[derive(Parser)]
#[command(
    name = "gemspatch",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported formats with their ids and sizes
    Formats,
    /// Show the registers of an instrument file (use '-' for stdin)
    Info {
        /// Input file to read (use '-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Input format; defaults to the file extension, then the file size
        #[arg(long = "format", short = 'f', value_name = "NAME")]
        format: Option<Format>,
    },
    /// Convert an instrument from one format to another
    Convert {
        /// Input file to read (use '-' for stdin)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Output file to write (use '-' for stdout)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
        /// Input format; defaults to the input extension, then its size
        #[arg(long = "from", value_name = "NAME")]
        from: Option<Format>,
        /// Output format; defaults to the output extension
        #[arg(long = "to", value_name = "NAME")]
        to: Option<Format>,
    },
    /// Run import -> export roundtrip test and compare binaries
    Test {
        /// Input file to read (use '-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Input format; defaults to the file extension, then the file size
        #[arg(long = "format", short = 'f', value_name = "NAME")]
        format: Option<Format>,
        /// Print a hexdump of both buffers on mismatch
        #[arg(long = "diag")]
        diag: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Formats => patch_formats(),
        Commands::Info { file, format } => {
            let bytes = read_input(&file)?;
            patch_info(&file, bytes, format)?;
        }
        Commands::Convert {
            input,
            output,
            from,
            to,
        } => {
            let bytes = read_input(&input)?;
            patch_convert(&input, bytes, &output, from, to)?;
        }
        Commands::Test { file, format, diag } => {
            let bytes = read_input(&file)?;
            patch_test_roundtrip(&file, bytes, format, diag)?;
        }
    }

    Ok(())
}
