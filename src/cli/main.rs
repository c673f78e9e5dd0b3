//! CLI binary entry point for flow-migrate

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use flow_migrate::cli::commands::convert::{ConvertArgs, InputSource, handle_convert};
#[cfg(feature = "cli")]
use flow_migrate::cli::config::OutputConfig;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "flow-migrate")]
#[command(about = "Convert a V1 flow document to the V2 schema")]
#[command(version)]
struct Cli {
    /// Source flow JSON file, or '-' for stdin
    source: String,
    /// Destination file (default: stdout)
    destination: Option<PathBuf>,
    /// Indentation width of the output (default: 2, or FLOW_MIGRATE_INDENT)
    #[arg(long)]
    indent: Option<usize>,
    /// Log conversion details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut output_config = OutputConfig::from_env();
    if let Some(indent) = cli.indent {
        output_config.indent = indent;
    }

    let args = ConvertArgs {
        input: InputSource::parse(&cli.source),
        output: cli.destination,
        output_config,
    };

    if let Err(e) = handle_convert(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
