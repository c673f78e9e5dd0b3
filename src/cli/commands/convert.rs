//! Convert command implementation

use crate::cli::config::OutputConfig;
use crate::cli::error::CliError;
use crate::convert::migrate_document;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::info;

/// Where the V1 document comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// `-` means stdin, anything else is a path
    pub fn parse(input: &str) -> Self {
        if input == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(input))
        }
    }

    fn describe(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "<stdin>".to_string(),
        }
    }
}

/// Arguments for the convert command
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub input: InputSource,
    /// Destination file; stdout when absent
    pub output: Option<PathBuf>,
    pub output_config: OutputConfig,
}

/// Load input content from file or stdin
fn load_input(input: &InputSource) -> Result<String, CliError> {
    match input {
        InputSource::Stdin => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
            Ok(content)
        }
        InputSource::File(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::FileReadError(path.clone(), e.to_string())),
    }
}

/// Render a document as indented JSON with a trailing newline
///
/// Non-ASCII characters are written as-is.
pub fn render_document(document: &Value, config: &OutputConfig) -> Result<String, CliError> {
    let indent = config.indent_unit();
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&indent));
    document
        .serialize(&mut serializer)
        .map_err(|e| CliError::IoError(format!("Failed to serialize flow: {}", e)))?;
    buffer.push(b'\n');

    String::from_utf8(buffer).map_err(|e| CliError::IoError(e.to_string()))
}

/// Convert V1 JSON text to rendered V2 JSON text
pub fn convert_text(content: &str, config: &OutputConfig) -> Result<String, CliError> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| CliError::ParseError(e.to_string()))?;

    let migration = migrate_document(document)?;
    info!(
        report = %serde_json::to_string(&migration.report).unwrap_or_default(),
        "Migration report"
    );

    render_document(&migration.document, config)
}

/// Handle the convert command
pub fn handle_convert(args: &ConvertArgs) -> Result<(), CliError> {
    info!(source = %args.input.describe(), "Converting flow");
    let content = load_input(&args.input)?;
    let rendered = convert_text(&content, &args.output_config)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?;
            eprintln!("Converted {} -> {}", args.input.describe(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| CliError::IoError(format!("Failed to write stdout: {}", e)))?;
        }
    }

    Ok(())
}
