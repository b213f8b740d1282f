#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hcl_lite::validate::Diagnostic;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Converts between HCL and JSON, formats and validates HCL.
///
/// Every command reads from stdin if no file is given or the file is `-`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse HCL and print the result as JSON.
    ToJson {
        /// Pretty-print the resulting JSON.
        #[arg(short, long)]
        pretty: bool,
        /// File to read HCL from.
        file: Option<PathBuf>,
    },
    /// Convert JSON to HCL.
    ///
    /// Empty JSON objects are written as empty HCL lists.
    FromJson {
        /// File to read JSON from.
        file: Option<PathBuf>,
    },
    /// Check HCL syntax and print all problems found.
    ///
    /// Exits with status 1 if any error is found.
    Validate {
        /// Print diagnostics as a JSON array.
        #[arg(long)]
        json: bool,
        /// File to read HCL from.
        file: Option<PathBuf>,
    },
    /// Parse HCL and print it formatted.
    Fmt {
        /// File to read HCL from.
        file: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("HCL_LITE_LOG"))
        .with_writer(io::stderr)
        .init();

    let mut writer = BufWriter::new(io::stdout());

    let code = match cli.command {
        Command::ToJson { pretty, file } => {
            let input = read_input(file.as_deref())?;
            let json = hcl_lite::json::hcl_to_json(&input, pretty)?;
            writeln!(writer, "{json}")?;
            ExitCode::SUCCESS
        }
        Command::FromJson { file } => {
            let input = read_input(file.as_deref())?;
            writer.write_all(hcl_lite::json::json_to_hcl(&input)?.as_bytes())?;
            ExitCode::SUCCESS
        }
        Command::Validate { json, file } => {
            let input = read_input(file.as_deref())?;
            let diagnostics = hcl_lite::validate(&input);
            write_diagnostics(&mut writer, &diagnostics, json)?;

            if diagnostics.iter().any(Diagnostic::is_error) {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Command::Fmt { file } => {
            let input = read_input(file.as_deref())?;
            let body = hcl_lite::parse_body(&input)?;
            hcl_lite::format::to_writer(&mut writer, &body)?;
            ExitCode::SUCCESS
        }
    };

    writer.flush()?;
    Ok(code)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    let mut input = String::new();

    match file {
        Some(path) if path != Path::new("-") => {
            tracing::debug!(path = %path.display(), "reading input file");
            input = fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
        }
        _ => {
            tracing::debug!("reading input from stdin");
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
        }
    }

    Ok(input)
}

fn write_diagnostics<W: Write>(
    writer: &mut W,
    diagnostics: &[Diagnostic],
    json: bool,
) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *writer, diagnostics)?;
        writeln!(writer)?;
        return Ok(());
    }

    for diagnostic in diagnostics {
        writeln!(writer, "{diagnostic}")?;
    }

    Ok(())
}
