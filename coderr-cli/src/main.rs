//! coderr - build, inspect and classify serialized coded errors.
//!
//! Payloads are the JSON objects produced by `coderr::marshal_json`. Input is
//! read from a file argument or from stdin.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use coderr::{Code, Config, Error, LogConfig, init_logging};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "coderr")]
#[command(author, version, about = "Build, inspect and classify serialized coded errors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a coded error and print its serialized form
    Encode {
        /// Classification code (the error is uncoded when omitted)
        #[arg(short, long)]
        code: Option<String>,

        /// Error message
        #[arg(short, long)]
        message: String,

        /// Message layer to wrap around the error, innermost first
        #[arg(short, long = "wrap", value_name = "TEXT")]
        wraps: Vec<String>,
    },

    /// Decode a serialized error and show its text, code and message
    Inspect {
        /// Payload file (stdin when omitted)
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Decode a serialized error and test it against a code
    ///
    /// Prints "match" and exits 0 when the error carries the code; prints
    /// "no match" and exits 1 otherwise.
    Check {
        /// Code to test for
        #[arg(short, long)]
        code: String,

        /// Payload file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (config, config_errors) = Config::from_env();
    let mut log_config = LogConfig::from_config(&config).with_stderr();
    if config.log_level.is_default() {
        log_config = log_config.with_level("warn");
    }
    if cli.verbose {
        log_config = log_config.with_level("debug");
    }
    let _logging_guards = init_logging(&log_config)?;

    for err in &config_errors {
        warn!("{err}; using default");
    }

    match cli.command {
        Commands::Encode {
            code,
            message,
            wraps,
        } => {
            println!("{}", coderr::marshal_json(&encode(code, message, wraps)));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { file, format } => {
            let err = read_payload(file.as_deref(), config.max_payload_bytes.value)?;
            match format {
                OutputFormat::Text => print!("{}", describe(&err)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&coderr::snapshot(&err))?)
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { code, file } => {
            let err = read_payload(file.as_deref(), config.max_payload_bytes.value)?;
            let target = Code::new(code);
            if coderr::is(&err, &target) {
                println!("match");
                Ok(ExitCode::SUCCESS)
            } else {
                debug!(code = %target, error = %coderr::render(&err), "classification failed");
                println!("no match");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn encode(code: Option<String>, message: String, wraps: Vec<String>) -> Error {
    let err = match code {
        Some(code) => coderr::new_coded(Code::new(code), message),
        None => coderr::new(message),
    };
    wraps.into_iter().fold(err, coderr::wrap)
}

fn read_payload(file: Option<&Path>, max_bytes: u64) -> Result<Error> {
    let reader: Box<dyn Read> = match file {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(std::io::stdin().lock()),
    };
    coderr::unmarshal_json_limited(reader, max_bytes)
        .context("payload exceeds CODERR_MAX_PAYLOAD_BYTES")
}

fn describe(err: &Error) -> String {
    let code = coderr::as_coded(err)
        .map(|coded| coded.code().to_string())
        .unwrap_or_default();
    let message = coderr::as_coded(err)
        .map(|coded| coded.message().to_string())
        .unwrap_or_else(|| coderr::cause(err).to_string());

    format!(
        "text:    {}\ncode:    {}\nmessage: {}\n",
        coderr::render(err),
        code,
        message
    )
}
