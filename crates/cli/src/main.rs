// idflags CLI - deleted-flag conflict reconciliation for identity feeds

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::EXIT_SUCCESS;
use recon::RunOptions;

#[derive(Parser)]
#[command(name = "idflags")]
#[command(about = "Find identity records whose deleted flags disagree while still Active/Leave")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a classification described by a TOML config file
    #[command(after_help = "\
Examples:
  idflags run nightly.recon.toml
  idflags run nightly.recon.toml --json
  idflags run nightly.recon.toml --fail-on-conflict")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Exit 1 when any valid conflict is found
        #[arg(long)]
        fail_on_conflict: bool,
    },

    /// Classify a single CSV without a config file
    #[command(after_help = "\
Examples:
  idflags classify records.csv --conflicts conflicts.csv --non-conflicts other.csv
  idflags classify records.tsv --delimiter '\\t' --conflicts c.csv --non-conflicts n.csv")]
    Classify {
        /// Input CSV with empid, login_id, emp_type, deleted_flag, status
        input: PathBuf,

        /// Where to write the conflict table
        #[arg(long)]
        conflicts: PathBuf,

        /// Where to write the non-conflict table
        #[arg(long)]
        non_conflicts: PathBuf,

        /// Also write the JSON report here
        #[arg(long)]
        report: Option<PathBuf>,

        /// Input field delimiter
        #[arg(long, default_value = ",", value_parser = parse_delimiter_arg)]
        delimiter: char,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Exit 1 when any valid conflict is found
        #[arg(long)]
        fail_on_conflict: bool,
    },

    /// Validate a config file without running it
    #[command(after_help = "\
Examples:
  idflags validate nightly.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

/// Accepts a literal character or the `\t` escape.
fn parse_delimiter_arg(s: &str) -> Result<char, String> {
    if s == "\\t" {
        return Ok('\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character, got {s:?}")),
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  idflags-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Diagnostics go to stderr, filtered by RUST_LOG (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: idflags <command> [options]");
            eprintln!("       idflags --help for more information");
            Ok(())
        }
        Some(Commands::Run { config, json, fail_on_conflict }) => {
            recon::cmd_run(config, RunOptions { json, fail_on_conflict })
        }
        Some(Commands::Classify {
            input,
            conflicts,
            non_conflicts,
            report,
            delimiter,
            json,
            fail_on_conflict,
        }) => recon::cmd_classify(
            input,
            conflicts,
            non_conflicts,
            report,
            delimiter,
            RunOptions { json, fail_on_conflict },
        ),
        Some(Commands::Validate { config }) => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
