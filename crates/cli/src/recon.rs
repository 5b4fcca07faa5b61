//! `idflags run|classify|validate` — load a feed, classify, write both tables.

use std::path::{Path, PathBuf};

use idflags_recon::config::{parse_delimiter, ResolvedPaths};
use idflags_recon::io::{
    load_csv_records, read_file_as_utf8, write_conflicts_file, write_non_conflicts_file,
};
use idflags_recon::{ReconConfig, ReconError, ReconResult};

use crate::exit_codes::{recon_exit_code, EXIT_CONFLICTS_FOUND, EXIT_IO, EXIT_USAGE};
use crate::CliError;

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumns { .. } => Some(
                "input needs columns: empid, login_id, emp_type, deleted_flag, status".to_string(),
            ),
            ReconError::InvalidDeletedFlag { .. } => {
                Some("deleted_flag accepts only \"Y\" (deleted) or \"N\" (active)".to_string())
            }
            _ => None,
        };
        CliError { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

/// Output switches shared by `run` and `classify`.
pub struct RunOptions {
    pub json: bool,
    pub fail_on_conflict: bool,
}

pub fn cmd_run(config_path: PathBuf, opts: RunOptions) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let paths = config.resolve(base_dir);
    let delimiter = config.delimiter()?;

    execute(Some(&config.name), &paths, delimiter, &opts)
}

pub fn cmd_classify(
    input: PathBuf,
    conflicts: PathBuf,
    non_conflicts: PathBuf,
    report: Option<PathBuf>,
    delimiter: char,
    opts: RunOptions,
) -> Result<(), CliError> {
    if conflicts == non_conflicts {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "--conflicts and --non-conflicts must be different files".into(),
            hint: None,
        });
    }
    if report.as_ref().is_some_and(|r| *r == conflicts || *r == non_conflicts) {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "--report must not point at --conflicts or --non-conflicts".into(),
            hint: None,
        });
    }
    let delimiter = parse_delimiter(&delimiter.to_string())
        .map_err(|e| CliError { code: EXIT_USAGE, message: e.to_string(), hint: None })?;

    let paths = ResolvedPaths { input, conflicts, non_conflicts, report };
    execute(None, &paths, delimiter, &opts)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "valid: '{}' reads {}, writes {} and {}",
        config.name, config.input.file, config.output.conflicts, config.output.non_conflicts,
    );
    Ok(())
}

fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| CliError {
        code: EXIT_IO,
        message: format!("cannot read config {}: {e}", config_path.display()),
        hint: None,
    })?;
    Ok(ReconConfig::from_toml(&config_str)?)
}

fn execute(
    config_name: Option<&str>,
    paths: &ResolvedPaths,
    delimiter: u8,
    opts: &RunOptions,
) -> Result<(), CliError> {
    let text = read_file_as_utf8(&paths.input)?;
    let records = load_csv_records(&text, delimiter)?;
    let result = idflags_recon::engine::run_named(config_name, &records)?;

    write_conflicts_file(&paths.conflicts, &result.tables.conflicts)?;
    write_non_conflicts_file(&paths.non_conflicts, &result.tables.non_conflicts)?;
    eprintln!("wrote {}", paths.conflicts.display());
    eprintln!("wrote {}", paths.non_conflicts.display());

    if paths.report.is_some() || opts.json {
        let json_str = serde_json::to_string_pretty(&result).map_err(|e| CliError {
            code: EXIT_IO,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;

        if let Some(ref path) = paths.report {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| CliError {
                    code: EXIT_IO,
                    message: format!("cannot create {}: {e}", parent.display()),
                    hint: None,
                })?;
            }
            std::fs::write(path, &json_str).map_err(|e| CliError {
                code: EXIT_IO,
                message: format!("cannot write {}: {e}", path.display()),
                hint: None,
            })?;
            eprintln!("wrote {}", path.display());
        }

        if opts.json {
            println!("{json_str}");
        }
    }

    print_summary(&result);

    if opts.fail_on_conflict && result.summary.conflicts > 0 {
        return Err(CliError {
            code: EXIT_CONFLICTS_FOUND,
            message: format!("{} conflict(s) found", result.summary.conflicts),
            hint: None,
        });
    }

    Ok(())
}

fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "{} record(s) in {} group(s): {} conflict(s), {} excluded",
        s.total_records, s.total_groups, s.conflicts, s.non_conflicts,
    );
    for (reason, count) in &s.reason_counts {
        eprintln!("  {reason}: {count}");
    }
}
