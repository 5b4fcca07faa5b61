//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Success                                                    |
//! | 1    | Conflicts found (only with `--fail-on-conflict`)           |
//! | 2    | CLI usage error (bad args)                                 |
//! | 3    | Invalid config                                             |
//! | 4    | Input schema error (missing required columns, bad CSV)     |
//! | 5    | Invariant violation (bad deleted_flag, impossible routing) |
//! | 6    | IO error (unreadable input, unwritable output)             |

use idflags_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Valid conflicts were found and `--fail-on-conflict` was given.
/// Like `diff(1)`, exit 1 means "something to look at."
pub const EXIT_CONFLICTS_FOUND: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input is missing required columns or is not well-formed CSV.
pub const EXIT_SCHEMA: u8 = 4;

/// Data violated an engine invariant. Treat as a defect in the feed.
pub const EXIT_INVARIANT: u8 = 5;

/// Cannot read input or write output.
pub const EXIT_IO: u8 = 6;

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingColumns { .. } | ReconError::Csv(_) => EXIT_SCHEMA,
        ReconError::InvalidDeletedFlag { .. } | ReconError::Invariant(_) => EXIT_INVARIANT,
        ReconError::Io(_) => EXIT_IO,
    }
}
