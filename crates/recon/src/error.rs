use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty path, colliding outputs, bad delimiter).
    ConfigValidation(String),
    /// One or more required input columns are absent from the header row.
    MissingColumns { columns: Vec<String> },
    /// A `deleted_flag` value outside `Y` / `N`. `line` is the 1-based CSV line.
    InvalidDeletedFlag { line: u64, value: String },
    /// A predicate combination the classifier can never produce.
    Invariant(String),
    /// Malformed CSV (ragged rows, bad quoting, etc.).
    Csv(String),
    /// IO error (file read/write).
    Io(String),
}

impl ReconError {
    /// True for errors that indicate a defect rather than bad user input.
    pub fn is_invariant(&self) -> bool {
        matches!(self, Self::InvalidDeletedFlag { .. } | Self::Invariant(_))
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumns { columns } => {
                write!(f, "missing required column(s): {}", columns.join(", "))
            }
            Self::InvalidDeletedFlag { line, value } => {
                write!(f, "line {line}: deleted_flag must be \"Y\" or \"N\", got \"{value}\"")
            }
            Self::Invariant(msg) => write!(f, "internal invariant violated: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<csv::Error> for ReconError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            Self::Io(e.to_string())
        } else {
            Self::Csv(e.to_string())
        }
    }
}

impl From<std::io::Error> for ReconError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
