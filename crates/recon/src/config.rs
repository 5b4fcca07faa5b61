use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    pub name: String,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub file: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub conflicts: String,
    pub non_conflicts: String,
    #[serde(default)]
    pub report: Option<String>,
}

fn default_delimiter() -> String {
    ",".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.input.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("input.file must not be empty".into()));
        }
        if self.output.conflicts.trim().is_empty() {
            return Err(ReconError::ConfigValidation("output.conflicts must not be empty".into()));
        }
        if self.output.non_conflicts.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "output.non_conflicts must not be empty".into(),
            ));
        }
        if self.output.conflicts == self.output.non_conflicts {
            return Err(ReconError::ConfigValidation(format!(
                "output.conflicts and output.non_conflicts both point at '{}'",
                self.output.conflicts
            )));
        }
        if let Some(report) = &self.output.report {
            if *report == self.output.conflicts || *report == self.output.non_conflicts {
                return Err(ReconError::ConfigValidation(format!(
                    "output.report '{report}' would overwrite an output table"
                )));
            }
        }
        parse_delimiter(&self.input.delimiter)?;
        Ok(())
    }

    /// Input delimiter as a byte. Validated on load.
    pub fn delimiter(&self) -> Result<u8, ReconError> {
        parse_delimiter(&self.input.delimiter)
    }

    /// Resolve every configured path against `base_dir` (the config file's directory).
    pub fn resolve(&self, base_dir: &Path) -> ResolvedPaths {
        ResolvedPaths {
            input: base_dir.join(&self.input.file),
            conflicts: base_dir.join(&self.output.conflicts),
            non_conflicts: base_dir.join(&self.output.non_conflicts),
            report: self.output.report.as_ref().map(|r| base_dir.join(r)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub input: PathBuf,
    pub conflicts: PathBuf,
    pub non_conflicts: PathBuf,
    pub report: Option<PathBuf>,
}

/// A delimiter must be exactly one ASCII character.
pub fn parse_delimiter(s: &str) -> Result<u8, ReconError> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(ReconError::ConfigValidation(format!(
            "delimiter must be a single ASCII character, got {s:?}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
