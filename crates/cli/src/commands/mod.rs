//! Command implementations.
//!
//! Every catalog command restores the persisted session first; public
//! commands never touch it. Results go to stdout, logs to stderr.

pub mod categories;
pub mod company;
pub mod plans;
pub mod public;
pub mod session;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use hostdeck_admin::{AdminError, AdminGateway, ConsoleConfig, DeletionConfirmed};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog operation failed.
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An input file is not valid YAML for the expected shape.
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Result output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    /// Result serialization failed.
    #[error("Failed to format output: {0}")]
    Format(String),

    /// A lookup matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A command argument is unusable.
    #[error("Invalid input: {0}")]
    Input(String),

    /// The operator declined a confirmation prompt.
    #[error("Aborted")]
    Aborted,
}

/// Shared state for one CLI invocation.
pub struct Console {
    pub gateway: AdminGateway,
    json: bool,
}

impl Console {
    /// Build the gateway for this invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn connect(config: &ConsoleConfig, json: bool) -> Result<Self, CliError> {
        Ok(Self {
            gateway: AdminGateway::from_config(config)?,
            json,
        })
    }

    /// Restore the persisted session, failing if there is none.
    pub async fn require_session(&self) -> Result<(), CliError> {
        if self.gateway.restore().await {
            Ok(())
        } else {
            Err(AdminError::Unauthenticated.into())
        }
    }

    /// Print a value as YAML, or JSON with `--json`.
    pub fn emit<T: Serialize>(&self, value: &T) -> Result<(), CliError> {
        let rendered = if self.json {
            serde_json::to_string_pretty(value).map_err(|e| CliError::Format(e.to_string()))?
        } else {
            serde_yaml::to_string(value).map_err(|e| CliError::Format(e.to_string()))?
        };
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", rendered.trim_end())?;
        Ok(())
    }

    /// Print one line of plain output.
    pub fn line(&self, text: impl AsRef<str>) -> Result<(), CliError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text.as_ref())?;
        Ok(())
    }

    pub const fn json(&self) -> bool {
        self.json
    }
}

/// Read a YAML file into `T`.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| CliError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Ask before a permanent deletion unless `--yes` was given.
pub fn confirm_deletion(what: &str, assume_yes: bool) -> Result<DeletionConfirmed, CliError> {
    if assume_yes {
        return Ok(DeletionConfirmed::assumed());
    }

    let mut stderr = io::stderr().lock();
    write!(stderr, "Permanently delete {what}? [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    DeletionConfirmed::from_answer(&answer).ok_or(CliError::Aborted)
}
