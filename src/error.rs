use std::path::PathBuf;
use thiserror::Error;

/// Problems with the user's inputs that end a run early without being fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("path '{}' not found", .0.display())]
    MissingPath(PathBuf),

    #[error("could not detect the roster delimiter (expected ',' or ';'), pass one with --delimiter")]
    AmbiguousDelimiter,

    #[error("invalid delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(String),

    #[error("no 'Name' column found. Headers are: {}", .0.join(", "))]
    MissingNameColumn(Vec<String>),

    #[error("roster has no header row")]
    EmptyRoster,
}

/// Split a command result into a soft configuration failure (reported, run
/// ends normally) and everything else (propagated as fatal).
pub fn soft_fail<T>(result: anyhow::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match err.downcast::<ConfigError>() {
            Ok(config) => {
                eprintln!("Error: {}", config);
                Ok(None)
            }
            Err(other) => Err(other),
        },
    }
}
