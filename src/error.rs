//! Crate-wide error handling
//!
//! Only failures that the caller has to act on live here. Missing archive pages, malformed
//! URLs inside documents and absent mirror files are all resolved locally and never become
//! errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::env::EnvError;

/// Errors surfaced by the rehosting engine
#[derive(Error, Debug)]
pub enum RehostError {
    /// A resolved archive file could not be read
    #[error("failed to read archive file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unreadable site configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid environment override
    #[error(transparent)]
    Env(#[from] EnvError),
}

impl RehostError {
    /// Wraps an I/O error together with the file it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RehostError::Io {
            path: path.into(),
            source,
        }
    }

    /// Archive read failures are the only errors a request can produce
    pub fn is_archive_failure(&self) -> bool {
        matches!(self, RehostError::Io { .. })
    }
}

pub type RehostResult<T> = Result<T, RehostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = RehostError::io(
            "/srv/legacy/index.html",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("/srv/legacy/index.html"));
        assert!(message.contains("denied"));
        assert!(err.is_archive_failure());
    }

    #[test]
    fn test_env_error_is_transparent() {
        let err: RehostError = EnvError {
            variable: "REHOST_LOG_LEVEL".to_string(),
            message: "Invalid log level 'loud'".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Environment variable 'REHOST_LOG_LEVEL': Invalid log level 'loud'"
        );
        assert!(!err.is_archive_failure());
    }
}
