//! Domain-specific error types for ansible-provisioner.
//!
//! `ProvisionerError` covers infrastructure failures only: a manifest that
//! cannot be read or parsed, a filesystem check that failed for a reason
//! other than "not found", or a guest filesystem that is not reachable.
//! Problems with the provisioner configuration itself are never errors; they
//! are collected as [`Diagnostic`](crate::validation::Diagnostic)s.
//!
//! `ProvisionerError` implements `Into<anyhow::Error>`, so the `?` operator
//! converts it automatically in the CLI layer.

use std::io;

/// Formats an IO error kind into a human-readable message.
///
/// Provides consistent messages for common IO error kinds
/// (e.g., "I/O error: not found") instead of the OS-level messages
/// (e.g., "No such file or directory (os error 2)"). Unrecognized kinds
/// fall back to the OS-level message.
pub(crate) fn io_error_kind_message(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "I/O error: not found".to_string(),
        io::ErrorKind::PermissionDenied => "I/O error: permission denied".to_string(),
        io::ErrorKind::IsADirectory => "I/O error: is a directory".to_string(),
        _ => format!("I/O error: {}", err),
    }
}

/// Domain-specific error type for ansible-provisioner.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProvisionerError {
    /// Validation produced diagnostics and the caller asked for a hard failure.
    #[error("validation error: {0}")]
    Validation(String),

    /// A manifest could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The guest filesystem cannot be inspected.
    #[error("guest error: {0}")]
    Guest(String),

    /// An I/O operation failed with contextual information.
    #[error("{context}: {message}")]
    Io {
        /// What was being done when the error occurred, usually including a path.
        context: String,
        /// Description derived from [`io_error_kind_message`].
        message: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ProvisionerError {
    /// Creates an `Io` variant with the `message` field derived from `source`.
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: io_error_kind_message(&source),
            source,
        }
    }
}
