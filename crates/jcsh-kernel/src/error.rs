//! Error types for the job-control engine.
//!
//! Every error here is recoverable at the shell-loop boundary: the REPL
//! prints a diagnostic and returns to the prompt. Nothing in this enum
//! terminates the shell process.

use nix::errno::Errno;
use thiserror::Error;

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Job-control and execution errors.
#[derive(Debug, Clone, Error)]
pub enum ShellError {
    #[error("fork failed: {0}")]
    Fork(#[source] Errno),

    #[error("failed to execute {program}: {source}")]
    Exec { program: String, source: Errno },

    #[error("cannot open {path}: {source}")]
    File { path: String, source: Errno },

    #[error("redirection operator `{0}` is missing a filename")]
    Redirect(String),

    #[error("no job at index {0}")]
    Index(usize),

    #[error("{0}")]
    State(String),

    #[error("terminal ownership transfer failed: {0}")]
    Terminal(#[source] Errno),

    #[error("failed to create process group: {0}")]
    ProcessGroup(#[source] Errno),

    #[error("wait failed: {0}")]
    Wait(#[source] Errno),

    #[error("signal delivery failed: {0}")]
    Signal(#[source] Errno),

    #[error("empty command")]
    Empty,
}
