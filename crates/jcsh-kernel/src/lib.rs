//! jcsh-kernel: the job-control and execution engine of jcsh.
//!
//! This crate provides:
//!
//! - **JobList**: ordered tracking of background/stopped jobs, addressed
//!   by dense positional indices
//! - **Executor**: redirection resolution and child-side process-image
//!   replacement
//! - **Launcher**: fork plus foreground/background placement with
//!   terminal-ownership arbitration
//! - **JobControl**: `fg`/`bg`/`wait-for`/`wait-all` as state transitions
//!   over the job list
//! - **Supervisor**: the narrow OS seam (spawn, continue signal,
//!   stop-reporting wait, terminal foreground group) behind a trait so the
//!   state machine is testable against a fake
//!
//! The shell is a single thread of control; all concurrency comes from OS
//! child processes. The engine blocks only inside explicit waits, and the
//! invariant "the shell owns the terminal whenever no foreground wait is
//! in progress" holds before and after every operation here.

pub mod control;
pub mod error;
pub mod executor;
pub mod job;
pub mod launcher;
pub mod supervisor;

pub use error::{ShellError, ShellResult};
pub use executor::{CommandSpec, OutputRedirect};
pub use job::{Job, JobList, JobStatus};
pub use launcher::launch;
pub use supervisor::{ignore_job_control_signals, OsSupervisor, Supervisor, WaitOutcome};
