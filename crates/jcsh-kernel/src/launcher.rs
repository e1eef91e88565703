//! Command launching: fork one child and place it in the foreground or
//! background.

use tracing::warn;

use crate::error::ShellResult;
use crate::executor::CommandSpec;
use crate::job::{JobList, JobStatus};
use crate::supervisor::{Supervisor, WaitOutcome};

/// Launch one command.
///
/// A trailing `&` token means "run in background" and is stripped before
/// the argument vector is built. Foreground commands get the terminal for
/// the duration of a stop-reporting wait; the shell reclaims it before
/// returning, whatever the wait reported. Background commands are recorded
/// in the job list immediately, without blocking and without touching
/// terminal ownership.
pub fn launch(
    tokens: &[String],
    jobs: &mut JobList,
    supervisor: &dyn Supervisor,
) -> ShellResult<()> {
    let (tokens, background) = match tokens.last().map(String::as_str) {
        Some("&") => (&tokens[..tokens.len() - 1], true),
        _ => (tokens, false),
    };

    let spec = CommandSpec::parse(tokens)?;
    let name = spec.program().to_string();
    let pid = supervisor.spawn(&spec)?;

    if background {
        // The child's fresh process group cannot read the terminal; it
        // stops itself if it tries.
        jobs.push(name, pid, JobStatus::Background);
        return Ok(());
    }

    if let Err(err) = supervisor.give_terminal_to(pid) {
        warn!(%pid, "failed to put child in the foreground: {err}");
    }
    let outcome = supervisor.wait(pid);
    // Ownership must be back with the shell before the next prompt,
    // whether or not the wait succeeded.
    if let Err(err) = supervisor.reclaim_terminal() {
        warn!("failed to reclaim terminal: {err}");
    }

    if let WaitOutcome::Stopped(_) = outcome? {
        jobs.push(name, pid, JobStatus::Stopped);
    }
    Ok(())
}
