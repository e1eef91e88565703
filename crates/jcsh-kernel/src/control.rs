//! The job-control state machine: `fg`, `bg`, `wait-for`, and `wait-all`
//! as transitions over [`JobList`] entries.
//!
//! Every operation treats an out-of-range index as a reported, recoverable
//! error with no partial mutation, and a failing OS call aborts only that
//! one operation.

use tracing::warn;

use crate::error::{ShellError, ShellResult};
use crate::job::{JobList, JobStatus};
use crate::supervisor::{Supervisor, WaitOutcome};

/// Resume the job at `index` in the foreground and wait for it.
///
/// An exit or signal-termination removes the job; a re-stop leaves it
/// tracked as `Stopped`. The shell reclaims the terminal before returning,
/// including on the wait-error path.
pub fn foreground(
    index: usize,
    jobs: &mut JobList,
    supervisor: &dyn Supervisor,
) -> ShellResult<()> {
    let pid = jobs.get(index).ok_or(ShellError::Index(index))?.pid;

    supervisor.give_terminal_to(pid)?;
    if let Err(err) = supervisor.resume(pid) {
        reclaim(supervisor);
        return Err(err);
    }

    let outcome = supervisor.wait(pid);
    reclaim(supervisor);

    match outcome? {
        WaitOutcome::Exited(_) | WaitOutcome::Signaled(_) => {
            jobs.remove(index);
        }
        WaitOutcome::Stopped(_) => {}
    }
    Ok(())
}

/// Resume the job at `index` in the background.
///
/// Sets the status to `Background` and delivers a continue signal; does
/// not block and does not touch terminal ownership. Idempotent on a job
/// already in the background.
pub fn background(
    index: usize,
    jobs: &mut JobList,
    supervisor: &dyn Supervisor,
) -> ShellResult<()> {
    let job = jobs.get_mut(index).ok_or(ShellError::Index(index))?;
    job.status = JobStatus::Background;
    supervisor.resume(job.pid)
}

/// Block until the background job at `index` exits.
///
/// Only valid on a `Background` job: waiting on a stopped job would block
/// forever, so that is rejected up front without blocking. A stop during
/// the wait transitions the job to `Stopped` in place; an exit or
/// signal-termination removes it.
pub fn wait_for(index: usize, jobs: &mut JobList, supervisor: &dyn Supervisor) -> ShellResult<()> {
    let job = jobs.get(index).ok_or(ShellError::Index(index))?;
    if job.status == JobStatus::Stopped {
        return Err(ShellError::State(format!(
            "job {index} is stopped, not in the background; resume it first"
        )));
    }

    match supervisor.wait(job.pid)? {
        WaitOutcome::Exited(_) | WaitOutcome::Signaled(_) => {
            jobs.remove(index);
        }
        WaitOutcome::Stopped(_) => {
            if let Some(job) = jobs.get_mut(index) {
                job.status = JobStatus::Stopped;
            }
        }
    }
    Ok(())
}

/// Wait on every background job in insertion order.
///
/// Jobs that stop during their wait transition to `Stopped` in place;
/// afterwards every job still `Background` (it exited or was killed during
/// the wait) is purged in one bulk pass. Per-job wait failures are
/// reported and do not stop the scan. May block for as long as the slowest
/// background job runs.
pub fn wait_all(jobs: &mut JobList, supervisor: &dyn Supervisor) {
    for index in 0..jobs.len() {
        let job = match jobs.get(index) {
            Some(job) if job.status == JobStatus::Background => job,
            _ => continue,
        };
        match supervisor.wait(job.pid) {
            Ok(WaitOutcome::Stopped(_)) => {
                if let Some(job) = jobs.get_mut(index) {
                    job.status = JobStatus::Stopped;
                }
            }
            Ok(_) => {}
            Err(err) => warn!(job = index, "wait-all: {err}"),
        }
    }
    jobs.remove_by_status(JobStatus::Background);
}

fn reclaim(supervisor: &dyn Supervisor) {
    if let Err(err) = supervisor.reclaim_terminal() {
        warn!("failed to reclaim terminal: {err}");
    }
}
