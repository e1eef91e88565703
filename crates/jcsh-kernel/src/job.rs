//! Job tracking for jcsh.
//!
//! A [`Job`] is one direct child process under shell management; the
//! [`JobList`] owns every record. The user-facing handle for a job is its
//! current position in the list, so indices are always dense `0..len` and
//! every removal renumbers the entries behind it.

use std::fmt;

use nix::unistd::Pid;

/// Lifecycle state of a tracked job.
///
/// A job that exits or is killed by a signal is removed from the list
/// outright; there is no third state for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Running (or runnable) in the background.
    Background,
    /// Stopped by a job-control signal.
    Stopped,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Background => write!(f, "background"),
            JobStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// One child process under shell management.
#[derive(Debug, Clone)]
pub struct Job {
    /// Process id of the child. Also its process-group id: every launched
    /// command is made its own group leader.
    pub pid: Pid,
    /// Display name, the command's program token. Not necessarily unique.
    pub name: String,
    /// Current lifecycle state.
    pub status: JobStatus,
}

/// Ordered collection of jobs, insertion order preserved.
#[derive(Debug, Default)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    /// Create an empty job list.
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Append a job at the tail of the list.
    pub fn push(&mut self, name: impl Into<String>, pid: Pid, status: JobStatus) {
        self.jobs.push(Job {
            pid,
            name: name.into(),
            status,
        });
    }

    /// Look up a job by positional index.
    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    /// Look up a job by positional index, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)
    }

    /// Remove the job at `index`, closing the gap. Subsequent jobs shift
    /// down by one position.
    pub fn remove(&mut self, index: usize) -> Option<Job> {
        if index < self.jobs.len() {
            Some(self.jobs.remove(index))
        } else {
            None
        }
    }

    /// Remove every job whose status equals `status`, preserving the
    /// relative order of the survivors.
    pub fn remove_by_status(&mut self, status: JobStatus) {
        self.jobs.retain(|job| job.status != status);
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no jobs are tracked.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterate jobs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }
}

impl fmt::Display for JobList {
    /// Renders the `jobs` listing: one `<index>: <name> (<status>)` line
    /// per job.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, job) in self.jobs.iter().enumerate() {
            writeln!(f, "{}: {} ({})", index, job.name, job.status)?;
        }
        Ok(())
    }
}
