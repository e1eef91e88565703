//! Process supervision: the narrow OS seam for job control.
//!
//! The [`Supervisor`] trait covers exactly the capabilities the launcher
//! and the job-control state machine need — spawn, terminal-ownership
//! transfer, continue-signal delivery, and a stop-reporting wait — so both
//! can be exercised against a scripted fake in unit tests while
//! [`OsSupervisor`] backs the real shell.

#[cfg(test)]
pub mod testing;

use std::process;

use nix::libc::STDIN_FILENO;
use nix::sys::signal::{killpg, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, getpgrp, setpgid, tcsetpgrp, ForkResult, Pid};

use crate::error::{ShellError, ShellResult};
use crate::executor::{exec_child, CommandSpec};

/// Result of a stop-reporting wait on one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Child exited with the given status code.
    Exited(i32),
    /// Child was terminated by a signal.
    Signaled(Signal),
    /// Child was stopped by a job-control signal.
    Stopped(Signal),
}

/// OS capabilities needed by the launcher and job control.
pub trait Supervisor {
    /// Fork one child that executes `spec` and never returns to shell
    /// logic. Returns the child's pid, which is also its process-group id.
    fn spawn(&self, spec: &CommandSpec) -> ShellResult<Pid>;

    /// Make `pgid` the terminal's foreground process group.
    fn give_terminal_to(&self, pgid: Pid) -> ShellResult<()>;

    /// Restore the shell's own process group as the terminal's foreground
    /// group. Must succeed before the next prompt is issued.
    fn reclaim_terminal(&self) -> ShellResult<()>;

    /// Deliver a continue signal to the job's process group.
    fn resume(&self, pgid: Pid) -> ShellResult<()>;

    /// Block until `pid` exits, is killed, or stops.
    fn wait(&self, pid: Pid) -> ShellResult<WaitOutcome>;
}

/// Supervisor backed by the real OS process model.
#[derive(Debug, Default)]
pub struct OsSupervisor;

impl OsSupervisor {
    pub fn new() -> Self {
        Self
    }
}

impl Supervisor for OsSupervisor {
    fn spawn(&self, spec: &CommandSpec) -> ShellResult<Pid> {
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                let err = exec_child(spec);
                eprintln!("jcsh: {err}");
                let code = match err {
                    ShellError::Exec { .. } => 127,
                    _ => 1,
                };
                process::exit(code);
            }
            Ok(ForkResult::Parent { child }) => {
                // Also set the child's group from this side; EACCES after
                // the child has already exec'd is the expected race.
                let _ = setpgid(child, child);
                Ok(child)
            }
            Err(errno) => Err(ShellError::Fork(errno)),
        }
    }

    fn give_terminal_to(&self, pgid: Pid) -> ShellResult<()> {
        tcsetpgrp(STDIN_FILENO, pgid).map_err(ShellError::Terminal)
    }

    fn reclaim_terminal(&self) -> ShellResult<()> {
        tcsetpgrp(STDIN_FILENO, getpgrp()).map_err(ShellError::Terminal)
    }

    fn resume(&self, pgid: Pid) -> ShellResult<()> {
        killpg(pgid, Signal::SIGCONT).map_err(ShellError::Signal)
    }

    fn wait(&self, pid: Pid) -> ShellResult<WaitOutcome> {
        loop {
            match waitpid(pid, Some(WaitPidFlag::WUNTRACED)).map_err(ShellError::Wait)? {
                WaitStatus::Exited(_, code) => return Ok(WaitOutcome::Exited(code)),
                WaitStatus::Signaled(_, signal, _) => return Ok(WaitOutcome::Signaled(signal)),
                WaitStatus::Stopped(_, signal) => return Ok(WaitOutcome::Stopped(signal)),
                // Not requested by our wait flags; keep waiting.
                _ => continue,
            }
        }
    }
}

/// Ignore the terminal-access stop signals in the shell itself.
///
/// Called once at startup. Children reset these to default before exec
/// (see [`crate::executor`]), so a backgrounded child touching the
/// terminal stops normally while the shell itself never does.
pub fn ignore_job_control_signals() -> ShellResult<()> {
    let action = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::all());
    for signal in [Signal::SIGTTIN, Signal::SIGTTOU] {
        unsafe { sigaction(signal, &action) }.map_err(ShellError::Signal)?;
    }
    Ok(())
}
