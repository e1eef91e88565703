//! Test doubles for the supervisor seam.

use std::cell::RefCell;
use std::collections::VecDeque;

use nix::errno::Errno;
use nix::unistd::Pid;

use super::{Supervisor, WaitOutcome};
use crate::error::{ShellError, ShellResult};
use crate::executor::CommandSpec;

/// One operation a [`FakeSupervisor`] was asked to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Spawn(String),
    GiveTerminal(Pid),
    ReclaimTerminal,
    Resume(Pid),
    Wait(Pid),
}

/// Scripted supervisor: hands out synthetic pids and replays queued wait
/// outcomes, recording every call for ordering assertions.
pub struct FakeSupervisor {
    next_pid: RefCell<i32>,
    outcomes: RefCell<VecDeque<ShellResult<WaitOutcome>>>,
    calls: RefCell<Vec<Call>>,
    fail_spawn: bool,
    fail_terminal: bool,
}

impl FakeSupervisor {
    pub fn new() -> Self {
        Self {
            next_pid: RefCell::new(1000),
            outcomes: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
            fail_spawn: false,
            fail_terminal: false,
        }
    }

    /// Queue the outcome of the next wait. Unqueued waits report a clean
    /// exit.
    pub fn on_wait(self, outcome: ShellResult<WaitOutcome>) -> Self {
        self.outcomes.borrow_mut().push_back(outcome);
        self
    }

    /// Every spawn fails with EAGAIN.
    pub fn failing_spawn() -> Self {
        Self {
            fail_spawn: true,
            ..Self::new()
        }
    }

    /// Every terminal-ownership transfer fails with ENOTTY.
    pub fn with_failing_terminal(self) -> Self {
        Self {
            fail_terminal: true,
            ..self
        }
    }

    /// Snapshot of the recorded call log.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl Default for FakeSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor for FakeSupervisor {
    fn spawn(&self, spec: &CommandSpec) -> ShellResult<Pid> {
        self.calls
            .borrow_mut()
            .push(Call::Spawn(spec.program().to_string()));
        if self.fail_spawn {
            return Err(ShellError::Fork(Errno::EAGAIN));
        }
        let mut next = self.next_pid.borrow_mut();
        let pid = Pid::from_raw(*next);
        *next += 1;
        Ok(pid)
    }

    fn give_terminal_to(&self, pgid: Pid) -> ShellResult<()> {
        self.calls.borrow_mut().push(Call::GiveTerminal(pgid));
        if self.fail_terminal {
            return Err(ShellError::Terminal(Errno::ENOTTY));
        }
        Ok(())
    }

    fn reclaim_terminal(&self) -> ShellResult<()> {
        self.calls.borrow_mut().push(Call::ReclaimTerminal);
        if self.fail_terminal {
            return Err(ShellError::Terminal(Errno::ENOTTY));
        }
        Ok(())
    }

    fn resume(&self, pgid: Pid) -> ShellResult<()> {
        self.calls.borrow_mut().push(Call::Resume(pgid));
        Ok(())
    }

    fn wait(&self, pid: Pid) -> ShellResult<WaitOutcome> {
        self.calls.borrow_mut().push(Call::Wait(pid));
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(WaitOutcome::Exited(0)))
    }
}
