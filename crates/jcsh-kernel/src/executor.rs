//! Child-side command execution: redirection resolution and image
//! replacement.
//!
//! [`CommandSpec::parse`] is a pure function over the token sequence and is
//! tested directly; [`exec_child`] runs inside the freshly forked child and
//! never returns on success.

use std::ffi::CString;
use std::path::Path;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2, execvp, setpgid, Pid};

use crate::error::{ShellError, ShellResult};

/// Output redirection target: truncate (`>`) or append (`>>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRedirect {
    pub path: String,
    pub append: bool,
}

/// One command, resolved from its token sequence: the argument vector the
/// program will see plus at most one honored input and one honored output
/// redirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program and arguments; excludes every redirection operator and its
    /// filename operand.
    pub argv: Vec<String>,
    /// Input redirection target, if any.
    pub stdin: Option<String>,
    /// Output redirection target, if any.
    pub stdout: Option<OutputRedirect>,
}

impl CommandSpec {
    /// Resolve redirections in a token sequence.
    ///
    /// Each `<`, `>`, or `>>` consumes the following token as a filename.
    /// The first-encountered operator of each kind wins; later ones are
    /// consumed but not honored. The argument vector is cut at the
    /// earliest-occurring redirection operator.
    pub fn parse(tokens: &[String]) -> ShellResult<Self> {
        let mut stdin = None;
        let mut stdout = None;
        let mut cut = tokens.len();

        let mut i = 0;
        while i < tokens.len() {
            let op = tokens[i].as_str();
            match op {
                "<" | ">" | ">>" => {
                    let path = tokens
                        .get(i + 1)
                        .ok_or_else(|| ShellError::Redirect(op.to_string()))?;
                    match op {
                        "<" => {
                            if stdin.is_none() {
                                stdin = Some(path.clone());
                            }
                        }
                        _ => {
                            if stdout.is_none() {
                                stdout = Some(OutputRedirect {
                                    path: path.clone(),
                                    append: op == ">>",
                                });
                            }
                        }
                    }
                    cut = cut.min(i);
                    i += 2;
                }
                _ => i += 1,
            }
        }

        let argv: Vec<String> = tokens[..cut].to_vec();
        if argv.is_empty() {
            return Err(ShellError::Empty);
        }
        Ok(Self {
            argv,
            stdin,
            stdout,
        })
    }

    /// The program token, used as the job's display name.
    pub fn program(&self) -> &str {
        &self.argv[0]
    }
}

/// Prepare the execution environment and replace the process image.
///
/// Runs in the child branch of a fork. On success this does not return;
/// the returned error is for the caller to report before terminating the
/// child with a non-zero status. The child must never fall back into
/// shell logic.
pub fn exec_child(spec: &CommandSpec) -> ShellError {
    if let Err(err) = apply_redirections(spec) {
        return err;
    }
    if let Err(err) = reset_stop_signals() {
        return err;
    }
    // Become our own process-group leader so terminal-ownership transfer
    // targets exactly this command.
    if let Err(errno) = setpgid(Pid::from_raw(0), Pid::from_raw(0)) {
        return ShellError::ProcessGroup(errno);
    }

    let argv: Vec<CString> = match spec
        .argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect()
    {
        Ok(argv) => argv,
        Err(_) => {
            return ShellError::Exec {
                program: spec.argv[0].clone(),
                source: Errno::EINVAL,
            }
        }
    };

    match execvp(&argv[0], &argv) {
        Err(errno) => ShellError::Exec {
            program: spec.argv[0].clone(),
            source: errno,
        },
        Ok(infallible) => match infallible {},
    }
}

/// Open redirection targets and splice them onto the standard streams.
///
/// Every opened descriptor is either duplicated onto its standard slot and
/// closed, or closed before the error propagates; none leak.
fn apply_redirections(spec: &CommandSpec) -> ShellResult<()> {
    if let Some(path) = &spec.stdin {
        let fd = open(Path::new(path), OFlag::O_RDONLY, Mode::empty()).map_err(|errno| {
            ShellError::File {
                path: path.clone(),
                source: errno,
            }
        })?;
        splice_fd(fd, STDIN_FILENO, path)?;
    }

    if let Some(redirect) = &spec.stdout {
        let mut flags = OFlag::O_WRONLY | OFlag::O_CREAT;
        flags |= if redirect.append {
            OFlag::O_APPEND
        } else {
            OFlag::O_TRUNC
        };
        let fd = open(
            Path::new(&redirect.path),
            flags,
            Mode::S_IRUSR | Mode::S_IWUSR,
        )
        .map_err(|errno| ShellError::File {
            path: redirect.path.clone(),
            source: errno,
        })?;
        splice_fd(fd, STDOUT_FILENO, &redirect.path)?;
    }

    Ok(())
}

/// Duplicate `fd` onto `target` and close the original slot.
fn splice_fd(fd: i32, target: i32, path: &str) -> ShellResult<()> {
    if let Err(errno) = dup2(fd, target) {
        let _ = close(fd);
        return Err(ShellError::File {
            path: path.to_string(),
            source: errno,
        });
    }
    let _ = close(fd);
    Ok(())
}

/// Restore default disposition for the terminal-access stop signals.
///
/// The shell ignores SIGTTIN/SIGTTOU and children inherit that; without
/// this reset a backgrounded child touching the terminal would block
/// silently instead of stopping.
fn reset_stop_signals() -> ShellResult<()> {
    let action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::all());
    for signal in [Signal::SIGTTIN, Signal::SIGTTOU] {
        unsafe { sigaction(signal, &action) }.map_err(ShellError::Signal)?;
    }
    Ok(())
}
