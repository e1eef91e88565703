//! jcsh REPL — interactive front end for the jcsh kernel.
//!
//! This crate owns everything outside the job-control engine:
//! - The read loop and command history via rustyline
//! - Whitespace tokenization of command lines
//! - The trivial built-ins: `pwd`, `cd`, `exit`
//! - Dispatch into the launcher (`<program> ...`) and job control
//!   (`jobs`, `fg`, `bg`, `wait-for`, `wait-all`)

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use jcsh_kernel::{control, ignore_job_control_signals, launch, JobList, OsSupervisor};

const PROMPT: &str = "jcsh> ";

/// Outcome of dispatching one command line.
#[derive(Debug, PartialEq, Eq)]
enum Dispatch {
    Continue,
    Exit,
}

/// REPL state: line editor, the shell's job list, and the OS supervisor.
pub struct Repl {
    editor: DefaultEditor,
    jobs: JobList,
    supervisor: OsSupervisor,
}

impl Repl {
    /// Create a new REPL. Sets the shell's own signal dispositions: the
    /// terminal-access stop signals are ignored so the shell survives
    /// being a background writer itself.
    pub fn new() -> Result<Self> {
        ignore_job_control_signals().context("failed to set shell signal dispositions")?;
        let editor = DefaultEditor::new().context("failed to initialize line editor")?;
        Ok(Self {
            editor,
            jobs: JobList::new(),
            supervisor: OsSupervisor::new(),
        })
    }

    /// Run the interactive read loop until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);
                    match self.dispatch(line) {
                        Ok(Dispatch::Exit) => break,
                        Ok(Dispatch::Continue) => {}
                        // Recoverable: report and return to the prompt.
                        Err(err) => eprintln!("jcsh: {err}"),
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err).context("failed to read input"),
            }
        }
        Ok(())
    }

    /// Execute one command line outside the interactive loop (`-c`).
    /// Returns `false` if the line requested exit.
    pub fn execute_line(&mut self, line: &str) -> Result<bool> {
        Ok(self.dispatch(line.trim())? == Dispatch::Continue)
    }

    fn dispatch(&mut self, line: &str) -> Result<Dispatch> {
        let tokens = tokenize(line);
        let Some(command) = tokens.first().map(String::as_str) else {
            return Ok(Dispatch::Continue);
        };

        match command {
            "exit" | "quit" => return Ok(Dispatch::Exit),
            "pwd" => {
                let cwd = env::current_dir().context("pwd")?;
                println!("{}", cwd.display());
            }
            "cd" => {
                let target = tokens.get(1).map(PathBuf::from).unwrap_or_else(home_dir);
                env::set_current_dir(&target)
                    .with_context(|| format!("cd: {}", target.display()))?;
            }
            "jobs" => print!("{}", self.jobs),
            "fg" => control::foreground(job_index(&tokens)?, &mut self.jobs, &self.supervisor)?,
            "bg" => control::background(job_index(&tokens)?, &mut self.jobs, &self.supervisor)?,
            "wait-for" => {
                control::wait_for(job_index(&tokens)?, &mut self.jobs, &self.supervisor)?
            }
            "wait-all" => control::wait_all(&mut self.jobs, &self.supervisor),
            _ => launch(&tokens, &mut self.jobs, &self.supervisor)?,
        }
        Ok(Dispatch::Continue)
    }
}

/// Split a command line into whitespace-separated tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Parse the positional job index of a job-control command.
fn job_index(tokens: &[String]) -> Result<usize> {
    let command = &tokens[0];
    let arg = tokens
        .get(1)
        .with_context(|| format!("{command}: job index required"))?;
    arg.parse()
        .with_context(|| format!("{command}: invalid job index `{arg}`"))
}

fn home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_whitespace() {
        assert_eq!(tokenize("ls -l  /tmp"), ["ls", "-l", "/tmp"]);
        assert_eq!(tokenize("  cat < in.txt  "), ["cat", "<", "in.txt"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn job_index_parses_and_rejects() {
        assert_eq!(job_index(&tokenize("fg 2")).unwrap(), 2);
        assert!(job_index(&tokenize("fg")).is_err());
        assert!(job_index(&tokenize("fg two")).is_err());
    }
}
