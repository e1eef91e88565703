//! End-to-end tests driving the kernel against real child processes.
//!
//! These run without a controlling terminal, so terminal-ownership
//! transfers fail harmlessly (reported, non-fatal) while fork, exec,
//! redirection, and wait behavior are exercised for real.

use std::fs;
use std::path::PathBuf;

use jcsh_kernel::{control, launch, JobList, JobStatus, OsSupervisor, ShellError};
use jcsh_repl::tokenize;

/// Unique scratch path for one test.
fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("jcsh-it-{}-{}", std::process::id(), name))
}

#[test]
fn foreground_redirection_round_trip() {
    let input = scratch("rt-in.txt");
    let output = scratch("rt-out.txt");
    fs::write(&input, "hello").unwrap();

    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();
    let line = format!("cat < {} > {}", input.display(), output.display());

    launch(&tokenize(&line), &mut jobs, &supervisor).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "hello");
    assert!(jobs.is_empty());

    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();
}

#[test]
fn append_redirection_accumulates() {
    let output = scratch("append.txt");
    let _ = fs::remove_file(&output);

    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();
    let line = format!("echo hi >> {}", output.display());

    launch(&tokenize(&line), &mut jobs, &supervisor).unwrap();
    launch(&tokenize(&line), &mut jobs, &supervisor).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "hi\nhi\n");
    fs::remove_file(&output).unwrap();
}

#[test]
fn redirection_operands_do_not_reach_the_program() {
    let output = scratch("argv.txt");

    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();
    // If the operator or filename leaked into echo's argv they would
    // appear in the output.
    let line = format!("echo hello > {}", output.display());

    launch(&tokenize(&line), &mut jobs, &supervisor).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "hello\n");
    fs::remove_file(&output).unwrap();
}

#[test]
fn background_launch_returns_immediately_and_tracks_the_job() {
    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();

    launch(&tokenize("sleep 0.2 &"), &mut jobs, &supervisor).unwrap();

    assert_eq!(jobs.len(), 1);
    let job = jobs.get(0).unwrap();
    assert_eq!(job.name, "sleep");
    assert_eq!(job.status, JobStatus::Background);

    // Cleanup: reap the child so it cannot outlive the test.
    control::wait_for(0, &mut jobs, &supervisor).unwrap();
    assert!(jobs.is_empty());
}

#[test]
fn wait_all_reaps_every_background_job() {
    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();

    launch(&tokenize("sleep 0.1 &"), &mut jobs, &supervisor).unwrap();
    launch(&tokenize("sleep 0.2 &"), &mut jobs, &supervisor).unwrap();
    assert_eq!(jobs.len(), 2);

    control::wait_all(&mut jobs, &supervisor);

    assert!(jobs.is_empty());
}

#[test]
fn exec_failure_terminates_the_child_without_a_job() {
    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();

    // The child reports the exec failure and exits 127; the launch itself
    // completes and records nothing.
    launch(
        &tokenize("jcsh-no-such-program-zzz"),
        &mut jobs,
        &supervisor,
    )
    .unwrap();
    assert!(jobs.is_empty());
}

#[test]
fn missing_input_file_terminates_the_child_without_a_job() {
    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();
    let missing = scratch("never-created.txt");

    let line = format!("cat < {}", missing.display());
    launch(&tokenize(&line), &mut jobs, &supervisor).unwrap();
    assert!(jobs.is_empty());
}

#[test]
fn fg_on_empty_job_list_is_an_index_error() {
    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();

    let err = control::foreground(0, &mut jobs, &supervisor).unwrap_err();
    assert!(matches!(err, ShellError::Index(0)));
}

#[test]
fn wait_for_on_stopped_job_fails_fast() {
    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();
    // A synthetic stopped job; the state check rejects it before any wait.
    jobs.push("vim", nix::unistd::Pid::from_raw(1), JobStatus::Stopped);

    let err = control::wait_for(0, &mut jobs, &supervisor).unwrap_err();
    assert!(matches!(err, ShellError::State(_)));
    assert_eq!(jobs.len(), 1);
}

#[test]
fn wait_for_out_of_range_is_an_index_error() {
    let supervisor = OsSupervisor::new();
    let mut jobs = JobList::new();

    let err = control::wait_for(3, &mut jobs, &supervisor).unwrap_err();
    assert!(matches!(err, ShellError::Index(3)));
}
