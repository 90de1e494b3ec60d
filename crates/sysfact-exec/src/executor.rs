//! Shell-backed implementation of the execution collaborator.

use std::io::Read;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use sysfact_core::{ExecOpts, Execute};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::shell::Shell;

/// Bound on command execution when the resolution sets none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const WAIT_POLL: Duration = Duration::from_millis(10);

/// How long to wait for further output chunks after the child exited.
const OUTPUT_GRACE: Duration = Duration::from_millis(50);

/// Runs resolution command strings through a platform shell.
///
/// Upholds the [`Execute`] contract: lookup failures, spawn failures and
/// timeouts all come back as `None`, never as a panic. A finished command's
/// trimmed stdout is returned whatever its exit status, since a fact command
/// that printed something told us its answer.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: Shell,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self {
            shell: Shell::default_for_platform(),
        }
    }

    pub fn with_shell(shell: Shell) -> Self {
        Self { shell }
    }

    /// Resolve the program token up front so "command not found" never
    /// reaches the spawn path.
    fn lookup(&self, command: &str, search_path: Option<&Path>) -> Result<()> {
        let program = command
            .split_whitespace()
            .next()
            .ok_or_else(|| Error::CommandNotFound {
                cmd: command.to_string(),
            })?;

        let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
        let found = match search_path {
            Some(dir) => which::which_in(program, Some(dir), cwd),
            None => which::which(program),
        };
        found.map(|_| ()).map_err(|_| Error::CommandNotFound {
            cmd: program.to_string(),
        })
    }

    fn run(&self, command: &str, opts: &ExecOpts) -> Result<String> {
        self.lookup(command, opts.search_path.as_deref())?;

        let mut cmd = Command::new(command).run_in_shell(self.shell).piped();
        if let Some(dir) = &opts.search_path {
            // The shell resolves the program again; put the override first
            // on its PATH so both lookups agree.
            let ambient = std::env::var_os("PATH").unwrap_or_default();
            let merged = std::env::join_paths(
                std::iter::once(dir.clone()).chain(std::env::split_paths(&ambient)),
            );
            if let Ok(path) = merged {
                cmd = cmd.env("PATH", path);
            }
        }

        let mut child = cmd.spawn()?;

        // Drain stdout on its own thread so a chatty child cannot deadlock
        // against a full pipe while we poll for exit. Chunks are handed over
        // a channel: the pipe's write end is inherited by anything the shell
        // forks, so the reader only sees EOF once the *last* holder exits,
        // and this thread must never be joined on that.
        let stdout = child.stdout.take();
        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        thread::spawn(move || {
            let Some(mut out) = stdout else { return };
            let mut chunk = [0u8; 4096];
            loop {
                match out.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(chunk[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let timeout = opts.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_status)) => break,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(Error::TimedOut {
                            cmd: command.to_string(),
                            timeout,
                        });
                    }
                    thread::sleep(WAIT_POLL);
                }
                Err(source) => {
                    let _ = child.kill();
                    return Err(Error::CommandFailed {
                        cmd: command.to_string(),
                        source,
                    });
                }
            }
        }

        // The child is gone; collect what it printed. A backgrounded
        // grandchild still holding the pipe open gets a short grace per
        // chunk, capped by the overall deadline, not a blocking wait for
        // EOF.
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let remaining = deadline
                .saturating_duration_since(Instant::now())
                .min(OUTPUT_GRACE);
            match rx.recv_timeout(remaining) {
                Ok(chunk) => buf.extend_from_slice(&chunk),
                Err(_) => break,
            }
        }
        let output = String::from_utf8_lossy(&buf);
        Ok(output.trim().to_string())
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Execute for ShellExecutor {
    fn exec(&self, command: &str, opts: &ExecOpts) -> Option<String> {
        match self.run(command, opts) {
            Ok(output) => Some(output),
            Err(err) => {
                tracing::debug!(command, %err, "command execution failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec(command: &str, opts: &ExecOpts) -> Option<String> {
        ShellExecutor::new().exec(command, opts)
    }

    #[test]
    fn test_unresolvable_program_yields_none() {
        assert_eq!(
            exec("definitely_not_a_real_command_12345", &ExecOpts::default()),
            None
        );
    }

    #[test]
    fn test_empty_command_yields_none() {
        assert_eq!(exec("", &ExecOpts::default()), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_trimmed_stdout() {
        assert_eq!(
            exec("echo hello", &ExecOpts::default()),
            Some("hello".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_handles_the_command_string() {
        // Pipes and quoting are the shell's job, passed through untouched.
        assert_eq!(
            exec("echo 'a b' | tr a x", &ExecOpts::default()),
            Some("x b".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_still_returns_output() {
        assert_eq!(
            exec("echo oops; exit 3", &ExecOpts::default()),
            Some("oops".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_the_child() {
        let start = Instant::now();
        let opts = ExecOpts::default().timeout(Duration::from_millis(100));
        assert_eq!(exec("sleep 5", &opts), None);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_holds_when_a_forked_child_keeps_the_pipe() {
        // Killing the shell leaves its forked sleep holding the stdout
        // pipe; the deadline must still be honored.
        let start = Instant::now();
        let opts = ExecOpts::default().timeout(Duration::from_millis(100));
        assert_eq!(exec("sleep 5; echo done", &opts), None);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_backgrounded_child_does_not_block_the_success_path() {
        let start = Instant::now();
        assert_eq!(
            exec("echo hi; sleep 5 &", &ExecOpts::default()),
            Some("hi".to_string())
        );
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_override() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fakefactcmd");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(file, "#!/bin/sh\necho from-override").unwrap();
        drop(file);
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let opts = ExecOpts::default().search_at(dir.path().to_path_buf());
        assert_eq!(exec("fakefactcmd", &opts), Some("from-override".to_string()));

        // Without the override the program is not on PATH at all.
        assert_eq!(exec("fakefactcmd", &ExecOpts::default()), None);
    }
}
