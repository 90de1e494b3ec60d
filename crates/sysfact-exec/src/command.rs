use std::ffi::OsStr;
use std::process::{Child, Command as StdCommand, Stdio};

use crate::error::{Error, Result};
use crate::shell::Shell;

/// Builder over `std::process::Command`.
#[derive(Debug)]
pub struct Command {
    inner: StdCommand,
    program: String,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            inner: StdCommand::new(&program),
            program,
        }
    }

    /// Re-target the whole program string through `shell`'s one-shot flag.
    pub fn run_in_shell(mut self, shell: Shell) -> Self {
        let script = self.program.clone();
        self.inner = StdCommand::new(shell.executable());
        self.inner.args([shell.command_flag(), &script]);
        self
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.inner.env(key, val);
        self
    }

    /// Pipe stdout for capture; the child gets no stdin and a silenced
    /// stderr.
    pub fn piped(mut self) -> Self {
        self.inner
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        self
    }

    pub fn spawn(&mut self) -> Result<Child> {
        self.inner.spawn().map_err(|e| Error::CommandFailed {
            cmd: self.program.clone(),
            source: e,
        })
    }
}
