//! Execution collaborator contract.
//!
//! Resolution is mechanism, not policy: it never spawns a process itself.
//! The [`Execute`] trait is the only contract between a resolution's command
//! code path and whatever actually runs the command.

use std::path::PathBuf;
use std::time::Duration;

use crate::logger::Logger;

/// Options forwarded to the execution collaborator alongside the command.
#[derive(Debug, Clone, Default)]
pub struct ExecOpts {
    /// Bound on execution time. `None` means the executor's default applies.
    pub timeout: Option<Duration>,
    /// Directory consulted instead of the ambient `PATH` when locating the
    /// program.
    pub search_path: Option<PathBuf>,
}

impl ExecOpts {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn search_at(mut self, dir: PathBuf) -> Self {
        self.search_path = Some(dir);
        self
    }
}

/// Runs a command string and returns captured standard output.
///
/// `None` signals the command could not be run (not found, spawn failure,
/// timeout). Implementations must not panic for those conditions and must
/// enforce `opts.timeout` themselves; the command string is taken as-is,
/// quoting and path resolution included.
pub trait Execute {
    fn exec(&self, command: &str, opts: &ExecOpts) -> Option<String>;
}

/// Collaborators a registry threads through [`Resolution::value`] calls.
///
/// [`Resolution::value`]: crate::Resolution::value
#[derive(Clone, Copy)]
pub struct ResolveCtx<'a> {
    pub exec: &'a dyn Execute,
    pub log: &'a dyn Logger,
}

impl<'a> ResolveCtx<'a> {
    pub fn new(exec: &'a dyn Execute, log: &'a dyn Logger) -> Self {
        Self { exec, log }
    }
}
