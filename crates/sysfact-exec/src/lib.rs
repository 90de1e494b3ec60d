//! Command execution for fact resolutions.
//!
//! # Architecture
//!
//! `sysfact-core` defines the [`Execute`](sysfact_core::Execute) contract
//! and stays out of the process-spawning business. This crate is the
//! production implementation: [`ShellExecutor`] hands the command string to
//! a platform shell, enforces the timeout, and signals every failure mode by
//! returning `None` rather than panicking.
//!
//! Platform differences (which shell, `.exe` suffixes, path layout) live
//! entirely here; a resolution passes its command string through unmodified
//! on every platform.
//!
//! # Example
//!
//! ```no_run
//! use sysfact_core::ExecOpts;
//! use sysfact_core::Execute;
//! use sysfact_exec::ShellExecutor;
//!
//! let exec = ShellExecutor::new();
//! let kernel = exec.exec("uname -s", &ExecOpts::default());
//! ```

pub use command::Command;
pub use error::{Error, Result};
pub use executor::{DEFAULT_TIMEOUT, ShellExecutor};
pub use shell::Shell;

mod command;
mod error;
mod executor;
mod shell;
