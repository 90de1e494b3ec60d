//! Lazy fact resolution.
//!
//! # Architecture
//!
//! A [`Resolution`] is one strategy for producing a fact's value: either an
//! external command string or a user-supplied callback, plus selection
//! metadata (weight) and an execution timeout. It sits between declarative
//! configuration and imperative, possibly-failing execution, and it keeps
//! those failures to itself: a broken code path degrades to `None` plus a
//! warning, never a panic at the caller.
//!
//! Resolution is mechanism, not policy. Running commands and sinking
//! warnings are collaborator contracts ([`Execute`], [`Logger`]) injected
//! through a [`ResolveCtx`]; the higher-level registry that owns many
//! resolutions per fact and picks the highest-weighted one lives outside
//! this crate.
//!
//! # Example
//!
//! ```
//! use serde_json::Value;
//! use sysfact_core::{Execute, ExecOpts, FactRef, Logger, ResolveCtx, Resolution};
//!
//! struct NoExec;
//! impl Execute for NoExec {
//!     fn exec(&self, _command: &str, _opts: &ExecOpts) -> Option<String> {
//!         None
//!     }
//! }
//!
//! struct Quiet;
//! impl Logger for Quiet {
//!     fn warn(&self, _msg: &str) {}
//!     fn warnonce(&self, _msg: &str) {}
//! }
//!
//! let fact = FactRef::new("kernel")?;
//! let mut res = Resolution::new("kernel-uname", fact)?;
//! res.setcode_fn(|| Ok(Some(Value::String("Linux".into()))));
//!
//! let ctx = ResolveCtx::new(&NoExec, &Quiet);
//! assert_eq!(res.value(&ctx), Some(Value::String("Linux".into())));
//! # Ok::<(), sysfact_core::Error>(())
//! ```

pub use error::{Error, Result};
pub use exec::{ExecOpts, Execute, ResolveCtx};
pub use fact::FactRef;
pub use logger::{Logger, TracingLogger};
pub use resolution::{CallbackFn, Code, Resolution};

mod error;
mod exec;
mod fact;
mod logger;
mod resolution;
