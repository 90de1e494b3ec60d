//! The resolution: one strategy for producing a fact's value.

use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};
use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::exec::{ExecOpts, ResolveCtx};
use crate::fact::FactRef;
use crate::logger::Logger;

/// Callback form of a resolution's code.
///
/// `Ok(None)` means the fact has no value on this system. Errors and panics
/// are isolated by [`Resolution::value`] and degrade to `None` plus a
/// warning; they never reach the caller.
pub type CallbackFn = Box<dyn Fn() -> anyhow::Result<Option<Value>> + Send + Sync>;

/// Source of truth for a resolution's value.
///
/// `setcode` overwrites this whole state; code paths never combine.
pub enum Code {
    Unset,
    Command(String),
    Callback(CallbackFn),
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Unset => f.write_str("Unset"),
            Code::Command(cmd) => f.debug_tuple("Command").field(cmd).finish(),
            Code::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// One strategy for producing a fact's value, with selection metadata.
///
/// Holds identity (name, owning fact), a code source, option state (weight,
/// timeout limit) and the evaluation flag. Computed values are never cached
/// here; every [`value`](Self::value) call recomputes.
pub struct Resolution {
    name: String,
    fact: FactRef,
    code: Code,
    value: Option<Value>,
    limit: Option<f64>,
    weight: Option<u32>,
    evaluated: Option<&'static Location<'static>>,
}

impl Resolution {
    /// Create a resolution bound to `fact`. The name must be non-empty.
    pub fn new(name: impl Into<String>, fact: FactRef) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(Self {
            name,
            fact,
            code: Code::Unset,
            value: None,
            limit: None,
            weight: None,
            evaluated: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fact(&self) -> &FactRef {
        &self.fact
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    /// Timeout bound in seconds, if one was configured.
    pub fn limit(&self) -> Option<f64> {
        self.limit
    }

    /// Selection priority, if one was configured.
    pub fn weight(&self) -> Option<u32> {
        self.weight
    }

    pub fn evaluated(&self) -> bool {
        self.evaluated.is_some()
    }

    /// Explicitly override the value. An override beats any code path.
    pub fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub fn set_weight(&mut self, weight: u32) {
        self.weight = Some(weight);
    }

    pub fn set_timeout(&mut self, secs: f64) {
        self.limit = Some(secs);
    }

    /// Store the code this resolution runs.
    ///
    /// A command string always wins: when both are given the callback is
    /// dropped, not kept around for later. With neither there is nothing to
    /// resolve, which is an argument error.
    pub fn setcode(&mut self, command: Option<String>, callback: Option<CallbackFn>) -> Result<()> {
        match (command, callback) {
            (Some(command), _) => self.code = Code::Command(command),
            (None, Some(callback)) => self.code = Code::Callback(callback),
            (None, None) => return Err(Error::NoCode),
        }
        Ok(())
    }

    /// Convenience for the callback form of [`setcode`](Self::setcode).
    pub fn setcode_fn<F>(&mut self, callback: F)
    where
        F: Fn() -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        self.code = Code::Callback(Box::new(callback));
    }

    /// Apply declarative options. Recognized keys: `value`, `timeout`,
    /// `weight`. Unrecognized keys fail the whole call before anything is
    /// applied.
    pub fn set_options(&mut self, mut options: Map<String, Value>) -> Result<()> {
        let value = options.remove("value");
        let timeout = options.remove("timeout");
        let weight = options.remove("weight");

        if !options.is_empty() {
            let keys: Vec<&str> = options.keys().map(String::as_str).collect();
            return Err(Error::InvalidOptions(keys.join(", ")));
        }

        let timeout = match timeout {
            Some(v) => Some(v.as_f64().filter(|s| s.is_finite() && *s >= 0.0).ok_or(
                Error::InvalidOptionValue {
                    key: "timeout",
                    expected: "a non-negative number of seconds",
                },
            )?),
            None => None,
        };
        let weight = match weight {
            Some(v) => Some(
                v.as_u64()
                    .and_then(|w| u32::try_from(w).ok())
                    .ok_or(Error::InvalidOptionValue {
                        key: "weight",
                        expected: "a non-negative integer",
                    })?,
            ),
            None => None,
        };

        if let Some(value) = value {
            self.value = Some(value);
        }
        if let Some(timeout) = timeout {
            self.limit = Some(timeout);
        }
        if let Some(weight) = weight {
            self.weight = Some(weight);
        }
        Ok(())
    }

    /// Compute the value: explicit override, else the stored code, else
    /// `None`. Nothing is cached and nothing is raised; a failing code path
    /// degrades to `None` plus a warning through `ctx.log`.
    pub fn value(&self, ctx: &ResolveCtx<'_>) -> Option<Value> {
        if let Some(value) = &self.value {
            return Some(value.clone());
        }

        match &self.code {
            Code::Unset => None,
            Code::Command(command) => {
                // A limit too large for Duration falls back to the
                // executor's default instead of panicking the caller.
                let opts = ExecOpts {
                    timeout: self
                        .limit
                        .and_then(|s| Duration::try_from_secs_f64(s).ok()),
                    search_path: None,
                };
                ctx.exec.exec(command, &opts).map(Value::String)
            }
            Code::Callback(callback) => self.run_callback(callback, ctx.log),
        }
    }

    fn run_callback(&self, callback: &CallbackFn, log: &dyn Logger) -> Option<Value> {
        match panic::catch_unwind(AssertUnwindSafe(callback)) {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                log.warn(&format!(
                    "could not retrieve fact='{}', resolution='{}': {err}",
                    self.fact.name(),
                    self.name
                ));
                None
            }
            Err(payload) => {
                log.warn(&format!(
                    "could not retrieve fact='{}', resolution='{}': {}",
                    self.fact.name(),
                    self.name,
                    panic_message(&payload)
                ));
                None
            }
        }
    }

    /// Run a configuration block against this resolution.
    ///
    /// The first call records its call site. Later calls are permitted but
    /// diagnosed, so misbehaving configuration degrades to a warning instead
    /// of aborting fact collection.
    #[track_caller]
    pub fn evaluate<F>(&mut self, log: &dyn Logger, block: F)
    where
        F: FnOnce(&mut Self),
    {
        let caller = Location::caller();
        if let Some(first) = self.evaluated {
            log.warn(&format!(
                "Already evaluated {} at {first}, reevaluating anyways",
                self.name
            ));
        }
        block(self);
        if self.evaluated.is_none() {
            self.evaluated = Some(caller);
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("name", &self.name)
            .field("fact", &self.fact)
            .field("code", &self.code)
            .field("value", &self.value)
            .field("limit", &self.limit)
            .field("weight", &self.weight)
            .field("evaluated", &self.evaluated)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "callback panicked"
    }
}
