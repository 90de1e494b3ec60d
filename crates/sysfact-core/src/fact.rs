use crate::error::{Error, Result};

/// Identity handle for the fact that owns a resolution.
///
/// Carried for diagnostics only; a [`Resolution`](crate::Resolution) never
/// mutates it or calls back into the owning registry through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRef {
    name: String,
}

impl FactRef {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyFactName);
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
