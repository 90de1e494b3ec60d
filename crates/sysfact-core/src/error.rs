use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("a resolution requires a name")]
    EmptyName,

    #[error("a resolution requires a fact")]
    EmptyFactName,

    #[error("must pass a command string or a callback to setcode")]
    NoCode,

    #[error("Invalid resolution options: {0}")]
    InvalidOptions(String),

    #[error("resolution option {key} expects {expected}")]
    InvalidOptionValue {
        key: &'static str,
        expected: &'static str,
    },
}
