use thiserror::Error;

/// Every failure the ledger can report back to the invocation boundary.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("incorrect number of arguments: expecting {expected}, got {got}")]
    Argument { expected: usize, got: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("argument `{name}` is not an integer: {value:?}")]
    Parse { name: &'static str, value: String },
    #[error("state store failure: {0}")]
    Store(String),
    #[error("no value stored under key {0:?}")]
    NotFound(String),
    #[error("value under key {key:?} could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("received unknown function invocation: {0}")]
    UnknownOperation(String),
}

impl From<rusqlite::Error> for LedgerError {
    fn from(e: rusqlite::Error) -> Self {
        LedgerError::Store(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
