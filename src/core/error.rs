use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// A required input is missing or empty. Raised before any resource is
    /// acquired.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Misuse of the transaction or session lifecycle, e.g. committing a
    /// transaction that has already completed.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A failure raised by the underlying store during open, persist, or
    /// commit. Propagated to the caller unchanged, never retried.
    #[error("Store failure: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

impl<T> From<std::sync::PoisonError<T>> for SessionError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}
