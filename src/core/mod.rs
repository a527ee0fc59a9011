pub mod error;
pub mod isolation;

pub use error::{Result, SessionError};
pub use isolation::IsolationLevel;
