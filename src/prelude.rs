//! Convenience re-exports for session-based application code.
//!
//! ```
//! use dbsession::prelude::*;
//! ```

pub use crate::config::{StoreSettings, apply_statement_logging};
pub use crate::context::{AsyncStoreContext, StoreContext};
pub use crate::core::{IsolationLevel, Result, SessionError};
pub use crate::registry::{AsyncContextFactory, ContextFactory, SessionRegistry};
pub use crate::session::{
    AsyncBeginTransaction, AsyncReadOnlySession, AsyncSaveChanges, AsyncSession,
    AsyncTransactionalSession, BeginTransaction, ReadOnlySession, SaveChanges, Session,
    SessionOptions, TransactionalSession,
};
pub use crate::transaction::{AsyncTransaction, Transaction, TransactionState};
