// ============================================================================
// dbsession Library
// ============================================================================

//! Database session and unit-of-work abstractions.
//!
//! A session is a scoped unit of work around one owned store context. Three
//! capability levels, each with a sync and an async variant:
//!
//! - [`ReadOnlySession`] / [`AsyncReadOnlySession`]: queries only; can pin
//!   read consistency with a startup transaction.
//! - [`Session`] / [`AsyncSession`]: adds `save_changes`; forgetting the
//!   call discards all accumulated changes on disposal.
//! - [`TransactionalSession`] / [`AsyncTransactionalSession`]: adds
//!   caller-owned transactions via `begin_transaction`.
//!
//! Disposal is deterministic on every exit path: the session's own
//! transaction is rolled back first, then the context is released, exactly
//! once.
//!
//! # Examples
//!
//! ```
//! use dbsession::memory::{MemoryStore, Value, fields};
//! use dbsession::session::{SaveChanges, Session};
//!
//! # fn main() -> dbsession::Result<()> {
//! let store = MemoryStore::new();
//!
//! let mut session = Session::new(store.context())?;
//! session
//!     .context_mut()
//!     .add("users", fields([("name", Value::from("Alice"))]))?;
//! session.save_changes()?;
//! session.close()?;
//!
//! assert_eq!(store.row_count("users")?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! Without `save_changes`, nothing is written:
//!
//! ```
//! use dbsession::memory::{MemoryStore, Value, fields};
//! use dbsession::session::Session;
//!
//! # fn main() -> dbsession::Result<()> {
//! let store = MemoryStore::new();
//!
//! let mut session = Session::new(store.context())?;
//! session
//!     .context_mut()
//!     .add("users", fields([("name", Value::from("Bob"))]))?;
//! session.close()?;
//!
//! assert_eq!(store.row_count("users")?, 0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod core;
pub mod memory;
pub mod registry;
pub mod session;
pub mod transaction;
pub mod prelude;

// Re-export main types for convenience
pub use crate::core::{IsolationLevel, Result, SessionError};
pub use transaction::{AsyncTransaction, Transaction, TransactionState};

pub use session::{
    AsyncBeginTransaction, AsyncReadOnlySession, AsyncSaveChanges, AsyncSession,
    AsyncTransactionalSession, BeginTransaction, ReadOnlySession, SaveChanges, Session,
    SessionOptions, TransactionalSession,
};

pub use config::{DEFAULT_SECTION, StoreSettings, apply_statement_logging};
pub use context::{
    AsyncStoreContext, AsyncTransactionHandle, StatementLogging, StoreContext, TransactionHandle,
};
pub use registry::{AsyncContextFactory, ContextFactory, SessionRegistry};
