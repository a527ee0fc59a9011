// ============================================================================
// Context Handle Contract
// ============================================================================
//
// The seam between the session layer and the database-access library it
// wraps. A session owns exactly one context for its whole lifetime and only
// needs three things from it: open a transaction at an isolation level,
// flush pending changes, and release the underlying connection.
//
// ============================================================================

use async_trait::async_trait;

use crate::core::{IsolationLevel, Result};

/// A live database context owned by exactly one session.
///
/// Implementations wrap whatever the underlying access library hands out
/// (a connection, a unit-of-work object). The session layer never shares a
/// context between sessions and never uses one after `close`.
pub trait StoreContext: Send {
    /// Opens a native transaction at the given isolation level.
    ///
    /// The returned handle is independent of this context borrow-wise; it
    /// communicates with the store on its own. Changes flushed through
    /// `save_changes` while the transaction is open become visible only
    /// once the transaction commits.
    fn begin_transaction(
        &mut self,
        isolation: IsolationLevel,
    ) -> Result<Box<dyn TransactionHandle>>;

    /// Flushes all changes accumulated since construction or since the
    /// previous flush. Returns the number of changes written.
    ///
    /// The store applies the batch atomically, opening an implicit
    /// transaction of its own when none is active.
    fn save_changes(&mut self) -> Result<u64>;

    /// Enables or disables change tracking for entities retrieved through
    /// this context. Disabling is a pure read-path optimization.
    fn set_tracking(&mut self, enabled: bool);

    /// Releases the underlying connection. Idempotent; a second call is a
    /// no-op.
    fn close(&mut self);
}

/// A native transaction handle as handed out by the store.
///
/// After `commit` or `rollback` succeeds the handle is inert: a further
/// lifecycle call is an error from the store, and dropping it is a no-op.
/// Dropping a handle that was never completed must roll the transaction
/// back.
pub trait TransactionHandle: Send {
    fn commit(&mut self) -> Result<()>;
    fn rollback(&mut self) -> Result<()>;
}

/// Asynchronous twin of [`StoreContext`]. Identical semantics; suspension
/// happens only at the store's I/O boundary.
#[async_trait]
pub trait AsyncStoreContext: Send {
    async fn begin_transaction(
        &mut self,
        isolation: IsolationLevel,
    ) -> Result<Box<dyn AsyncTransactionHandle>>;

    async fn save_changes(&mut self) -> Result<u64>;

    /// Tracking is pure in-process configuration, so this stays synchronous
    /// even on the async contract.
    fn set_tracking(&mut self, enabled: bool);

    async fn close(&mut self);
}

/// Asynchronous twin of [`TransactionHandle`].
#[async_trait]
pub trait AsyncTransactionHandle: Send {
    async fn commit(&mut self) -> Result<()>;
    async fn rollback(&mut self) -> Result<()>;
}

/// Optional capability: a context that can echo the statements it executes
/// to the log. Wired up from [`StoreSettings`](crate::config::StoreSettings)
/// via [`apply_statement_logging`](crate::config::apply_statement_logging).
pub trait StatementLogging {
    fn set_statement_logging(&mut self, enabled: bool);
}
