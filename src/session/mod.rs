// ============================================================================
// Session Family
// ============================================================================
//
// A session is a scoped unit of work around one owned store context. The
// family is built from one owned-resource component (`SessionCore`) plus
// capability traits, instead of an inheritance ladder:
//
//   ReadOnlySession      - context + optional startup transaction, reads only
//   Session              - adds the SaveChanges capability
//   TransactionalSession - adds the BeginTransaction capability
//
// Each type has an async twin with identical semantics. A session instance
// is a single logical task's unit of work; it provides no internal locking
// and must not be shared across threads concurrently.
//
// ============================================================================

pub mod core;
pub mod read_only;
pub mod session;
pub mod transactional;

use async_trait::async_trait;

use crate::core::{IsolationLevel, Result};
use crate::transaction::{AsyncTransaction, Transaction};

pub use self::core::SessionOptions;
pub use read_only::{AsyncReadOnlySession, ReadOnlySession};
pub use session::{AsyncSession, Session};
pub use transactional::{AsyncTransactionalSession, TransactionalSession};

/// Capability: flush all pending changes of the unit of work to the store.
///
/// Omitting the call discards the accumulated changes when the session is
/// disposed; that silent discard is the safety net callers rely on.
pub trait SaveChanges {
    /// Returns the number of changes written.
    fn save_changes(&mut self) -> Result<u64>;
}

/// Capability: open caller-owned transactions on demand.
///
/// The session does not track transactions created this way; the caller must
/// dispose each returned [`Transaction`]. Only one caller-owned transaction
/// should be open at a time per session; the type does not enforce this.
pub trait BeginTransaction {
    /// Opens a transaction at the default isolation level.
    fn begin_transaction(&mut self) -> Result<Transaction> {
        self.begin_transaction_with(IsolationLevel::default())
    }

    /// Opens a transaction at an explicit isolation level.
    fn begin_transaction_with(&mut self, isolation: IsolationLevel) -> Result<Transaction>;
}

/// Asynchronous twin of [`SaveChanges`].
#[async_trait]
pub trait AsyncSaveChanges {
    async fn save_changes(&mut self) -> Result<u64>;
}

/// Asynchronous twin of [`BeginTransaction`].
#[async_trait]
pub trait AsyncBeginTransaction {
    async fn begin_transaction(&mut self) -> Result<AsyncTransaction> {
        self.begin_transaction_with(IsolationLevel::default()).await
    }

    async fn begin_transaction_with(
        &mut self,
        isolation: IsolationLevel,
    ) -> Result<AsyncTransaction>;
}
