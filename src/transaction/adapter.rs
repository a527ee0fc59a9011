use crate::context::{AsyncTransactionHandle, TransactionHandle};
use crate::core::{Result, SessionError};
use crate::transaction::TransactionState;

/// Owned transaction scope over a native store transaction.
///
/// Obtained from a transactional session. The caller owns it exclusively and
/// is responsible for disposing it: either `commit` the work, or let `close`
/// (or drop) roll it back. A transaction that is never committed is always
/// rolled back.
///
/// Committing does not flush a session's pending changes; `save_changes` and
/// `commit` are independent operations, mirroring how relational stores
/// separate the transaction boundary from the change flush.
pub struct Transaction {
    handle: Box<dyn TransactionHandle>,
    state: TransactionState,
}

impl Transaction {
    pub(crate) fn new(handle: Box<dyn TransactionHandle>) -> Self {
        Self {
            handle,
            state: TransactionState::Active,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Commits the underlying native transaction.
    ///
    /// Calling this a second time, or after the transaction was closed, is an
    /// `InvalidOperation` error. A commit failure from the store leaves the
    /// transaction active so that disposal still rolls it back.
    pub fn commit(&mut self) -> Result<()> {
        if !self.state.is_active() {
            return Err(SessionError::InvalidOperation(format!(
                "cannot commit: transaction is already {}",
                self.state
            )));
        }
        self.handle.commit()?;
        self.state = TransactionState::Committed;
        log::debug!("transaction committed");
        Ok(())
    }

    /// Disposes the transaction, rolling the native handle back when `commit`
    /// was never called. Idempotent; closing a completed transaction is a
    /// no-op.
    pub fn close(&mut self) -> Result<()> {
        if !self.state.is_active() {
            return Ok(());
        }
        self.handle.rollback()?;
        self.state = TransactionState::RolledBack;
        log::debug!("transaction rolled back on close");
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state.is_active() {
            if let Err(err) = self.close() {
                log::warn!("transaction rollback failed on drop: {err}");
            }
        }
    }
}

/// Asynchronous twin of [`Transaction`].
///
/// The expected disposal path is `close().await`; dropping an active
/// transaction instead logs a warning and falls back to whatever cleanup the
/// native handle performs on drop.
pub struct AsyncTransaction {
    handle: Box<dyn AsyncTransactionHandle>,
    state: TransactionState,
}

impl AsyncTransaction {
    pub(crate) fn new(handle: Box<dyn AsyncTransactionHandle>) -> Self {
        Self {
            handle,
            state: TransactionState::Active,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Commits the underlying native transaction. Same contract as
    /// [`Transaction::commit`]; cancellation happens by dropping the future,
    /// and partial native-side effects are bounded by the store's own
    /// guarantees.
    pub async fn commit(&mut self) -> Result<()> {
        if !self.state.is_active() {
            return Err(SessionError::InvalidOperation(format!(
                "cannot commit: transaction is already {}",
                self.state
            )));
        }
        self.handle.commit().await?;
        self.state = TransactionState::Committed;
        log::debug!("transaction committed");
        Ok(())
    }

    /// Disposes the transaction, rolling the native handle back when
    /// `commit` was never called. Idempotent.
    pub async fn close(&mut self) -> Result<()> {
        if !self.state.is_active() {
            return Ok(());
        }
        self.handle.rollback().await?;
        self.state = TransactionState::RolledBack;
        log::debug!("transaction rolled back on close");
        Ok(())
    }
}

impl Drop for AsyncTransaction {
    fn drop(&mut self) {
        if self.state.is_active() {
            log::warn!(
                "async transaction dropped while active; relying on the native handle's rollback-on-drop"
            );
        }
    }
}
