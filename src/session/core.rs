use uuid::Uuid;

use crate::context::{AsyncStoreContext, AsyncTransactionHandle, StoreContext, TransactionHandle};
use crate::core::{IsolationLevel, Result};

/// Construction options shared by every session variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    tracking_disabled: bool,
    isolation: Option<IsolationLevel>,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables change tracking on the context. A pure read-path
    /// optimization; retrieved entities are not registered for later change
    /// detection.
    pub fn disable_tracking(mut self) -> Self {
        self.tracking_disabled = true;
        self
    }

    /// Requests a transaction at the given isolation level for the whole
    /// session lifetime. The session never commits this transaction; it only
    /// fixes read consistency and is rolled back on disposal.
    pub fn isolation(mut self, level: IsolationLevel) -> Self {
        self.isolation = Some(level);
        self
    }

    pub fn tracking_is_disabled(&self) -> bool {
        self.tracking_disabled
    }

    pub fn isolation_level(&self) -> Option<IsolationLevel> {
        self.isolation
    }
}

/// The owned-resource component every session variant is built on: one
/// context, at most one startup transaction, and the disposal logic that
/// always releases the transaction before the context.
///
/// `transaction` is declared before `context` so the implicit drop order
/// releases the transaction first as well.
pub(crate) struct SessionCore<C: StoreContext> {
    transaction: Option<Box<dyn TransactionHandle>>,
    context: Option<C>,
    id: Uuid,
}

impl<C: StoreContext> std::fmt::Debug for SessionCore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCore")
            .field("id", &self.id)
            .field("has_transaction", &self.transaction.is_some())
            .finish()
    }
}

impl<C: StoreContext> SessionCore<C> {
    pub(crate) fn open(mut context: C, options: SessionOptions) -> Result<Self> {
        if options.tracking_is_disabled() {
            context.set_tracking(false);
        }
        let transaction = match options.isolation_level() {
            Some(level) => Some(context.begin_transaction(level)?),
            None => None,
        };
        let id = Uuid::new_v4();
        log::debug!(
            "session {id} opened (tracking_disabled={}, isolation={:?})",
            options.tracking_is_disabled(),
            options.isolation_level()
        );
        Ok(Self {
            transaction,
            context: Some(context),
            id,
        })
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn has_startup_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    // The context is only ever None after release(), and release() is only
    // reachable through close(self) or Drop, so these accessors cannot
    // observe a released core.
    pub(crate) fn context(&self) -> &C {
        self.context
            .as_ref()
            .expect("session context accessed after close")
    }

    pub(crate) fn context_mut(&mut self) -> &mut C {
        self.context
            .as_mut()
            .expect("session context accessed after close")
    }

    pub(crate) fn close(mut self) -> Result<()> {
        let result = self.release();
        log::debug!("session {} closed", self.id);
        result
    }

    /// Rolls back the startup transaction (if any), then closes the context.
    /// The context is closed even when the rollback fails; the rollback
    /// error is reported after disposal completed.
    fn release(&mut self) -> Result<()> {
        let mut result = Ok(());
        if let Some(mut transaction) = self.transaction.take() {
            if let Err(err) = transaction.rollback() {
                result = Err(err);
            }
        }
        if let Some(mut context) = self.context.take() {
            context.close();
        }
        result
    }
}

impl<C: StoreContext> Drop for SessionCore<C> {
    fn drop(&mut self) {
        // No-op after close(); release() already emptied both slots.
        if let Err(err) = self.release() {
            log::warn!(
                "session {}: startup transaction rollback failed on drop: {err}",
                self.id
            );
        }
    }
}

/// Asynchronous twin of [`SessionCore`]. The expected disposal path is
/// `close().await`; dropping without it logs a warning and leaves cleanup to
/// the native handles' own drop behavior.
pub(crate) struct AsyncSessionCore<C: AsyncStoreContext> {
    transaction: Option<Box<dyn AsyncTransactionHandle>>,
    context: Option<C>,
    id: Uuid,
}

impl<C: AsyncStoreContext> AsyncSessionCore<C> {
    pub(crate) async fn open(mut context: C, options: SessionOptions) -> Result<Self> {
        if options.tracking_is_disabled() {
            context.set_tracking(false);
        }
        let transaction = match options.isolation_level() {
            Some(level) => Some(context.begin_transaction(level).await?),
            None => None,
        };
        let id = Uuid::new_v4();
        log::debug!(
            "async session {id} opened (tracking_disabled={}, isolation={:?})",
            options.tracking_is_disabled(),
            options.isolation_level()
        );
        Ok(Self {
            transaction,
            context: Some(context),
            id,
        })
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn has_startup_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    pub(crate) fn context(&self) -> &C {
        self.context
            .as_ref()
            .expect("session context accessed after close")
    }

    pub(crate) fn context_mut(&mut self) -> &mut C {
        self.context
            .as_mut()
            .expect("session context accessed after close")
    }

    pub(crate) async fn close(mut self) -> Result<()> {
        let mut result = Ok(());
        if let Some(mut transaction) = self.transaction.take() {
            if let Err(err) = transaction.rollback().await {
                result = Err(err);
            }
        }
        if let Some(mut context) = self.context.take() {
            context.close().await;
        }
        log::debug!("async session {} closed", self.id);
        result
    }
}

impl<C: AsyncStoreContext> Drop for AsyncSessionCore<C> {
    fn drop(&mut self) {
        if self.transaction.is_some() || self.context.is_some() {
            log::warn!(
                "async session {} dropped without close(); relying on the store handles' own cleanup",
                self.id
            );
        }
    }
}
