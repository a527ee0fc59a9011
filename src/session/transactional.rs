use async_trait::async_trait;
use uuid::Uuid;

use crate::context::{AsyncStoreContext, StoreContext};
use crate::core::{IsolationLevel, Result};
use crate::session::core::{AsyncSessionCore, SessionCore};
use crate::session::{
    AsyncBeginTransaction, AsyncSaveChanges, BeginTransaction, SaveChanges, SessionOptions,
};
use crate::transaction::{AsyncTransaction, Transaction};

/// A session that can additionally start and commit several transactions
/// individually.
///
/// Transactions returned by
/// [`begin_transaction`](BeginTransaction::begin_transaction) are owned by
/// the caller and must be disposed by the caller; the session does not track
/// them. Committing such a transaction does not flush pending changes;
/// callers who want committed-and-saved semantics call both
/// [`save_changes`](SaveChanges::save_changes) and [`Transaction::commit`].
/// A previous transaction should be completed before starting the next one;
/// nested transactions are not supported, and honoring that is a caller
/// obligation.
pub struct TransactionalSession<C: StoreContext> {
    core: SessionCore<C>,
}

impl<C: StoreContext> TransactionalSession<C> {
    pub fn new(context: C) -> Result<Self> {
        Self::with_options(context, SessionOptions::new())
    }

    pub fn with_options(context: C, options: SessionOptions) -> Result<Self> {
        Ok(Self {
            core: SessionCore::open(context, options)?,
        })
    }

    pub fn id(&self) -> Uuid {
        self.core.id()
    }

    pub fn has_startup_transaction(&self) -> bool {
        self.core.has_startup_transaction()
    }

    pub fn context(&self) -> &C {
        self.core.context()
    }

    pub fn context_mut(&mut self) -> &mut C {
        self.core.context_mut()
    }

    pub fn close(self) -> Result<()> {
        self.core.close()
    }
}

impl<C: StoreContext> SaveChanges for TransactionalSession<C> {
    fn save_changes(&mut self) -> Result<u64> {
        let written = self.core.context_mut().save_changes()?;
        log::debug!("session {}: {written} change(s) persisted", self.core.id());
        Ok(written)
    }
}

impl<C: StoreContext> BeginTransaction for TransactionalSession<C> {
    fn begin_transaction_with(&mut self, isolation: IsolationLevel) -> Result<Transaction> {
        let handle = self.core.context_mut().begin_transaction(isolation)?;
        log::debug!(
            "session {}: caller-owned transaction opened ({isolation})",
            self.core.id()
        );
        Ok(Transaction::new(handle))
    }
}

/// Asynchronous twin of [`TransactionalSession`].
pub struct AsyncTransactionalSession<C: AsyncStoreContext> {
    core: AsyncSessionCore<C>,
}

impl<C: AsyncStoreContext> AsyncTransactionalSession<C> {
    pub async fn new(context: C) -> Result<Self> {
        Self::with_options(context, SessionOptions::new()).await
    }

    pub async fn with_options(context: C, options: SessionOptions) -> Result<Self> {
        Ok(Self {
            core: AsyncSessionCore::open(context, options).await?,
        })
    }

    pub fn id(&self) -> Uuid {
        self.core.id()
    }

    pub fn has_startup_transaction(&self) -> bool {
        self.core.has_startup_transaction()
    }

    pub fn context(&self) -> &C {
        self.core.context()
    }

    pub fn context_mut(&mut self) -> &mut C {
        self.core.context_mut()
    }

    pub async fn close(self) -> Result<()> {
        self.core.close().await
    }
}

#[async_trait]
impl<C: AsyncStoreContext> AsyncSaveChanges for AsyncTransactionalSession<C> {
    async fn save_changes(&mut self) -> Result<u64> {
        let written = self.core.context_mut().save_changes().await?;
        log::debug!("session {}: {written} change(s) persisted", self.core.id());
        Ok(written)
    }
}

#[async_trait]
impl<C: AsyncStoreContext> AsyncBeginTransaction for AsyncTransactionalSession<C> {
    async fn begin_transaction_with(
        &mut self,
        isolation: IsolationLevel,
    ) -> Result<AsyncTransaction> {
        let handle = self.core.context_mut().begin_transaction(isolation).await?;
        log::debug!(
            "session {}: caller-owned transaction opened ({isolation})",
            self.core.id()
        );
        Ok(AsyncTransaction::new(handle))
    }
}
