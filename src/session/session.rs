use async_trait::async_trait;
use uuid::Uuid;

use crate::context::{AsyncStoreContext, StoreContext};
use crate::core::Result;
use crate::session::core::{AsyncSessionCore, SessionCore};
use crate::session::{AsyncSaveChanges, SaveChanges, SessionOptions};

/// A session that can read as well as insert, update, or delete data.
///
/// Changes accumulated through the context are only written when
/// [`save_changes`](SaveChanges::save_changes) is called; the store applies
/// the flush transactionally, opening an implicit transaction of its own if
/// required. A session disposed without the call discards all accumulated
/// changes.
pub struct Session<C: StoreContext> {
    core: SessionCore<C>,
}

impl<C: StoreContext> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("core", &self.core).finish()
    }
}

impl<C: StoreContext> Session<C> {
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

impl<C: StoreContext> SaveChanges for Session<C> {
    /// Failures from the store (constraint violations, connectivity loss)
    /// propagate unchanged; the session neither retries nor swallows them.
    fn save_changes(&mut self) -> Result<u64> {
        let written = self.core.context_mut().save_changes()?;
        log::debug!("session {}: {written} change(s) persisted", self.core.id());
        Ok(written)
    }
}

/// Asynchronous twin of [`Session`].
pub struct AsyncSession<C: AsyncStoreContext> {
    core: AsyncSessionCore<C>,
}

impl<C: AsyncStoreContext> AsyncSession<C> {
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
impl<C: AsyncStoreContext> AsyncSaveChanges for AsyncSession<C> {
    async fn save_changes(&mut self) -> Result<u64> {
        let written = self.core.context_mut().save_changes().await?;
        log::debug!("session {}: {written} change(s) persisted", self.core.id());
        Ok(written)
    }
}
