use uuid::Uuid;

use crate::context::{AsyncStoreContext, StoreContext};
use crate::core::Result;
use crate::session::SessionOptions;
use crate::session::core::{AsyncSessionCore, SessionCore};

/// A session used only to read data. No persist operation exists on this
/// type; read-onlyness is a property of the type, not a runtime check.
///
/// When constructed with an isolation level, a transaction is opened
/// immediately and held for the session's whole lifetime to fix read
/// consistency. The session never commits it; disposal rolls it back and
/// then releases the context.
pub struct ReadOnlySession<C: StoreContext> {
    core: SessionCore<C>,
}

impl<C: StoreContext> std::fmt::Debug for ReadOnlySession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadOnlySession").field("core", &self.core).finish()
    }
}

impl<C: StoreContext> ReadOnlySession<C> {
    /// Opens a read-only session with default options: tracking enabled, no
    /// transaction.
    pub fn new(context: C) -> Result<Self> {
        Self::with_options(context, SessionOptions::new())
    }

    pub fn with_options(context: C, options: SessionOptions) -> Result<Self> {
        Ok(Self {
            core: SessionCore::open(context, options)?,
        })
    }

    /// Identifier used in lifecycle logging.
    pub fn id(&self) -> Uuid {
        self.core.id()
    }

    /// Whether the session holds a startup transaction.
    pub fn has_startup_transaction(&self) -> bool {
        self.core.has_startup_transaction()
    }

    /// The owned store context, for running queries.
    pub fn context(&self) -> &C {
        self.core.context()
    }

    pub fn context_mut(&mut self) -> &mut C {
        self.core.context_mut()
    }

    /// Disposes the session: the startup transaction (if any) is rolled
    /// back, then the context is released. Dropping the session performs the
    /// same cleanup; `close` additionally surfaces a rollback failure.
    pub fn close(self) -> Result<()> {
        self.core.close()
    }
}

/// Asynchronous twin of [`ReadOnlySession`].
pub struct AsyncReadOnlySession<C: AsyncStoreContext> {
    core: AsyncSessionCore<C>,
}

impl<C: AsyncStoreContext> AsyncReadOnlySession<C> {
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

    /// Disposes the session. This is the expected disposal path for async
    /// sessions; dropping without it logs a warning and defers cleanup to
    /// the native handles.
    pub async fn close(self) -> Result<()> {
        self.core.close().await
    }
}
