use async_trait::async_trait;

use crate::context::{
    AsyncStoreContext, AsyncTransactionHandle, StatementLogging,
};
use crate::core::{IsolationLevel, Result};
use crate::memory::context::{MemoryContext, MemoryTransactionHandle};
use crate::memory::store::MemoryStore;
use crate::memory::value::{Fields, Record};

/// Asynchronous context over a [`MemoryStore`].
///
/// Wraps the synchronous context; the store holds its lock only for short,
/// await-free critical sections, so delegation is safe. Suspension points
/// exist to honor the async contract, not because the memory store blocks.
pub struct AsyncMemoryContext {
    inner: MemoryContext,
}

impl AsyncMemoryContext {
    pub(crate) fn new(store: MemoryStore) -> Self {
        Self {
            inner: MemoryContext::new(store),
        }
    }

    /// Queues an insert. Buffering is in-process and needs no await.
    pub fn add(&mut self, table: &str, fields: Fields) -> Result<()> {
        self.inner.add(table, fields)
    }

    pub fn modify(&mut self, table: &str, id: u64, fields: Fields) -> Result<()> {
        self.inner.modify(table, id, fields)
    }

    pub fn remove(&mut self, table: &str, id: u64) -> Result<()> {
        self.inner.remove(table, id)
    }

    pub async fn rows(&mut self, table: &str) -> Result<Vec<Record>> {
        self.inner.rows(table)
    }

    pub async fn find(&mut self, table: &str, id: u64) -> Result<Option<Record>> {
        self.inner.find(table, id)
    }

    pub fn pending_count(&self) -> usize {
        self.inner.pending_count()
    }

    pub fn tracked_count(&self) -> usize {
        self.inner.tracked_count()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

#[async_trait]
impl AsyncStoreContext for AsyncMemoryContext {
    async fn begin_transaction(
        &mut self,
        isolation: IsolationLevel,
    ) -> Result<Box<dyn AsyncTransactionHandle>> {
        let handle = self.inner.begin_raw(isolation)?;
        Ok(Box::new(AsyncMemoryTransactionHandle { inner: handle }))
    }

    async fn save_changes(&mut self) -> Result<u64> {
        self.inner.save_raw()
    }

    fn set_tracking(&mut self, enabled: bool) {
        self.inner.set_tracking_raw(enabled);
    }

    async fn close(&mut self) {
        self.inner.close_raw();
    }
}

impl StatementLogging for AsyncMemoryContext {
    fn set_statement_logging(&mut self, enabled: bool) {
        self.inner.set_statement_logging(enabled);
    }
}

/// Asynchronous native handle. Rollback-on-drop comes from the wrapped
/// synchronous handle.
pub struct AsyncMemoryTransactionHandle {
    inner: MemoryTransactionHandle,
}

#[async_trait]
impl AsyncTransactionHandle for AsyncMemoryTransactionHandle {
    async fn commit(&mut self) -> Result<()> {
        self.inner.commit_raw()
    }

    async fn rollback(&mut self) -> Result<()> {
        self.inner.rollback_raw()
    }
}
