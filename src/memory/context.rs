use std::collections::HashMap;

use crate::context::{StatementLogging, StoreContext, TransactionHandle};
use crate::core::{IsolationLevel, Result, SessionError};
use crate::memory::store::{MemoryStore, PendingChange};
use crate::memory::value::{Fields, Record};

/// Synchronous context over a [`MemoryStore`].
///
/// Owned by exactly one session. Modifications are buffered in the context
/// and reach the store only through `save_changes`; a context released with
/// a non-empty buffer discards it.
pub struct MemoryContext {
    store: MemoryStore,
    pending: Vec<PendingChange>,
    tracked: HashMap<(String, u64), Record>,
    tracking: bool,
    statement_logging: bool,
    active_txn: Option<u64>,
    closed: bool,
}

impl MemoryContext {
    pub(crate) fn new(store: MemoryStore) -> Self {
        Self {
            store,
            pending: Vec::new(),
            tracked: HashMap::new(),
            tracking: true,
            statement_logging: false,
            active_txn: None,
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(SessionError::InvalidOperation(
                "context has been closed".to_string(),
            ));
        }
        Ok(())
    }

    fn log_statement(&self, statement: &str) {
        if self.statement_logging {
            log::info!("statement: {statement}");
        }
    }

    /// Queues an insert. The record identity is assigned by the store when
    /// the change is flushed.
    pub fn add(&mut self, table: &str, fields: Fields) -> Result<()> {
        self.ensure_open()?;
        self.log_statement(&format!("INSERT INTO {table}"));
        self.pending.push(PendingChange::Insert {
            table: table.to_string(),
            fields,
        });
        Ok(())
    }

    /// Queues a full-record update of the row with the given id.
    pub fn modify(&mut self, table: &str, id: u64, fields: Fields) -> Result<()> {
        self.ensure_open()?;
        self.log_statement(&format!("UPDATE {table} (id {id})"));
        self.pending.push(PendingChange::Update {
            table: table.to_string(),
            id,
            fields,
        });
        Ok(())
    }

    /// Queues a delete of the row with the given id.
    pub fn remove(&mut self, table: &str, id: u64) -> Result<()> {
        self.ensure_open()?;
        self.log_statement(&format!("DELETE FROM {table} (id {id})"));
        self.pending.push(PendingChange::Delete {
            table: table.to_string(),
            id,
        });
        Ok(())
    }

    /// Reads the committed records of a table. When tracking is enabled the
    /// retrieved records are registered in the tracking map.
    pub fn rows(&mut self, table: &str) -> Result<Vec<Record>> {
        self.ensure_open()?;
        self.log_statement(&format!("SELECT * FROM {table}"));
        let records = self.store.rows(table)?;
        if self.tracking {
            for record in &records {
                self.tracked
                    .insert((table.to_string(), record.id), record.clone());
            }
        }
        Ok(records)
    }

    /// Reads one committed record by id.
    pub fn find(&mut self, table: &str, id: u64) -> Result<Option<Record>> {
        self.ensure_open()?;
        self.log_statement(&format!("SELECT * FROM {table} WHERE id = {id}"));
        let record = self.store.find(table, id)?;
        if self.tracking {
            if let Some(record) = &record {
                self.tracked
                    .insert((table.to_string(), record.id), record.clone());
            }
        }
        Ok(record)
    }

    /// Changes queued but not yet flushed.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Records currently registered for change detection.
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // Shared lifecycle plumbing; the sync and async trait impls both
    // delegate here.

    pub(crate) fn begin_raw(&mut self, isolation: IsolationLevel) -> Result<MemoryTransactionHandle> {
        self.ensure_open()?;
        self.log_statement(&format!("BEGIN TRANSACTION ({isolation})"));
        let id = self.store.begin_txn(isolation)?;
        self.active_txn = Some(id);
        Ok(MemoryTransactionHandle {
            store: self.store.clone(),
            id,
            completed: false,
        })
    }

    pub(crate) fn save_raw(&mut self) -> Result<u64> {
        self.ensure_open()?;
        self.log_statement("SAVE CHANGES");
        let written = self.store.persist(&self.pending, self.active_txn)?;
        self.pending.clear();
        Ok(written)
    }

    pub(crate) fn close_raw(&mut self) {
        if self.closed {
            return;
        }
        if !self.pending.is_empty() {
            log::debug!(
                "context closed with {} unflushed change(s) discarded",
                self.pending.len()
            );
        }
        self.pending.clear();
        self.tracked.clear();
        self.closed = true;
    }

    pub(crate) fn set_tracking_raw(&mut self, enabled: bool) {
        self.tracking = enabled;
        if !enabled {
            self.tracked.clear();
        }
    }
}

impl StoreContext for MemoryContext {
    fn begin_transaction(
        &mut self,
        isolation: IsolationLevel,
    ) -> Result<Box<dyn TransactionHandle>> {
        Ok(Box::new(self.begin_raw(isolation)?))
    }

    fn save_changes(&mut self) -> Result<u64> {
        self.save_raw()
    }

    fn set_tracking(&mut self, enabled: bool) {
        self.set_tracking_raw(enabled);
    }

    fn close(&mut self) {
        self.close_raw();
    }
}

impl StatementLogging for MemoryContext {
    fn set_statement_logging(&mut self, enabled: bool) {
        self.statement_logging = enabled;
    }
}

/// Native transaction handle of the memory store.
///
/// Dropping a handle that was never completed rolls its stage back; that is
/// the store-side contract the transaction adapters build on.
pub struct MemoryTransactionHandle {
    store: MemoryStore,
    id: u64,
    completed: bool,
}

impl MemoryTransactionHandle {
    pub(crate) fn commit_raw(&mut self) -> Result<()> {
        if self.completed {
            return Err(SessionError::InvalidOperation(format!(
                "transaction {} is already completed",
                self.id
            )));
        }
        self.store.commit_txn(self.id)?;
        self.completed = true;
        Ok(())
    }

    pub(crate) fn rollback_raw(&mut self) -> Result<()> {
        if self.completed {
            return Err(SessionError::InvalidOperation(format!(
                "transaction {} is already completed",
                self.id
            )));
        }
        self.store.rollback_txn(self.id)?;
        self.completed = true;
        Ok(())
    }
}

impl TransactionHandle for MemoryTransactionHandle {
    fn commit(&mut self) -> Result<()> {
        self.commit_raw()
    }

    fn rollback(&mut self) -> Result<()> {
        self.rollback_raw()
    }
}

impl Drop for MemoryTransactionHandle {
    fn drop(&mut self) {
        if !self.completed {
            if let Err(err) = self.store.rollback_txn(self.id) {
                log::warn!("transaction {} rollback failed on drop: {err}", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::{Value, fields};

    #[test]
    fn test_changes_buffer_until_save() {
        let store = MemoryStore::new();
        let mut context = store.context();

        context
            .add("users", fields([("name", Value::from("alice"))]))
            .unwrap();
        assert_eq!(context.pending_count(), 1);
        assert_eq!(store.row_count("users").unwrap(), 0);

        let written = context.save_raw().unwrap();
        assert_eq!(written, 1);
        assert_eq!(context.pending_count(), 0);
        assert_eq!(store.row_count("users").unwrap(), 1);
    }

    #[test]
    fn test_failed_save_keeps_pending_buffer() {
        let store = MemoryStore::new();
        let mut context = store.context();

        context
            .modify("users", 99, fields([("name", Value::from("ghost"))]))
            .unwrap();
        assert!(context.save_raw().is_err());
        assert_eq!(context.pending_count(), 1);
    }

    #[test]
    fn test_tracking_registers_retrieved_records() {
        let store = MemoryStore::new();
        let mut writer = store.context();
        writer
            .add("users", fields([("name", Value::from("alice"))]))
            .unwrap();
        writer.save_raw().unwrap();

        let mut context = store.context();
        context.rows("users").unwrap();
        assert_eq!(context.tracked_count(), 1);
    }

    #[test]
    fn test_tracking_disabled_retains_no_metadata() {
        let store = MemoryStore::new();
        let mut writer = store.context();
        writer
            .add("users", fields([("name", Value::from("alice"))]))
            .unwrap();
        writer.save_raw().unwrap();

        let mut context = store.context();
        context.set_tracking_raw(false);
        context.rows("users").unwrap();
        assert_eq!(context.tracked_count(), 0);
    }

    #[test]
    fn test_closed_context_rejects_operations() {
        let store = MemoryStore::new();
        let mut context = store.context();
        context.close_raw();
        context.close_raw(); // second close is a no-op
        assert!(context.is_closed());

        let err = context
            .add("users", fields([("name", Value::from("x"))]))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidOperation(_)));
    }

    #[test]
    fn test_save_into_active_transaction_stages() {
        let store = MemoryStore::new();
        let mut context = store.context();

        let mut handle = context.begin_raw(IsolationLevel::ReadCommitted).unwrap();
        context
            .add("users", fields([("name", Value::from("alice"))]))
            .unwrap();
        context.save_raw().unwrap();
        assert_eq!(store.row_count("users").unwrap(), 0);

        handle.commit_raw().unwrap();
        assert_eq!(store.row_count("users").unwrap(), 1);
    }

    #[test]
    fn test_handle_drop_rolls_back_stage() {
        let store = MemoryStore::new();
        let mut context = store.context();

        let handle = context.begin_raw(IsolationLevel::ReadCommitted).unwrap();
        context
            .add("users", fields([("name", Value::from("alice"))]))
            .unwrap();
        context.save_raw().unwrap();
        drop(handle);

        assert_eq!(store.row_count("users").unwrap(), 0);
        // The transaction is gone; the next flush autocommits.
        context
            .add("users", fields([("name", Value::from("bob"))]))
            .unwrap();
        context.save_raw().unwrap();
        assert_eq!(store.row_count("users").unwrap(), 1);
    }
}
