use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::core::{IsolationLevel, Result, SessionError};
use crate::memory::value::{Fields, Record};

/// One buffered modification, recorded by a context and applied by the
/// store when the unit of work is flushed.
#[derive(Debug, Clone)]
pub(crate) enum PendingChange {
    Insert { table: String, fields: Fields },
    Update { table: String, id: u64, fields: Fields },
    Delete { table: String, id: u64 },
}

#[derive(Debug, Default)]
struct Table {
    next_id: u64,
    records: Vec<Record>,
}

impl Table {
    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

/// Writes flushed while a transaction is open are parked here until the
/// transaction commits; rollback discards the whole stage.
#[derive(Debug)]
struct Stage {
    isolation: IsolationLevel,
    changes: Vec<PendingChange>,
}

#[derive(Debug, Default)]
struct StoreInner {
    tables: BTreeMap<String, Table>,
    stages: HashMap<u64, Stage>,
    next_txn_id: u64,
    persist_calls: u64,
    last_persist_at: Option<DateTime<Utc>>,
}

/// Counters exposed for verification and diagnostics.
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Number of flush calls the store has served, staged or direct.
    pub persist_calls: u64,
    /// Transactions currently open against the store.
    pub open_transactions: usize,
    pub last_persist_at: Option<DateTime<Utc>>,
}

/// Shared in-memory store. Cloning the handle shares the same data;
/// contexts spawned from any clone observe one store.
///
/// This is the bundled reference backend: it implements the context
/// contract end to end (staged transactional writes, auto-assigned record
/// identities, tracking metadata) and is what the crate's own test suite
/// runs against.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an owned synchronous context over this store.
    pub fn context(&self) -> crate::memory::MemoryContext {
        crate::memory::MemoryContext::new(self.clone())
    }

    /// Spawns an owned asynchronous context over this store.
    pub fn async_context(&self) -> crate::memory::AsyncMemoryContext {
        crate::memory::AsyncMemoryContext::new(self.clone())
    }

    /// Committed records of a table, in insertion order. Unknown tables
    /// read as empty.
    pub fn rows(&self, table: &str) -> Result<Vec<Record>> {
        let inner = self.inner.read()?;
        Ok(inner
            .tables
            .get(table)
            .map(|t| t.records.clone())
            .unwrap_or_default())
    }

    pub fn row_count(&self, table: &str) -> Result<usize> {
        let inner = self.inner.read()?;
        Ok(inner.tables.get(table).map(|t| t.records.len()).unwrap_or(0))
    }

    pub fn find(&self, table: &str, id: u64) -> Result<Option<Record>> {
        let inner = self.inner.read()?;
        Ok(inner.tables.get(table).and_then(|t| {
            t.position(id).map(|index| t.records[index].clone())
        }))
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let inner = self.inner.read()?;
        Ok(StoreStats {
            persist_calls: inner.persist_calls,
            open_transactions: inner.stages.len(),
            last_persist_at: inner.last_persist_at,
        })
    }

    /// Opens a native transaction and returns its id.
    ///
    /// The staging model gives read-committed visibility regardless of the
    /// requested level; the level is recorded with the stage and surfaced in
    /// logs.
    pub(crate) fn begin_txn(&self, isolation: IsolationLevel) -> Result<u64> {
        let mut inner = self.inner.write()?;
        inner.next_txn_id += 1;
        let id = inner.next_txn_id;
        inner.stages.insert(
            id,
            Stage {
                isolation,
                changes: Vec::new(),
            },
        );
        log::debug!("store: transaction {id} opened ({isolation})");
        Ok(id)
    }

    pub(crate) fn commit_txn(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.write()?;
        if !inner.stages.contains_key(&id) {
            return Err(SessionError::InvalidOperation(format!(
                "transaction {id} is not active"
            )));
        }
        // Validate against committed state while the stage is still intact,
        // so a failed commit leaves the transaction active and the caller's
        // disposal path rolls it back.
        validate(&inner, &inner.stages[&id].changes)?;
        let stage = inner
            .stages
            .remove(&id)
            .expect("stage checked above");
        apply(&mut inner, &stage.changes);
        log::debug!(
            "store: transaction {id} committed ({} staged change(s))",
            stage.changes.len()
        );
        Ok(())
    }

    pub(crate) fn rollback_txn(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.write()?;
        match inner.stages.remove(&id) {
            Some(stage) => {
                log::debug!(
                    "store: transaction {id} ({}) rolled back, {} staged change(s) discarded",
                    stage.isolation,
                    stage.changes.len()
                );
                Ok(())
            }
            None => Err(SessionError::InvalidOperation(format!(
                "transaction {id} is not active"
            ))),
        }
    }

    /// Flushes a unit of work's pending changes.
    ///
    /// When `txn` names a still-open transaction the batch is staged under
    /// it; otherwise it is validated and applied atomically under the store
    /// lock (the implicit transaction). The pending buffer is only drained
    /// by the caller after this returns `Ok`.
    pub(crate) fn persist(&self, changes: &[PendingChange], txn: Option<u64>) -> Result<u64> {
        let mut inner = self.inner.write()?;
        let staged = match txn {
            Some(id) if inner.stages.contains_key(&id) => {
                validate(&inner, changes)?;
                let stage = inner
                    .stages
                    .get_mut(&id)
                    .expect("stage checked above");
                stage.changes.extend_from_slice(changes);
                true
            }
            _ => {
                validate(&inner, changes)?;
                apply(&mut inner, changes);
                false
            }
        };
        inner.persist_calls += 1;
        inner.last_persist_at = Some(Utc::now());
        log::debug!(
            "store: {} change(s) {}",
            changes.len(),
            if staged { "staged" } else { "applied" }
        );
        Ok(changes.len() as u64)
    }
}

/// Rejects updates and deletes whose target row does not exist in the
/// committed state. Inserts are always valid; their identities are assigned
/// at apply time.
fn validate(inner: &StoreInner, changes: &[PendingChange]) -> Result<()> {
    for change in changes {
        let (table, id) = match change {
            PendingChange::Insert { .. } => continue,
            PendingChange::Update { table, id, .. } => (table, id),
            PendingChange::Delete { table, id } => (table, id),
        };
        let found = inner
            .tables
            .get(table)
            .and_then(|t| t.position(*id))
            .is_some();
        if !found {
            return Err(SessionError::Store(format!(
                "no row with id {id} in table '{table}'"
            )));
        }
    }
    Ok(())
}

fn apply(inner: &mut StoreInner, changes: &[PendingChange]) {
    for change in changes {
        match change {
            PendingChange::Insert { table, fields } => {
                let table = inner.tables.entry(table.clone()).or_default();
                table.next_id += 1;
                table.records.push(Record {
                    id: table.next_id,
                    fields: fields.clone(),
                });
            }
            PendingChange::Update { table, id, fields } => {
                if let Some(table) = inner.tables.get_mut(table) {
                    if let Some(index) = table.position(*id) {
                        table.records[index].fields = fields.clone();
                    }
                }
            }
            PendingChange::Delete { table, id } => {
                if let Some(table) = inner.tables.get_mut(table) {
                    if let Some(index) = table.position(*id) {
                        table.records.remove(index);
                    }
                }
            }
        }
    }
}
