/// Transaction adapter tests
///
/// The adapter contract: commit exactly once, explicit rollback on disposal
/// when commit was never called, and lifecycle misuse surfaced as errors.
/// Run with: cargo test --test transaction_tests
use dbsession::core::{IsolationLevel, SessionError};
use dbsession::memory::{MemoryStore, Value, fields};
use dbsession::session::{BeginTransaction, SaveChanges, TransactionalSession};
use dbsession::transaction::TransactionState;

#[test]
fn test_transaction_starts_active() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    let txn = session.begin_transaction().unwrap();
    assert_eq!(txn.state(), TransactionState::Active);
    assert!(txn.state().is_active());

    drop(txn);
    session.close().unwrap();
}

#[test]
fn test_commit_moves_to_terminal_state() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    let mut txn = session.begin_transaction().unwrap();
    txn.commit().unwrap();
    assert_eq!(txn.state(), TransactionState::Committed);
    assert!(txn.state().is_terminal());

    drop(txn);
    session.close().unwrap();
}

#[test]
fn test_double_commit_is_invalid_operation() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    let mut txn = session.begin_transaction().unwrap();
    txn.commit().unwrap();

    let err = txn.commit().unwrap_err();
    assert!(matches!(err, SessionError::InvalidOperation(_)));

    drop(txn);
    session.close().unwrap();
}

#[test]
fn test_commit_after_close_is_invalid_operation() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    let mut txn = session.begin_transaction().unwrap();
    txn.close().unwrap();
    assert_eq!(txn.state(), TransactionState::RolledBack);

    let err = txn.commit().unwrap_err();
    assert!(matches!(err, SessionError::InvalidOperation(_)));

    drop(txn);
    session.close().unwrap();
}

#[test]
fn test_close_is_idempotent() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    let mut txn = session.begin_transaction().unwrap();
    txn.close().unwrap();
    txn.close().unwrap();

    drop(txn);
    session.close().unwrap();
}

#[test]
fn test_drop_without_commit_observes_rollback() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    {
        let _txn = session.begin_transaction().unwrap();
        session
            .context_mut()
            .add("audit", fields([("event", Value::from("login"))]))
            .unwrap();
        session.save_changes().unwrap();
        // Adapter dropped here without commit.
    }

    assert_eq!(store.row_count("audit").unwrap(), 0);
    session.close().unwrap();
}

#[test]
fn test_commit_applies_staged_changes() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    let mut txn = session.begin_transaction_with(IsolationLevel::Serializable).unwrap();
    session
        .context_mut()
        .add("audit", fields([("event", Value::from("login"))]))
        .unwrap();
    session
        .context_mut()
        .add("audit", fields([("event", Value::from("logout"))]))
        .unwrap();
    session.save_changes().unwrap();

    txn.commit().unwrap();
    drop(txn);

    assert_eq!(store.row_count("audit").unwrap(), 2);
    session.close().unwrap();
}

#[test]
fn test_sequential_transactions_on_one_session() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    // First unit: committed.
    let mut txn = session.begin_transaction().unwrap();
    session
        .context_mut()
        .add("audit", fields([("event", Value::from("first"))]))
        .unwrap();
    session.save_changes().unwrap();
    txn.commit().unwrap();
    drop(txn);

    // Second unit on the same session: rolled back.
    let txn = session.begin_transaction().unwrap();
    session
        .context_mut()
        .add("audit", fields([("event", Value::from("second"))]))
        .unwrap();
    session.save_changes().unwrap();
    drop(txn);

    session.close().unwrap();

    let rows = store.rows("audit").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("event"), Some(&Value::from("first")));
}

#[test]
fn test_session_does_not_track_caller_owned_transactions() {
    let store = MemoryStore::new();
    let mut session = TransactionalSession::new(store.context()).unwrap();

    let txn = session.begin_transaction().unwrap();
    // Disposing the session does not dispose the caller's transaction.
    session.close().unwrap();
    assert_eq!(store.stats().unwrap().open_transactions, 1);

    drop(txn);
    assert_eq!(store.stats().unwrap().open_transactions, 0);
}
