/// Async session lifecycle tests
///
/// The async twins must preserve the exact semantics of their blocking
/// counterparts; only the suspension model differs.
/// Run with: cargo test --test async_session_tests
use dbsession::core::{IsolationLevel, SessionError};
use dbsession::memory::{MemoryStore, Value, fields};
use dbsession::session::{
    AsyncBeginTransaction, AsyncReadOnlySession, AsyncSaveChanges, AsyncSession,
    AsyncTransactionalSession, SessionOptions,
};

#[tokio::test]
async fn test_async_read_only_session_reads_rows() {
    let store = MemoryStore::new();
    let mut writer = AsyncSession::new(store.async_context()).await.unwrap();
    writer
        .context_mut()
        .add("users", fields([("name", Value::from("alice"))]))
        .unwrap();
    writer.save_changes().await.unwrap();
    writer.close().await.unwrap();

    let mut session = AsyncReadOnlySession::new(store.async_context()).await.unwrap();
    let rows = session.context_mut().rows("users").await.unwrap();
    assert_eq!(rows.len(), 1);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_async_isolation_level_opens_startup_transaction() {
    let store = MemoryStore::new();

    let session = AsyncReadOnlySession::with_options(
        store.async_context(),
        SessionOptions::new().isolation(IsolationLevel::RepeatableRead),
    )
    .await
    .unwrap();

    assert!(session.has_startup_transaction());
    assert_eq!(store.stats().unwrap().open_transactions, 1);

    session.close().await.unwrap();
    assert_eq!(store.stats().unwrap().open_transactions, 0);
}

#[tokio::test]
async fn test_async_save_assigns_identity() {
    let store = MemoryStore::new();

    let mut session = AsyncSession::new(store.async_context()).await.unwrap();
    session
        .context_mut()
        .add("users", fields([("name", Value::from("carol"))]))
        .unwrap();
    session.save_changes().await.unwrap();
    session.close().await.unwrap();

    // Exactly one new record, with the store-assigned identity.
    let rows = store.rows("users").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert_eq!(store.stats().unwrap().persist_calls, 1);
}

#[tokio::test]
async fn test_async_dispose_without_save_discards_changes() {
    let store = MemoryStore::new();

    let mut session = AsyncSession::new(store.async_context()).await.unwrap();
    session
        .context_mut()
        .add("users", fields([("name", Value::from("dave"))]))
        .unwrap();
    session.close().await.unwrap();

    assert_eq!(store.row_count("users").unwrap(), 0);
}

#[tokio::test]
async fn test_async_commit_without_save_writes_nothing() {
    let store = MemoryStore::new();

    let mut session = AsyncTransactionalSession::with_options(
        store.async_context(),
        SessionOptions::new().isolation(IsolationLevel::ReadCommitted),
    )
    .await
    .unwrap();

    session
        .context_mut()
        .add("users", fields([("name", Value::from("erin"))]))
        .unwrap();

    let mut txn = session.begin_transaction().await.unwrap();
    txn.commit().await.unwrap();
    txn.close().await.unwrap();
    session.close().await.unwrap();

    assert_eq!(store.row_count("users").unwrap(), 0);
}

#[tokio::test]
async fn test_async_save_then_commit_is_visible() {
    let store = MemoryStore::new();

    let mut session = AsyncTransactionalSession::new(store.async_context())
        .await
        .unwrap();
    let mut txn = session.begin_transaction().await.unwrap();

    session
        .context_mut()
        .add("orders", fields([("total", Value::from(42.0))]))
        .unwrap();
    session.save_changes().await.unwrap();
    assert_eq!(store.row_count("orders").unwrap(), 0);

    txn.commit().await.unwrap();
    txn.close().await.unwrap();
    session.close().await.unwrap();

    assert_eq!(store.row_count("orders").unwrap(), 1);
}

#[tokio::test]
async fn test_async_double_commit_is_invalid_operation() {
    let store = MemoryStore::new();

    let mut session = AsyncTransactionalSession::new(store.async_context())
        .await
        .unwrap();
    let mut txn = session.begin_transaction().await.unwrap();

    txn.commit().await.unwrap();
    let err = txn.commit().await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidOperation(_)));

    txn.close().await.unwrap();
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_async_transaction_close_rolls_back_stage() {
    let store = MemoryStore::new();

    let mut session = AsyncTransactionalSession::new(store.async_context())
        .await
        .unwrap();
    let mut txn = session.begin_transaction().await.unwrap();

    session
        .context_mut()
        .add("orders", fields([("total", Value::from(7.0))]))
        .unwrap();
    session.save_changes().await.unwrap();

    txn.close().await.unwrap();
    session.close().await.unwrap();

    assert_eq!(store.row_count("orders").unwrap(), 0);
}

#[test]
fn test_async_session_on_block_on() {
    // The async family does not require a multithreaded runtime.
    tokio_test::block_on(async {
        let store = MemoryStore::new();
        let mut session = AsyncSession::new(store.async_context()).await.unwrap();
        session
            .context_mut()
            .add("users", fields([("name", Value::from("frank"))]))
            .unwrap();
        session.save_changes().await.unwrap();
        session.close().await.unwrap();
        assert_eq!(store.row_count("users").unwrap(), 1);
    });
}
