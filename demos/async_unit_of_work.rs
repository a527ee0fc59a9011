//! Asynchronous unit-of-work walkthrough; same semantics as the blocking
//! demo, only the suspension model differs.
//!
//! Run with: cargo run --example async_unit_of_work

use anyhow::Result;
use dbsession::core::IsolationLevel;
use dbsession::memory::{MemoryStore, Value, fields};
use dbsession::session::{
    AsyncBeginTransaction, AsyncReadOnlySession, AsyncSaveChanges, AsyncSession,
    AsyncTransactionalSession, SessionOptions,
};

#[tokio::main]
async fn main() -> Result<()> {
    let store = MemoryStore::new();

    let mut session = AsyncSession::new(store.async_context()).await?;
    session
        .context_mut()
        .add("customers", fields([("name", Value::from("Acme Corp"))]))?;
    let written = session.save_changes().await?;
    session.close().await?;
    println!("persisted {written} customer(s)");

    let mut session = AsyncTransactionalSession::new(store.async_context()).await?;
    let mut txn = session
        .begin_transaction_with(IsolationLevel::ReadCommitted)
        .await?;
    session
        .context_mut()
        .add("invoices", fields([("total", Value::from(99.0))]))?;
    session.save_changes().await?;
    txn.commit().await?;
    txn.close().await?;
    session.close().await?;
    println!("invoices committed: {}", store.row_count("invoices")?);

    let mut reader = AsyncReadOnlySession::with_options(
        store.async_context(),
        SessionOptions::new().isolation(IsolationLevel::RepeatableRead),
    )
    .await?;
    for record in reader.context_mut().rows("customers").await? {
        println!("customer #{}: {}", record.id, record.get("name").unwrap());
    }
    reader.close().await?;

    Ok(())
}
