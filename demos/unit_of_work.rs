//! Synchronous unit-of-work walkthrough over the bundled memory store.
//!
//! Run with: cargo run --example unit_of_work

use anyhow::Result;
use dbsession::config::{StoreSettings, apply_statement_logging};
use dbsession::core::IsolationLevel;
use dbsession::memory::{MemoryStore, Value, fields};
use dbsession::session::{
    BeginTransaction, ReadOnlySession, SaveChanges, Session, SessionOptions, TransactionalSession,
};
use serde_json::json;

fn main() -> Result<()> {
    let config = json!({
        "database": {
            "connection_string": "memory://demo",
            "logging_enabled": true
        }
    });
    let settings = StoreSettings::from_configuration(&config)?;

    let store = MemoryStore::new();

    // A mutable session: changes only land once save_changes is called.
    let mut context = store.context();
    apply_statement_logging(&mut context, &settings);
    let mut session = Session::new(context)?;
    session
        .context_mut()
        .add("customers", fields([("name", Value::from("Acme Corp"))]))?;
    session
        .context_mut()
        .add("customers", fields([("name", Value::from("Globex"))]))?;
    let written = session.save_changes()?;
    session.close()?;
    println!("persisted {written} customer(s)");

    // A forgotten save_changes discards the work.
    let mut session = Session::new(store.context())?;
    session
        .context_mut()
        .add("customers", fields([("name", Value::from("Initech"))]))?;
    session.close()?;
    println!(
        "after dispose-without-save the store still has {} customer(s)",
        store.row_count("customers")?
    );

    // Caller-owned transaction: save_changes stages, commit publishes.
    let mut session = TransactionalSession::new(store.context())?;
    let mut txn = session.begin_transaction_with(IsolationLevel::Serializable)?;
    session
        .context_mut()
        .add("invoices", fields([("total", Value::from(1250.0))]))?;
    session.save_changes()?;
    txn.commit()?;
    drop(txn);
    session.close()?;
    println!("invoices committed: {}", store.row_count("invoices")?);

    // Read-only pass with tracking disabled.
    let mut reader = ReadOnlySession::with_options(
        store.context(),
        SessionOptions::new().disable_tracking(),
    )?;
    for record in reader.context_mut().rows("customers")? {
        println!("customer #{}: {}", record.id, record.get("name").unwrap());
    }
    reader.close()?;

    Ok(())
}
