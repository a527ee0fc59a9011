// ============================================================================
// Bundled In-Memory Store Backend
// ============================================================================
//
// A reference implementation of the context contract: staged transactional
// writes, auto-assigned record identities, and tracking metadata. Useful as
// a test double for session-based code and as the backend the crate's own
// suite runs against.
//
// ============================================================================

pub mod async_context;
pub mod context;
pub mod store;
pub mod value;

pub use async_context::{AsyncMemoryContext, AsyncMemoryTransactionHandle};
pub use context::{MemoryContext, MemoryTransactionHandle};
pub use store::{MemoryStore, StoreStats};
pub use value::{Fields, Record, Value, fields};
