// ============================================================================
// Session Registration
// ============================================================================
//
// Thin composition-root glue: a factory seam for context handles and a
// registry mapping session types to zero-argument factory closures. The
// lifetime policy is transient: every resolve produces a fresh instance the
// caller must dispose.
//
// ============================================================================

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use async_trait::async_trait;

use crate::context::{AsyncStoreContext, StoreContext};
use crate::core::{Result, SessionError};
use crate::memory::{AsyncMemoryContext, MemoryContext, MemoryStore};

/// Supplies connection-ready context handles, one per unit of work.
pub trait ContextFactory: Send + Sync {
    type Context: StoreContext;

    fn create_context(&self) -> Result<Self::Context>;
}

/// Asynchronous twin of [`ContextFactory`].
#[async_trait]
pub trait AsyncContextFactory: Send + Sync {
    type Context: AsyncStoreContext;

    async fn create_context(&self) -> Result<Self::Context>;
}

impl ContextFactory for MemoryStore {
    type Context = MemoryContext;

    fn create_context(&self) -> Result<Self::Context> {
        Ok(self.context())
    }
}

#[async_trait]
impl AsyncContextFactory for MemoryStore {
    type Context = AsyncMemoryContext;

    async fn create_context(&self) -> Result<Self::Context> {
        Ok(self.async_context())
    }
}

type Factory<S> = Box<dyn Fn() -> Result<S> + Send + Sync>;

/// Maps session types to their factory closures.
///
/// ```
/// use dbsession::memory::MemoryStore;
/// use dbsession::registry::SessionRegistry;
/// use dbsession::session::Session;
/// use dbsession::memory::MemoryContext;
///
/// let store = MemoryStore::new();
/// let mut registry = SessionRegistry::new();
/// registry.register(move || Session::new(store.context()));
///
/// let session: Session<MemoryContext> = registry.resolve().unwrap();
/// session.close().unwrap();
/// ```
#[derive(Default)]
pub struct SessionRegistry {
    factories: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a zero-argument factory for a session type. A later
    /// registration for the same type replaces the earlier one.
    pub fn register<S, F>(&mut self, factory: F)
    where
        S: 'static,
        F: Fn() -> Result<S> + Send + Sync + 'static,
    {
        let boxed: Factory<S> = Box::new(factory);
        self.factories.insert(TypeId::of::<S>(), Box::new(boxed));
    }

    /// Produces a fresh instance of the requested session type. The caller
    /// owns and must dispose it.
    pub fn resolve<S: 'static>(&self) -> Result<S> {
        let entry = self.factories.get(&TypeId::of::<S>()).ok_or_else(|| {
            SessionError::InvalidArgument(format!(
                "no session factory registered for {}",
                type_name::<S>()
            ))
        })?;
        let factory = entry.downcast_ref::<Factory<S>>().ok_or_else(|| {
            SessionError::InvalidOperation(format!(
                "registered factory for {} has an unexpected type",
                type_name::<S>()
            ))
        })?;
        factory()
    }

    pub fn contains<S: 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<S>())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
