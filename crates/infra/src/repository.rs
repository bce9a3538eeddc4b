//! Persistence collaborator for transactions, vouchers and accounts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use bookkeep_core::{DomainError, DomainResult, Entity};

/// CRUD store keyed by an entity's integer-backed id.
///
/// `list` returns records in insertion order.
pub trait Repository<E: Entity>: Send + Sync {
    /// Allocate an id for a record about to be inserted.
    fn next_id(&self) -> E::Id;
    fn get(&self, id: &E::Id) -> Option<E>;
    fn list(&self) -> Vec<E>;
    fn insert(&self, entity: E) -> DomainResult<()>;
    fn update(&self, entity: E) -> DomainResult<()>;
    fn remove(&self, id: &E::Id) -> DomainResult<E>;
}

impl<E, S> Repository<E> for Arc<S>
where
    E: Entity,
    S: Repository<E> + ?Sized,
{
    fn next_id(&self) -> E::Id {
        (**self).next_id()
    }

    fn get(&self, id: &E::Id) -> Option<E> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<E> {
        (**self).list()
    }

    fn insert(&self, entity: E) -> DomainResult<()> {
        (**self).insert(entity)
    }

    fn update(&self, entity: E) -> DomainResult<()> {
        (**self).update(entity)
    }

    fn remove(&self, id: &E::Id) -> DomainResult<E> {
        (**self).remove(id)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    records: RwLock<Vec<E>>,
    next: AtomicU64,
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next: AtomicU64::new(1),
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> DomainError {
    DomainError::invariant("repository lock poisoned")
}

impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Entity + Clone + Send + Sync + 'static,
    E::Id: Into<u64>,
{
    fn next_id(&self) -> E::Id {
        <E::Id as From<u64>>::from(self.next.fetch_add(1, Ordering::SeqCst))
    }

    fn get(&self, id: &E::Id) -> Option<E> {
        let records = self.records.read().ok()?;
        records.iter().find(|e| e.id() == id).cloned()
    }

    fn list(&self) -> Vec<E> {
        match self.records.read() {
            Ok(records) => records.clone(),
            Err(_) => vec![],
        }
    }

    fn insert(&self, entity: E) -> DomainResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.iter().any(|e| e.id() == entity.id()) {
            return Err(DomainError::conflict(format!("id {:?} already exists", entity.id())));
        }
        // Keep the allocator ahead of explicitly supplied ids (seed data).
        let raw: u64 = (*entity.id()).into();
        self.next.fetch_max(raw + 1, Ordering::SeqCst);
        records.push(entity);
        Ok(())
    }

    fn update(&self, entity: E) -> DomainResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let slot = records
            .iter_mut()
            .find(|e| e.id() == entity.id())
            .ok_or_else(|| DomainError::not_found(format!("{:?}", entity.id())))?;
        *slot = entity;
        Ok(())
    }

    fn remove(&self, id: &E::Id) -> DomainResult<E> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let idx = records
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| DomainError::not_found(format!("{id:?}")))?;
        Ok(records.remove(idx))
    }
}
