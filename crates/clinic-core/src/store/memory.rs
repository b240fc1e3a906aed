// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory collection backend.
//!
//! Rows live in a `BTreeMap` behind a `parking_lot::RwLock`; ids come from an
//! atomic counter. Nothing is persisted across restarts.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use super::{Collection, Entity, Filter};
use crate::error::{CoreError, CoreResult};

/// A thread-safe in-memory [`Collection`].
#[derive(Debug)]
pub struct MemoryCollection<E: Entity> {
    rows: RwLock<BTreeMap<E::Id, E>>,
    next_id: AtomicU64,
}

impl<E: Entity> MemoryCollection<E> {
    /// Creates an empty collection. Ids start at 1.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    fn allocate(&self, entity: &mut E) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        entity.assign_id(E::Id::from(id));
    }
}

impl<E: Entity> Default for MemoryCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Collection<E> for MemoryCollection<E> {
    async fn get(&self, id: E::Id) -> CoreResult<Option<E>> {
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn list(&self, filter: Filter<'_, E>) -> CoreResult<Vec<E>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|row| filter(row))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: Filter<'_, E>) -> CoreResult<usize> {
        Ok(self.rows.read().values().filter(|row| filter(row)).count())
    }

    async fn insert(&self, mut entity: E) -> CoreResult<E> {
        self.allocate(&mut entity);
        self.rows.write().insert(entity.id(), entity.clone());
        trace!(kind = E::KIND, id = ?entity.id(), "Inserted");
        Ok(entity)
    }

    async fn insert_unique(&self, mut entity: E, clashes: Filter<'_, E>) -> CoreResult<Option<E>> {
        let mut rows = self.rows.write();
        if rows.values().any(|row| clashes(row)) {
            return Ok(None);
        }
        self.allocate(&mut entity);
        rows.insert(entity.id(), entity.clone());
        Ok(Some(entity))
    }

    async fn update(&self, entity: E) -> CoreResult<E> {
        let mut rows = self.rows.write();
        match rows.get_mut(&entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(CoreError::not_found(E::KIND, entity.id())),
        }
    }

    async fn update_unique(&self, entity: E, clashes: Filter<'_, E>) -> CoreResult<Option<E>> {
        let mut rows = self.rows.write();
        let id = entity.id();
        if !rows.contains_key(&id) {
            return Err(CoreError::not_found(E::KIND, id));
        }
        if rows.values().any(|row| row.id() != id && clashes(row)) {
            return Ok(None);
        }
        rows.insert(id, entity.clone());
        Ok(Some(entity))
    }

    async fn delete(&self, id: E::Id) -> CoreResult<bool> {
        Ok(self.rows.write().remove(&id).is_some())
    }
}
