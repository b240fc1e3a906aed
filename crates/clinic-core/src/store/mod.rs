// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Persistence seam.
//!
//! Storage is an external collaborator. The domain only sees the typed
//! [`Collection`] trait; [`MemoryCollection`] is the bundled backend.
//!
//! # Design Principles
//!
//! - **Typed ids**: each collection is keyed by its entity's id newtype.
//! - **Conditional writes**: uniqueness checks run inside the backend's own
//!   critical section (`insert_unique` / `update_unique`).
//! - **Rooms are read-only here**: room writes go through
//!   [`RoomCoordinator`](crate::RoomCoordinator); [`Store::rooms`] hands out
//!   a read-only [`RoomView`].

mod memory;

pub use memory::MemoryCollection;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    Appointment, Bill, Doctor, MedicalRecord, Patient, Prescription, Room, User,
};

// =============================================================================
// Entity
// =============================================================================

/// A persistable entity with a server-assigned id.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The id newtype.
    type Id: Copy + Ord + Debug + Send + Sync + From<u64> + Into<u64> + 'static;

    /// Entity name used in error messages, e.g. `"Patient"`.
    const KIND: &'static str;

    /// Returns the id.
    fn id(&self) -> Self::Id;

    /// Sets the id. Called by backends on insert.
    fn assign_id(&mut self, id: Self::Id);
}

/// A borrowed row predicate.
pub type Filter<'a, E> = &'a (dyn Fn(&E) -> bool + Send + Sync);

// =============================================================================
// Collection
// =============================================================================

/// Typed storage operations for one entity kind.
///
/// `list` returns rows in ascending id order; callers sort further as needed.
#[async_trait]
pub trait Collection<E: Entity>: Send + Sync {
    /// Fetches one entity.
    async fn get(&self, id: E::Id) -> CoreResult<Option<E>>;

    /// Returns every entity matching `filter`.
    async fn list(&self, filter: Filter<'_, E>) -> CoreResult<Vec<E>>;

    /// Counts entities matching `filter`.
    async fn count(&self, filter: Filter<'_, E>) -> CoreResult<usize>;

    /// Inserts a new entity and returns it with its assigned id.
    async fn insert(&self, entity: E) -> CoreResult<E>;

    /// Inserts unless an existing entity matches `clashes`.
    ///
    /// Returns `None` on a clash. The check and the write are atomic.
    async fn insert_unique(&self, entity: E, clashes: Filter<'_, E>) -> CoreResult<Option<E>>;

    /// Replaces an existing entity. Fails with `NotFound` if it is gone.
    async fn update(&self, entity: E) -> CoreResult<E>;

    /// Replaces an existing entity unless another entity matches `clashes`.
    ///
    /// The entity itself is never considered a clash.
    async fn update_unique(&self, entity: E, clashes: Filter<'_, E>) -> CoreResult<Option<E>>;

    /// Deletes an entity. Returns `false` if it did not exist.
    async fn delete(&self, id: E::Id) -> CoreResult<bool>;

    /// Fetches one entity or fails with `NotFound`.
    async fn require(&self, id: E::Id) -> CoreResult<E> {
        self.get(id)
            .await?
            .ok_or_else(|| CoreError::not_found(E::KIND, id))
    }

    /// Returns every entity.
    async fn list_all(&self) -> CoreResult<Vec<E>> {
        self.list(&|_| true).await
    }

    /// Counts every entity.
    async fn count_all(&self) -> CoreResult<usize> {
        self.count(&|_| true).await
    }
}

// =============================================================================
// Store
// =============================================================================

/// The backends a [`Store`] is assembled from.
pub struct Collections {
    /// Login accounts.
    pub users: Arc<dyn Collection<User>>,
    /// Patients.
    pub patients: Arc<dyn Collection<Patient>>,
    /// Doctors.
    pub doctors: Arc<dyn Collection<Doctor>>,
    /// Appointments.
    pub appointments: Arc<dyn Collection<Appointment>>,
    /// Medical records.
    pub medical_records: Arc<dyn Collection<MedicalRecord>>,
    /// Prescriptions.
    pub prescriptions: Arc<dyn Collection<Prescription>>,
    /// Bills.
    pub bills: Arc<dyn Collection<Bill>>,
    /// Rooms.
    pub rooms: Arc<dyn Collection<Room>>,
}

impl Collections {
    /// In-memory backends for every collection.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryCollection::new()),
            patients: Arc::new(MemoryCollection::new()),
            doctors: Arc::new(MemoryCollection::new()),
            appointments: Arc::new(MemoryCollection::new()),
            medical_records: Arc::new(MemoryCollection::new()),
            prescriptions: Arc::new(MemoryCollection::new()),
            bills: Arc::new(MemoryCollection::new()),
            rooms: Arc::new(MemoryCollection::new()),
        }
    }
}

/// Shared handle to every collection. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    /// Login accounts.
    pub users: Arc<dyn Collection<User>>,
    /// Patients. Deletion must go through the room coordinator.
    pub patients: Arc<dyn Collection<Patient>>,
    /// Doctors.
    pub doctors: Arc<dyn Collection<Doctor>>,
    /// Appointments.
    pub appointments: Arc<dyn Collection<Appointment>>,
    /// Medical records.
    pub medical_records: Arc<dyn Collection<MedicalRecord>>,
    /// Prescriptions.
    pub prescriptions: Arc<dyn Collection<Prescription>>,
    /// Bills.
    pub bills: Arc<dyn Collection<Bill>>,
    rooms: Arc<dyn Collection<Room>>,
}

impl Store {
    /// Assembles a store from backends.
    pub fn new(collections: Collections) -> Self {
        Self {
            users: collections.users,
            patients: collections.patients,
            doctors: collections.doctors,
            appointments: collections.appointments,
            medical_records: collections.medical_records,
            prescriptions: collections.prescriptions,
            bills: collections.bills,
            rooms: collections.rooms,
        }
    }

    /// A store backed entirely by memory.
    pub fn in_memory() -> Self {
        Self::new(Collections::in_memory())
    }

    /// Read-only access to rooms.
    pub fn rooms(&self) -> RoomView {
        RoomView {
            inner: Arc::clone(&self.rooms),
        }
    }

    pub(crate) fn room_collection(&self) -> &dyn Collection<Room> {
        self.rooms.as_ref()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

/// Read-only view over the room collection.
#[derive(Clone)]
pub struct RoomView {
    inner: Arc<dyn Collection<Room>>,
}

impl RoomView {
    /// Fetches one room.
    pub async fn get(&self, id: crate::types::RoomId) -> CoreResult<Option<Room>> {
        self.inner.get(id).await
    }

    /// Fetches one room or fails with `NotFound`.
    pub async fn require(&self, id: crate::types::RoomId) -> CoreResult<Room> {
        self.inner.require(id).await
    }

    /// Returns every room matching `filter`.
    pub async fn list(&self, filter: Filter<'_, Room>) -> CoreResult<Vec<Room>> {
        self.inner.list(filter).await
    }

    /// Counts rooms matching `filter`.
    pub async fn count(&self, filter: Filter<'_, Room>) -> CoreResult<usize> {
        self.inner.count(filter).await
    }
}
