// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Room state coordinator.
//!
//! The only code path that writes rooms. It keeps the patient/room pairing a
//! partial bijection: a room hosts at most one patient and a patient occupies
//! at most one room.
//!
//! # Locking
//!
//! Each room and each patient has an async mutex, created on first use and
//! dropped again once no operation holds or waits on it.
//! Locks are always taken room first, then patient, so two operations can
//! never wait on each other in a cycle. The read-modify-write of a room
//! happens entirely under its lock, which is what makes two concurrent
//! assignments of the same room resolve to one winner.
//!
//! The patient side is tracked in an occupancy index (`patient -> room`)
//! maintained by the same operations, so no room scan is needed to detect a
//! patient that is already placed.

use std::hash::Hash;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::error::{ConflictError, CoreError, CoreResult};
use crate::models::{Room, RoomInput};
use crate::store::{Collection, Entity, Store};
use crate::types::{PatientId, RoomId};

type LockMap<K> = DashMap<K, Arc<Mutex<()>>>;

// =============================================================================
// RoomCoordinator
// =============================================================================

/// Serializes every room mutation and patient deletion.
pub struct RoomCoordinator {
    store: Store,
    room_locks: LockMap<RoomId>,
    patient_locks: LockMap<PatientId>,
    occupancy: DashMap<PatientId, RoomId>,
}

impl RoomCoordinator {
    /// Creates a coordinator over `store`.
    ///
    /// Call [`rebuild_index`](Self::rebuild_index) once if the store may
    /// already contain occupied rooms.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            room_locks: DashMap::new(),
            patient_locks: DashMap::new(),
            occupancy: DashMap::new(),
        }
    }

    /// Rebuilds the occupancy index from stored rooms.
    pub async fn rebuild_index(&self) -> CoreResult<usize> {
        let rooms = self.store.room_collection().list_all().await?;
        self.occupancy.clear();
        for room in &rooms {
            if let Some(patient) = room.occupant() {
                self.occupancy.insert(patient, room.id);
            }
        }
        info!(occupied = self.occupancy.len(), "Room occupancy index rebuilt");
        Ok(self.occupancy.len())
    }

    /// The room a patient currently occupies, if any.
    pub fn room_of(&self, patient: PatientId) -> Option<RoomId> {
        self.occupancy.get(&patient).map(|entry| *entry.value())
    }

    // ===== Room CRUD =====

    /// Creates an unoccupied room. Room numbers are unique.
    pub async fn create_room(&self, input: RoomInput) -> CoreResult<Room> {
        input.validate()?;
        let room = Room::from_input(input, Utc::now());
        let number = room.room_number.clone();

        let created = self
            .store
            .room_collection()
            .insert_unique(room, &|other: &Room| other.room_number == number)
            .await?
            .ok_or_else(|| duplicate_number(&number))?;

        info!(room = %created.id, number = %created.room_number, "Room created");
        Ok(created)
    }

    /// Updates number, type and status of a room.
    ///
    /// The status of an occupied room can only change through
    /// [`assign`](Self::assign).
    pub async fn update_room(&self, id: RoomId, input: RoomInput) -> CoreResult<Room> {
        input.validate()?;
        let _room_guard = lock(&self.room_locks, id).await;
        let rooms = self.store.room_collection();

        let mut room = rooms.require(id).await?;
        if room.is_occupied() && input.status.is_some() {
            return Err(ConflictError::RoomInUse { room: id }.into());
        }

        room.apply(input, Utc::now());
        let number = room.room_number.clone();
        rooms
            .update_unique(room, &|other: &Room| other.room_number == number)
            .await?
            .ok_or_else(|| duplicate_number(&number))
    }

    /// Deletes a room, releasing its occupant.
    pub async fn delete_room(&self, id: RoomId) -> CoreResult<()> {
        let _room_guard = lock(&self.room_locks, id).await;
        let rooms = self.store.room_collection();

        let room = rooms.require(id).await?;
        if let Some(patient) = room.occupant() {
            let _patient_guard = lock(&self.patient_locks, patient).await;
            self.occupancy.remove_if(&patient, |_, room| *room == id);
        }
        if !rooms.delete(id).await? {
            return Err(CoreError::not_found(Room::KIND, id));
        }

        info!(room = %id, "Room deleted");
        Ok(())
    }

    // ===== Assignment =====

    /// Assigns `patient` to a room, or releases the room when `None`.
    ///
    /// Assigning the current occupant again is a no-op. Assigning a different
    /// patient to an occupied room fails with
    /// [`ConflictError::RoomOccupied`] and leaves the room untouched.
    /// Releasing always leaves the room `Available`.
    pub async fn assign(&self, id: RoomId, patient: Option<PatientId>) -> CoreResult<Room> {
        let _room_guard = lock(&self.room_locks, id).await;
        let room = self.store.room_collection().require(id).await?;

        match patient {
            Some(patient) => self.occupy(room, patient).await,
            None => self.release(room).await,
        }
    }

    async fn occupy(&self, mut room: Room, patient: PatientId) -> CoreResult<Room> {
        let _patient_guard = lock(&self.patient_locks, patient).await;
        self.store.patients.require(patient).await?;

        match room.occupant() {
            Some(current) if current == patient => return Ok(room),
            Some(current) => {
                debug!(room = %room.id, occupant = %current, requested = %patient, "Room already occupied");
                return Err(ConflictError::RoomOccupied {
                    room: room.id,
                    occupant: current,
                }
                .into());
            }
            None => {}
        }

        if let Some(other) = self.room_of(patient) {
            if other != room.id {
                return Err(ConflictError::PatientAlreadyAssigned {
                    patient,
                    room: other,
                }
                .into());
            }
        }

        room.occupy(patient, Utc::now());
        let room = self.store.room_collection().update(room).await?;
        self.occupancy.insert(patient, room.id);

        info!(room = %room.id, patient = %patient, "Patient assigned to room");
        Ok(room)
    }

    async fn release(&self, mut room: Room) -> CoreResult<Room> {
        let previous = room.occupant();
        let _patient_guard = match previous {
            Some(patient) => Some(lock(&self.patient_locks, patient).await),
            None => None,
        };

        room.release(Utc::now());
        let room = self.store.room_collection().update(room).await?;

        if let Some(patient) = previous {
            self.occupancy.remove_if(&patient, |_, occupied| *occupied == room.id);
            info!(room = %room.id, patient = %patient, "Room released");
        }
        Ok(room)
    }

    // ===== Patients =====

    /// Deletes a patient unless they occupy a room.
    pub async fn delete_patient(&self, patient: PatientId) -> CoreResult<()> {
        let _patient_guard = lock(&self.patient_locks, patient).await;

        if let Some(room) = self.room_of(patient) {
            return Err(ConflictError::PatientInRoom { patient, room }.into());
        }
        if !self.store.patients.delete(patient).await? {
            return Err(CoreError::not_found("Patient", patient));
        }

        info!(patient = %patient, "Patient deleted");
        Ok(())
    }
}

impl std::fmt::Debug for RoomCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomCoordinator")
            .field("occupied", &self.occupancy.len())
            .finish_non_exhaustive()
    }
}

async fn lock<K>(locks: &LockMap<K>, key: K) -> KeyGuard<'_, K>
where
    K: Eq + Hash + Copy,
{
    let mutex = Arc::clone(locks.entry(key).or_default().value());
    KeyGuard {
        locks,
        key,
        guard: Some(mutex.lock_owned().await),
    }
}

/// Holds a per-key lock. On drop the map entry is removed once nobody else
/// holds or waits on it, so unknown ids leave nothing behind.
struct KeyGuard<'a, K: Eq + Hash> {
    locks: &'a LockMap<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash> Drop for KeyGuard<'_, K> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters clone the Arc under the shard lock, so a count of one
        // means the map is the only owner.
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

fn duplicate_number(number: &str) -> CoreError {
    ConflictError::DuplicateRoomNumber {
        room_number: number.to_string(),
    }
    .into()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Patient, PatientInput};
    use crate::types::RoomStatus;

    async fn setup() -> (Arc<RoomCoordinator>, Store) {
        let store = Store::in_memory();
        (Arc::new(RoomCoordinator::new(store.clone())), store)
    }

    async fn add_patient(store: &Store, name: &str) -> PatientId {
        let input = PatientInput {
            name: name.into(),
            ..Default::default()
        };
        store
            .patients
            .insert(Patient::from_input(input, Utc::now()))
            .await
            .unwrap()
            .id
    }

    fn room_input(number: &str) -> RoomInput {
        RoomInput {
            room_number: number.into(),
            room_type: "Single".into(),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_assign_then_reassign_conflicts() {
        let (coord, store) = setup().await;
        let five = add_patient(&store, "five").await;
        let nine = add_patient(&store, "nine").await;
        let room = coord.create_room(room_input("12")).await.unwrap();

        let occupied = coord.assign(room.id, Some(five)).await.unwrap();
        assert_eq!(occupied.status(), RoomStatus::Occupied);
        assert_eq!(occupied.occupant(), Some(five));

        let err = coord.assign(room.id, Some(nine)).await.unwrap_err();
        assert!(matches!(
            err.as_conflict(),
            Some(ConflictError::RoomOccupied { occupant, .. }) if *occupant == five
        ));

        let unchanged = store.rooms().require(room.id).await.unwrap();
        assert_eq!(unchanged.occupant(), Some(five));
    }

    #[tokio::test]
    async fn test_reassigning_same_patient_is_noop() {
        let (coord, store) = setup().await;
        let five = add_patient(&store, "five").await;
        let room = coord.create_room(room_input("1")).await.unwrap();

        coord.assign(room.id, Some(five)).await.unwrap();
        let again = coord.assign(room.id, Some(five)).await.unwrap();
        assert_eq!(again.occupant(), Some(five));
    }

    #[tokio::test]
    async fn test_unassign_always_succeeds() {
        let (coord, store) = setup().await;
        let five = add_patient(&store, "five").await;
        let room = coord.create_room(room_input("3")).await.unwrap();

        let empty = coord.assign(room.id, None).await.unwrap();
        assert_eq!(empty.status(), RoomStatus::Available);

        coord.assign(room.id, Some(five)).await.unwrap();
        let released = coord.assign(room.id, None).await.unwrap();
        assert_eq!(released.status(), RoomStatus::Available);
        assert_eq!(released.occupant(), None);
        assert_eq!(coord.room_of(five), None);
    }

    #[tokio::test]
    async fn test_missing_patient_is_not_found() {
        let (coord, _store) = setup().await;
        let room = coord.create_room(room_input("4")).await.unwrap();

        let err = coord.assign(room.id, Some(PatientId::new(99))).await.unwrap_err();
        assert_eq!(err.to_string(), "Patient not found");
    }

    #[tokio::test]
    async fn test_patient_cannot_occupy_two_rooms() {
        let (coord, store) = setup().await;
        let five = add_patient(&store, "five").await;
        let a = coord.create_room(room_input("A")).await.unwrap();
        let b = coord.create_room(room_input("B")).await.unwrap();

        coord.assign(a.id, Some(five)).await.unwrap();
        let err = coord.assign(b.id, Some(five)).await.unwrap_err();
        assert!(matches!(
            err.as_conflict(),
            Some(ConflictError::PatientAlreadyAssigned { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_assignment_has_one_winner() {
        let (coord, store) = setup().await;
        let first = add_patient(&store, "first").await;
        let second = add_patient(&store, "second").await;
        let room = coord.create_room(room_input("12")).await.unwrap().id;

        let a = tokio::spawn({
            let coord = Arc::clone(&coord);
            async move { coord.assign(room, Some(first)).await }
        });
        let b = tokio::spawn({
            let coord = Arc::clone(&coord);
            async move { coord.assign(room, Some(second)).await }
        });
        let (a, b) = tokio::join!(a, b);
        let results = [a.unwrap(), b.unwrap()];

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        let winner = winners[0].occupant();

        let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert!(matches!(
            loser.as_conflict(),
            Some(ConflictError::RoomOccupied { .. })
        ));

        let stored = store.rooms().require(room).await.unwrap();
        assert_eq!(stored.occupant(), winner);
        assert_eq!(stored.status(), RoomStatus::Occupied);
    }

    #[tokio::test]
    async fn test_lock_entries_do_not_accumulate() {
        let (coord, store) = setup().await;
        for id in 1..=1_000u64 {
            let err = coord.assign(RoomId::new(id), None).await.unwrap_err();
            assert!(err.is_not_found());
            assert!(coord.delete_patient(PatientId::new(id)).await.is_err());
        }

        let room = coord.create_room(room_input("9")).await.unwrap();
        let err = coord
            .assign(room.id, Some(PatientId::new(4242)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let five = add_patient(&store, "five").await;
        coord.assign(room.id, Some(five)).await.unwrap();
        coord.assign(room.id, None).await.unwrap();

        assert_eq!(coord.room_locks.len(), 0);
        assert_eq!(coord.patient_locks.len(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_lock_entries_released_after_contention() {
        let (coord, store) = setup().await;
        let room = coord.create_room(room_input("10")).await.unwrap();
        let mut patients = Vec::new();
        for i in 0..8 {
            patients.push(add_patient(&store, &format!("p{i}")).await);
        }

        let tasks: Vec<_> = patients
            .into_iter()
            .map(|patient| {
                let coord = Arc::clone(&coord);
                tokio::spawn(async move { coord.assign(room.id, Some(patient)).await })
            })
            .collect();
        for task in tasks {
            let _ = task.await.unwrap();
        }

        assert_eq!(coord.room_locks.len(), 0);
        assert_eq!(coord.patient_locks.len(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_room_number() {
        let (coord, _store) = setup().await;
        coord.create_room(room_input("12")).await.unwrap();

        let err = coord.create_room(room_input("12")).await.unwrap_err();
        assert_eq!(err.to_string(), "Room number already exists");

        let other = coord.create_room(room_input("13")).await.unwrap();
        let err = coord.update_room(other.id, room_input("12")).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_status_change_on_occupied_room_rejected() {
        let (coord, store) = setup().await;
        let five = add_patient(&store, "five").await;
        let room = coord.create_room(room_input("12")).await.unwrap();
        coord.assign(room.id, Some(five)).await.unwrap();

        let mut input = room_input("12");
        input.status = Some(RoomStatus::Maintenance);
        let err = coord.update_room(room.id, input).await.unwrap_err();
        assert!(matches!(err.as_conflict(), Some(ConflictError::RoomInUse { .. })));

        let renamed = coord.update_room(room.id, room_input("12B")).await.unwrap();
        assert_eq!(renamed.status(), RoomStatus::Occupied);
        assert_eq!(renamed.room_number, "12B");
    }

    #[tokio::test]
    async fn test_delete_patient_in_room_conflicts() {
        let (coord, store) = setup().await;
        let five = add_patient(&store, "five").await;
        let room = coord.create_room(room_input("12")).await.unwrap();
        coord.assign(room.id, Some(five)).await.unwrap();

        let err = coord.delete_patient(five).await.unwrap_err();
        assert!(matches!(err.as_conflict(), Some(ConflictError::PatientInRoom { .. })));

        coord.assign(room.id, None).await.unwrap();
        coord.delete_patient(five).await.unwrap();
        assert!(store.patients.get(five).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_room_frees_patient() {
        let (coord, store) = setup().await;
        let five = add_patient(&store, "five").await;
        let room = coord.create_room(room_input("12")).await.unwrap();
        coord.assign(room.id, Some(five)).await.unwrap();

        coord.delete_room(room.id).await.unwrap();
        assert_eq!(coord.room_of(five), None);
        assert!(coord.delete_room(room.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_rebuild_index() {
        let (coord, store) = setup().await;
        let five = add_patient(&store, "five").await;
        let room = coord.create_room(room_input("12")).await.unwrap();
        coord.assign(room.id, Some(five)).await.unwrap();

        let fresh = RoomCoordinator::new(store.clone());
        assert_eq!(fresh.rebuild_index().await.unwrap(), 1);
        assert_eq!(fresh.room_of(five), Some(room.id));
    }
}
