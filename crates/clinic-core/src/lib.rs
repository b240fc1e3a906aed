// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # clinic-core
//!
//! Domain layer of the clinic operations backend.
//!
//! This crate has no knowledge of HTTP. It provides:
//!
//! - The clinical entity model (patients, doctors, appointments, records,
//!   prescriptions, bills, rooms, user accounts)
//! - The persistence seam ([`Collection`]) with an in-memory backend
//! - The [`RoomCoordinator`], the single mutation path for room state
//! - The role-scoped [`ReadModel`] that builds dashboards
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────┐      ┌──────────────┐
//!            │ RoomCoordinator│    │  ReadModel   │
//!            └──────┬───────┘      └──────┬───────┘
//!                   │                     │
//!                   └────────┬────────────┘
//!                            ▼
//!                     ┌─────────────┐
//!                     │    Store    │
//!                     └──────┬──────┘
//!                            ▼
//!                  dyn Collection<E> (memory, ...)
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod coordinator;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod models;
pub mod store;
pub mod types;

pub use coordinator::RoomCoordinator;
pub use dashboard::{
    AdminDashboard, DashboardView, DayWindow, DoctorDashboard, ReadModel, ReceptionistDashboard,
};
pub use error::{ConflictError, CoreError, CoreResult};
pub use identity::Identity;
pub use models::{
    Appointment, AppointmentInput, Bill, BillInput, Doctor, DoctorInput, MedicalRecord,
    MedicalRecordInput, Patient, PatientInput, Prescription, PrescriptionInput, Room, RoomInput,
    User,
};
pub use store::{Collection, Collections, Entity, MemoryCollection, RoomView, Store};
pub use types::{
    AppointmentId, AppointmentStatus, BillId, BillStatus, DoctorId, MedicalRecordId, PatientId,
    PrescriptionId, Role, RoomId, RoomStatus, UserId,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
