// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Seed data written straight into the store, bypassing HTTP, so a test only
//! exercises the endpoint it is about.

use chrono::{DateTime, Duration, Utc};

use clinic_api::password::hash_password;
use clinic_core::{
    Appointment, AppointmentInput, AppointmentStatus, Bill, BillInput, BillStatus, Collection,
    Doctor, DoctorInput, Patient, PatientInput, Role, Room, RoomInput, RoomStatus, User,
};

use crate::common::harness::TestApp;

/// Signing secret used by every test application.
pub const TEST_SECRET: &str = "integration-test-secret-that-is-long-enough";

/// Password given to seeded accounts.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

// =============================================================================
// Inputs
// =============================================================================

/// Payload for a patient called `name`.
pub fn patient_input(name: &str) -> PatientInput {
    PatientInput {
        name: name.to_string(),
        age: 42,
        gender: "female".to_string(),
        phone: "555-0100".to_string(),
        email: None,
        address: None,
    }
}

/// Payload for a doctor called `name`.
pub fn doctor_input(name: &str, specialization: &str) -> DoctorInput {
    DoctorInput {
        name: name.to_string(),
        email: format!("{}@clinic.test", name.to_lowercase().replace(' ', ".")),
        phone: "555-0200".to_string(),
        specialization: specialization.to_string(),
        availability: "Mon-Fri".to_string(),
    }
}

/// Payload for a room.
pub fn room_input(number: &str, status: Option<RoomStatus>) -> RoomInput {
    RoomInput {
        room_number: number.to_string(),
        room_type: "General".to_string(),
        status,
    }
}

// =============================================================================
// Seeding
// =============================================================================

impl TestApp {
    /// Inserts a patient.
    pub async fn seed_patient(&self, name: &str) -> Patient {
        let patient = Patient::from_input(patient_input(name), Utc::now());
        self.state.store.patients.insert(patient).await.unwrap()
    }

    /// Inserts a doctor.
    pub async fn seed_doctor(&self, name: &str, specialization: &str) -> Doctor {
        let doctor = Doctor::from_input(doctor_input(name, specialization), Utc::now());
        self.state.store.doctors.insert(doctor).await.unwrap()
    }

    /// Inserts doctors until one with id `id` exists and returns it.
    pub async fn seed_doctor_with_id(&self, id: u64) -> Doctor {
        loop {
            let doctor = self.seed_doctor(&format!("Doctor {}", id), "General").await;
            if doctor.id.get() >= id {
                return doctor;
            }
        }
    }

    /// Creates an `Available` room through the coordinator.
    pub async fn seed_room(&self, number: &str) -> Room {
        self.state.rooms.create_room(room_input(number, None)).await.unwrap()
    }

    /// Inserts a scheduled appointment.
    pub async fn seed_appointment(
        &self,
        patient: &Patient,
        doctor: &Doctor,
        date: DateTime<Utc>,
    ) -> Appointment {
        let input = AppointmentInput {
            patient_id: patient.id,
            doctor_id: doctor.id,
            date,
            time: date.format("%H:%M").to_string(),
            status: AppointmentStatus::Scheduled,
            notes: String::new(),
        };
        let appointment = Appointment::from_input(input, Utc::now());
        self.state.store.appointments.insert(appointment).await.unwrap()
    }

    /// Inserts a bill.
    pub async fn seed_bill(&self, patient: &Patient, amount: f64, status: BillStatus) -> Bill {
        let input = BillInput {
            patient_id: patient.id,
            amount,
            status,
            payment_date: None,
            description: "Consultation".to_string(),
        };
        self.state
            .store
            .bills
            .insert(Bill::from_input(input, Utc::now()))
            .await
            .unwrap()
    }

    /// Inserts an account with [`TEST_PASSWORD`].
    pub async fn seed_user(&self, email: &str, role: Role) -> User {
        let hash = hash_password(TEST_PASSWORD).unwrap();
        let user = User::new("Test User", email, hash, role, Utc::now());
        self.state.store.users.insert(user).await.unwrap()
    }
}

// =============================================================================
// Dates
// =============================================================================

/// An instant inside today's local day window.
pub fn today() -> DateTime<Utc> {
    let window = clinic_core::DayWindow::today();
    window.start + (window.end - window.start) / 2
}

/// An instant `days` days from [`today`].
pub fn days_from_today(days: i64) -> DateTime<Utc> {
    today() + Duration::days(days)
}
