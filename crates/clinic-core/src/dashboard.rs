// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-scoped dashboard read model.
//!
//! Every view is built from point-in-time counts against the store. "Today"
//! is the server's local calendar day and is recomputed per call.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::identity::Identity;
use crate::models::{Appointment, Bill, Room};
use crate::store::{Collection, Store};
use crate::types::{AppointmentStatus, BillStatus, DoctorId, Role, RoomStatus};

/// Maximum number of upcoming appointments on the doctor dashboard.
pub const UPCOMING_LIMIT: usize = 10;

/// How far ahead the doctor dashboard looks.
pub const UPCOMING_HORIZON_DAYS: i64 = 7;

// =============================================================================
// DayWindow
// =============================================================================

/// A half-open `[start, end)` span covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// Local midnight, in UTC.
    pub start: DateTime<Utc>,
    /// The next local midnight, in UTC.
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The local day containing `now`.
    ///
    /// Falls back to a 24 hour span when a midnight does not exist in the
    /// zone (DST gap).
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let date = now.date_naive();

        let start = tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| {
                now.with_timezone(&Utc) - (now.time() - NaiveTime::MIN)
            });

        let end = date
            .succ_opt()
            .and_then(|next| tz.from_local_datetime(&next.and_time(NaiveTime::MIN)).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| start + Duration::hours(24));

        Self { start, end }
    }

    /// Today in the server's local zone.
    pub fn today() -> Self {
        Self::containing(&Local::now())
    }

    /// Returns `true` if `at` falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

// =============================================================================
// Views
// =============================================================================

/// Clinic-wide counts for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    /// Number of patients.
    pub total_patients: usize,
    /// Number of doctors.
    pub total_doctors: usize,
    /// Number of appointments.
    pub total_appointments: usize,
    /// Appointments scheduled today.
    pub today_appointments: usize,
    /// Unpaid bills.
    pub pending_bills: usize,
    /// Rooms with status `Available`.
    pub available_rooms: usize,
}

/// A doctor's own schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    /// Today's appointments for the doctor, earliest first.
    pub today_appointments: Vec<Appointment>,
    /// Appointments after today within the horizon, earliest first.
    pub upcoming_appointments: Vec<Appointment>,
    /// Distinct patients the doctor has an appointment with.
    pub total_patients: usize,
}

/// Front desk overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionistDashboard {
    /// Today's appointments for every doctor, earliest first.
    pub today_appointments: Vec<Appointment>,
    /// Appointments with status `Scheduled`.
    pub pending_appointments: usize,
    /// Number of patients.
    pub total_patients: usize,
    /// Rooms with status `Available`.
    pub available_rooms: usize,
}

/// One of the role-specific views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DashboardView {
    /// Admin view.
    Admin(AdminDashboard),
    /// Doctor view.
    Doctor(DoctorDashboard),
    /// Receptionist view.
    Receptionist(ReceptionistDashboard),
}

// =============================================================================
// ReadModel
// =============================================================================

/// Builds dashboards from the store.
#[derive(Debug, Clone)]
pub struct ReadModel {
    store: Store,
}

impl ReadModel {
    /// Creates a read model over `store`.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Builds the `role` dashboard for `identity` as of now.
    pub async fn build(&self, role: Role, identity: &Identity) -> CoreResult<DashboardView> {
        self.build_at(role, identity, DayWindow::today(), Utc::now())
            .await
    }

    /// Builds the `role` dashboard for a given day and instant.
    ///
    /// The patient role has no dashboard.
    pub async fn build_at(
        &self,
        role: Role,
        identity: &Identity,
        today: DayWindow,
        now: DateTime<Utc>,
    ) -> CoreResult<DashboardView> {
        match role {
            Role::Admin => self.admin(today).await.map(DashboardView::Admin),
            Role::Doctor => {
                let doctor = DoctorId::new(identity.subject.get());
                self.doctor(doctor, today, now)
                    .await
                    .map(DashboardView::Doctor)
            }
            Role::Receptionist => self
                .receptionist(today)
                .await
                .map(DashboardView::Receptionist),
            Role::Patient => Err(CoreError::validation("No dashboard for role patient")),
        }
    }

    /// Clinic-wide counts.
    pub async fn admin(&self, today: DayWindow) -> CoreResult<AdminDashboard> {
        let store = &self.store;
        Ok(AdminDashboard {
            total_patients: store.patients.count_all().await?,
            total_doctors: store.doctors.count_all().await?,
            total_appointments: store.appointments.count_all().await?,
            today_appointments: store
                .appointments
                .count(&|a: &Appointment| today.contains(a.date))
                .await?,
            pending_bills: store
                .bills
                .count(&|b: &Bill| b.status == BillStatus::Unpaid)
                .await?,
            available_rooms: self.available_rooms().await?,
        })
    }

    /// A single doctor's schedule.
    pub async fn doctor(
        &self,
        doctor: DoctorId,
        today: DayWindow,
        now: DateTime<Utc>,
    ) -> CoreResult<DoctorDashboard> {
        let own = self
            .store
            .appointments
            .list(&|a: &Appointment| a.doctor_id == doctor)
            .await?;

        let horizon = now + Duration::days(UPCOMING_HORIZON_DAYS);

        let mut today_appointments: Vec<_> = own
            .iter()
            .filter(|a| today.contains(a.date))
            .cloned()
            .collect();
        today_appointments.sort_by_key(|a| a.date);

        // Starts where today's window ends, so next midnight is not lost.
        let mut upcoming_appointments: Vec<_> = own
            .iter()
            .filter(|a| a.date >= today.end && a.date <= horizon)
            .cloned()
            .collect();
        upcoming_appointments.sort_by_key(|a| a.date);
        upcoming_appointments.truncate(UPCOMING_LIMIT);

        let mut patients: Vec<_> = own.iter().map(|a| a.patient_id).collect();
        patients.sort_unstable();
        patients.dedup();

        Ok(DoctorDashboard {
            today_appointments,
            upcoming_appointments,
            total_patients: patients.len(),
        })
    }

    /// The front desk overview.
    pub async fn receptionist(&self, today: DayWindow) -> CoreResult<ReceptionistDashboard> {
        let store = &self.store;

        let mut today_appointments = store
            .appointments
            .list(&|a: &Appointment| today.contains(a.date))
            .await?;
        today_appointments.sort_by_key(|a| a.date);

        Ok(ReceptionistDashboard {
            today_appointments,
            pending_appointments: store
                .appointments
                .count(&|a: &Appointment| a.status == AppointmentStatus::Scheduled)
                .await?,
            total_patients: store.patients.count_all().await?,
            available_rooms: self.available_rooms().await?,
        })
    }

    async fn available_rooms(&self) -> CoreResult<usize> {
        self.store
            .rooms()
            .count(&|r: &Room| r.status() == RoomStatus::Available)
            .await
    }
}

// =============================================================================
// Tests
// =============================================================================
