// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Resource, action and role-set definitions for the permission matrix.

use serde::{Deserialize, Serialize};
use std::fmt;

use clinic_core::Role;

// =============================================================================
// ResourceKind
// =============================================================================

/// Resources guarded by the permission matrix.
///
/// Each dashboard is its own resource so that its role is named in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Patients.
    Patient,
    /// Doctors.
    Doctor,
    /// Appointments.
    Appointment,
    /// Medical records.
    MedicalRecord,
    /// Prescriptions.
    Prescription,
    /// Bills.
    Bill,
    /// Rooms (including assignment).
    Room,
    /// The admin dashboard.
    AdminDashboard,
    /// The doctor dashboard.
    DoctorDashboard,
    /// The receptionist dashboard.
    ReceptionistDashboard,
}

impl ResourceKind {
    /// Every resource, in table order.
    pub const ALL: [ResourceKind; 10] = [
        ResourceKind::Patient,
        ResourceKind::Doctor,
        ResourceKind::Appointment,
        ResourceKind::MedicalRecord,
        ResourceKind::Prescription,
        ResourceKind::Bill,
        ResourceKind::Room,
        ResourceKind::AdminDashboard,
        ResourceKind::DoctorDashboard,
        ResourceKind::ReceptionistDashboard,
    ];

    /// Returns the resource name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Patient => "patient",
            ResourceKind::Doctor => "doctor",
            ResourceKind::Appointment => "appointment",
            ResourceKind::MedicalRecord => "medical-record",
            ResourceKind::Prescription => "prescription",
            ResourceKind::Bill => "bill",
            ResourceKind::Room => "room",
            ResourceKind::AdminDashboard => "dashboard:admin",
            ResourceKind::DoctorDashboard => "dashboard:doctor",
            ResourceKind::ReceptionistDashboard => "dashboard:receptionist",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// ActionKind
// =============================================================================

/// Operations on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Create.
    Create,
    /// Read or list.
    Read,
    /// Update (room assignment counts as an update).
    Update,
    /// Delete.
    Delete,
}

impl ActionKind {
    /// Every action, in table order.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Create,
        ActionKind::Read,
        ActionKind::Update,
        ActionKind::Delete,
    ];

    /// Returns the action name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Read => "read",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// RoleSet
// =============================================================================

/// A set of roles stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    /// No role.
    pub const NOBODY: RoleSet = RoleSet(0);

    /// Every authenticated role.
    pub const AUTHENTICATED: RoleSet = RoleSet::of(&Role::ALL);

    /// Builds a set from a list of roles.
    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < roles.len() {
            bits |= Self::bit(roles[i]);
            i += 1;
        }
        RoleSet(bits)
    }

    /// Returns `true` if `role` is in the set.
    pub const fn contains(&self, role: Role) -> bool {
        self.0 & Self::bit(role) != 0
    }

    /// Returns `true` if the set is empty.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the roles in the set.
    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }

    const fn bit(role: Role) -> u8 {
        match role {
            Role::Admin => 1 << 0,
            Role::Doctor => 1 << 1,
            Role::Receptionist => 1 << 2,
            Role::Patient => 1 << 3,
        }
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let names: Vec<_> = self.iter().map(|r| r.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}
