// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-Based Access Control (RBAC).
//!
//! The permission matrix maps every `(resource, action)` pair to the set of
//! roles allowed to perform it. The mapping is written as one exhaustive
//! `match` with no wildcard arm, so adding a resource or action fails to
//! compile until its row is filled in. Pairs that no role may perform map to
//! [`RoleSet::NOBODY`]; lookups for any role outside the set deny.
//!
//! | Resource               | Create      | Read          | Update        | Delete      |
//! |------------------------|-------------|---------------|---------------|-------------|
//! | doctor                 | admin       | authenticated | admin         | admin       |
//! | patient                | admin, rec. | authenticated | admin, rec.   | admin       |
//! | appointment            | admin, rec. | authenticated | authenticated | admin, rec. |
//! | medical-record         | admin, doc. | authenticated | admin, doc.   | admin       |
//! | prescription           | admin, doc. | authenticated | admin, doc.   | admin       |
//! | bill                   | admin, rec. | authenticated | admin, rec.   | admin       |
//! | room                   | admin       | authenticated | admin, rec.   | admin       |
//! | dashboard:admin        | -           | admin         | -             | -           |
//! | dashboard:doctor       | -           | doctor        | -             | -           |
//! | dashboard:receptionist | -           | receptionist  | -             | -           |
//!
//! Doctors listing appointments are additionally restricted to their own
//! rows. That restriction is a data filter applied by the handler after the
//! matrix has allowed the read; it is not part of the table.

use clinic_core::{Identity, Role};

use super::permission::{ActionKind, ResourceKind, RoleSet};

const ADMIN: RoleSet = RoleSet::of(&[Role::Admin]);
const ADMIN_RECEPTION: RoleSet = RoleSet::of(&[Role::Admin, Role::Receptionist]);
const ADMIN_DOCTOR: RoleSet = RoleSet::of(&[Role::Admin, Role::Doctor]);
const ANY: RoleSet = RoleSet::AUTHENTICATED;
const NOBODY: RoleSet = RoleSet::NOBODY;

/// The policy rule for one `(resource, action)` pair.
pub const fn rule(resource: ResourceKind, action: ActionKind) -> RoleSet {
    use ActionKind::{Create, Delete, Read, Update};
    use ResourceKind::*;

    match (resource, action) {
        (Doctor, Create) => ADMIN,
        (Doctor, Read) => ANY,
        (Doctor, Update) => ADMIN,
        (Doctor, Delete) => ADMIN,

        (Patient, Create) => ADMIN_RECEPTION,
        (Patient, Read) => ANY,
        (Patient, Update) => ADMIN_RECEPTION,
        (Patient, Delete) => ADMIN,

        (Appointment, Create) => ADMIN_RECEPTION,
        (Appointment, Read) => ANY,
        (Appointment, Update) => ANY,
        (Appointment, Delete) => ADMIN_RECEPTION,

        (MedicalRecord, Create) => ADMIN_DOCTOR,
        (MedicalRecord, Read) => ANY,
        (MedicalRecord, Update) => ADMIN_DOCTOR,
        (MedicalRecord, Delete) => ADMIN,

        (Prescription, Create) => ADMIN_DOCTOR,
        (Prescription, Read) => ANY,
        (Prescription, Update) => ADMIN_DOCTOR,
        (Prescription, Delete) => ADMIN,

        (Bill, Create) => ADMIN_RECEPTION,
        (Bill, Read) => ANY,
        (Bill, Update) => ADMIN_RECEPTION,
        (Bill, Delete) => ADMIN,

        (Room, Create) => ADMIN,
        (Room, Read) => ANY,
        (Room, Update) => ADMIN_RECEPTION,
        (Room, Delete) => ADMIN,

        (AdminDashboard, Read) => ADMIN,
        (AdminDashboard, Create | Update | Delete) => NOBODY,

        (DoctorDashboard, Read) => RoleSet::of(&[Role::Doctor]),
        (DoctorDashboard, Create | Update | Delete) => NOBODY,

        (ReceptionistDashboard, Read) => RoleSet::of(&[Role::Receptionist]),
        (ReceptionistDashboard, Create | Update | Delete) => NOBODY,
    }
}

const RESOURCES: usize = ResourceKind::ALL.len();
const ACTIONS: usize = ActionKind::ALL.len();

type Table = [[RoleSet; ACTIONS]; RESOURCES];

const fn build_table() -> Table {
    let mut table = [[NOBODY; ACTIONS]; RESOURCES];
    let mut r = 0;
    while r < RESOURCES {
        let mut a = 0;
        while a < ACTIONS {
            table[r][a] = rule(ResourceKind::ALL[r], ActionKind::ALL[a]);
            a += 1;
        }
        r += 1;
    }
    table
}

// =============================================================================
// Decision
// =============================================================================

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The identity may proceed.
    Allow,
    /// The identity may not proceed.
    Deny,
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

// =============================================================================
// RBAC Policy
// =============================================================================

/// The permission matrix.
///
/// Precomputed once at startup, immutable afterwards and read without
/// locking by every request. Lookups are two array indexes.
#[derive(Debug, Clone, Copy)]
pub struct RbacPolicy {
    table: Table,
}

impl RbacPolicy {
    /// Creates the clinic policy.
    pub const fn new() -> Self {
        Self {
            table: build_table(),
        }
    }

    /// The roles allowed to perform `action` on `resource`.
    pub fn allowed_roles(&self, resource: ResourceKind, action: ActionKind) -> RoleSet {
        self.table[resource.index()][action.index()]
    }

    /// Decides whether `identity` may perform `action` on `resource`.
    pub fn authorize(
        &self,
        identity: &Identity,
        resource: ResourceKind,
        action: ActionKind,
    ) -> Decision {
        if self.allowed_roles(resource, action).contains(identity.role) {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    /// Iterates over every `(resource, action, roles)` rule.
    pub fn rules(&self) -> impl Iterator<Item = (ResourceKind, ActionKind, RoleSet)> + '_ {
        ResourceKind::ALL.into_iter().flat_map(move |resource| {
            ActionKind::ALL
                .into_iter()
                .map(move |action| (resource, action, self.allowed_roles(resource, action)))
        })
    }
}

impl Default for RbacPolicy {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn as_role(role: Role) -> Identity {
        Identity::new(1u64, role)
    }

    #[test]
    fn test_table_matches_rule() {
        let policy = RbacPolicy::new();
        for (resource, action, roles) in policy.rules() {
            assert_eq!(roles, rule(resource, action));
        }
        assert_eq!(policy.rules().count(), 40);
    }

    #[test]
    fn test_admin_only_actions() {
        let policy = RbacPolicy::new();
        for role in [Role::Doctor, Role::Receptionist, Role::Patient] {
            assert_eq!(
                policy.authorize(&as_role(role), ResourceKind::Doctor, ActionKind::Create),
                Decision::Deny
            );
            assert_eq!(
                policy.authorize(&as_role(role), ResourceKind::Room, ActionKind::Delete),
                Decision::Deny
            );
        }
        assert!(policy
            .authorize(&as_role(Role::Admin), ResourceKind::Doctor, ActionKind::Create)
            .is_allowed());
    }

    #[test]
    fn test_room_update_includes_receptionist() {
        let policy = RbacPolicy::new();
        assert!(policy
            .authorize(&as_role(Role::Receptionist), ResourceKind::Room, ActionKind::Update)
            .is_allowed());
        assert!(!policy
            .authorize(&as_role(Role::Doctor), ResourceKind::Room, ActionKind::Update)
            .is_allowed());
    }

    #[test]
    fn test_dashboards_are_single_role() {
        let policy = RbacPolicy::new();
        let cases = [
            (ResourceKind::AdminDashboard, Role::Admin),
            (ResourceKind::DoctorDashboard, Role::Doctor),
            (ResourceKind::ReceptionistDashboard, Role::Receptionist),
        ];
        for (resource, owner) in cases {
            for role in Role::ALL {
                let decision = policy.authorize(&as_role(role), resource, ActionKind::Read);
                assert_eq!(decision.is_allowed(), role == owner, "{resource} / {role}");
            }
        }
    }

    #[test]
    fn test_unlisted_pairs_deny_everyone() {
        let policy = RbacPolicy::new();
        let dashboards = [
            ResourceKind::AdminDashboard,
            ResourceKind::DoctorDashboard,
            ResourceKind::ReceptionistDashboard,
        ];
        for resource in dashboards {
            for action in [ActionKind::Create, ActionKind::Update, ActionKind::Delete] {
                assert!(policy.allowed_roles(resource, action).is_empty());
                for role in Role::ALL {
                    assert_eq!(
                        policy.authorize(&as_role(role), resource, action),
                        Decision::Deny
                    );
                }
            }
        }
    }

    #[test]
    fn test_patient_role_reads_only() {
        let policy = RbacPolicy::new();
        let patient = as_role(Role::Patient);
        for (resource, action, _) in policy.rules() {
            let decision = policy.authorize(&patient, resource, action);
            let expected = match (resource, action) {
                (
                    ResourceKind::AdminDashboard
                    | ResourceKind::DoctorDashboard
                    | ResourceKind::ReceptionistDashboard,
                    _,
                ) => false,
                (ResourceKind::Appointment, ActionKind::Update) => true,
                (_, ActionKind::Read) => true,
                _ => false,
            };
            assert_eq!(decision.is_allowed(), expected, "{resource} {action}");
        }
    }
}
