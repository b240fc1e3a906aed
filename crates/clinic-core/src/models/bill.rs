// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::store::Entity;
use crate::types::{BillId, BillStatus, PatientId};

/// A charge against a patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Bill id.
    pub id: BillId,
    /// The billed patient.
    pub patient_id: PatientId,
    /// Amount due.
    pub amount: f64,
    /// Payment status.
    pub status: BillStatus,
    /// When the bill was paid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<DateTime<Utc>>,
    /// What the bill is for.
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for [`Bill`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillInput {
    /// The billed patient.
    pub patient_id: PatientId,
    /// Amount due.
    pub amount: f64,
    /// Payment status. Defaults to `Unpaid`.
    #[serde(default)]
    pub status: BillStatus,
    /// Explicit payment date.
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    /// What the bill is for.
    #[serde(default)]
    pub description: String,
}

impl BillInput {
    /// Validates the payload.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(CoreError::validation("amount must be a non-negative number"));
        }
        Ok(())
    }
}

impl Bill {
    /// Builds a new bill from a validated payload.
    pub fn from_input(input: BillInput, now: DateTime<Utc>) -> Self {
        let mut bill = Self {
            id: BillId::new(0),
            patient_id: input.patient_id,
            amount: input.amount,
            status: input.status,
            payment_date: input.payment_date,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        bill.stamp_payment(now);
        bill
    }

    /// Replaces the mutable fields with the payload.
    ///
    /// An existing payment date survives an update that omits one.
    pub fn apply(&mut self, input: BillInput, now: DateTime<Utc>) {
        self.patient_id = input.patient_id;
        self.amount = input.amount;
        self.status = input.status;
        if input.payment_date.is_some() {
            self.payment_date = input.payment_date;
        }
        self.description = input.description;
        self.updated_at = now;
        self.stamp_payment(now);
    }

    fn stamp_payment(&mut self, now: DateTime<Utc>) {
        if self.status == BillStatus::Paid && self.payment_date.is_none() {
            self.payment_date = Some(now);
        }
    }
}

impl Entity for Bill {
    type Id = BillId;
    const KIND: &'static str = "Bill";

    fn id(&self) -> BillId {
        self.id
    }

    fn assign_id(&mut self, id: BillId) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input(status: BillStatus, payment_date: Option<DateTime<Utc>>) -> BillInput {
        BillInput {
            patient_id: PatientId::new(1),
            amount: 120.0,
            status,
            payment_date,
            description: "consultation".into(),
        }
    }

    #[test]
    fn test_paid_bill_is_stamped() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let bill = Bill::from_input(input(BillStatus::Paid, None), now);
        assert_eq!(bill.payment_date, Some(now));

        let unpaid = Bill::from_input(input(BillStatus::Unpaid, None), now);
        assert_eq!(unpaid.payment_date, None);
    }

    #[test]
    fn test_explicit_payment_date_is_kept() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let paid_at = Utc.with_ymd_and_hms(2025, 2, 20, 9, 0, 0).unwrap();
        let mut bill = Bill::from_input(input(BillStatus::Unpaid, None), now);

        bill.apply(input(BillStatus::Paid, Some(paid_at)), now);
        assert_eq!(bill.payment_date, Some(paid_at));

        bill.apply(input(BillStatus::Paid, None), now);
        assert_eq!(bill.payment_date, Some(paid_at));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut bad = input(BillStatus::Unpaid, None);
        bad.amount = -1.0;
        assert!(bad.validate().is_err());
        assert!(input(BillStatus::Unpaid, None).validate().is_ok());
    }
}
