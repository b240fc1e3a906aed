// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Entity Handler Integration Tests
//!
//! Create/read/update/delete flows, list filters and the shared error shapes:
//! 404 `"<Entity> not found"`, 400 for malformed ids and bodies.

use clinic_core::{BillStatus, Collection};
use clinic_tests::prelude::*;

// =============================================================================
// Error Shapes
// =============================================================================

#[tokio::test]
async fn test_crud_unknown_ids_are_404() {
    let app = TestApp::new();
    let token = app.admin_token();

    let cases = [
        ("/api/doctors/999", "Doctor not found"),
        ("/api/patients/999", "Patient not found"),
        ("/api/appointments/999", "Appointment not found"),
        ("/api/medical-records/999", "Medical record not found"),
        ("/api/prescriptions/999", "Prescription not found"),
        ("/api/bills/999", "Bill not found"),
        ("/api/rooms/999", "Room not found"),
    ];

    for (uri, message) in cases {
        app.get(uri, &token)
            .await
            .assert_error(StatusCode::NOT_FOUND, message);
        app.delete(uri, &token)
            .await
            .assert_error(StatusCode::NOT_FOUND, message);
    }
}

#[tokio::test]
async fn test_crud_non_numeric_id_is_400() {
    let app = TestApp::new();
    let token = app.admin_token();

    for uri in ["/api/patients/abc", "/api/bills/-1", "/api/rooms/1.5"] {
        app.get(uri, &token)
            .await
            .assert_error(StatusCode::BAD_REQUEST, "Invalid ID");
    }
}

#[tokio::test]
async fn test_crud_unmatched_requests_keep_error_body() {
    let app = TestApp::new();
    let token = app.admin_token();

    app.get("/api/wards", &token)
        .await
        .assert_error(StatusCode::NOT_FOUND, "Route not found");
    app.put("/api/doctors", &token, json!({}))
        .await
        .assert_error(StatusCode::BAD_REQUEST, "Method not allowed");
}

#[tokio::test]
async fn test_crud_malformed_body_is_400() {
    let app = TestApp::new();

    let response = app
        .post("/api/patients", &app.admin_token(), json!({ "name": "Ada", "age": "old" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.error_message().unwrap().starts_with("Invalid JSON"));
}

// =============================================================================
// Patients
// =============================================================================

#[tokio::test]
async fn test_crud_patient_lifecycle() {
    let app = TestApp::new();
    let token = app.receptionist_token();

    let created = app
        .post(
            "/api/patients",
            &token,
            json!({ "name": "Ada", "age": 36, "gender": "female", "phone": "555-0101" }),
        )
        .await;
    created.assert_status(StatusCode::CREATED);
    let uri = format!("/api/patients/{}", created.id());

    let updated = app
        .put(
            &uri,
            &token,
            json!({ "name": "Ada Lovelace", "age": 37, "gender": "female", "phone": "555-0101" }),
        )
        .await;
    updated.assert_status(StatusCode::OK);
    assert_eq!(updated.body["name"], "Ada Lovelace");
    assert_eq!(updated.body["age"], 37);

    let fetched = app.get(&uri, &token).await;
    assert_eq!(fetched.body["name"], "Ada Lovelace");

    app.delete(&uri, &token)
        .await
        .assert_error(StatusCode::FORBIDDEN, "Insufficient permissions");

    let deleted = app.delete(&uri, &app.admin_token()).await;
    deleted.assert_status(StatusCode::OK);
    assert_eq!(deleted.body, json!({ "message": "Patient deleted successfully" }));

    app.get(&uri, &token)
        .await
        .assert_error(StatusCode::NOT_FOUND, "Patient not found");
}

#[tokio::test]
async fn test_crud_patient_requires_name() {
    let app = TestApp::new();

    app.post("/api/patients", &app.admin_token(), json!({ "name": "  " }))
        .await
        .assert_error(StatusCode::BAD_REQUEST, "name is required");
}

// =============================================================================
// Doctors
// =============================================================================

#[tokio::test]
async fn test_crud_doctor_filter_by_specialization() {
    let app = TestApp::new();
    app.seed_doctor("House", "Diagnostics").await;
    let wilson = app.seed_doctor("Wilson", "Oncology").await;
    let cuddy = app.seed_doctor("Cuddy", "Oncology").await;

    let response = app
        .get("/api/doctors?specialization=Oncology", &app.patient_token())
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        field_values(response.items(), "id"),
        vec![cuddy.id.get(), wilson.id.get()]
    );
}

// =============================================================================
// Appointments
// =============================================================================

#[tokio::test]
async fn test_crud_appointment_requires_existing_patient() {
    let app = TestApp::new();
    let doctor = app.seed_doctor("House", "Diagnostics").await;

    app.post(
        "/api/appointments",
        &app.receptionist_token(),
        json!({ "patientId": 404, "doctorId": doctor.id, "date": today() }),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST, "Patient not found");

    assert_eq!(app.state.store.appointments.count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_crud_appointment_status_update() {
    let app = TestApp::new();
    let patient = app.seed_patient("Ada").await;
    let doctor = app.seed_doctor("House", "Diagnostics").await;
    let token = app.receptionist_token();

    let created = app
        .post(
            "/api/appointments",
            &token,
            json!({ "patientId": patient.id, "doctorId": doctor.id, "date": today(), "time": "10:00" }),
        )
        .await;
    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.body["status"], "Scheduled");

    let uri = format!("/api/appointments/{}", created.id());
    let updated = app
        .put(
            &uri,
            &app.doctor_token(doctor.id.get()),
            json!({
                "patientId": patient.id,
                "doctorId": doctor.id,
                "date": today(),
                "time": "10:00",
                "status": "Completed"
            }),
        )
        .await;
    updated.assert_status(StatusCode::OK);
    assert_eq!(updated.body["status"], "Completed");

    let filtered = app.get("/api/appointments?status=Completed", &token).await;
    assert_eq!(filtered.items().len(), 1);
}

// =============================================================================
// Medical Records and Prescriptions
// =============================================================================

#[tokio::test]
async fn test_crud_clinical_entries_check_references() {
    let app = TestApp::new();
    let patient = app.seed_patient("Ada").await;
    let token = app.admin_token();

    app.post(
        "/api/medical-records",
        &token,
        json!({ "patientId": patient.id, "doctorId": 77, "diagnosis": "Flu" }),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST, "Doctor not found");

    app.post(
        "/api/prescriptions",
        &token,
        json!({ "patientId": 88, "doctorId": 77, "medicineName": "Rest" }),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST, "Patient not found");
}

#[tokio::test]
async fn test_crud_prescriptions_filter_by_patient() {
    let app = TestApp::new();
    let ada = app.seed_patient("Ada").await;
    let grace = app.seed_patient("Grace").await;
    let doctor = app.seed_doctor("House", "Diagnostics").await;
    let token = app.doctor_token(doctor.id.get());

    for (patient, medicine) in [(&ada, "Aspirin"), (&grace, "Ibuprofen"), (&ada, "Rest")] {
        app.post(
            "/api/prescriptions",
            &token,
            json!({
                "patientId": patient.id,
                "doctorId": doctor.id,
                "medicineName": medicine,
                "dosage": "1/day"
            }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    let response = app
        .get(&format!("/api/prescriptions?patientId={}", ada.id), &token)
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.items().len(), 2);
    assert!(response
        .items()
        .iter()
        .all(|item| item["patientId"] == json!(ada.id)));
}

// =============================================================================
// Bills
// =============================================================================

#[tokio::test]
async fn test_crud_bill_paid_stamps_payment_date() {
    let app = TestApp::new();
    let patient = app.seed_patient("Ada").await;
    let token = app.receptionist_token();

    let created = app
        .post(
            "/api/bills",
            &token,
            json!({ "patientId": patient.id, "amount": 150.0, "description": "Checkup" }),
        )
        .await;
    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.body["status"], "Unpaid");
    assert!(created.body["paymentDate"].is_null());

    let updated = app
        .put(
            &format!("/api/bills/{}", created.id()),
            &token,
            json!({ "patientId": patient.id, "amount": 150.0, "status": "Paid" }),
        )
        .await;
    updated.assert_status(StatusCode::OK);
    assert!(updated.body["paymentDate"].is_string());
}

#[tokio::test]
async fn test_crud_bill_rejects_negative_amount() {
    let app = TestApp::new();
    let patient = app.seed_patient("Ada").await;

    app.post(
        "/api/bills",
        &app.admin_token(),
        json!({ "patientId": patient.id, "amount": -5.0 }),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST, "amount must be a non-negative number");
}

#[tokio::test]
async fn test_crud_bills_filter_by_status() {
    let app = TestApp::new();
    let patient = app.seed_patient("Ada").await;
    app.seed_bill(&patient, 10.0, BillStatus::Paid).await;
    app.seed_bill(&patient, 20.0, BillStatus::Unpaid).await;
    app.seed_bill(&patient, 30.0, BillStatus::Unpaid).await;

    let response = app
        .get("/api/bills?status=Unpaid", &app.admin_token())
        .await;
    assert_eq!(response.items().len(), 2);
}

// =============================================================================
// Rooms
// =============================================================================

#[tokio::test]
async fn test_crud_rooms_filter_and_order() {
    let app = TestApp::new();
    let token = app.admin_token();

    for (number, kind) in [("B2", "ICU"), ("A1", "General"), ("A3", "ICU")] {
        app.post("/api/rooms", &token, json!({ "roomNumber": number, "type": kind }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app.get("/api/rooms?type=ICU", &token).await;
    let numbers: Vec<_> = response
        .items()
        .iter()
        .map(|room| room["roomNumber"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(numbers, vec!["A3", "B2"]);

    let response = app.get("/api/rooms?status=Available", &token).await;
    assert_eq!(response.items().len(), 3);
}
