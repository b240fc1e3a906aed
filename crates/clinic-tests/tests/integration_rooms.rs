// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Room Assignment Integration Tests
//!
//! Occupancy changes only through `POST /api/rooms/{id}/assign`. A room
//! holds at most one patient and a patient occupies at most one room, also
//! under concurrent requests.

use std::sync::Arc;

use clinic_core::RoomStatus;
use clinic_tests::prelude::*;

fn assign_uri(room: impl std::fmt::Display) -> String {
    format!("/api/rooms/{}/assign", room)
}

#[tokio::test]
async fn test_rooms_assign_and_release() {
    let app = TestApp::new();
    let token = app.receptionist_token();
    let room = app.seed_room("201").await;
    let patient = app.seed_patient("Ada").await;

    let response = app
        .post(&assign_uri(room.id), &token, json!({ "patientId": patient.id }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body["status"], "Occupied");
    assert_eq!(response.body["patientId"], json!(patient.id));

    let response = app
        .post(&assign_uri(room.id), &token, json!({ "patientId": null }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body["status"], "Available");
    assert!(response.body.get("patientId").is_none());
}

#[tokio::test]
async fn test_rooms_empty_body_releases() {
    let app = TestApp::new();
    let token = app.admin_token();
    let room = app.seed_room("202").await;
    let patient = app.seed_patient("Ada").await;

    app.post(&assign_uri(room.id), &token, json!({ "patientId": patient.id }))
        .await
        .assert_status(StatusCode::OK);

    let response = app.post(&assign_uri(room.id), &token, json!({})).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body["status"], "Available");
    assert_eq!(app.state.rooms.room_of(patient.id), None);
}

#[tokio::test]
async fn test_rooms_reassign_occupied_room_is_rejected() {
    let app = TestApp::new();
    let token = app.receptionist_token();
    let room = app.seed_room("203").await;
    let first = app.seed_patient("Ada").await;
    let second = app.seed_patient("Grace").await;

    app.post(&assign_uri(room.id), &token, json!({ "patientId": first.id }))
        .await
        .assert_status(StatusCode::OK);

    app.post(&assign_uri(room.id), &token, json!({ "patientId": second.id }))
        .await
        .assert_error(StatusCode::BAD_REQUEST, "Room is already occupied");

    let stored = app.get(&format!("/api/rooms/{}", room.id), &token).await;
    assert_eq!(stored.body["patientId"], json!(first.id));
}

#[tokio::test]
async fn test_rooms_assign_same_patient_is_idempotent() {
    let app = TestApp::new();
    let token = app.receptionist_token();
    let room = app.seed_room("204").await;
    let patient = app.seed_patient("Ada").await;

    for _ in 0..2 {
        app.post(&assign_uri(room.id), &token, json!({ "patientId": patient.id }))
            .await
            .assert_status(StatusCode::OK);
    }
}

#[tokio::test]
async fn test_rooms_patient_cannot_hold_two_rooms() {
    let app = TestApp::new();
    let token = app.receptionist_token();
    let first = app.seed_room("205").await;
    let second = app.seed_room("206").await;
    let patient = app.seed_patient("Ada").await;

    app.post(&assign_uri(first.id), &token, json!({ "patientId": patient.id }))
        .await
        .assert_status(StatusCode::OK);

    let response = app
        .post(&assign_uri(second.id), &token, json!({ "patientId": patient.id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error_message(),
        Some(format!("Patient is already assigned to room {}", first.id).as_str())
    );
}

#[tokio::test]
async fn test_rooms_unknown_targets() {
    let app = TestApp::new();
    let token = app.admin_token();
    let room = app.seed_room("207").await;

    app.post(&assign_uri(room.id), &token, json!({ "patientId": 999 }))
        .await
        .assert_error(StatusCode::BAD_REQUEST, "Patient not found");

    app.post(&assign_uri(999), &token, json!({ "patientId": null }))
        .await
        .assert_error(StatusCode::NOT_FOUND, "Room not found");

    app.post(&assign_uri("abc"), &token, json!({ "patientId": null }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rooms_occupied_status_not_writable_directly() {
    let app = TestApp::new();
    let token = app.admin_token();

    app.post(
        "/api/rooms",
        &token,
        json!({ "roomNumber": "301", "type": "ICU", "status": "Occupied" }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .post(
            "/api/rooms",
            &token,
            json!({ "roomNumber": "301", "type": "ICU", "status": "Maintenance" }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.body["status"], "Maintenance");
}

#[tokio::test]
async fn test_rooms_release_returns_maintenance_room_to_service() {
    let app = TestApp::new();
    let token = app.admin_token();
    let response = app
        .post(
            "/api/rooms",
            &token,
            json!({ "roomNumber": "302", "type": "ICU", "status": "Maintenance" }),
        )
        .await;
    let room = response.id();

    let response = app
        .post(&assign_uri(room), &token, json!({ "patientId": null }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body["status"], "Available");
    assert!(response.body.get("patientId").is_none());
}

#[tokio::test]
async fn test_rooms_duplicate_number() {
    let app = TestApp::new();
    app.seed_room("401").await;

    app.post(
        "/api/rooms",
        &app.admin_token(),
        json!({ "roomNumber": "401", "type": "General" }),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST, "Room number already exists");
}

#[tokio::test]
async fn test_rooms_occupant_blocks_patient_delete() {
    let app = TestApp::new();
    let token = app.admin_token();
    let room = app.seed_room("501").await;
    let patient = app.seed_patient("Ada").await;

    app.post(&assign_uri(room.id), &token, json!({ "patientId": patient.id }))
        .await
        .assert_status(StatusCode::OK);

    let patient_uri = format!("/api/patients/{}", patient.id);
    app.delete(&patient_uri, &token)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.post(&assign_uri(room.id), &token, json!({ "patientId": null }))
        .await
        .assert_status(StatusCode::OK);
    app.delete(&patient_uri, &token)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rooms_concurrent_assign_has_one_winner() {
    let app = Arc::new(TestApp::new());
    let token = app.receptionist_token();
    let room = app.seed_room("601").await;

    let mut patients = Vec::new();
    for i in 0..8 {
        patients.push(app.seed_patient(&format!("Patient {}", i)).await);
    }

    let mut handles = Vec::new();
    for patient in &patients {
        let app = Arc::clone(&app);
        let token = token.clone();
        let uri = assign_uri(room.id);
        let body = json!({ "patientId": patient.id });
        handles.push(tokio::spawn(async move { app.post(&uri, &token, body).await }));
    }

    let mut winners = Vec::new();
    for (handle, patient) in handles.into_iter().zip(&patients) {
        let response = handle.await.unwrap();
        match response.status {
            StatusCode::OK => winners.push(patient.id),
            StatusCode::BAD_REQUEST => {
                assert_eq!(response.error_message(), Some("Room is already occupied"));
            }
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(winners.len(), 1);
    let stored = app.state.store.rooms().require(room.id).await.unwrap();
    assert_eq!(stored.status(), RoomStatus::Occupied);
    assert_eq!(stored.occupant(), Some(winners[0]));
    assert_eq!(app.state.rooms.room_of(winners[0]), Some(room.id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rooms_concurrent_patient_into_two_rooms() {
    let app = Arc::new(TestApp::new());
    let token = app.admin_token();
    let left = app.seed_room("701").await;
    let right = app.seed_room("702").await;
    let patient = app.seed_patient("Ada").await;

    let left_uri = assign_uri(left.id);
    let right_uri = assign_uri(right.id);
    let (a, b) = tokio::join!(
        app.post(&left_uri, &token, json!({ "patientId": patient.id })),
        app.post(&right_uri, &token, json!({ "patientId": patient.id })),
    );

    let ok = [a.status, b.status]
        .iter()
        .filter(|status| **status == StatusCode::OK)
        .count();
    assert_eq!(ok, 1);

    let occupied = app
        .state
        .store
        .rooms()
        .count(&|room| room.is_occupied())
        .await
        .unwrap();
    assert_eq!(occupied, 1);
}
