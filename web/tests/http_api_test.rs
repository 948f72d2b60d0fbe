//! End-to-end HTTP API tests driving the full router in process.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use axum_test::TestServer;
use dcs_core::{FlightKey, RecordStore, RoomEvent};
use dcs_web::{build_router, AppState};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

fn server() -> TestServer {
    TestServer::new(build_router(AppState::default())).unwrap()
}

/// Server plus a handle on its state, for room-subscription assertions.
fn server_with_state() -> (TestServer, AppState) {
    let state = AppState::new(Arc::new(RecordStore::new()));
    let server = TestServer::new(build_router(state.clone())).unwrap();
    (server, state)
}

#[tokio::test]
async fn test_health() {
    let server = server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_flight_and_passenger_lifecycle_scenario() {
    let server = server();

    // POST flight -> stored with status OPEN.
    let response = server
        .post("/api/flights")
        .json(&json!({"flight_no": "AI101", "flight_date": "2024-05-01"}))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["ok"], true);
    assert_eq!(body["flight"]["status"], "OPEN");

    // POST pax -> sequence 001, status OPEN, zero bags.
    let response = server
        .post("/api/pax")
        .json(&json!({
            "flight_no": "AI101",
            "flight_date": "2024-05-01",
            "surname": "SHAH",
            "given": "RAJ"
        }))
        .await;
    response.assert_status_ok();
    let pax = response.json::<Value>()["passenger"].clone();
    assert_eq!(pax["sequence_no"], "001");
    assert_eq!(pax["status"], "OPEN");
    assert_eq!(pax["bag_count"], 0);
    let id = pax["id"].as_u64().unwrap();

    // Check-in -> CHECKED.
    let response = server.post(&format!("/api/pax/{id}/checkin")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["passenger"]["status"], "CHECKED");

    // Board -> BOARDED, boarded true.
    let response = server.post(&format!("/api/pax/{id}/board")).await;
    let pax = response.json::<Value>()["passenger"].clone();
    assert_eq!(pax["status"], "BOARDED");
    assert_eq!(pax["boarded"], true);

    // Offload -> OPEN, boarded false, seat cleared.
    let response = server.post(&format!("/api/pax/{id}/offload")).await;
    let pax = response.json::<Value>()["passenger"].clone();
    assert_eq!(pax["status"], "OPEN");
    assert_eq!(pax["boarded"], false);
    assert_eq!(pax["seat"], "");
}

#[tokio::test]
async fn test_flight_upsert_merge_preserves_omitted_fields() {
    let server = server();
    server
        .post("/api/flights")
        .json(&json!({
            "flight_no": "AI101",
            "flight_date": "2024-05-01",
            "origin": "DEL",
            "destination": "BOM"
        }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/flights")
        .json(&json!({
            "flight_no": "ai101",
            "flight_date": "2024-05-01",
            "tail": "VT-EXA"
        }))
        .await;
    let flight = response.json::<Value>()["flight"].clone();
    assert_eq!(flight["origin"], "DEL");
    assert_eq!(flight["destination"], "BOM");
    assert_eq!(flight["tail"], "VT-EXA");

    // Case-insensitive key: still one flight.
    let response = server.get("/api/flights").await;
    assert_eq!(response.json::<Value>()["flights"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_flight_no_is_bad_request() {
    let server = server();
    let response = server
        .post("/api/flights")
        .json(&json!({"flight_date": "2024-05-01"}))
        .await;
    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"], "flight_no is required");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_list_flights_date_filter_as_set() {
    let server = server();
    for (no, date) in [
        ("AI101", "2024-05-01"),
        ("AI102", "2024-05-01"),
        ("AI103", "2024-05-02"),
    ] {
        server
            .post("/api/flights")
            .json(&json!({"flight_no": no, "flight_date": date}))
            .await
            .assert_status_ok();
    }

    let response = server.get("/api/flights").add_query_param("date", "2024-05-01").await;
    let flights: HashSet<String> = response.json::<Value>()["flights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["flight_no"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        flights,
        HashSet::from(["AI101".to_string(), "AI102".to_string()])
    );
}

#[tokio::test]
async fn test_check_in_blocked_while_flight_in_pd() {
    let server = server();
    let response = server
        .post("/api/pax")
        .json(&json!({
            "flight_no": "AI101",
            "flight_date": "2024-05-01",
            "surname": "SHAH"
        }))
        .await;
    let id = response.json::<Value>()["passenger"]["id"].as_u64().unwrap();

    server
        .post("/api/flights/status")
        .json(&json!({
            "flight_no": "AI101",
            "flight_date": "2024-05-01",
            "status": "PD"
        }))
        .await
        .assert_status_ok();

    let response = server.post(&format!("/api/pax/{id}/checkin")).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "Flight in PD");

    // The failed attempt left the passenger untouched.
    let response = server.get("/api/flights/AI101/2024-05-01/pax").await;
    assert_eq!(
        response.json::<Value>()["passengers"][0]["status"],
        "OPEN"
    );
}

#[tokio::test]
async fn test_status_change_on_unknown_flight_is_not_found() {
    let server = server();
    let response = server
        .post("/api/flights/status")
        .json(&json!({
            "flight_no": "ZZ999",
            "flight_date": "2024-05-01",
            "status": "PD"
        }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_lifecycle_on_unknown_passenger_is_not_found() {
    let server = server();
    let response = server.post("/api/pax/424242/board").await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_manifest_import_scenario() {
    let server = server();
    let response = server
        .post("/api/flights/AI101/2024-05-01/import")
        .text("smith,john,12A,ABC123\ndoe,jane,14B,XYZ789")
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["imported"], 2);

    let response = server.get("/api/flights/AI101/2024-05-01/pax").await;
    let pax = response.json::<Value>()["passengers"].clone();
    assert_eq!(pax.as_array().unwrap().len(), 2);
    assert_eq!(pax[0]["surname"], "SMITH");
    assert_eq!(pax[0]["given"], "JOHN");
    assert_eq!(pax[0]["sequence_no"], "001");
    assert_eq!(pax[1]["surname"], "DOE");
    assert_eq!(pax[1]["sequence_no"], "002");
}

#[tokio::test]
async fn test_import_skips_short_lines_in_tally() {
    let server = server();
    let response = server
        .post("/api/flights/AI101/2024-05-01/import")
        .text("SMITH,JOHN\nBADLINE\n\nDOE,JANE")
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["imported"], 2);
}

#[tokio::test]
async fn test_import_rejects_undecodable_bytes() {
    let server = server();
    let response = server
        .post("/api/flights/AI101/2024-05-01/import")
        .bytes(vec![0xff, 0xfe, b'S'].into())
        .await;
    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"],
        "import payload is not valid UTF-8"
    );
}

#[tokio::test]
async fn test_bags_count_coercion_over_http() {
    let server = server();
    let response = server
        .post("/api/pax")
        .json(&json!({
            "flight_no": "AI101",
            "flight_date": "2024-05-01",
            "surname": "SHAH"
        }))
        .await;
    let id = response.json::<Value>()["passenger"]["id"].as_u64().unwrap();

    let response = server
        .post(&format!("/api/pax/{id}/bags"))
        .json(&json!({"count": 2, "total_weight": 31.5}))
        .await;
    assert_eq!(response.json::<Value>()["passenger"]["bag_count"], 2);

    // Invalid count adds nothing rather than failing.
    let response = server
        .post(&format!("/api/pax/{id}/bags"))
        .json(&json!({"count": "junk"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["passenger"]["bag_count"], 2);

    // A body-less request also adds nothing.
    let response = server.post(&format!("/api/pax/{id}/bags")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["passenger"]["bag_count"], 2);
}

#[tokio::test]
async fn test_movement_log_append_and_list() {
    let server = server();
    let response = server
        .post("/api/flights/AI101/2024-05-01/movements")
        .json(&json!({"off": "0910", "remark": "pushback"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["movement"]["off"], "0910");

    let response = server.get("/api/flights/AI101/2024-05-01/movements").await;
    let log = response.json::<Value>()["movements"].clone();
    assert_eq!(log.as_array().unwrap().len(), 1);
    assert_eq!(log[0]["remark"], "pushback");
}

#[tokio::test]
async fn test_boarding_pass_and_bag_tag_documents() {
    let server = server();
    server
        .post("/api/flights")
        .json(&json!({
            "flight_no": "AI101",
            "flight_date": "2024-05-01",
            "destination": "BOM"
        }))
        .await
        .assert_status_ok();
    let response = server
        .post("/api/pax")
        .json(&json!({
            "flight_no": "AI101",
            "flight_date": "2024-05-01",
            "surname": "SHAH",
            "given": "RAJ",
            "seat": "12A"
        }))
        .await;
    let id = response.json::<Value>()["passenger"]["id"].as_u64().unwrap();

    let response = server.get(&format!("/api/pax/{id}/boarding-pass")).await;
    response.assert_status_ok();
    assert!(response.text().contains("SHAH/RAJ"));

    let response = server.get(&format!("/api/pax/{id}/bag-tag")).await;
    response.assert_status_ok();
    assert!(response.text().contains("BOM"));

    let response = server.get("/api/pax/424242/boarding-pass").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_subscriber_receives_exactly_one_event_per_mutation() {
    let (server, state) = server_with_state();
    let key = FlightKey::new("AI101", "2024-05-01");
    let mut rx = state
        .hub
        .join(uuid::Uuid::new_v4(), key.clone())
        .await
        .unwrap();

    let response = server
        .post("/api/pax")
        .json(&json!({
            "flight_no": "AI101",
            "flight_date": "2024-05-01",
            "surname": "SHAH"
        }))
        .await;
    let id = response.json::<Value>()["passenger"]["id"].as_u64().unwrap();
    server
        .post(&format!("/api/pax/{id}/checkin"))
        .await
        .assert_status_ok();
    server
        .post(&format!("/api/pax/{id}/board"))
        .await
        .assert_status_ok();

    // One pax:created, then exactly one pax:updated per lifecycle call,
    // each carrying the full updated record.
    assert!(matches!(
        rx.recv().await.unwrap(),
        RoomEvent::PaxCreated { imported: 1, .. }
    ));
    match rx.recv().await.unwrap() {
        RoomEvent::PaxUpdated { passenger } => {
            assert_eq!(passenger.id, id);
            assert_eq!(passenger.status, dcs_core::PaxStatus::Checked);
            assert_eq!(passenger.sequence_no, "001");
        }
        other => panic!("expected pax:updated, got {other:?}"),
    }
    match rx.recv().await.unwrap() {
        RoomEvent::PaxUpdated { passenger } => {
            assert_eq!(passenger.status, dcs_core::PaxStatus::Boarded);
            assert!(passenger.boarded);
        }
        other => panic!("expected pax:updated, got {other:?}"),
    }
    assert!(rx.try_recv().is_err(), "no extra events");
}

#[tokio::test]
async fn test_import_publishes_single_batch_event() {
    let (server, state) = server_with_state();
    let key = FlightKey::new("AI101", "2024-05-01");
    let mut rx = state
        .hub
        .join(uuid::Uuid::new_v4(), key.clone())
        .await
        .unwrap();

    server
        .post("/api/flights/AI101/2024-05-01/import")
        .text("SMITH,JOHN\nDOE,JANE")
        .await
        .assert_status_ok();

    assert!(matches!(
        rx.recv().await.unwrap(),
        RoomEvent::PaxCreated {
            passenger: None,
            imported: 2
        }
    ));
    assert!(rx.try_recv().is_err(), "batch import publishes once");
}

#[tokio::test]
async fn test_events_scoped_to_their_room() {
    let (server, state) = server_with_state();
    let mut other_room = state
        .hub
        .join(uuid::Uuid::new_v4(), FlightKey::new("AI102", "2024-05-01"))
        .await
        .unwrap();

    server
        .post("/api/flights")
        .json(&json!({"flight_no": "AI101", "flight_date": "2024-05-01"}))
        .await
        .assert_status_ok();

    assert!(
        other_room.try_recv().is_err(),
        "mutation on AI101 must not reach AI102's room"
    );
}
