//! Integration tests for the per-user rental request event stream.

mod common;

use std::time::Duration;

use axum::http::{header, Method, StatusCode};
use common::{empty_request, json_request, TestApp};
use futures::StreamExt;
use serde_json::json;

#[tokio::test]
async fn test_stream_delivers_only_own_updates() {
    let app = TestApp::new();
    let admin = app.register_admin().await;
    let owner = app.register_renter().await;
    let other = app.register_farmer().await;

    let own_request = app.submit_rental(&owner, "Tractor", json!(900)).await;
    let other_request = app.submit_rental(&other, "Tiller", json!(400)).await;

    let response = app
        .send(empty_request(
            Method::GET,
            "/api/v1/me/rental-requests/events",
            Some(&owner.access_token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    for (request, status) in [(&other_request, "rejected"), (&own_request, "approved")] {
        let decided = app
            .send(json_request(
                Method::POST,
                &format!(
                    "/api/v1/admin/rental-requests/{}/decision",
                    request["id"].as_str().unwrap()
                ),
                Some(&admin.access_token),
                json!({ "status": status }),
            ))
            .await;
        assert_eq!(decided.status(), StatusCode::OK);
    }

    let mut body = response.into_body().into_data_stream();
    let mut received = String::new();
    while !received.contains("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .expect("timed out waiting for event")
            .expect("stream ended")
            .unwrap();
        received.push_str(std::str::from_utf8(&chunk).unwrap());
    }

    assert!(received.contains("event: rental_request_updated"));
    assert!(received.contains(own_request["id"].as_str().unwrap()));
    assert!(!received.contains(other_request["id"].as_str().unwrap()));
}

#[tokio::test]
async fn test_submission_does_not_emit_event() {
    let app = TestApp::new();
    let admin = app.register_admin().await;
    let owner = app.register_renter().await;

    let response = app
        .send(empty_request(
            Method::GET,
            "/api/v1/me/rental-requests/events",
            Some(&owner.access_token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut body = response.into_body().into_data_stream();

    let submitted = app.submit_rental(&owner, "Power Weeder", json!(650)).await;

    let quiet = tokio::time::timeout(Duration::from_millis(300), body.next()).await;
    assert!(quiet.is_err(), "submission produced an event");

    let decided = app
        .send(json_request(
            Method::POST,
            &format!(
                "/api/v1/admin/rental-requests/{}/decision",
                submitted["id"].as_str().unwrap()
            ),
            Some(&admin.access_token),
            json!({ "status": "approved" }),
        ))
        .await;
    assert_eq!(decided.status(), StatusCode::OK);

    let mut received = String::new();
    while !received.contains("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .expect("timed out waiting for event")
            .expect("stream ended")
            .unwrap();
        received.push_str(std::str::from_utf8(&chunk).unwrap());
    }
    assert!(received.contains("event: rental_request_updated"));
    assert!(received.contains(submitted["id"].as_str().unwrap()));
}

#[tokio::test]
async fn test_stream_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .send(empty_request(
            Method::GET,
            "/api/v1/me/rental-requests/events",
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
