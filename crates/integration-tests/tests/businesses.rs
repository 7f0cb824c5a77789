//! End-to-end tests for businesses, services and queue lifecycle.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use taboor_integration_tests::TestContext;

#[tokio::test]
async fn test_business_registration_and_listing() {
    let ctx = TestContext::spawn().await;

    let (status, body) = ctx
        .post(
            "/business/register",
            &json!({
                "name": "Fade Masters",
                "category": "Barber",
                "address": "12 King Fahd Rd",
                "latitude": 24.7136,
                "longitude": 46.6753,
                "phone": "0112345678",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["business"]["name"], "Fade Masters");
    assert_eq!(body["business"]["is_active"], true);

    let (status, body) = ctx.get("/businesses").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["businesses"].as_array().unwrap().len(), 1);

    // Missing name
    let (status, body) = ctx
        .post("/business/register", &json!({ "category": "Barber" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Business name is required");
}

#[tokio::test]
async fn test_services_crud() {
    let ctx = TestContext::spawn().await;
    let business_id = ctx.seed_business("Biz").await;

    let (status, body) = ctx
        .post(
            "/services",
            &json!({
                "business_id": business_id,
                "name": "Haircut",
                "description": "Classic cut",
                "duration_minutes": 20,
                "price": 50.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["service"]["duration_minutes"], 20);

    // Defaults apply when omitted
    let (status, body) = ctx
        .post(
            "/services",
            &json!({ "business_id": business_id, "name": "Walk-in" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["service"]["duration_minutes"], 15);
    assert_eq!(body["service"]["price"], 0.0);

    let (status, body) = ctx
        .get(&format!("/businesses/{business_id}/services"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"].as_array().unwrap().len(), 2);

    // Validation and unknown business
    let (status, body) = ctx.post("/services", &json!({ "name": "Orphan" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "business_id and name are required");

    let (status, _) = ctx
        .post("/services", &json!({ "business_id": 9999, "name": "Ghost" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_queue_lifecycle() {
    let ctx = TestContext::spawn().await;
    let business_id = ctx.seed_business("Biz").await;
    let queue_id = ctx.seed_queue(business_id).await;

    // Pause, reopen, close
    for next in ["paused", "open", "closed"] {
        let (status, body) = ctx
            .patch(
                &format!("/queues/{queue_id}/status"),
                &json!({ "status": next }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["queue"]["status"], next);
    }

    // Closed is terminal
    let (status, _) = ctx
        .patch(
            &format!("/queues/{queue_id}/status"),
            &json!({ "status": "open" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Bogus status value
    let (status, body) = ctx
        .patch(
            &format!("/queues/{queue_id}/status"),
            &json!({ "status": "on-fire" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid status. Use open|paused|closed");

    // Unknown queue
    let (status, _) = ctx
        .patch("/queues/9999/status", &json!({ "status": "open" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_queue_listing_includes_service_name() {
    let ctx = TestContext::spawn().await;
    let business_id = ctx.seed_business("Biz").await;

    let (_, body) = ctx
        .post(
            "/services",
            &json!({ "business_id": business_id, "name": "Beard Trim" }),
        )
        .await;
    let service_id = body["service"]["id"].as_i64().unwrap();

    let (status, _) = ctx
        .post(
            "/queues",
            &json!({ "business_id": business_id, "service_id": service_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    ctx.seed_queue(business_id).await;

    let (status, body) = ctx.get(&format!("/businesses/{business_id}/queues")).await;
    assert_eq!(status, StatusCode::OK);
    let queues = body["queues"].as_array().unwrap();
    assert_eq!(queues.len(), 2);
    let names: Vec<_> = queues
        .iter()
        .filter_map(|q| q["service_name"].as_str())
        .collect();
    assert_eq!(names, vec!["Beard Trim"]);
}

#[tokio::test]
async fn test_ticket_status_dashboard_actions() {
    let ctx = TestContext::spawn().await;
    let business_id = ctx.seed_business("Biz").await;
    let queue_id = ctx.seed_queue(business_id).await;

    let user = ctx.seed_user("User", "user@example.com").await;
    let (_, body) = ctx
        .post(&format!("/queues/{queue_id}/join"), &json!({ "user_id": user }))
        .await;
    let ticket = body["ticket_number"].as_i64().unwrap();

    // waiting -> done is not a legal move
    let (status, _) = ctx
        .patch(
            &format!("/queues/{queue_id}/tickets/{ticket}/status"),
            &json!({ "status": "done" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // call, then mark done
    ctx.post(&format!("/queues/{queue_id}/next"), &json!({})).await;
    let (status, body) = ctx
        .patch(
            &format!("/queues/{queue_id}/tickets/{ticket}/status"),
            &json!({ "status": "done" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["status"], "done");

    let (_, body) = ctx.get(&format!("/queues/{queue_id}/overview")).await;
    assert_eq!(body["stats"]["done"], 1);

    // unknown ticket and bogus status
    let (status, _) = ctx
        .patch(
            &format!("/queues/{queue_id}/tickets/99/status"),
            &json!({ "status": "skipped" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .patch(
            &format!("/queues/{queue_id}/tickets/{ticket}/status"),
            &json!({ "status": "bogus" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overview_counts_and_eta() {
    let ctx = TestContext::spawn().await;
    let business_id = ctx.seed_business("TestBiz").await;

    let (_, body) = ctx
        .post(
            "/services",
            &json!({
                "business_id": business_id,
                "name": "Haircut",
                "duration_minutes": 20,
            }),
        )
        .await;
    let service_id = body["service"]["id"].as_i64().unwrap();

    let (_, body) = ctx
        .post(
            "/queues",
            &json!({ "business_id": business_id, "service_id": service_id }),
        )
        .await;
    let queue_id = body["queue"]["id"].as_i64().unwrap();

    for n in 1..=3 {
        let user = ctx
            .seed_user(&format!("User {n}"), &format!("u{n}@example.com"))
            .await;
        ctx.post(&format!("/queues/{queue_id}/join"), &json!({ "user_id": user }))
            .await;
    }
    ctx.post(&format!("/queues/{queue_id}/next"), &json!({})).await;

    let (status, body) = ctx.get(&format!("/queues/{queue_id}/overview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queue"]["business_name"], "TestBiz");
    assert_eq!(body["queue"]["service_name"], "Haircut");
    assert_eq!(body["stats"]["waiting"], 2);
    assert_eq!(body["stats"]["called"], 1);
    assert_eq!(body["stats"]["left"], 0);
    // 2 waiting x 20 minutes
    assert_eq!(body["estimated_wait_minutes"], 40);

    // Queue with no service uses the 10-minute default
    let bare_queue = ctx.seed_queue(business_id).await;
    let user = ctx.seed_user("Solo", "solo@example.com").await;
    ctx.post(&format!("/queues/{bare_queue}/join"), &json!({ "user_id": user }))
        .await;

    let (_, body) = ctx.get(&format!("/queues/{bare_queue}/overview")).await;
    assert_eq!(body["estimated_wait_minutes"], 10);

    // Unknown queue
    let (status, _) = ctx.get("/queues/9999/overview").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
