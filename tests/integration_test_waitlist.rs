mod common;

use artisan_booking::domain::models::artisan::PLAN_FREE;
use axum::http::StatusCode;
use common::{fixed_now, TestApp};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::task::JoinSet;

fn join_payload(email: &str, date: &str) -> Value {
    json!({
        "client_name": "Camille Laurent",
        "client_email": email,
        "client_phone": "+33612345678",
        "preferred_date": date,
        "preferred_time_slot": "morning",
        "service_name": "Boiler repair"
    })
}

async fn join(app: &TestApp, artisan: &str, email: &str, date: &str) -> (StatusCode, Value) {
    app.send("POST", &format!("/api/v1/artisans/{}/waitlist", artisan), Some(join_payload(email, date))).await
}

async fn entry_status(app: &TestApp, entry_id: &str) -> String {
    let (status,): (String,) = sqlx::query_as("SELECT status FROM waitlist_entries WHERE id = ?")
        .bind(entry_id)
        .fetch_one(&app.pool).await.unwrap();
    status
}

#[tokio::test]
async fn test_join_normalises_email_and_rejects_duplicates() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Plomberie Martin", PLAN_FREE).await;

    let (status, entry) = join(&app, &artisan, "  Camille@Example.FR ", "2025-06-10").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["client_email"], "camille@example.fr");
    assert_eq!(entry["status"], "waiting");
    assert_eq!(entry["preferred_time_slot"], "morning");
    assert!(entry["notified_at"].is_null());

    let (status, body) = join(&app, &artisan, "camille@example.fr", "2025-06-10").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("waitlist"));

    // Another date is a separate entry.
    let (status, _) = join(&app, &artisan, "camille@example.fr", "2025-06-11").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_rejoin_allowed_after_removal() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Plomberie Martin", PLAN_FREE).await;

    let (_, entry) = join(&app, &artisan, "camille@example.fr", "2025-06-10").await;
    let entry_id = entry["id"].as_str().unwrap();

    let (status, removed) = app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/{}", artisan, entry_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["status"], "removed");

    let (status, rejoined) = join(&app, &artisan, "camille@example.fr", "2025-06-10").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(rejoined["id"], entry["id"]);
}

#[tokio::test]
async fn test_join_validation() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Plomberie Martin", PLAN_FREE).await;
    let uri = format!("/api/v1/artisans/{}/waitlist", artisan);

    let (status, _) = join(&app, &artisan, "camille@example.fr", "2025-06-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = join(&app, &artisan, "camille.example.fr", "2025-06-10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_slot = join_payload("camille@example.fr", "2025-06-10");
    bad_slot["preferred_time_slot"] = json!("evening");
    let (status, _) = app.send("POST", &uri, Some(bad_slot)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut no_name = join_payload("camille@example.fr", "2025-06-10");
    no_name["client_name"] = json!("   ");
    let (status, _) = app.send("POST", &uri, Some(no_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Today is still acceptable.
    let (status, _) = join(&app, &artisan, "camille@example.fr", "2025-06-02").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_is_ordered_and_skips_past_and_terminal_entries() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Plomberie Martin", PLAN_FREE).await;

    join(&app, &artisan, "late@example.fr", "2025-06-20").await;
    join(&app, &artisan, "early@example.fr", "2025-06-05").await;
    let (_, gone) = join(&app, &artisan, "gone@example.fr", "2025-06-06").await;
    app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/{}?action=remove", artisan, gone["id"].as_str().unwrap()), None).await;

    sqlx::query(
        "INSERT INTO waitlist_entries (id, artisan_id, client_name, client_email, preferred_date, preferred_time_slot, status, created_at)
         VALUES ('past-entry', ?, 'Old', 'old@example.fr', '2025-05-30', 'any', 'waiting', ?)"
    )
        .bind(&artisan)
        .bind(fixed_now())
        .execute(&app.pool).await.unwrap();

    let (status, list) = app.send("GET", &format!("/api/v1/artisans/{}/waitlist", artisan), None).await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = list.as_array().unwrap().iter().map(|e| e["client_email"].as_str().unwrap()).collect();
    assert_eq!(emails, vec!["early@example.fr", "late@example.fr"]);
}

#[tokio::test]
async fn test_notify_sends_then_marks_notified() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Plomberie Martin", PLAN_FREE).await;
    let (_, entry) = join(&app, &artisan, "camille@example.fr", "2025-06-10").await;
    let entry_id = entry["id"].as_str().unwrap();
    let uri = format!("/api/v1/artisans/{}/waitlist/{}?action=notify", artisan, entry_id);

    let (status, notified) = app.send("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notified["status"], "notified");
    assert!(notified["notified_at"].is_string());

    {
        let sent = app.notifications.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_email, "camille@example.fr");
        assert_eq!(sent[0].recipient_phone.as_deref(), Some("+33612345678"));
        assert_eq!(sent[0].subject, "A slot opened up with Plomberie Martin");
        assert!(sent[0].html_body.contains("Plomberie Martin"));
        assert!(sent[0].html_body.contains("Camille Laurent"));
    }

    // Terminal: neither a second notify nor a remove changes anything.
    let (status, _) = app.send("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/{}", artisan, entry_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(entry_status(&app, entry_id).await, "notified");
    assert_eq!(app.notifications.sent.lock().unwrap().len(), 1);

    // Notified entries no longer block a fresh join.
    let (status, _) = join(&app, &artisan, "camille@example.fr", "2025-06-10").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_removed_entry_cannot_be_notified() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Plomberie Martin", PLAN_FREE).await;
    let (_, entry) = join(&app, &artisan, "camille@example.fr", "2025-06-10").await;
    let entry_id = entry["id"].as_str().unwrap();

    app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/{}", artisan, entry_id), None).await;

    let (status, _) = app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/{}?action=notify", artisan, entry_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(entry_status(&app, entry_id).await, "removed");
    assert!(app.notifications.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_send_keeps_entry_waiting() {
    let app = TestApp::with_failing_notifier().await;
    let artisan = app.seed_artisan("Plomberie Martin", PLAN_FREE).await;
    let (_, entry) = join(&app, &artisan, "camille@example.fr", "2025-06-10").await;
    let entry_id = entry["id"].as_str().unwrap();

    let (status, body) = app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/{}?action=notify", artisan, entry_id), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());

    assert_eq!(entry_status(&app, entry_id).await, "waiting");
    let (_, list) = app.send("GET", &format!("/api/v1/artisans/{}/waitlist", artisan), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_entry_lookup_is_scoped_to_artisan() {
    let app = TestApp::new().await;
    let owner = app.seed_artisan("Owner", PLAN_FREE).await;
    let other = app.seed_artisan("Other", PLAN_FREE).await;
    let (_, entry) = join(&app, &owner, "camille@example.fr", "2025-06-10").await;
    let entry_id = entry["id"].as_str().unwrap();

    let (status, _) = app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/{}?action=notify", other, entry_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/missing", owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", &format!("/api/v1/artisans/{}/waitlist/{}?action=archive", owner, entry_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(entry_status(&app, entry_id).await, "waiting");
}

#[tokio::test]
async fn test_concurrent_joins_create_one_entry() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Plomberie Martin", PLAN_FREE).await;
    let uri = format!("/api/v1/artisans/{}/waitlist", artisan);

    let mut set = JoinSet::new();
    for _ in 0..8 {
        let router = app.router.clone();
        let uri = uri.clone();
        let payload = join_payload("camille@example.fr", "2025-06-10");
        set.spawn(async move {
            use axum::{body::Body, http::{header, Request}};
            use tower::ServiceExt;
            let response = router.oneshot(
                Request::builder().method("POST").uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string())).unwrap()
            ).await.unwrap();
            response.status()
        });
    }

    let mut statuses: HashMap<StatusCode, usize> = HashMap::new();
    while let Some(res) = set.join_next().await {
        *statuses.entry(res.unwrap()).or_default() += 1;
    }

    assert_eq!(statuses.get(&StatusCode::CREATED).copied().unwrap_or(0), 1, "statuses: {:?}", statuses);
    assert_eq!(statuses.get(&StatusCode::CONFLICT).copied().unwrap_or(0), 7, "statuses: {:?}", statuses);

    let (waiting,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM waitlist_entries WHERE artisan_id = ? AND status = 'waiting'")
        .bind(&artisan)
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(waiting, 1);
}
