mod common;

use artisan_booking::domain::models::artisan::PLAN_PRO;
use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

fn rule_types(quote: &Value) -> Vec<String> {
    quote["applied_rules"].as_array().unwrap()
        .iter()
        .map(|r| r["type"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_saturday_morning_nets_ten_percent_off() {
    let app = TestApp::new().await;
    let (status, quote) = app.send("GET", "/api/v1/pricing?date=2025-06-14&time=09:00&base_price=100", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(rule_types(&quote), vec!["off_peak", "high_demand"]);
    assert_eq!(quote["applied_rules"][0]["discount"], -15);
    assert_eq!(quote["applied_rules"][1]["discount"], 5);
    assert_eq!(quote["final_price"].as_f64(), Some(90.0));
    assert_eq!(quote["savings"].as_f64(), Some(10.0));
    assert_eq!(quote["surcharge"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_christmas_surcharge() {
    let app = TestApp::new().await;
    let (_, quote) = app.send("GET", "/api/v1/pricing?date=2025-12-25&time=10:00&base_price=100", None).await;

    assert_eq!(rule_types(&quote), vec!["holiday"]);
    assert_eq!(quote["final_price"].as_f64(), Some(120.0));
    assert_eq!(quote["surcharge"].as_f64(), Some(20.0));
    assert_eq!(quote["savings"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_holiday_saturday_stacks_all_rules() {
    let app = TestApp::new().await;
    // All Saints' Day 2025 falls on a Saturday.
    let (_, quote) = app.send("GET", "/api/v1/pricing?date=2025-11-01&time=09:00&base_price=100", None).await;

    assert_eq!(rule_types(&quote), vec!["off_peak", "high_demand", "holiday"]);
    assert_eq!(quote["final_price"].as_f64(), Some(110.0));
    assert_eq!(quote["surcharge"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_last_minute_uses_injected_clock() {
    let app = TestApp::new().await;
    // Clock is 2025-06-02 09:00 local; default base price applies.
    let (_, quote) = app.send("GET", "/api/v1/pricing?date=2025-06-02&time=20:00", None).await;

    assert_eq!(rule_types(&quote), vec!["last_minute"]);
    assert_eq!(quote["base_price"].as_f64(), Some(50.0));
    assert_eq!(quote["final_price"].as_f64(), Some(55.0));

    let (_, later) = app.send("GET", "/api/v1/pricing?date=2025-06-04&time=11:00", None).await;
    assert!(rule_types(&later).is_empty());
    assert_eq!(later["final_price"].as_f64(), Some(50.0));
}

#[tokio::test]
async fn test_contracted_rate_overrides_base_price() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Chauffage Moreau", PLAN_PRO).await;
    app.seed_service_rate(&artisan, "boiler-service", 8000).await;

    let (status, quote) = app.send(
        "GET",
        &format!("/api/v1/pricing?artisan_id={}&service_id=boiler-service&date=2025-06-04&time=11:00&base_price=10", artisan),
        None,
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["base_price"].as_f64(), Some(80.0));
    assert_eq!(quote["final_price"].as_f64(), Some(80.0));

    let (_, fallback) = app.send(
        "GET",
        &format!("/api/v1/pricing?artisan_id={}&service_id=unknown&date=2025-06-04&time=11:00&base_price=10", artisan),
        None,
    ).await;
    assert_eq!(fallback["base_price"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_quote_input_validation() {
    let app = TestApp::new().await;

    let (status, _) = app.send("GET", "/api/v1/pricing?date=2025-06-04&time=25:00", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("GET", "/api/v1/pricing?date=2025-06-04&time=10:00&base_price=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("GET", "/api/v1/pricing?date=2025-06-04&time=10:00&base_price=-5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("GET", "/api/v1/pricing?artisan_id=ghost&date=2025-06-04&time=10:00", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_base_price_must_be_positive_and_bounded() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/api/v1/pricing?date=2025-06-04&time=10:00&base_price=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("base_price"));

    // Decimal::MAX on a holiday would overflow the multiplication.
    let (status, body) = app.send("GET", "/api/v1/pricing?date=2025-12-25&time=10:00&base_price=79228162514264337593543950335", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, quote) = app.send("GET", "/api/v1/pricing?date=2025-12-25&time=10:00&base_price=1000000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["final_price"].as_f64(), Some(1_200_000.0));
}

#[tokio::test]
async fn test_settings_are_persisted_but_not_used_for_quotes() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Peinture Simon", PLAN_PRO).await;
    let uri = format!("/api/v1/artisans/{}/pricing/settings", artisan);

    let (status, defaults) = app.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaults["off_peak_discount"], -15);
    assert_eq!(defaults["enable_dynamic_pricing"], true);

    let (status, saved) = app.send("POST", &uri, Some(json!({
        "off_peak_discount": -30,
        "custom_rules": [{"type": "loyalty", "discount": -5, "description": "Returning client"}]
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["off_peak_discount"], -30);
    assert_eq!(saved["weekend_surcharge"], 5);
    assert_eq!(saved["custom_rules"][0]["type"], "loyalty");

    let (_, stored) = app.send("GET", &uri, None).await;
    assert_eq!(stored["off_peak_discount"], -30);

    let (_, quote) = app.send(
        "GET",
        &format!("/api/v1/pricing?artisan_id={}&date=2025-06-04&time=09:00&base_price=100", artisan),
        None,
    ).await;
    assert_eq!(quote["applied_rules"][0]["discount"], -15);
    assert_eq!(quote["final_price"].as_f64(), Some(85.0));
}

#[tokio::test]
async fn test_settings_out_of_bounds_are_rejected() {
    let app = TestApp::new().await;
    let artisan = app.seed_artisan("Toiture Laurent", PLAN_PRO).await;
    let uri = format!("/api/v1/artisans/{}/pricing/settings", artisan);

    for bad in [
        json!({ "off_peak_discount": 10 }),
        json!({ "weekend_surcharge": 51 }),
        json!({ "holiday_surcharge": 150 }),
        json!({ "custom_rules": [{"type": "", "discount": 5, "description": "x"}] }),
    ] {
        let (status, _) = app.send("POST", &uri, Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM artisan_pricing_settings")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 0);
}
