use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, availability, pricing, waitlist, booking};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Availability policy & slots
        .route("/api/v1/artisans/{artisan_id}/availability", get(availability::get_policy).put(availability::update_policy))
        .route("/api/v1/artisans/{artisan_id}/availability/slots", get(availability::list_bookable_slots).post(availability::replace_day))
        .route("/api/v1/artisans/{artisan_id}/availability/slots/{slot_id}", delete(availability::delete_slot))

        // Pricing
        .route("/api/v1/pricing", get(pricing::quote_price))
        .route("/api/v1/artisans/{artisan_id}/pricing/settings", get(pricing::get_settings).post(pricing::save_settings))

        // Waitlist
        .route("/api/v1/artisans/{artisan_id}/waitlist", get(waitlist::list_waitlist).post(waitlist::join_waitlist))
        .route("/api/v1/artisans/{artisan_id}/waitlist/{entry_id}", delete(waitlist::update_entry))

        // Bookings
        .route("/api/v1/artisans/{artisan_id}/bookings", post(booking::create_booking))
        .route("/api/v1/artisans/{artisan_id}/bookings/{booking_id}/cancel", post(booking::cancel_booking))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        artisan_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
