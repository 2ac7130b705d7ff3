use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::artisan::ArtisanPath;
use crate::api::dtos::requests::CreateBookingRequest;
use crate::domain::models::{
    availability::AvailabilityPolicy,
    booking::{Booking, BOOKING_CANCELLED},
};
use crate::domain::services::availability::{is_bookable, local_now};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_name = payload.client_name.trim().to_string();
    let client_email = payload.client_email.trim().to_lowercase();
    if client_name.is_empty() {
        return Err(AppError::Validation("client_name is required".into()));
    }
    if !client_email.contains('@') {
        return Err(AppError::Validation("client_email is invalid".into()));
    }

    let slot = state.slot_repo.find_by_id(&artisan.id, &payload.slot_id).await?
        .ok_or(AppError::NotFound("Slot not found".into()))?;

    let policy = state.availability_repo.find(&artisan.id).await?
        .unwrap_or_else(|| AvailabilityPolicy::default_for(&artisan.id));
    let now = local_now(state.clock.as_ref(), state.config.timezone);

    if !is_bookable(&policy, &slot, now) {
        warn!("Slot {} of artisan {} is not bookable", slot.id, artisan.id);
        return Err(AppError::Conflict("Slot is not bookable".into()));
    }

    let booking = Booking::new(artisan.id.clone(), slot.id.clone(), client_name, client_email, state.clock.now());

    let created = state.booking_repo.claim_slot(&booking).await?;
    info!("Booking {} claimed slot {}", created.id, created.slot_id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&artisan.id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status == BOOKING_CANCELLED {
        return Err(AppError::Conflict("Booking is already cancelled".into()));
    }

    let cancelled = state.booking_repo.cancel(&booking).await?;
    info!("Booking {} cancelled, slot {} reopened", cancelled.id, cancelled.slot_id);
    Ok(Json(cancelled))
}
