use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::artisan::ArtisanPath;
use crate::api::dtos::requests::{JoinWaitlistRequest, WaitlistActionQuery};
use crate::domain::models::waitlist::NewWaitlistParams;
use crate::domain::services::availability::local_now;
use crate::error::AppError;
use std::sync::Arc;

pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Json(payload): Json<JoinWaitlistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let today = local_now(state.clock.as_ref(), state.config.timezone).date();
    let params = NewWaitlistParams {
        artisan_id: artisan.id,
        client_name: payload.client_name,
        client_email: payload.client_email,
        client_phone: payload.client_phone,
        preferred_date: payload.preferred_date,
        preferred_time_slot: payload.preferred_time_slot,
        service_name: payload.service_name,
    };

    let entry = state.waitlist_service().join(params, today, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list_waitlist(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
) -> Result<impl IntoResponse, AppError> {
    let today = local_now(state.clock.as_ref(), state.config.timezone).date();
    let entries = state.waitlist_service().list(&artisan.id, today).await?;
    Ok(Json(entries))
}

/// `?action=notify` sends the availability notice; `remove` (the default) takes the entry off the list.
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Path((_, entry_id)): Path<(String, String)>,
    Query(params): Query<WaitlistActionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.waitlist_service();
    let entry = match params.action.as_deref().unwrap_or("remove") {
        "remove" => service.remove(&artisan.id, &entry_id).await?,
        "notify" => service.notify(&artisan.id, &entry_id, state.clock.now()).await?,
        other => return Err(AppError::Validation(format!("Unknown action '{}'", other))),
    };
    Ok(Json(entry))
}
