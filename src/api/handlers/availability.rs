use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::artisan::ArtisanPath;
use crate::api::dtos::{
    requests::{ReplaceDayRequest, SlotRangeQuery},
    responses::{BookableSlotsResponse, SlotResponse},
};
use crate::domain::models::{
    availability::{AvailabilityPolicy, AvailabilityUpdate},
    slot::Slot,
};
use crate::domain::services::availability::{apply_update, filter_bookable, local_now, parse_ranges};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

const MAX_RANGE_DAYS: i64 = 366;

async fn load_policy(state: &AppState, artisan_id: &str) -> Result<AvailabilityPolicy, AppError> {
    Ok(state.availability_repo.find(artisan_id).await?
        .unwrap_or_else(|| AvailabilityPolicy::default_for(artisan_id)))
}

pub async fn get_policy(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
) -> Result<impl IntoResponse, AppError> {
    let policy = load_policy(&state, &artisan.id).await?;
    Ok(Json(policy))
}

pub async fn update_policy(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Json(payload): Json<AvailabilityUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let current = load_policy(&state, &artisan.id).await?;
    let updated = apply_update(current, &payload)?;
    let saved = state.availability_repo.upsert(&updated).await?;
    info!("Availability policy updated for artisan {}", artisan.id);
    Ok(Json(saved))
}

pub async fn list_bookable_slots(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Query(range): Query<SlotRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if range.start > range.end {
        return Err(AppError::Validation("start must not be after end".into()));
    }
    if (range.end - range.start).num_days() > MAX_RANGE_DAYS {
        return Err(AppError::Validation(format!("Range cannot exceed {} days", MAX_RANGE_DAYS)));
    }

    let policy = load_policy(&state, &artisan.id).await?;
    let now = local_now(state.clock.as_ref(), state.config.timezone);

    let candidates = state.slot_repo.list_available(&artisan.id, range.start, range.end).await?;
    let total = candidates.len();
    let bookable = filter_bookable(&policy, candidates, now);
    info!("Artisan {}: {} of {} slots bookable between {} and {}", artisan.id, bookable.len(), total, range.start, range.end);

    Ok(Json(BookableSlotsResponse::group(&bookable)))
}

pub async fn replace_day(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Json(payload): Json<ReplaceDayRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !artisan.is_paid_tier() {
        return Err(AppError::Forbidden("Custom slots require a paid subscription".into()));
    }

    let ranges = parse_ranges(&payload.slots)?;
    let created_at = state.clock.now();
    let slots: Vec<Slot> = ranges.into_iter()
        .map(|(start, end)| Slot::new(artisan.id.clone(), payload.date, start, end, created_at))
        .collect();

    let created = state.slot_repo.replace_day(&artisan.id, payload.date, &slots).await?;
    info!("Replaced slots of {} for artisan {} ({} slots)", payload.date, artisan.id, created.len());

    let body: Vec<SlotResponse> = created.iter().map(SlotResponse::from).collect();
    Ok(Json(body))
}

pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Path((_, slot_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.slot_repo.delete_unreferenced(&artisan.id, &slot_id).await?;
    info!("Deleted slot {} of artisan {}", slot_id, artisan.id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
