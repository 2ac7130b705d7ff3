use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::artisan::ArtisanPath;
use crate::api::dtos::requests::{PriceQuery, SavePricingSettingsRequest};
use crate::domain::models::pricing::PricingSettings;
use crate::domain::services::availability::{local_now, parse_hhmm};
use crate::domain::services::pricing::{calculate_dynamic_price, DEFAULT_BASE_PRICE, MAX_BASE_PRICE};
use crate::error::AppError;
use rust_decimal::Decimal;
use sqlx::types::Json as DbJson;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

const MAX_CUSTOM_RULES: usize = 20;

/// Contracted rate for the (artisan, service) pair, else the explicit `base_price`, else the platform default.
async fn resolve_base_price(state: &AppState, query: &PriceQuery) -> Result<Decimal, AppError> {
    if let Some(ref artisan_id) = query.artisan_id {
        state.artisan_repo.find_by_id(artisan_id).await?
            .ok_or(AppError::NotFound("Artisan not found".into()))?;

        if let Some(ref service_id) = query.service_id
            && let Some(cents) = state.artisan_repo.find_service_rate(artisan_id, service_id).await? {
            debug!("Using contracted rate {} cents for {}/{}", cents, artisan_id, service_id);
            return Ok(Decimal::new(cents, 2));
        }
    }

    match query.base_price {
        Some(ref raw) => {
            let price = Decimal::from_str(raw.trim())
                .map_err(|_| AppError::Validation(format!("Invalid base_price '{}'", raw)))?;
            if price <= Decimal::ZERO || price > Decimal::from(MAX_BASE_PRICE) {
                return Err(AppError::Validation(format!("base_price must be greater than 0 and at most {}", MAX_BASE_PRICE)));
            }
            Ok(price)
        }
        None => Ok(Decimal::from(DEFAULT_BASE_PRICE)),
    }
}

pub async fn quote_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let time = parse_hhmm(&query.time)?;
    let base_price = resolve_base_price(&state, &query).await?;
    let created_at = local_now(state.clock.as_ref(), state.config.timezone);

    let quote = calculate_dynamic_price(base_price, query.date, time, created_at)?;
    info!("Quoted {} -> {} for {} {} ({} rules)", quote.base_price, quote.final_price, query.date, query.time, quote.applied_rules.len());
    Ok(Json(quote))
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.pricing_repo.find(&artisan.id).await?
        .unwrap_or_else(|| PricingSettings::default_for(&artisan.id, state.clock.now()));
    Ok(Json(settings))
}

fn check_bound(name: &str, value: Option<i32>, min: i32, max: i32) -> Result<(), AppError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => {
            Err(AppError::Validation(format!("{} must be between {} and {}", name, min, max)))
        }
        _ => Ok(()),
    }
}

pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    ArtisanPath(artisan): ArtisanPath,
    Json(payload): Json<SavePricingSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_bound("off_peak_discount", payload.off_peak_discount, -50, 0)?;
    check_bound("weekend_surcharge", payload.weekend_surcharge, 0, 50)?;
    check_bound("last_minute_surcharge", payload.last_minute_surcharge, 0, 50)?;
    check_bound("holiday_surcharge", payload.holiday_surcharge, 0, 100)?;
    if let Some(ref rules) = payload.custom_rules {
        if rules.len() > MAX_CUSTOM_RULES {
            return Err(AppError::Validation(format!("At most {} custom rules", MAX_CUSTOM_RULES)));
        }
        if rules.iter().any(|r| r.rule_type.trim().is_empty() || !(-100..=100).contains(&r.discount)) {
            return Err(AppError::Validation("Custom rules need a type and a discount between -100 and 100".into()));
        }
    }

    let now = state.clock.now();
    let mut settings = state.pricing_repo.find(&artisan.id).await?
        .unwrap_or_else(|| PricingSettings::default_for(&artisan.id, now));

    if let Some(enabled) = payload.enable_dynamic_pricing { settings.enable_dynamic_pricing = enabled; }
    if let Some(v) = payload.off_peak_discount { settings.off_peak_discount = v; }
    if let Some(v) = payload.weekend_surcharge { settings.weekend_surcharge = v; }
    if let Some(v) = payload.last_minute_surcharge { settings.last_minute_surcharge = v; }
    if let Some(v) = payload.holiday_surcharge { settings.holiday_surcharge = v; }
    if let Some(rules) = payload.custom_rules { settings.custom_rules = DbJson(rules); }
    settings.updated_at = now;

    let saved = state.pricing_repo.upsert(&settings).await?;
    info!("Pricing settings saved for artisan {}", artisan.id);
    Ok(Json(saved))
}
