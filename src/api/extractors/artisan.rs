use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;
use crate::domain::models::artisan::Artisan;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::Span;

/// The artisan named by the `{artisan_id}` path segment. Unknown ids are rejected with 404.
pub struct ArtisanPath(pub Artisan);

impl FromRequestParts<Arc<AppState>> for ArtisanPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Invalid path parameters".into()))?;

        let artisan_id = params.get("artisan_id")
            .ok_or(AppError::Validation("Missing artisan_id".into()))?;

        let artisan = state.artisan_repo.find_by_id(artisan_id).await?
            .ok_or(AppError::NotFound("Artisan not found".into()))?;

        Span::current().record("artisan_id", artisan.id.as_str());

        Ok(ArtisanPath(artisan))
    }
}
