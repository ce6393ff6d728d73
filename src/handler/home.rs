use std::sync::Arc;

use axum::{response::IntoResponse, Extension, Json};

use crate::{
    db::{addb::AdExt, propertydb::PropertyExt},
    dtos::{addtos::FilterAdDto, propertydtos::FilterPropertyDto},
    error::HttpError,
    AppState,
};

const FEATURED_LIMIT: usize = 6;
const RECENT_LIMIT: usize = 8;

/// Home view: promoted and latest records for both listing families.
pub async fn home(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let featured_ads = app_state
        .db_client
        .get_featured_ads(FEATURED_LIMIT)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let recent_ads = app_state
        .db_client
        .get_recent_ads(RECENT_LIMIT)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let featured_properties = app_state
        .db_client
        .get_featured_properties(FEATURED_LIMIT)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let recent_properties = app_state
        .db_client
        .get_recent_properties(RECENT_LIMIT)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "featured_ads": featured_ads.iter().map(FilterAdDto::from_ad).collect::<Vec<_>>(),
            "recent_ads": recent_ads.iter().map(FilterAdDto::from_ad).collect::<Vec<_>>(),
            "featured_properties": featured_properties
                .iter()
                .map(FilterPropertyDto::from_property)
                .collect::<Vec<_>>(),
            "recent_properties": recent_properties
                .iter()
                .map(FilterPropertyDto::from_property)
                .collect::<Vec<_>>()
        }
    })))
}
