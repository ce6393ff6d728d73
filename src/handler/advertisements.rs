use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::addb::AdExt,
    dtos::addtos::{AdImageDto, AdListQueryDto, CreateAdDto, FilterAdDto, UpdateAdDto},
    error::HttpError,
    utils::pagination::{Paginator, PAGE_SIZE},
    AppState,
};

/// Related listings shown under an advertisement detail view.
const RELATED_LIMIT: usize = 4;

pub fn ad_handler() -> Router {
    Router::new()
        .route("/", get(list_advertisements).post(create_advertisement))
        .route(
            "/:ad_id",
            get(get_advertisement)
                .put(update_advertisement)
                .delete(delete_advertisement),
        )
}

pub async fn list_advertisements(
    Query(query_params): Query<AdListQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let filters = query_params.to_filters();

    let total = app_state
        .db_client
        .count_active_ads(&filters)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let paginator = Paginator::new(total as u64, PAGE_SIZE);
    let page = paginator.clamp_page(query_params.parse_page());

    let ads = app_state
        .db_client
        .get_active_ads(&filters, PAGE_SIZE as usize, paginator.offset(page))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Distinct locations feed the filter dropdown on the client
    let locations = app_state
        .db_client
        .get_distinct_ad_locations()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_ads: Vec<FilterAdDto> = ads.iter().map(FilterAdDto::from_ad).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "advertisements": filtered_ads,
            "locations": locations,
            "total": total,
            "pagination": paginator.meta(page)
        }
    })))
}

pub async fn get_advertisement(
    Path(ad_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let mut ad = app_state
        .db_client
        .get_active_ad_by_id(ad_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Advertisement not found"))?;

    // Every detail view counts, no deduplication by viewer
    if let Some(views) = app_state
        .db_client
        .increment_ad_views(ad_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
    {
        ad.views_count = views;
    }

    let related = app_state
        .db_client
        .get_related_ads(ad.category, ad.id, RELATED_LIMIT)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let images = app_state
        .db_client
        .get_ad_images(ad.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let related_ads: Vec<FilterAdDto> = related.iter().map(FilterAdDto::from_ad).collect();
    let image_dtos: Vec<AdImageDto> = images.iter().map(AdImageDto::from_image).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "advertisement": FilterAdDto::from_ad(&ad),
            "images": image_dtos,
            "related_ads": related_ads
        }
    })))
}

pub async fn create_advertisement(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateAdDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ad = app_state
        .db_client
        .create_ad(body)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Advertisement created successfully",
        "data": {
            "advertisement": FilterAdDto::from_ad(&ad)
        }
    })))
}

pub async fn update_advertisement(
    Path(ad_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdateAdDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ad = app_state
        .db_client
        .update_ad(ad_id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Advertisement not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Advertisement updated successfully",
        "data": {
            "advertisement": FilterAdDto::from_ad(&ad)
        }
    })))
}

pub async fn delete_advertisement(
    Path(ad_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deactivated = app_state
        .db_client
        .deactivate_ad(ad_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !deactivated {
        return Err(HttpError::not_found("Advertisement not found"));
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Advertisement deactivated successfully"
    })))
}
