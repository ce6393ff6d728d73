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
    db::propertydb::{PropertyExt, PropertySearchFilters},
    dtos::propertydtos::{
        CreatePropertyDto, FilterPropertyDto, PropertyImageDto, PropertyListQueryDto,
        SearchQueryDto, UpdatePropertyDto,
    },
    error::HttpError,
    utils::pagination::{Paginator, PAGE_SIZE},
    AppState,
};

const RELATED_LIMIT: usize = 4;

pub fn property_handler() -> Router {
    Router::new()
        .route("/", get(list_properties).post(create_property))
        .route(
            "/:property_id",
            get(get_property).put(update_property).delete(delete_property),
        )
}

pub async fn list_properties(
    Query(query_params): Query<PropertyListQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let filters = query_params.to_filters();

    let total = app_state
        .db_client
        .count_active_properties(&filters)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let paginator = Paginator::new(total as u64, PAGE_SIZE);
    let page = paginator.clamp_page(query_params.parse_page());

    let properties = app_state
        .db_client
        .get_active_properties(&filters, PAGE_SIZE as usize, paginator.offset(page))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cities = app_state
        .db_client
        .get_distinct_cities()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_properties: Vec<FilterPropertyDto> = properties
        .iter()
        .map(FilterPropertyDto::from_property)
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "properties": filtered_properties,
            "cities": cities,
            "total": total,
            "pagination": paginator.meta(page)
        }
    })))
}

pub async fn get_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .get_active_property_by_id(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    let related = app_state
        .db_client
        .get_related_properties(
            &property.city,
            property.property_type,
            property.id,
            RELATED_LIMIT,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let images = app_state
        .db_client
        .get_property_images(property.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let related_properties: Vec<FilterPropertyDto> = related
        .iter()
        .map(FilterPropertyDto::from_property)
        .collect();
    let image_dtos: Vec<PropertyImageDto> =
        images.iter().map(PropertyImageDto::from_image).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "property": FilterPropertyDto::from_property(&property),
            "images": image_dtos,
            "related_properties": related_properties
        }
    })))
}

/// Free-text search over active properties. Results keep the default
/// creation-descending order, no relevance ranking.
pub async fn search_properties(
    Query(query_params): Query<SearchQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let query = query_params.query();
    let filters = PropertySearchFilters::for_search(query.clone());

    let total = app_state
        .db_client
        .count_active_properties(&filters)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let paginator = Paginator::new(total as u64, PAGE_SIZE);
    let page = paginator.clamp_page(query_params.parse_page());

    let properties = app_state
        .db_client
        .get_active_properties(&filters, PAGE_SIZE as usize, paginator.offset(page))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results: Vec<FilterPropertyDto> = properties
        .iter()
        .map(FilterPropertyDto::from_property)
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "query": query,
            "properties": results,
            "total": total,
            "pagination": paginator.meta(page)
        }
    })))
}

pub async fn create_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property = app_state
        .db_client
        .create_property(body)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property created successfully",
        "data": {
            "property": FilterPropertyDto::from_property(&property)
        }
    })))
}

pub async fn update_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property = app_state
        .db_client
        .update_property(property_id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property updated successfully",
        "data": {
            "property": FilterPropertyDto::from_property(&property)
        }
    })))
}

pub async fn delete_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deactivated = app_state
        .db_client
        .deactivate_property(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !deactivated {
        return Err(HttpError::not_found("Property not found"));
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property deactivated successfully"
    })))
}
