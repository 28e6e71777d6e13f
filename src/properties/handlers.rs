use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::properties::dto::{
    CreatePropertyRequest, FilterParams, PropertyResponse, UpdatePropertyRequest,
};
use crate::properties::repo::{Image, ListingFilter, Property};
use crate::state::AppState;
use crate::users::repo::User;

/// Listing routes. Browsing is public; creating and mutating a listing
/// requires an authenticated account.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_properties).post(create_property))
        .route("/properties/filter", get(filter_properties))
        .route(
            "/properties/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
}

async fn list_properties(State(state): State<AppState>) -> ApiResult<Json<Vec<PropertyResponse>>> {
    let properties = Property::list_all(&state.db).await?;
    Ok(Json(to_responses(&state.db, properties).await?))
}

#[instrument(skip(state))]
async fn filter_properties(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FilterParams>,
) -> ApiResult<Json<Vec<PropertyResponse>>> {
    let filter = ListingFilter::from(params);
    let properties = Property::filter(&state.db, &filter).await?;
    Ok(Json(to_responses(&state.db, properties).await?))
}

async fn get_property(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<PropertyResponse>> {
    let property = Property::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Property not found with id: {id}")))?;
    let owner = User::find_by_id(&state.db, property.owner_id).await?;
    let images = Image::for_properties(&state.db, &[property.id]).await?;
    Ok(Json(PropertyResponse::assemble(property, owner, images)))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
async fn create_property(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<CreatePropertyRequest>,
) -> ApiResult<Json<PropertyResponse>> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if payload.price < Decimal::ZERO {
        return Err(ApiError::Validation("Price must not be negative".into()));
    }

    let property = Property::create_with_images(&state.db, payload.into_new(user.id)).await?;
    info!(property_id = %property.id, "property created");

    let images = Image::for_properties(&state.db, &[property.id]).await?;
    Ok(Json(PropertyResponse::assemble(property, Some(user), images)))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
async fn update_property(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdatePropertyRequest>,
) -> ApiResult<Json<PropertyResponse>> {
    let mut property = Property::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Property not found with id: {id}")))?;

    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required".into()));
        }
    }
    if let Some(price) = payload.price {
        if price < Decimal::ZERO {
            return Err(ApiError::Validation("Price must not be negative".into()));
        }
    }

    payload.apply(&mut property);
    let property = property.update(&state.db).await?;
    info!(property_id = %property.id, "property updated");

    let owner = User::find_by_id(&state.db, property.owner_id).await?;
    let images = Image::for_properties(&state.db, &[property.id]).await?;
    Ok(Json(PropertyResponse::assemble(property, owner, images)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
async fn delete_property(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Property::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Property not found with id: {id}")));
    }
    info!(property_id = %id, "property deleted");
    Ok(StatusCode::OK)
}

/// Batch-loads owners and galleries for a page of listings.
async fn to_responses(
    db: &PgPool,
    properties: Vec<Property>,
) -> Result<Vec<PropertyResponse>, sqlx::Error> {
    if properties.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = properties.iter().map(|p| p.id).collect();
    let owner_ids: Vec<Uuid> = properties.iter().map(|p| p.owner_id).collect();

    let owners: HashMap<Uuid, User> = User::find_by_ids(db, &owner_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let mut galleries: HashMap<Uuid, Vec<Image>> = HashMap::new();
    for image in Image::for_properties(db, &ids).await? {
        galleries.entry(image.property_id).or_default().push(image);
    }

    Ok(properties
        .into_iter()
        .map(|property| {
            let owner = owners.get(&property.owner_id).cloned();
            let images = galleries.remove(&property.id).unwrap_or_default();
            PropertyResponse::assemble(property, owner, images)
        })
        .collect())
}
