use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::favorites::dto::{FavoriteRequest, FavoriteResponse};
use crate::favorites::repo::Favorite;
use crate::properties::repo::Property;
use crate::state::AppState;

/// Favorites are always scoped to the authenticated caller.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/ids", get(favorite_ids))
        .route("/favorites/:property_id", delete(remove_favorite))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<FavoriteRequest>,
) -> ApiResult<Json<FavoriteResponse>> {
    if Favorite::exists(&state.db, user.id, payload.property_id).await? {
        return Err(ApiError::Conflict("Property already in favorites".into()));
    }

    let property = Property::find_by_id(&state.db, payload.property_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".into()))?;

    let favorite = Favorite::insert(&state.db, user.id, property.id).await?;
    info!(property_id = %property.id, "favorite added");
    Ok(Json(FavoriteResponse::new(favorite, property)))
}

/// Removing an absent favorite is not an error; the end state is the same.
#[instrument(skip(state, user), fields(user_id = %user.id))]
async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(property_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = Favorite::remove(&state.db, user.id, property_id).await?;
    if removed == 0 {
        debug!(%property_id, "favorite was not present");
    } else {
        info!(%property_id, "favorite removed");
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_favorites(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<FavoriteResponse>>> {
    let favorites = Favorite::list_for_user(&state.db, user.id).await?;
    Ok(Json(favorites.into_iter().map(FavoriteResponse::from).collect()))
}

async fn favorite_ids(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Uuid>>> {
    Ok(Json(Favorite::property_ids(&state.db, user.id).await?))
}
