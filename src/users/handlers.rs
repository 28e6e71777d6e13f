use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::gate::require_admin;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use crate::users::dto::{ProfileUpdateRequest, UserResponse, UserUpdateRequest};
use crate::users::repo::{Role, User};
use crate::validate::{is_valid_email, is_valid_phone};

/// Self-service account routes, available to any authenticated user.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(get_profile).put(update_profile))
        .route("/profile", get(role_greeting))
}

/// Administration routes; every route in here requires the ADMIN role.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/users", get(list_users))
        .route(
            "/admin/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/admin/users/:id/toggle-status", patch(toggle_status))
        .route_layer(middleware::from_fn(require_admin))
}

async fn get_profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    ApiJson(payload): ApiJson<ProfileUpdateRequest>,
) -> ApiResult<Json<UserResponse>> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Name is required".into()));
        }
    }
    if let Some(phone) = &payload.phone {
        if !is_valid_phone(phone) {
            return Err(ApiError::Validation("Invalid phone number format".into()));
        }
    }

    payload.apply(&mut user);
    let user = user.update(&state.db).await?;
    info!(user_id = %user.id, "profile updated");
    Ok(Json(UserResponse::from(user)))
}

async fn role_greeting(CurrentUser(user): CurrentUser) -> &'static str {
    match user.role {
        Role::Admin => "bonjour admin",
        Role::User => "bonjour le client",
    }
}

async fn admin_dashboard() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Admin Dashboard",
        "role": "ADMIN",
    }))
}

async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found with id: {id}")))?;
    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip(state, payload))]
async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(mut payload): ApiJson<UserUpdateRequest>,
) -> ApiResult<Json<UserResponse>> {
    let mut user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found with id: {id}")))?;

    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Name is required".into()));
        }
    }
    if let Some(email) = &mut payload.email {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email format".into()));
        }
        if *email != user.email && User::find_by_email(&state.db, email).await?.is_some() {
            warn!(%id, "admin update rejected, email already taken");
            return Err(ApiError::Conflict(format!("Email already exists: {email}")));
        }
    }
    if let Some(phone) = &payload.phone {
        if !is_valid_phone(phone) {
            return Err(ApiError::Validation("Invalid phone number format".into()));
        }
    }

    payload.apply(&mut user);
    let user = user.update(&state.db).await?;
    info!(user_id = %user.id, "user updated by admin");
    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = User::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("User not found with id: {id}")));
    }
    info!(user_id = %id, "user deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn toggle_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::toggle_enabled(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found with id: {id}")))?;
    info!(user_id = %user.id, enabled = user.enabled, "user status toggled");
    Ok(Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Someone".into(),
            email: "someone@example.com".into(),
            password_hash: "hash".into(),
            phone: None,
            role,
            enabled: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn dashboard_payload_names_the_admin_role() {
        let Json(body) = admin_dashboard().await;
        assert_eq!(body["message"], "Welcome to Admin Dashboard");
        assert_eq!(body["role"], "ADMIN");
    }

    #[tokio::test]
    async fn greeting_depends_on_role() {
        let admin = role_greeting(CurrentUser(sample_user(Role::Admin))).await;
        assert_eq!(admin, "bonjour admin");
        let client = role_greeting(CurrentUser(sample_user(Role::User))).await;
        assert_eq!(client, "bonjour le client");
    }
}
