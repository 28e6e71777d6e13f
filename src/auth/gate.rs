use axum::extract::{FromRef, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, error, warn};

use crate::auth::extractors::CurrentUser;
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::{Role, User};

/// Authorization gate, run once per inbound request before routing.
///
/// A valid bearer token for an enabled account puts a [`CurrentUser`] into
/// the request extensions. Anything else (no header, bad scheme, bad
/// signature, expired token, unknown subject, disabled account) passes the
/// request through anonymous; route protection downstream decides whether
/// that is acceptable. No server-side session is kept.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(user) = resolve_bearer(&state, req.headers()).await {
        req.extensions_mut().insert(CurrentUser(user));
    }
    next.run(req).await
}

async fn resolve_bearer(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    // Expect "Bearer <token>"
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?;

    let keys = JwtKeys::from_ref(state);
    let claims = match keys.verify(token) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "bearer token rejected");
            return None;
        }
    };

    let user = match User::find_by_email(&state.db, &claims.sub).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(subject = %claims.sub, "token subject has no account");
            return None;
        }
        Err(e) => {
            error!(error = %e, "account lookup failed during authentication");
            return None;
        }
    };

    if !user.enabled {
        warn!(user_id = %user.id, "disabled account presented a valid token");
        return None;
    }

    Some(user)
}

/// Route layer for admin-prefixed routes.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<CurrentUser>() {
        Some(CurrentUser(user)) if user.role == Role::Admin => Ok(next.run(req).await),
        Some(_) => Err(ApiError::Forbidden("Admin role required".into())),
        None => Err(ApiError::Unauthorized("Authentication required".into())),
    }
}

/// Route layer for client-prefixed routes.
pub async fn require_user(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<CurrentUser>() {
        Some(CurrentUser(user)) if user.role == Role::User => Ok(next.run(req).await),
        Some(_) => Err(ApiError::Forbidden("User role required".into())),
        None => Err(ApiError::Unauthorized("Authentication required".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use time::OffsetDateTime;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn sample_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Somebody".into(),
            email: "somebody@example.com".into(),
            password_hash: "hash".into(),
            phone: None,
            role,
            enabled: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn admin_only_router() -> Router {
        Router::new()
            .route("/admin-only", get(|| async { "ok" }))
            .route_layer(from_fn(require_admin))
    }

    fn user_only_router() -> Router {
        Router::new()
            .route("/user-only", get(|| async { "ok" }))
            .route_layer(from_fn(require_user))
    }

    #[tokio::test]
    async fn require_admin_rejects_anonymous_with_401() {
        let res = admin_only_router()
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin-only")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_admin_rejects_plain_user_with_403() {
        let res = admin_only_router()
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin-only")
                    .extension(CurrentUser(sample_user(Role::User)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn require_admin_lets_admin_through() {
        let res = admin_only_router()
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin-only")
                    .extension(CurrentUser(sample_user(Role::Admin)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn require_user_rejects_admin_with_403() {
        let res = user_only_router()
            .oneshot(
                HttpRequest::builder()
                    .uri("/user-only")
                    .extension(CurrentUser(sample_user(Role::Admin)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn require_user_lets_user_through() {
        let res = user_only_router()
            .oneshot(
                HttpRequest::builder()
                    .uri("/user-only")
                    .extension(CurrentUser(sample_user(Role::User)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
