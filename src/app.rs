use std::net::SocketAddr;

use axum::extract::Request;
use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::gate;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::{auth, client, favorites, properties, users};

pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::router())
        .merge(properties::router())
        .merge(favorites::router())
        .merge(users::router())
        .merge(users::admin_router());

    Router::new()
        .nest("/api", api)
        .nest("/client", client::router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::authenticate,
        ))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Paths that match no route still follow the protection policy: an
/// anonymous caller is refused before learning whether the path exists.
async fn not_found(req: Request) -> ApiError {
    if req.extensions().get::<CurrentUser>().is_some() {
        ApiError::NotFound("Resource not found".into())
    } else {
        ApiError::Unauthorized("Authentication required".into())
    }
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request as HttpRequest, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn request(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn client_dashboard_requires_a_token() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(request("/client/dashboard")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_dashboard_requires_a_token() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(request("/api/admin/dashboard")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_bearer_token_stays_anonymous() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/client/dashboard")
                    .header("Authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_path_is_refused_before_disclosure() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(request("/does-not-exist")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refusals_use_the_error_envelope() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(request("/client/dashboard")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["timestamp"].is_string());
        assert_eq!(body["status"], 401);
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["message"], "Authentication required");
    }
}
