use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::users::repo::User;

/// The account the authorization gate resolved for this request.
///
/// Present in the request extensions only when the caller sent a valid
/// bearer token for an enabled account; extracting it on any other request
/// rejects with `Unauthorized`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::Role;
    use axum::extract::FromRequestParts;
    use axum::http::{Method, Request, StatusCode, Uri};
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn get_request_parts(method: Method, uri: Uri) -> axum::http::request::Parts {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        let (parts, _) = request.into_parts();
        parts
    }

    fn sample_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Client1 test".into(),
            email: "client1@example.com".into(),
            password_hash: "hash".into(),
            phone: Some("+0987654321".into()),
            role,
            enabled: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn extracts_the_user_placed_by_the_gate() {
        let mut parts = get_request_parts(Method::GET, Uri::from_static("/api/favorites"));
        let user = sample_user(Role::User);
        parts.extensions.insert(CurrentUser(user.clone()));

        let CurrentUser(got) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .expect("extraction should succeed");
        assert_eq!(got.id, user.id);
        assert_eq!(got.email, "client1@example.com");
    }

    #[tokio::test]
    async fn rejects_anonymous_requests() {
        let mut parts = get_request_parts(Method::GET, Uri::from_static("/api/favorites"));
        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .expect_err("anonymous request must be rejected");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
