use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::ApiError;

/// The auth gate. Resolves the caller's identity from the `Authorization`
/// header before any protected handler runs.
///
/// The header value is the token itself, with no `Bearer ` scheme prefix;
/// existing clients send it bare. Missing, malformed, and expired tokens all
/// collapse to the same 403 so a caller learns nothing from the distinction.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Forbidden)?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            ApiError::Forbidden
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/cars");
        if let Some(v) = value {
            builder = builder.header("Authorization", v);
        }
        let (parts, _) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[tokio::test]
    async fn resolves_identity_from_bare_token() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let token = JwtKeys::from_ref(&state).sign(user_id).expect("sign");

        let mut parts = parts_with_auth(Some(&token));
        let AuthUser(resolved) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("extract");
        assert_eq!(resolved, user_id);
    }

    #[tokio::test]
    async fn missing_header_is_forbidden() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn tampered_token_is_forbidden() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign(Uuid::new_v4()).expect("sign");
        let tampered = format!("{}x", token);

        let mut parts = parts_with_auth(Some(&tampered));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn prefixed_token_is_rejected() {
        // Clients that add a "Bearer " scheme do not match the wire format.
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign(Uuid::new_v4()).expect("sign");

        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        assert!(AuthUser::from_request_parts(&mut parts, &state)
            .await
            .is_err());
    }
}
