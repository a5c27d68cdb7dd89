use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::validate_jwt;
use crate::database::models::UserProfile;
use crate::error::ApiError;

/// The caller, resolved from the bearer token and re-checked against the store
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<AuthUser> for UserProfile {
    fn from(user: AuthUser) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

/// Rejects the request with 401 unless it carries a valid token for an
/// existing, active user; otherwise injects `AuthUser` for the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers()).map_err(|msg| {
        tracing::debug!("Unauthenticated request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = validate_jwt(token)?;

    let user = state
        .users
        .active_user(claims.sub)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            tracing::warn!("Token subject {} is unknown or inactive", claims.sub);
            ApiError::unauthorized("User inactive or deleted.")
        })?;

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        name: user.name,
    });

    Ok(next.run(request).await)
}

/// Accepts `Authorization: Bearer <token>` and the `Token <token>` form
fn extract_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Authentication credentials were not provided.")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("Token "))
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Invalid token header. No credentials provided.");
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_and_token_schemes() {
        assert_eq!(extract_token(&headers("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(extract_token(&headers("Token abc.def")), Ok("abc.def"));
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert!(extract_token(&HeaderMap::new()).is_err());
        assert!(extract_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_token(&headers("Bearer    ")).is_err());
    }
}
