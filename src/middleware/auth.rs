use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_jwt, Claims};
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::types::OwnerId;

/// Authenticated principal resolved from the session token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub owner_id: OwnerId,
    pub email: String,
    pub name: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            owner_id: claims.owner_id(),
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Access guard: resolves the session before the handler runs.
///
/// Requests without a valid session are answered with 401 here, so no body is
/// parsed and no store call happens for them.
pub async fn session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = resolve_session(request.headers(), &state.config.security).map_err(|reason| {
        tracing::warn!("Rejected unauthenticated request to {}: {}", request.uri().path(), reason);
        ApiError::unauthorized("Unauthorized access")
    })?;

    tracing::debug!("Session resolved for owner {}", auth_user.owner_id);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Resolves the caller from the Authorization header or, failing that, the session cookie
pub fn resolve_session(headers: &HeaderMap, security: &SecurityConfig) -> Result<AuthUser, String> {
    let token = extract_token(headers, &security.session_cookie)?;
    let claims = validate_jwt(&token, &security.jwt_secret).map_err(|e| e.to_string())?;
    Ok(AuthUser::from(claims))
}

fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Result<String, String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| "Invalid Authorization header format".to_string())?;

        return match auth_str.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Some(_) => Err("Empty session token".to_string()),
            None => Err("Authorization header must use Bearer token format".to_string()),
        };
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
        .ok_or_else(|| "Missing session token".to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Unauthorized access"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate_jwt;
    use crate::config::AppConfig;
    use axum::http::HeaderValue;

    fn token_for(owner: &str, security: &SecurityConfig) -> String {
        let claims = Claims::new(&OwnerId::from(owner), "owner@example.com", None, 1);
        generate_jwt(&claims, &security.jwt_secret).unwrap()
    }

    #[test]
    fn resolves_bearer_token() {
        let security = AppConfig::development().security;
        let mut headers = HeaderMap::new();
        let value = format!("Bearer {}", token_for("owner-a", &security));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());

        let user = resolve_session(&headers, &security).unwrap();
        assert_eq!(user.owner_id, OwnerId::from("owner-a"));
    }

    #[test]
    fn resolves_session_cookie() {
        let security = AppConfig::development().security;
        let mut headers = HeaderMap::new();
        let value = format!("theme=dark; {}={}", security.session_cookie, token_for("owner-b", &security));
        headers.insert(header::COOKIE, HeaderValue::from_str(&value).unwrap());

        let user = resolve_session(&headers, &security).unwrap();
        assert_eq!(user.owner_id, OwnerId::from("owner-b"));
    }

    #[test]
    fn rejects_missing_and_malformed_credentials() {
        let security = AppConfig::development().security;
        assert!(resolve_session(&HeaderMap::new(), &security).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(resolve_session(&headers, &security).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"));
        assert!(resolve_session(&headers, &security).is_err());
    }

    #[test]
    fn empty_secret_rejects_everyone() {
        let mut security = AppConfig::development().security;
        let token = token_for("owner-a", &security);
        security.jwt_secret.clear();

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
        assert!(resolve_session(&headers, &security).is_err());
    }
}
