use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::services::Identity;

/// Authenticated caller extracted from the bearer token
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub role: String,
}

impl AuthUser {
    /// Identity stamped onto submitter fields
    pub fn identity(&self) -> Identity {
        Identity {
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            name: claims.name,
            phone: claims.phone,
            role: claims.role,
        }
    }
}

/// Validates the bearer token and injects `AuthUser` into request extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(token, &state.config.security.jwt_secret).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::trace!("Authenticated {} ({})", auth_user.user_id, auth_user.role);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}
