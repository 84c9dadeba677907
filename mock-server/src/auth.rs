//! Token issuance and bearer gating.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ServerError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Decode `Authorization: Basic <b64(id:secret)>` into its two halves.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let encoded = headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (id, secret) = text.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}

/// `POST /api/v2/client/tokens`. The form body is accepted and ignored.
pub async fn issue_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ServerError> {
    let Some((app_id, _secret)) = basic_credentials(&headers) else {
        warn!("token request without valid basic credentials");
        return Err(ServerError::InvalidAuthentication);
    };
    let token = state.store.write().await.issue_token(state.token_ttl, Utc::now());
    info!(%app_id, "issued access token");
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in: state.token_ttl.num_seconds().max(0),
    }))
}

/// Route layer rejecting requests without a live bearer token.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(request.headers()).map(str::to_owned);
    let authorized = match token {
        Some(token) => state.store.read().await.token_valid(&token, Utc::now()),
        None => false,
    };
    if !authorized {
        warn!(path = %request.uri().path(), "rejected unauthenticated request");
        return Err(ServerError::Unauthorized);
    }
    Ok(next.run(request).await)
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
    fn decodes_basic_credentials() {
        let creds = basic_credentials(&headers("Basic dGVzdF9hcHA6dGVzdF9zZWNyZXQ="));
        assert_eq!(creds, Some(("test_app".to_string(), "test_secret".to_string())));
    }

    #[test]
    fn rejects_malformed_basic_credentials() {
        assert!(basic_credentials(&headers("Basic not-base64!")).is_none());
        // base64("nocolon")
        assert!(basic_credentials(&headers("Basic bm9jb2xvbg==")).is_none());
        assert!(basic_credentials(&headers("Bearer abc")).is_none());
        assert!(basic_credentials(&HeaderMap::new()).is_none());
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
    }
}
