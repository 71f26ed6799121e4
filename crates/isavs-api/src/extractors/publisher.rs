//! `PublisherAuth` extractor — guards the realtime management endpoints
//! with the configured `realtime.publish_token`.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use isavs_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the request carried the publish token as a Bearer credential.
#[derive(Debug, Clone, Copy)]
pub struct PublisherAuth;

impl FromRequestParts<AppState> for PublisherAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Routes are only mounted with a token, but never fail open.
        let expected = state
            .config
            .realtime
            .publish_token()
            .ok_or_else(|| AppError::unauthorized("Publishing is disabled"))?;

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        if !tokens_match(token.trim().as_bytes(), expected.as_bytes()) {
            warn!(path = %parts.uri.path(), "Rejected realtime request with wrong publish token");
            return Err(AppError::unauthorized("Invalid publish token").into());
        }

        Ok(PublisherAuth)
    }
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
