use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;

/// Scheme and authority clients use to reach this server, without a trailing
/// slash, e.g. `http://localhost:3000`.
///
/// Taken from `server.public_url` when configured, otherwise rebuilt from the
/// `X-Forwarded-Proto` and `Host` headers.
pub struct BaseUrl(pub String);

impl FromRequestParts<AppState> for BaseUrl {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(public_url) = &state.config.server.public_url {
            return Ok(BaseUrl(public_url.trim_end_matches('/').to_string()));
        }

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .ok_or_else(|| AppError::Validation("Missing Host header".into()))?;

        let scheme = parts
            .headers
            .get("X-Forwarded-Proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("http");

        Ok(BaseUrl(format!("{scheme}://{host}")))
    }
}
