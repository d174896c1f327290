use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use super::AdminState;
use super::error::ApiError;

/// Bearer-token gate shared by the webhook and the admin routes.
pub(super) async fn require_admin_token(
    State(state): State<AdminState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.admin_token.as_deref() else {
        return ApiError::token_unset().into_response();
    };

    let provided = match extract_token(request.headers().get(axum::http::header::AUTHORIZATION)) {
        Some(value) => value,
        None => return ApiError::unauthorized().into_response(),
    };

    if !token_matches(&provided, expected) {
        return ApiError::unauthorized().into_response();
    }

    next.run(request).await
}

fn extract_token(header: Option<&axum::http::HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}

fn token_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
