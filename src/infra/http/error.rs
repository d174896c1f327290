use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::repos::RepoError;
use crate::domain::error::PurgeError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub mod codes {
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const TOKEN_UNSET: &str = "admin_token_unset";
    pub const CONFIRMATION_REQUIRED: &str = "confirmation_required";
    pub const CONFIG_INCOMPLETE: &str = "config_incomplete";
    pub const EDGE_UNAVAILABLE: &str = "edge_unavailable";
    pub const EMPTY_TARGET: &str = "empty_target";
    pub const MISSING_HOST: &str = "missing_host";
    pub const PURGE_API: &str = "purge_api_error";
    pub const REPO: &str = "repo_error";
}

/// JSON error response with a stable machine code and a human-readable
/// message, optionally carrying a remediation hint.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "admin token required",
            None,
        )
    }

    pub fn token_unset() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::TOKEN_UNSET,
            "no admin token is configured",
            Some("set `admin.token` in the configuration and restart".to_string()),
        )
    }

    pub fn confirmation_required(operation: &'static str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::CONFIRMATION_REQUIRED,
            format!("{operation} requires explicit confirmation"),
            Some("repeat the request with `confirm: true`".to_string()),
        )
    }
}

impl From<PurgeError> for ApiError {
    fn from(err: PurgeError) -> Self {
        let message = err.to_string();
        match err {
            PurgeError::ConfigIncomplete { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                codes::CONFIG_INCOMPLETE,
                message,
                Some("complete the edge settings via PUT /admin/settings".to_string()),
            ),
            PurgeError::Unavailable { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::EDGE_UNAVAILABLE,
                message,
                Some("configure `edge.endpoint` and restart".to_string()),
            ),
            PurgeError::EmptyTarget => Self::new(
                StatusCode::BAD_REQUEST,
                codes::EMPTY_TARGET,
                message,
                None,
            ),
            PurgeError::MissingHost => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                codes::MISSING_HOST,
                message,
                Some(
                    "set `default_host` in the edge settings or configure `site.base_url`"
                        .to_string(),
                ),
            ),
            PurgeError::Api { .. } => {
                Self::new(StatusCode::BAD_GATEWAY, codes::PURGE_API, message, None)
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            err.to_string(),
            None,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
