use thiserror::Error;

/// Failure taxonomy for purge operations, shared by the dispatcher, the
/// purge client and the admin surface.
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("edge configuration is missing `{field}`; complete it in the edge settings")]
    ConfigIncomplete { field: &'static str },
    #[error("edge purge client is unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("no usable purge targets were left after filtering")]
    EmptyTarget,
    #[error("no default host is configured and no site host could be resolved")]
    MissingHost,
    #[error("edge purge API call failed: {message}")]
    Api { message: String },
}

impl PurgeError {
    pub fn config_incomplete(field: &'static str) -> Self {
        Self::ConfigIncomplete { field }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }
}
