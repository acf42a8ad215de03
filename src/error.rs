//! Error taxonomy shared by every connector.
//!
//! Validation and auth errors are raised before any outbound call is made.
//! Transport, API and decode errors come out of the shared HTTP helper.

/// Error returned by actions, triggers and option loaders.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// A required input field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// An input field is present but cannot be used as given.
    #[error("invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Credentials or auth parameters are missing.
    #[error("authentication error: {0}")]
    Auth(String),

    /// DNS, connection, timeout or client-construction failure.
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The remote API answered with a non-2xx status.
    #[error("API request failed with status {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    /// The remote API answered 2xx but the payload has an unexpected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A lookup over remote data found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConnectorError {
    /// Shorthand for [`ConnectorError::InvalidInput`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors raised before any outbound call (input and auth).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidInput { .. } | Self::Auth(_)
        )
    }

    /// HTTP status of a remote API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
