//! Error handling for the yogi library.
//!
//! Every failure surfaces as a single [`YogiError`] taxonomy distinguished
//! by a stable [`YogiError::code`] string rather than per-provider error
//! classes. Adapters never swallow upstream failures; they map the upstream
//! status into this taxonomy and propagate it unchanged.

use thiserror::Error;

/// The error type used throughout the library.
#[derive(Error, Debug)]
pub enum YogiError {
    /// Unregistered provider name. Raised before any network call.
    #[error("Model provider '{0}' not found")]
    ProviderNotFound(String),

    /// The upstream API reported a missing resource.
    #[error("{0}")]
    NotFound(String),

    /// Any other non-2xx upstream response, carrying the upstream status
    /// text and the provider that produced it.
    #[error("{provider} API error: {status}")]
    Upstream { provider: String, status: String },

    /// The caller supplied an input shape the adapter cannot translate.
    #[error("{0}")]
    InvalidInput(String),

    /// A unified service was used before `configure()`.
    #[error("Service must be configured before use")]
    NotConfigured,

    /// The operation is not implemented by the active provider.
    #[error("{0}")]
    UnsupportedOperation(String),

    /// Missing or malformed credentials at construction time.
    #[error("{0}")]
    Configuration(String),

    /// A generation was cancelled between stages.
    #[error("Generation '{0}' was cancelled")]
    Cancelled(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream returned a payload that could not be decoded.
    #[error("{0}")]
    Parse(String),

    /// Invariant violation inside the library (poisoned lock, etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl YogiError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProviderNotFound(_) => "PROVIDER_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::UnsupportedOperation(_) => "UNSUPPORTED_OPERATION",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cancelled(_) => "CANCELLED",
            Self::Http(_) => "HTTP_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Provider that produced this error, when known.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Upstream { provider, .. } => Some(provider),
            _ => None,
        }
    }
}
