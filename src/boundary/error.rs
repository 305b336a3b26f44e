use std::fmt;

use crate::ai::analyzer::AiFailure;

/// Stable error taxonomy for the whole suggestion path. Each kind maps to
/// exactly one HTTP status, so the transport in front of the service stays a
/// dumb translator.
#[derive(Debug)]
pub enum SuggestError {
    /// Malformed or empty page description; carries the validator's issues.
    Validation(Vec<String>),

    /// AI credentials invalid or missing, with fallback disabled.
    Authentication(String),

    /// Upstream throttle or admission-control rejection.
    RateLimited { retry_after_secs: Option<u64> },

    /// The request boundary's wall-clock budget elapsed.
    Timeout { budget_ms: u64 },

    /// Any other failure, with fallback disabled.
    Upstream(String),
}

impl SuggestError {
    pub fn status(&self) -> u16 {
        match self {
            SuggestError::Validation(_) => 400,
            SuggestError::Authentication(_) => 401,
            SuggestError::RateLimited { .. } => 429,
            SuggestError::Timeout { .. } => 408,
            SuggestError::Upstream(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SuggestError::Validation(_) => "validation_error",
            SuggestError::Authentication(_) => "authentication_failure",
            SuggestError::RateLimited { .. } => "rate_limited",
            SuggestError::Timeout { .. } => "timeout",
            SuggestError::Upstream(_) => "upstream_error",
        }
    }

    /// Caller-facing message, safe for any deployment.
    pub fn message(&self) -> &'static str {
        match self {
            SuggestError::Validation(_) => "invalid page description",
            SuggestError::Authentication(_) => "AI service authentication failed",
            SuggestError::RateLimited { .. } => "rate limit exceeded",
            SuggestError::Timeout { .. } => "request timed out",
            SuggestError::Upstream(_) => "element analysis failed",
        }
    }

    /// The single place an AI failure becomes a request error. Exhaustive by
    /// construction: every kind keeps its original semantics (401/429/408/5xx).
    pub fn from_ai(failure: AiFailure) -> Self {
        match failure {
            AiFailure::Authentication(msg) => SuggestError::Authentication(msg),
            AiFailure::RateLimited { retry_after_secs } => {
                SuggestError::RateLimited { retry_after_secs }
            }
            AiFailure::Timeout { budget_ms } => SuggestError::Timeout { budget_ms },
            AiFailure::Upstream(msg) => SuggestError::Upstream(msg),
        }
    }
}

impl fmt::Display for SuggestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestError::Validation(issues) => {
                write!(f, "invalid page description: {}", issues.join("; "))
            }
            SuggestError::Authentication(msg) => {
                write!(f, "AI service authentication failed: {}", msg)
            }
            SuggestError::RateLimited { retry_after_secs } => match retry_after_secs {
                Some(secs) => write!(f, "rate limit exceeded, retry in ~{}s", secs),
                None => write!(f, "rate limit exceeded"),
            },
            SuggestError::Timeout { budget_ms } => {
                write!(f, "request exceeded {}ms budget", budget_ms)
            }
            SuggestError::Upstream(msg) => write!(f, "element analysis failed: {}", msg),
        }
    }
}

impl std::error::Error for SuggestError {}
