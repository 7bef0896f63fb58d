//! Fetch error types.
//!
//! The top-level [`FetchError`] is the failure taxonomy providers surface:
//! configuration problems (fatal to a provider), expected unauthenticated
//! states, upstream-shape changes (parse and identifier failures, logged
//! with raw context), and transient transport trouble eligible for the
//! next scheduled retry. Host-specific errors fold into it via `From`.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for provider fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Missing credential, binary, or setting. Fatal to the provider
    /// until the configuration changes; surfaced once, not retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The browser session is not authenticated. Expected state that
    /// triggers the sign-in prompt; not logged as a failure.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// No account identifier could be established after every fallback
    /// stage. The upstream page or API shape changed.
    #[error("No account identifier found")]
    NoAccountIdentifier,

    /// Upstream text or JSON did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Network or process failure; transient, eligible for retry on the
    /// next scheduled round.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The fetch exceeded its internal bound.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Returns true for failures the next scheduled round may clear.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Returns true for expected states that are not logged as failures.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not expose the configured bound on the error.
            Self::Timeout(Duration::ZERO)
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(ParseError::InvalidJson(err.to_string()))
    }
}

impl From<HttpError> for FetchError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(d) => Self::Timeout(d),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<ProcessError> for FetchError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::NotFound(cmd) => {
                Self::Configuration(format!("Command not found: {cmd}"))
            }
            ProcessError::Timeout(d) => Self::Timeout(d),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<DocumentError> for FetchError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotAttached => {
                Self::Configuration("no document host attached".to_string())
            }
            DocumentError::NotAuthenticated => Self::NotAuthenticated,
            DocumentError::Timeout(d) => Self::Timeout(d),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<CredentialError> for FetchError {
    fn from(err: CredentialError) -> Self {
        Self::Configuration(err.to_string())
    }
}

// ============================================================================
// Parse Error
// ============================================================================

/// Error type for tolerant-parsing failures.
///
/// Carries the field name (and the raw text for numeric failures) so a
/// shape change upstream is diagnosable from the log line alone.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A required labeled field was absent.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing label.
        field: String,
    },

    /// A label was found but its value did not parse as a number.
    #[error("Invalid number for {field}: {raw:?}")]
    InvalidNumber {
        /// Name of the label the value followed.
        field: String,
        /// The raw text that failed to convert.
        raw: String,
    },

    /// A JSON body did not match the expected structure.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Unexpected HTTP status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

// ============================================================================
// Process Error
// ============================================================================

/// Error type for subprocess operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Command not found on PATH.
    #[error("Command not found: {0}")]
    NotFound(String),

    /// Command timed out.
    #[error("Command timed out after {0:?}")]
    Timeout(Duration),

    /// Non-zero exit code.
    #[error("Command exited with code {code}: {stderr}")]
    NonZeroExit {
        /// Exit code from the process.
        code: i32,
        /// Standard error output.
        stderr: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Document Error
// ============================================================================

/// Error type for document host operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// No embedded browser is attached to this context.
    #[error("No document host attached")]
    NotAttached,

    /// The session backing the document host is not authenticated.
    #[error("Document host session not authenticated")]
    NotAuthenticated,

    /// Script evaluation failed in the page.
    #[error("Script evaluation failed: {0}")]
    EvalFailed(String),

    /// The evaluated result was not JSON-serializable.
    #[error("Script result not serializable: {0}")]
    NotSerializable(String),

    /// Navigation failed.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Script evaluation timed out.
    #[error("Script evaluation timed out after {0:?}")]
    Timeout(Duration),
}

// ============================================================================
// Credential Error
// ============================================================================

/// Error type for credential store operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Access to the secure storage was denied.
    #[error("Access denied to credential storage")]
    AccessDenied,

    /// The secure storage backend is unavailable.
    #[error("Credential storage unavailable: {0}")]
    Unavailable(String),

    /// Platform error.
    #[error("Platform error: {0}")]
    Platform(String),
}

impl From<keyring::Error> for CredentialError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoStorageAccess(_) => CredentialError::AccessDenied,
            keyring::Error::PlatformFailure(e) => CredentialError::Platform(e.to_string()),
            other => CredentialError::Unavailable(other.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::Transport("connection reset".into()).is_transient());
        assert!(FetchError::Timeout(Duration::from_secs(30)).is_transient());
        assert!(!FetchError::Configuration("no key".into()).is_transient());
        assert!(!FetchError::NotAuthenticated.is_transient());
        assert!(!FetchError::NoAccountIdentifier.is_transient());
    }

    #[test]
    fn test_expected_classification() {
        assert!(FetchError::NotAuthenticated.is_expected());
        assert!(!FetchError::Transport("x".into()).is_expected());
    }

    #[test]
    fn test_process_not_found_is_configuration() {
        let err: FetchError = ProcessError::NotFound("ccusage".into()).into();
        assert!(matches!(err, FetchError::Configuration(_)));
    }

    #[test]
    fn test_document_not_authenticated_maps_through() {
        let err: FetchError = DocumentError::NotAuthenticated.into();
        assert!(matches!(err, FetchError::NotAuthenticated));
    }

    #[test]
    fn test_parse_error_names_field() {
        let err = ParseError::MissingField {
            field: "Total Cost".into(),
        };
        assert_eq!(err.to_string(), "Missing required field: Total Cost");

        let err = ParseError::InvalidNumber {
            field: "Sessions".into(),
            raw: "many".into(),
        };
        assert!(err.to_string().contains("Sessions"));
        assert!(err.to_string().contains("many"));
    }
}
