//! Error types exposed by the GitHub audit layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while configuring an audit or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditError {
    /// The authentication token was missing.
    #[error("GitHub token cannot be empty")]
    MissingToken,

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The repository filter is neither `owner/name` nor a name fragment.
    #[error("repository filter `{input}` must be `owner/name` or a name fragment")]
    InvalidRepositoryFilter {
        /// The filter exactly as supplied.
        input: String,
    },

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401 response.
        message: String,
    },

    /// GitHub answered 403 or 404 for a resource the token cannot see.
    #[error("GitHub denied access ({status}): {message}")]
    AccessDenied {
        /// HTTP status code, either 403 or 404.
        status: u16,
        /// GitHub error message.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// A response could not be decoded into the expected shape.
    #[error("GitHub response could not be decoded: {message}")]
    Decode {
        /// Deserialisation error detail.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if it could be fetched after the failure.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub, enriched with quota details.
        message: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },
}

impl AuditError {
    /// Returns true when GitHub refused to show the resource (403 or 404).
    ///
    /// Rate limit responses share the 403 status but are never classified as
    /// access denials.
    #[must_use]
    pub const fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    /// Returns true for errors that must abort a bulk audit run instead of
    /// skipping the current repository.
    #[must_use]
    pub const fn is_fatal_in_bulk(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. } | Self::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::AuditError;

    #[rstest]
    #[case::rate_limit(AuditError::RateLimitExceeded { rate_limit: None, message: "slow down".to_owned() }, true)]
    #[case::decode(AuditError::Decode { message: "missing field".to_owned() }, true)]
    #[case::access_denied(AuditError::AccessDenied { status: 404, message: "Not Found".to_owned() }, false)]
    #[case::api(AuditError::Api { message: "boom".to_owned() }, false)]
    #[case::network(AuditError::Network { message: "reset".to_owned() }, false)]
    fn classifies_bulk_fatality(#[case] error: AuditError, #[case] expected: bool) {
        assert_eq!(error.is_fatal_in_bulk(), expected, "unexpected for {error:?}");
    }

    #[rstest]
    fn access_denied_is_distinct_from_rate_limit() {
        let denied = AuditError::AccessDenied {
            status: 403,
            message: "Must have admin rights to Repository.".to_owned(),
        };
        let limited = AuditError::RateLimitExceeded {
            rate_limit: None,
            message: "API rate limit exceeded".to_owned(),
        };

        assert!(denied.is_access_denied());
        assert!(!limited.is_access_denied());
    }
}
