//! Error mapping helpers for the Octocrab GitHub gateway implementations.

use http::StatusCode;
use octocrab::Octocrab;

use crate::github::error::AuditError;
use crate::github::rate_limit::RateLimitInfo;

/// Checks if a GitHub error status means the token itself was rejected.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED)
}

/// Checks if a GitHub error status means the resource is hidden from the
/// caller.
pub(super) const fn is_visibility_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::FORBIDDEN | StatusCode::NOT_FOUND)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks if an octocrab error comes from decoding a response body.
pub(super) const fn is_decode_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> AuditError {
    if let octocrab::Error::GitHub { source, .. } = error {
        let status = source.status_code;
        let message = format!("{operation} failed: {message}", message = source.message);
        if is_auth_failure(status) {
            return AuditError::Authentication { message };
        }
        if is_visibility_failure(status) {
            return AuditError::AccessDenied {
                status: status.as_u16(),
                message,
            };
        }
        return AuditError::Api {
            message: format!(
                "{operation} failed with status {status}: {message}",
                message = source.message
            ),
        };
    }

    if is_network_error(error) {
        return AuditError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    if is_decode_error(error) {
        return AuditError::Decode {
            message: format!("{operation} failed: {error}"),
        };
    }

    AuditError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps an octocrab error, asking `/rate_limit` for quota details when the
/// failure was a rate limit rejection.
pub(super) async fn map_octocrab_error_with_rate_limit(
    client: &Octocrab,
    operation: &str,
    error: &octocrab::Error,
) -> AuditError {
    match error {
        octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
            let base_message = format!("{operation} failed: {message}", message = source.message);
            rate_limit_error(client, base_message).await
        }
        _ => map_octocrab_error(operation, error),
    }
}

/// Builds a rate limit error enriched with the current quota window.
pub(super) async fn rate_limit_error(client: &Octocrab, base_message: String) -> AuditError {
    let rate_limit = fetch_rate_limit_info(client).await;
    let message = match &rate_limit {
        Some(info) => format!("{base_message} ({info})"),
        None => base_message,
    };

    AuditError::RateLimitExceeded {
        rate_limit,
        message,
    }
}

async fn fetch_rate_limit_info(client: &Octocrab) -> Option<RateLimitInfo> {
    let rate = client.ratelimit().get().await.ok()?.rate;
    let Ok(limit) = u32::try_from(rate.limit) else {
        return None;
    };
    let Ok(remaining) = u32::try_from(rate.remaining) else {
        return None;
    };
    Some(RateLimitInfo::new(limit, remaining, rate.reset))
}
