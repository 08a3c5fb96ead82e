//! Reconstruction of deploy-key API URLs from GraphQL node identifiers.
//!
//! GraphQL exposes deploy keys only by node id. Legacy node ids are base64
//! of `09:PublicKey<id>`, which is enough to rebuild the REST URL of the key.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::locator::RepositoryRef;

const NODE_PREFIX: &str = "09:PublicKey";

/// Decodes the numeric key id embedded in a deploy-key node id.
///
/// Returns `None` when the id is not valid base64, lacks the `PublicKey`
/// prefix, or carries a non-numeric remainder.
///
/// # Example
///
/// ```
/// use ghaudit::github::deploy_key::decode_deploy_key_id;
///
/// assert_eq!(decode_deploy_key_id("MDk6UHVibGljS2V5MTIzNDU="), Some(12345));
/// assert_eq!(decode_deploy_key_id("not base64!"), None);
/// ```
#[must_use]
pub fn decode_deploy_key_id(node_id: &str) -> Option<u64> {
    let bytes = STANDARD.decode(node_id.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    decoded.strip_prefix(NODE_PREFIX)?.parse::<u64>().ok()
}

/// Builds `<api_base>/repos/<owner>/<name>/keys/<id>` for a deploy key.
#[must_use]
pub fn deploy_key_url(api_base: &str, repository: &RepositoryRef, node_id: &str) -> Option<String> {
    let id = decode_deploy_key_id(node_id)?;
    Some(format!(
        "{base}{path}/keys/{id}",
        base = api_base.trim_end_matches('/'),
        path = repository.repository_path()
    ))
}
