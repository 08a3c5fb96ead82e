//! Identity wrappers for repositories and credentials.

use std::fmt;

use super::error::AuditError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner login is non-empty and contains no `/`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidRepositoryFilter`] for an empty login or
    /// one containing a path separator.
    pub fn new(value: &str) -> Result<Self, AuditError> {
        if value.is_empty() || value.contains('/') {
            return Err(AuditError::InvalidRepositoryFilter {
                input: value.to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty and contains no `/`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidRepositoryFilter`] for an empty name or
    /// one containing a path separator.
    pub fn new(value: &str) -> Result<Self, AuditError> {
        if value.is_empty() || value.contains('/') {
            return Err(AuditError::InvalidRepositoryFilter {
                input: value.to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Owner and name of one repository; the key for every audit sub-query.
///
/// # Example
///
/// ```
/// use ghaudit::github::locator::RepositoryRef;
///
/// let reference = RepositoryRef::from_owner_repo("genuinetools", "audit")
///     .expect("should build reference");
/// assert_eq!(reference.full_name(), "genuinetools/audit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositoryRef {
    /// Creates a reference from already validated parts.
    #[must_use]
    pub const fn new(owner: RepositoryOwner, name: RepositoryName) -> Self {
        Self { owner, name }
    }

    /// Creates a reference from owner and repository name strings.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidRepositoryFilter`] when either part is
    /// empty or contains a `/`.
    pub fn from_owner_repo(owner: &str, name: &str) -> Result<Self, AuditError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            name: RepositoryName::new(name)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Returns `owner/name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.name.as_str())
    }

    pub(crate) fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

/// Restriction of an audit to a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryFilter {
    /// A fully qualified `owner/name`; resolved with one direct lookup.
    Exact(RepositoryRef),
    /// Part of a repository name; resolved with a narrowed search.
    Fragment(String),
}

impl RepositoryFilter {
    /// Parses `owner/name` or a bare name fragment.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidRepositoryFilter`] when the input is
    /// blank or when either side of the `/` is empty or contains another
    /// `/`.
    pub fn parse(input: &str) -> Result<Self, AuditError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AuditError::InvalidRepositoryFilter {
                input: input.to_owned(),
            });
        }

        match trimmed.split_once('/') {
            Some((owner, name)) => RepositoryRef::from_owner_repo(owner, name)
                .map(Self::Exact)
                .map_err(|_| AuditError::InvalidRepositoryFilter {
                    input: input.to_owned(),
                }),
            None => Ok(Self::Fragment(trimmed.to_owned())),
        }
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, AuditError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AuditError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AuditError, PersonalAccessToken, RepositoryFilter, RepositoryRef};

    #[rstest]
    fn parses_exact_repository_filter() {
        let filter = RepositoryFilter::parse("genuinetools/audit").expect("filter should parse");

        let expected =
            RepositoryRef::from_owner_repo("genuinetools", "audit").expect("reference is valid");
        assert_eq!(filter, RepositoryFilter::Exact(expected));
    }

    #[rstest]
    fn parses_name_fragment() {
        let filter = RepositoryFilter::parse(" audit ").expect("fragment should parse");
        assert_eq!(filter, RepositoryFilter::Fragment("audit".to_owned()));
    }

    #[rstest]
    #[case::blank("  ")]
    #[case::missing_owner("/audit")]
    #[case::missing_name("genuinetools/")]
    #[case::nested_path("genuinetools/audit/tree")]
    fn rejects_malformed_filters(#[case] input: &str) {
        let result = RepositoryFilter::parse(input);
        assert!(
            matches!(result, Err(AuditError::InvalidRepositoryFilter { .. })),
            "expected InvalidRepositoryFilter for {input:?}, got {result:?}"
        );
    }

    #[rstest]
    fn rejects_empty_token() {
        let result = PersonalAccessToken::new("   ");
        assert!(
            matches!(result, Err(AuditError::MissingToken)),
            "expected MissingToken, got {result:?}"
        );
    }

    #[rstest]
    fn token_debug_output_is_redacted() {
        let token = PersonalAccessToken::new("ghp_secret").expect("token should be valid");
        assert_eq!(format!("{token:?}"), "PersonalAccessToken(***)");
    }
}
