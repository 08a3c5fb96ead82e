//! GraphQL documents sent by the GraphQL gateway.

/// Fields fetched for every audited repository.
const REPOSITORY_FRAGMENT: &str = r#"
fragment AuditedRepository on Repository {
  owner { login }
  name
  mergeCommitAllowed
  squashMergeAllowed
  rebaseMergeAllowed
  refs(first: 100, refPrefix: "refs/heads/") {
    totalCount
    nodes { name }
  }
  branchProtectionRules(first: 100) {
    totalCount
    nodes { pattern }
  }
  deployKeys(first: 100) {
    totalCount
    nodes { id title readOnly }
  }
  collaborators(first: 100) {
    totalCount
    edges {
      permission
      node { login }
    }
  }
}
"#;

pub(super) const VIEWER_LOGIN: &str = "query { viewer { login } }";

/// Which root field owns the listed repositories.
#[derive(Debug, Clone, Copy)]
pub(super) enum OwnerKind {
    User,
    Organization,
}

impl OwnerKind {
    const fn field(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organization => "organization",
        }
    }
}

/// Repository listing for a user or organisation, aliased to `owner`.
pub(super) fn owner_repositories(kind: OwnerKind) -> String {
    format!(
        r"query ownerRepositories($login: String!, $affiliations: [RepositoryAffiliation]!, $cursor: String) {{
  owner: {field}(login: $login) {{
    repositories(
      first: 100,
      affiliations: $affiliations,
      orderBy: {{field: STARGAZERS, direction: DESC}},
      after: $cursor
    ) {{
      totalCount
      pageInfo {{ endCursor hasNextPage }}
      nodes {{ ...AuditedRepository }}
    }}
  }}
}}
{REPOSITORY_FRAGMENT}",
        field = kind.field()
    )
}

pub(super) fn repository() -> String {
    format!(
        r"query repository($owner: String!, $name: String!) {{
  repository(owner: $owner, name: $name) {{ ...AuditedRepository }}
}}
{REPOSITORY_FRAGMENT}"
    )
}

pub(super) fn search() -> String {
    format!(
        r"query searchRepositories($query: String!) {{
  search(query: $query, type: REPOSITORY, first: 100) {{
    nodes {{ ... on Repository {{ ...AuditedRepository }} }}
  }}
}}
{REPOSITORY_FRAGMENT}"
    )
}

#[cfg(test)]
mod tests {
    use super::{OwnerKind, owner_repositories, repository, search};

    #[test]
    fn listing_aliases_root_field_to_owner() {
        let query = owner_repositories(OwnerKind::Organization);
        assert!(query.contains("owner: organization(login: $login)"));
        assert!(query.contains("fragment AuditedRepository on Repository"));
    }

    #[test]
    fn every_document_carries_the_fragment() {
        for document in [repository(), search(), owner_repositories(OwnerKind::User)] {
            assert!(document.contains("...AuditedRepository"));
            assert!(document.contains("fragment AuditedRepository"));
        }
    }
}
